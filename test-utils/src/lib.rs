//! Hookline Test Utils
//!
//! Provides shared testing utilities for the hookline log pipeline and bot. This crate
//! offers a builder pattern for creating test contexts with a temporary log directory
//! and, optionally, a mock Discord webhook server.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment holding the log directory and mock server
//! - **webhook**: Helpers mounting canned webhook responses on the mock server
//! - **TestError**: Error types that can occur during test setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_delivery() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_webhook("bot", 204)
//!         .build()
//!         .await?;
//!
//!     let url = test.webhook_url("bot")?;
//!     // Record lines, then inspect test.payloads("bot").await?
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod webhook;
