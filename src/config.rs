use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{config::ConfigError, AppError};
use crate::model::log::{ChannelConfig, FlushSettings, BOT_CHANNEL, SITE_CHANNEL};

const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug)]
pub struct Config {
    pub discord_bot_token: String,
    /// Register slash commands to this guild instead of globally
    pub discord_guild_id: Option<u64>,

    pub bot_log_webhook: Option<Url>,
    pub site_log_webhook: Option<Url>,

    /// Command line of the secondary web server, run through the platform shell
    pub site_command: Option<String>,

    pub log_dir: PathBuf,
    pub flush: FlushSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Webhook URLs that are missing or malformed
    /// disable remote delivery for their channel with a warning instead of failing.
    ///
    /// # Arguments
    /// - `lookup` - Returns the raw value for a configuration key
    ///
    /// # Returns
    /// - `Ok(Config)` - Parsed configuration
    /// - `Err(ConfigError::MissingEnvVar)` - `DISCORD_BOT_TOKEN` is not set
    /// - `Err(ConfigError::InvalidValue)` - A numeric value or the guild id failed to parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let defaults = FlushSettings::default();

        Ok(Self {
            discord_bot_token: get("DISCORD_BOT_TOKEN")
                .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            discord_guild_id: get("DISCORD_GUILD_ID")
                .map(|value| parse_guild_id(&value))
                .transpose()?,
            bot_log_webhook: get("BOT_LOG_WEBHOOK")
                .and_then(|value| parse_webhook("BOT_LOG_WEBHOOK", &value)),
            site_log_webhook: get("SITE_LOG_WEBHOOK")
                .and_then(|value| parse_webhook("SITE_LOG_WEBHOOK", &value)),
            site_command: get("SITE_COMMAND"),
            log_dir: get("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            flush: FlushSettings {
                debounce: get_millis(&get, "LOG_DEBOUNCE_MS")?.unwrap_or(defaults.debounce),
                retry_backoff: get_millis(&get, "LOG_RETRY_MS")?
                    .unwrap_or(defaults.retry_backoff),
                send_timeout: get_millis(&get, "LOG_SEND_TIMEOUT_MS")?
                    .unwrap_or(defaults.send_timeout),
                max_retries: get("LOG_MAX_RETRIES")
                    .map(|value| parse_number("LOG_MAX_RETRIES", &value))
                    .transpose()?
                    .unwrap_or(defaults.max_retries),
                max_payload_chars: defaults.max_payload_chars,
            },
        })
    }

    /// Log channels in the order they are created at startup.
    pub fn log_channels(&self) -> Vec<ChannelConfig> {
        vec![
            ChannelConfig::new(BOT_CHANNEL, self.bot_log_webhook.clone()),
            ChannelConfig::new(SITE_CHANNEL, self.site_log_webhook.clone()),
        ]
    }
}

fn get_millis<G>(get: &G, key: &str) -> Result<Option<Duration>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| parse_number::<u64>(key, &value).map(Duration::from_millis))
        .transpose()
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_guild_id(value: &str) -> Result<u64, ConfigError> {
    let id = parse_number::<u64>("DISCORD_GUILD_ID", value)?;
    if id == 0 {
        return Err(ConfigError::InvalidValue {
            key: "DISCORD_GUILD_ID".to_string(),
            value: value.to_string(),
            reason: "snowflake ids are non-zero".to_string(),
        });
    }

    Ok(id)
}

fn parse_webhook(key: &str, value: &str) -> Option<Url> {
    match Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        Ok(url) => {
            tracing::warn!(
                "{} uses unsupported scheme '{}', remote delivery disabled",
                key,
                url.scheme()
            );
            None
        }
        Err(e) => {
            tracing::warn!("{} is not a valid URL ({}), remote delivery disabled", key, e);
            None
        }
    }
}
