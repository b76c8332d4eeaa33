//! Splitting of flushed batches into webhook-sized payloads.

use crate::model::log::LogEntry;

/// One webhook payload and the entries it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub entries: Vec<LogEntry>,
    pub content: String,
}

/// Groups entries into payloads of at most `max_chars` characters.
///
/// Lines are joined with `\n` and payloads only break between lines, so order is
/// preserved across the returned sequence. A single line longer than `max_chars` gets a
/// payload of its own and is truncated on a character boundary.
pub fn split_batch(entries: Vec<LogEntry>, max_chars: usize) -> Vec<Payload> {
    let max_chars = max_chars.max(1);
    let mut payloads = Vec::new();
    let mut current = Payload {
        entries: Vec::new(),
        content: String::new(),
    };
    let mut current_chars = 0;

    for entry in entries {
        let line_chars = entry.line().chars().count();
        let separator = usize::from(!current.entries.is_empty());

        if !current.entries.is_empty() && current_chars + separator + line_chars > max_chars {
            payloads.push(std::mem::replace(
                &mut current,
                Payload {
                    entries: Vec::new(),
                    content: String::new(),
                },
            ));
            current_chars = 0;
        }

        if !current.entries.is_empty() {
            current.content.push('\n');
            current_chars += 1;
        }

        if line_chars > max_chars {
            current.content.extend(entry.line().chars().take(max_chars));
            current_chars += max_chars;
        } else {
            current.content.push_str(entry.line());
            current_chars += line_chars;
        }
        current.entries.push(entry);
    }

    if !current.entries.is_empty() {
        payloads.push(current);
    }

    payloads
}
