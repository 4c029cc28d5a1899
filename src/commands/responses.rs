//! Response formatters for bot commands.
//!
//! Slack renders text between triple backticks as a monospace block, which is
//! what [`format_table`] relies on to align its columns.

/// Delimiter of a Slack preformatted block.
const BLOCK_DELIMITER: &str = "```";

/// Placeholder rendered for an empty table.
const EMPTY_PLACEHOLDER: &str = "<empty>";

/// Header labels of the filter table.
const HEADER_KEY: &str = "Filter Topic";
const HEADER_VALUE: &str = "Tweet Count";

/// Renders an ordered list of name/value pairs as an aligned monospace block.
///
/// Each line is the key padded to the width of the longest key, followed by
/// ` : ` and the value, in the order given. With `with_header`, a
/// `Filter Topic : Tweet Count` line comes first and its label takes part in
/// the width computation.
///
/// An empty list renders the `<empty>` placeholder, header or not.
///
/// # Examples
///
/// ```
/// let table = format_table(&[("a", "1"), ("bb", "2")], false);
/// assert_eq!(table, "```\na  : 1\nbb : 2\n```");
/// ```
pub fn format_table<K, V>(entries: &[(K, V)], with_header: bool) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if entries.is_empty() {
        return wrap_block(EMPTY_PLACEHOLDER);
    }

    let mut width = entries
        .iter()
        .map(|(key, _)| key.as_ref().chars().count())
        .max()
        .unwrap_or(0);
    if with_header {
        width = width.max(HEADER_KEY.chars().count());
    }

    let mut lines = Vec::with_capacity(entries.len() + 1);
    if with_header {
        lines.push(format_row(HEADER_KEY, HEADER_VALUE, width));
    }
    lines.extend(
        entries
            .iter()
            .map(|(key, value)| format_row(key.as_ref(), value.as_ref(), width)),
    );

    wrap_block(&lines.join("\n"))
}

fn format_row(key: &str, value: &str, width: usize) -> String {
    format!("{:<width$} : {}", key, value, width = width)
}

fn wrap_block(body: &str) -> String {
    format!("{}\n{}\n{}", BLOCK_DELIMITER, body, BLOCK_DELIMITER)
}

/// Formats the reply for a command name missing from the command table.
///
/// # Examples
///
/// ```
/// assert_eq!(format_unknown_command("dance"), "Unknown Command: \"dance\"");
/// ```
pub fn format_unknown_command(name: &str) -> String {
    format!("Unknown Command: \"{}\"", name)
}

/// Formats the reply for a message that could not be tokenized.
pub fn format_parse_error(reason: &str) -> String {
    format!("Unable to parse command: {}", reason)
}

/// Formats the ping reply.
///
/// # Examples
///
/// ```
/// assert_eq!(
///     format_uptime("safehouse", "0:00:05"),
///     "safehouse is active, current uptime: 0:00:05"
/// );
/// ```
pub fn format_uptime(bot_name: &str, elapsed: &str) -> String {
    format!("{} is active, current uptime: {}", bot_name, elapsed)
}

/// Formats the notice sent before the bot shuts down.
pub fn format_shutdown_notice() -> String {
    ":wave: Shutting down, goodbye master.".to_owned()
}
