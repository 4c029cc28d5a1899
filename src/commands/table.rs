//! Registry of the commands the bot recognizes.

/// Ordered mapping from command name to a human-readable description.
///
/// The table serves two purposes: a command name absent from it is rejected as
/// unknown, and `help` renders it row by row.
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<(&'static str, &'static str)>,
}

impl CommandTable {
    /// Returns true if `name` is a registered command.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == name)
    }

    /// Commands and their descriptions, in display order.
    pub fn entries(&self) -> &[(&'static str, &'static str)] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        CommandTable {
            entries: vec![
                ("help", "show this help message"),
                ("ping", "show the bot uptime"),
                ("exit", "shut the bot down"),
                ("quit", "shut the bot down"),
                ("list", "list the tracked filter topics"),
                ("add", "add filter topics"),
                ("del", "remove filter topics"),
                ("clear", "remove every filter topic"),
                ("raise", "raise the filter tweet count"),
            ],
        }
    }
}
