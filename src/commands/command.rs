//! Command parsing and handling.
//!
//! This module converts the text following a bot mention into a structured
//! [`Command`]. Parsing happens in two steps: the text is split into tokens with
//! shell-style quoting rules ([`CommandInvocation::parse`]), then the command
//! name is checked against the [`CommandTable`] ([`Command::parse`]).

use log::debug;

use crate::commands::{
    responses::{format_parse_error, format_unknown_command},
    table::CommandTable,
};

/// Represents a parsed bot command.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    /// Display the command table
    Help,
    /// Report the uptime
    Ping,
    /// Shut the bot down, triggered by both `exit` and `quit`
    Exit,
    /// List the tracked filter topics
    List,
    /// Add filter topics
    Add,
    /// Remove filter topics
    Del,
    /// Remove every filter topic
    Clear,
    /// Raise the filter tweet count
    Raise,
}

/// A command name and its arguments, extracted from one message.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Lower-cased first token, empty if the message had no token
    pub name: String,
    /// Remaining tokens, quotes removed
    pub args: Vec<String>,
}

/// Errors that can occur during command parsing.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParsingError {
    /// The text could not be tokenized, e.g. because of an unbalanced quote
    UnableToParse(String),
    /// The command name is not in the command table
    Unknown(String),
}

impl CommandInvocation {
    /// Splits a message into a command name and its arguments.
    ///
    /// Tokens follow shell quoting rules, so `add "foo bar" baz` gives the
    /// arguments `foo bar` and `baz`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandParsingError::UnableToParse`] when the quoting is
    /// unbalanced. No partial token list is produced in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// let invocation = CommandInvocation::parse("add \"foo bar\" baz").unwrap();
    /// assert_eq!(invocation.name, "add");
    /// assert_eq!(invocation.args, vec!["foo bar", "baz"]);
    /// ```
    pub fn parse(body: &str) -> Result<Self, CommandParsingError> {
        let mut tokens = shell_words::split(body)
            .map_err(|e| CommandParsingError::UnableToParse(e.to_string()))?
            .into_iter();

        let name = tokens
            .next()
            .map(|token| token.to_lowercase())
            .unwrap_or_default();
        let args = tokens.collect();

        debug!("tokenized command {:?} with arguments {:?}", name, args);

        Ok(CommandInvocation { name, args })
    }
}

impl Command {
    /// Resolves an invocation against the command table.
    ///
    /// An empty command name resolves to [`Command::Help`].
    ///
    /// # Errors
    ///
    /// Returns [`CommandParsingError::Unknown`] if the name is not registered.
    pub fn parse(
        table: &CommandTable,
        invocation: &CommandInvocation,
    ) -> Result<Self, CommandParsingError> {
        let name = invocation.name.as_str();

        // If no command, return help
        if name.is_empty() {
            return Ok(Command::Help);
        }

        if !table.contains(name) {
            return Err(CommandParsingError::Unknown(name.to_owned()));
        }

        match name {
            "help" => Ok(Command::Help),
            "ping" => Ok(Command::Ping),
            "exit" | "quit" => Ok(Command::Exit),
            "list" => Ok(Command::List),
            "add" => Ok(Command::Add),
            "del" => Ok(Command::Del),
            "clear" => Ok(Command::Clear),
            "raise" => Ok(Command::Raise),
            _ => Err(CommandParsingError::Unknown(name.to_owned())),
        }
    }
}

/// Formats a command error into a user-facing message.
///
/// Every parsing error produces a reply, so the user always gets an answer.
pub fn format_command_error(error: &CommandParsingError) -> String {
    match error {
        CommandParsingError::UnableToParse(reason) => format_parse_error(reason),
        CommandParsingError::Unknown(name) => format_unknown_command(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<Command, CommandParsingError> {
        let invocation = CommandInvocation::parse(body)?;
        Command::parse(&CommandTable::default(), &invocation)
    }

    #[test]
    fn test_tokenize_quoted_argument() {
        let invocation = CommandInvocation::parse("add \"foo bar\" baz").unwrap();
        assert_eq!(invocation.name, "add");
        assert_eq!(invocation.args, vec!["foo bar", "baz"]);
    }

    #[test]
    fn test_tokenize_single_quotes() {
        let invocation = CommandInvocation::parse("del 'rust lang'").unwrap();
        assert_eq!(invocation.name, "del");
        assert_eq!(invocation.args, vec!["rust lang"]);
    }

    #[test]
    fn test_tokenize_unbalanced_quote() {
        let result = CommandInvocation::parse("add \"foo");
        assert!(matches!(result, Err(CommandParsingError::UnableToParse(_))));
    }

    #[test]
    fn test_tokenize_lowercases_name_only() {
        let invocation = CommandInvocation::parse("PiNg Foo").unwrap();
        assert_eq!(invocation.name, "ping");
        assert_eq!(invocation.args, vec!["Foo"]);
    }

    #[test]
    fn test_tokenize_empty() {
        let invocation = CommandInvocation::parse("   ").unwrap();
        assert_eq!(invocation.name, "");
        assert!(invocation.args.is_empty());
    }

    #[test]
    fn test_parse_help_command() {
        assert_eq!(parse("help"), Ok(Command::Help));
    }

    #[test]
    fn test_parse_empty_is_help() {
        assert_eq!(parse(""), Ok(Command::Help));
    }

    #[test]
    fn test_parse_ping_command() {
        assert_eq!(parse("ping"), Ok(Command::Ping));
    }

    #[test]
    fn test_parse_exit_and_quit() {
        assert_eq!(parse("exit"), Ok(Command::Exit));
        assert_eq!(parse("quit"), Ok(Command::Exit));
    }

    #[test]
    fn test_parse_filter_commands() {
        assert_eq!(parse("list"), Ok(Command::List));
        assert_eq!(parse("add \"foo bar\" baz"), Ok(Command::Add));
        assert_eq!(parse("del foo"), Ok(Command::Del));
        assert_eq!(parse("clear"), Ok(Command::Clear));
        assert_eq!(parse("raise 10"), Ok(Command::Raise));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse("dance now"),
            Err(CommandParsingError::Unknown("dance".to_owned()))
        );
    }

    #[test]
    fn test_parse_command_missing_from_table() {
        let table = CommandTable::default();
        let invocation = CommandInvocation {
            name: "games".to_owned(),
            args: vec![],
        };
        assert!(matches!(
            Command::parse(&table, &invocation),
            Err(CommandParsingError::Unknown(name)) if name == "games"
        ));
    }

    #[test]
    fn test_format_command_error_unknown() {
        let message = format_command_error(&CommandParsingError::Unknown("dance".to_owned()));
        assert_eq!(message, "Unknown Command: \"dance\"");
    }

    #[test]
    fn test_format_command_error_unable_to_parse() {
        let message = format_command_error(&CommandParsingError::UnableToParse(
            "missing closing quote".to_owned(),
        ));
        assert!(message.contains("missing closing quote"));
    }
}
