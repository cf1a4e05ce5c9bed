//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `init`: Initialize a querydeck repository
//! - `list`: List saved queries
//! - `save`: Save a constraint with its search key
//! - `delete`: Delete a saved query
//! - `apply`: Select a saved query and print the emitted pair
//! - `fields`: Show a class's fields with the search key checked
//! - `operators`: Show the constraint operator reference
//! - `session`: Run an interactive editing session from stdin
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! querydeck save --constraint 'score>10' --key username
//! querydeck list
//! querydeck apply q-a1b2c3
//! ```

mod args;
mod execute;
mod session;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{
    ApplyArgs, DeleteArgs, FieldsArgs, InitArgs, ListArgs, SaveArgs, SchemaArgs, SessionArgs,
};
pub use session::{SessionOutcome, run_session};
pub use validators::{validate_field_name, validate_prefix, validate_query_id};

/// Querydeck - saved queries for a schema-backed data browser
///
/// Keep reusable constraints with their search keys in `.querydeck/queries.jsonl`
/// and hand the chosen one to whatever runs the query.
#[derive(Parser, Debug)]
#[command(name = "querydeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new querydeck repository
    ///
    /// Creates the `.querydeck/` directory with configuration and an empty
    /// saved-query file.
    Init(InitArgs),

    /// List saved queries in the order they were saved
    List(ListArgs),

    /// Save a constraint and search key for later reuse
    Save(SaveArgs),

    /// Delete a saved query permanently
    Delete(DeleteArgs),

    /// Select a saved query and print the `(constraint, search key)` pair
    Apply(ApplyArgs),

    /// Show the fields of a class with the search key checked
    Fields(FieldsArgs),

    /// Show the constraint operator reference
    Operators,

    /// Run an editing session, reading commands from stdin
    ///
    /// Type `help` in the session for the command list. End of input cancels.
    Session(SessionArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns any error raised by the command.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            Some(Commands::List(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_list(&app, args, output_mode)
            }
            Some(Commands::Save(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_save(&mut app, args, output_mode).await
            }
            Some(Commands::Delete(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_delete(&mut app, args, output_mode).await
            }
            Some(Commands::Apply(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_apply(app, args, output_mode)
            }
            Some(Commands::Fields(args)) => execute::execute_fields(args, output_mode),
            Some(Commands::Operators) => execute::execute_operators(output_mode),
            Some(Commands::Session(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_session(app, args, output_mode).await
            }
            None => {
                println!("querydeck saved-query manager");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parse_no_command() {
        let cli = Cli::try_parse_from(["querydeck"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn parse_global_json_flag() {
        let cli = Cli::try_parse_from(["querydeck", "list", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::List(_))));
    }

    #[test]
    fn parse_save() {
        let cli =
            Cli::try_parse_from(["querydeck", "save", "--constraint", "score>10", "-k", "username"])
                .unwrap();
        match cli.command {
            Some(Commands::Save(args)) => {
                assert_eq!(args.constraint, "score>10");
                assert_eq!(args.key.as_deref(), Some("username"));
            }
            other => panic!("Expected Save command, got {other:?}"),
        }
    }

    #[rstest]
    #[case::tab("name=\"a\tb\"")]
    #[case::multiline("a\nb")]
    #[case::operators(r#"{"score":{"$gte":10}}"#)]
    fn parse_save_keeps_constraint_verbatim(#[case] constraint: &str) {
        let cli = Cli::try_parse_from(["querydeck", "save", "--constraint", constraint]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Save(args)) if args.constraint == constraint));
    }

    #[test]
    fn parse_session_query_keeps_control_characters() {
        let cli = Cli::try_parse_from([
            "querydeck", "session", "--schema", "s.json", "--class", "GameScore", "--query",
            "a\tb\nc",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Session(args)) => assert_eq!(args.query, "a\tb\nc"),
            other => panic!("Expected Session command, got {other:?}"),
        }
    }

    #[test]
    fn parse_save_allows_empty_constraint() {
        let cli = Cli::try_parse_from(["querydeck", "save", "--constraint", ""]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Save(args)) if args.constraint.is_empty()));
    }

    #[test]
    fn parse_session() {
        let cli = Cli::try_parse_from([
            "querydeck", "session", "--schema", "s.json", "--class", "GameScore", "-q", "a>1",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Session(args)) => {
                assert_eq!(args.schema.class_name, "GameScore");
                assert_eq!(args.query, "a>1");
                assert!(args.key.is_none());
            }
            other => panic!("Expected Session command, got {other:?}"),
        }
    }

    #[rstest]
    #[case::bad_id(&["querydeck", "delete", "not_an_id"])]
    #[case::bad_prefix(&["querydeck", "init", "--prefix", "a-b"])]
    #[case::spaced_key(&["querydeck", "save", "-c", "x", "-k", "a b"])]
    #[case::missing_class(&["querydeck", "fields", "--schema", "s.json"])]
    fn parse_rejects(#[case] argv: &[&str]) {
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
