//! Line-oriented driver for an interactive saved-query session.
//!
//! Each input line is one command:
//!
//! | command          | effect                                          |
//! |------------------|-------------------------------------------------|
//! | `draft <text>`   | replace the draft query                         |
//! | `key <field>`    | toggle the search key                           |
//! | `builder <text>` | deliver a structured builder result             |
//! | `save`           | save the current pair                           |
//! | `edit <id>`      | load a saved query into the draft               |
//! | `delete <id>`    | delete a saved query                            |
//! | `select <id>`    | emit a saved query and end the session          |
//! | `apply`          | emit the draft and end the session              |
//! | `cancel`         | end the session without emitting                |
//! | `show`           | print draft, key, fields and saved queries      |
//! | `help`           | list commands                                   |
//!
//! End of input cancels the session. Storage failures and unknown IDs are
//! reported and the session continues.

use std::io::{BufRead, Write};

use crate::bridge::BuilderRequest;
use crate::controller::SavedQueryController;
use crate::domain::{QueryId, QuerySelection};
use crate::editor::InputOutcome;
use crate::output::{self, OutputConfig, OutputMode};

const HELP: &str = "\
commands: draft <text>, key <field>, builder <text>, save, edit <id>,
          delete <id>, select <id>, apply, cancel, show, help";

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A selection was emitted to the consumer.
    Selected(QuerySelection),
    /// The session ended without emitting.
    Cancelled,
}

/// Parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command<'a> {
    Draft(&'a str),
    Key(&'a str),
    Builder(&'a str),
    Save,
    Edit(&'a str),
    Delete(&'a str),
    Select(&'a str),
    Apply,
    Cancel,
    Show,
    Help,
    Empty,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = line
        .trim_start()
        .split_once(' ')
        .unwrap_or((line.trim_start(), ""));

    match word {
        "draft" => Command::Draft(rest),
        "key" => Command::Key(rest.trim()),
        "builder" => Command::Builder(rest),
        "save" => Command::Save,
        "edit" => Command::Edit(rest.trim()),
        "delete" => Command::Delete(rest.trim()),
        "select" => Command::Select(rest.trim()),
        "apply" => Command::Apply,
        "cancel" => Command::Cancel,
        "show" => Command::Show,
        "help" => Command::Help,
        "" => Command::Empty,
        other => Command::Unknown(other),
    }
}

/// Run a session over `input` until it ends, writing feedback to `out`.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails. Session
/// level failures are reported on `out`.
pub async fn run_session<R: BufRead, W: Write>(
    mut controller: SavedQueryController,
    input: R,
    out: &mut W,
    mode: OutputMode,
    config: &OutputConfig,
) -> anyhow::Result<SessionOutcome> {
    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Command::Draft(text) => {
                if controller.handle_text_input(text) == InputOutcome::Commit {
                    output::write_message(out, &format!("draft: {}", controller.draft()))?;
                }
            }
            Command::Key(field) => {
                let key = controller.toggle_search_key(field).to_string();
                output::write_message(out, &format!("search key: {key}"))?;
            }
            Command::Builder(text) => {
                let builder = |_: &BuilderRequest| -> Option<String> { Some(text.to_string()) };
                controller.run_builder(&builder);
            }
            Command::Save => match controller.save().await {
                Ok(saved) => {
                    let msg = format!("saved {}", saved.id);
                    output::write_message(out, &output::success(&msg, config))?;
                }
                Err(e) => {
                    let msg = format!("could not save query: {e}");
                    output::write_message(out, &output::warning(&msg, config))?;
                }
            },
            Command::Edit(id) => {
                if let Err(e) = controller.edit_saved(&QueryId::new(id)) {
                    output::write_message(out, &output::error(&e.to_string(), config))?;
                }
            }
            Command::Delete(id) => match controller.delete_saved(&QueryId::new(id)).await {
                Ok(()) => {
                    output::write_message(out, &output::success(&format!("deleted {id}"), config))?;
                }
                Err(e) if e.is_storage() => {
                    let msg = format!("could not delete query: {e}");
                    output::write_message(out, &output::warning(&msg, config))?;
                }
                Err(e) => {
                    output::write_message(out, &output::error(&e.to_string(), config))?;
                }
            },
            Command::Select(id) => match controller.select_saved(&QueryId::new(id)) {
                Ok(selection) => return Ok(SessionOutcome::Selected(selection)),
                Err((returned, e)) => {
                    controller = returned;
                    output::write_message(out, &output::error(&e.to_string(), config))?;
                }
            },
            Command::Apply => return Ok(SessionOutcome::Selected(controller.apply())),
            Command::Cancel => {
                controller.cancel();
                return Ok(SessionOutcome::Cancelled);
            }
            Command::Show => show(&controller, out, mode, config)?,
            Command::Help => output::write_message(out, HELP)?,
            Command::Empty => {}
            Command::Unknown(word) => {
                let msg = format!("unknown command '{word}' (try 'help')");
                output::write_message(out, &output::error(&msg, config))?;
            }
        }
    }

    tracing::debug!("Session input closed");
    controller.cancel();
    Ok(SessionOutcome::Cancelled)
}

fn show<W: Write>(
    controller: &SavedQueryController,
    out: &mut W,
    mode: OutputMode,
    config: &OutputConfig,
) -> std::io::Result<()> {
    if mode == OutputMode::Json {
        let fields: Vec<_> = controller
            .selector()
            .rows()
            .map(|(name, checked)| serde_json::json!({ "name": name, "checked": checked }))
            .collect();
        return output::write_json(
            out,
            &serde_json::json!({
                "draft": controller.draft(),
                "search_key": controller.search_key(),
                "fields": fields,
                "saved": controller.saved(),
            }),
        );
    }

    output::write_message(out, &format!("draft: {}", controller.draft()))?;
    output::write_message(out, &format!("search key: {}", controller.search_key()))?;
    output::write_fields(out, controller.selector(), mode, config)?;
    output::write_queries(out, controller.saved(), mode, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::draft_keeps_inner_spaces("draft name = 'a b'", Command::Draft("name = 'a b'"))]
    #[case::bare_draft("draft", Command::Draft(""))]
    #[case::key("key  score ", Command::Key("score"))]
    #[case::select_crlf("select q-abc123\r\n", Command::Select("q-abc123"))]
    #[case::apply("apply", Command::Apply)]
    #[case::blank("   ", Command::Empty)]
    #[case::unknown("frobnicate now", Command::Unknown("frobnicate"))]
    fn parses_commands(#[case] line: &str, #[case] expected: Command<'_>) {
        assert_eq!(parse_command(line), expected);
    }
}
