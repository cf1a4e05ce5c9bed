//! Command execution logic.

use anyhow::Result;
use std::io::{self, Write};

use super::args::{ApplyArgs, DeleteArgs, FieldsArgs, InitArgs, ListArgs, SaveArgs, SessionArgs};
use super::session::{SessionOutcome, run_session};
use crate::app::App;
use crate::controller::{SavedQueryController, SelectionConsumer};
use crate::domain::{DEFAULT_SEARCH_KEY, QueryId};
use crate::error::Error;
use crate::help::OPERATORS;
use crate::output::{self, OutputConfig, OutputMode};
use crate::schema::{SchemaProvider, StaticSchemaProvider};
use crate::selector::SearchKeySelector;

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;
    let result = init::init(&current_dir, args.prefix.as_deref()).await?;

    if !args.quiet {
        println!("Initialized querydeck in {}", result.querydeck_dir.display());
        println!("  Config:  {}", result.config_file.display());
        println!("  Queries: {}", result.queries_file.display());
        println!("  ID prefix: {}", result.prefix);
    }

    Ok(())
}

/// Execute the list command
pub fn execute_list(app: &App, args: &ListArgs, output_mode: OutputMode) -> Result<()> {
    let queries = app.store().list();
    let shown = &queries[..args.limit.unwrap_or(queries.len()).min(queries.len())];

    let config = OutputConfig::from_env();
    output::write_queries(&mut io::stdout().lock(), shown, output_mode, &config)?;
    Ok(())
}

/// Execute the save command
pub async fn execute_save(app: &mut App, args: &SaveArgs, output_mode: OutputMode) -> Result<()> {
    let key = args
        .key
        .clone()
        .unwrap_or_else(|| app.config().default_search_key.clone());
    let saved = app.store_mut().add(args.constraint.as_str(), key).await?;

    let config = OutputConfig::from_env();
    let mut stdout = io::stdout().lock();
    match output_mode {
        OutputMode::Json => output::write_json(&mut stdout, &saved)?,
        OutputMode::Text => {
            write!(stdout, "{} ", output::success("Saved", &config))?;
            output::write_query(&mut stdout, &saved, output_mode, &config)?;
        }
    }
    Ok(())
}

/// Execute the delete command
pub async fn execute_delete(
    app: &mut App,
    args: &DeleteArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let id = QueryId::new(args.query_id.as_str());
    let saved = app
        .store()
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::QueryNotFound(id.clone()))?;
    app.store_mut().delete(&saved).await?;

    match output_mode {
        OutputMode::Json => output::write_json(
            &mut io::stdout().lock(),
            &serde_json::json!({ "deleted": id }),
        )?,
        OutputMode::Text => println!("Deleted {id}"),
    }
    Ok(())
}

/// Execute the apply command: select a saved query and print its pair.
pub fn execute_apply(app: App, args: &ApplyArgs, output_mode: OutputMode) -> Result<()> {
    let default_key = app.config().default_search_key.clone();
    let controller = SavedQueryController::new(
        app.into_store(),
        Vec::new(),
        "",
        default_key,
        print_selection(output_mode),
    );

    match controller.select_saved(&QueryId::new(args.query_id.as_str())) {
        Ok(_) => Ok(()),
        Err((controller, e)) => {
            controller.cancel();
            Err(e.into())
        }
    }
}

/// Execute the fields command
pub fn execute_fields(args: &FieldsArgs, output_mode: OutputMode) -> Result<()> {
    let provider = StaticSchemaProvider::from_file(&args.schema.schema)?;
    let fields = provider.fields(&args.schema.class_name)?;
    let key = args.key.as_deref().unwrap_or(DEFAULT_SEARCH_KEY);
    let selector = SearchKeySelector::new(fields, key);

    let config = OutputConfig::from_env();
    output::write_fields(&mut io::stdout().lock(), &selector, output_mode, &config)?;
    Ok(())
}

/// Execute the operators command
pub fn execute_operators(output_mode: OutputMode) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match output_mode {
        OutputMode::Json => {
            let rows: Vec<_> = OPERATORS
                .iter()
                .map(|o| serde_json::json!({ "symbol": o.symbol, "description": o.description }))
                .collect();
            output::write_json(&mut stdout, &rows)?;
        }
        OutputMode::Text => output::write_operators(&mut stdout, OPERATORS, &OutputConfig::from_env())?,
    }
    Ok(())
}

/// Execute the session command, reading session commands from stdin.
pub async fn execute_session(app: App, args: &SessionArgs, output_mode: OutputMode) -> Result<()> {
    let provider = StaticSchemaProvider::from_file(&args.schema.schema)?;
    let fields = provider.fields(&args.schema.class_name)?;
    let key = args
        .key
        .clone()
        .unwrap_or_else(|| app.config().default_search_key.clone());

    let controller = SavedQueryController::new(
        app.into_store(),
        fields,
        args.query.as_str(),
        key,
        print_selection(output_mode),
    )
    .with_class_name(args.schema.class_name.as_str());

    let config = OutputConfig::from_env();
    let stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    let outcome = run_session(controller, stdin, &mut stdout, output_mode, &config).await?;

    if outcome == SessionOutcome::Cancelled && output_mode == OutputMode::Text {
        println!("Cancelled");
    }
    Ok(())
}

/// Consumer that prints the emitted selection to stdout.
fn print_selection(output_mode: OutputMode) -> SelectionConsumer {
    Box::new(move |selection| {
        let config = OutputConfig::from_env();
        if let Err(e) =
            output::write_selection(&mut io::stdout().lock(), &selection, output_mode, &config)
        {
            tracing::warn!(error = %e, "Failed to print selection");
        }
    })
}
