//! Command dispatch: loads settings, builds the catalog and runs one command.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::service_container::forest_json;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `hscode --help`".to_string(),
        ));
    };

    // Commands that need no tariff table
    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config { command } => return _config(cli, command),
        _ => {}
    }

    let container = ServiceContainer::new(load_settings(cli)?);
    match command {
        Commands::Search { query, top } => {
            _search(&container, &Commands::query_text(query), *top)
        }
        Commands::Candidates { query, json } => {
            _candidates(&container, &Commands::query_text(query), *json)
        }
        Commands::Classify { query } => _classify(&container, &Commands::query_text(query)),
        Commands::Tree { code } => _tree(&container, code.as_deref()),
        Commands::Export { output } => _export(&container, output.as_deref()),
        Commands::Chapters => _chapters(&container),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config_dir.as_deref())?;
    if let Some(table) = &cli.table {
        settings.table_path = table.clone();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(container))]
fn _search(container: &ServiceContainer, query: &str, top: Option<usize>) -> CliResult<()> {
    let top = top.unwrap_or(container.settings.top);
    if top == 0 {
        return Err(CliError::InvalidArgs("--top must be at least 1".to_string()));
    }
    let catalog = container.catalog_service()?;

    let ranked = catalog.rank(query, top);
    if ranked.is_empty() {
        return Err(CliError::NotFound(format!("no chapter matches {:?}", query)));
    }

    output::header(&format!("Chapters for \"{}\"", query));
    for chapter in ranked {
        output::detail(&format!(
            "{:>10.2}  {}  {}",
            chapter.score,
            chapter.code.green(),
            chapter.local_text
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _candidates(container: &ServiceContainer, query: &str, as_json: bool) -> CliResult<()> {
    let catalog = container.catalog_service()?;
    let lookup = catalog
        .lookup(query)
        .ok_or_else(|| CliError::NotFound(format!("no chapter matches {:?}", query)))?;

    if as_json {
        let value = json!({
            "chapter": {
                "code": lookup.chapter.code,
                "localText": lookup.chapter.local_text,
            },
            "candidates": lookup.candidates,
        });
        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| InfraError::json("serialize candidates", e))?;
        output::info(&text);
        return Ok(());
    }

    output::header(&format!(
        "{}  {}",
        lookup.chapter.code, lookup.chapter.local_text
    ));
    if lookup.candidates.is_empty() {
        output::warning("chapter has no descendants");
    }
    for candidate in &lookup.candidates {
        output::detail(&format!(
            "{:<12} {}",
            candidate.code.green(),
            candidate.local_text
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _classify(container: &ServiceContainer, query: &str) -> CliResult<()> {
    if container.settings.candidate_limit == 0 {
        return Err(CliError::InvalidArgs(
            "candidate_limit must be at least 1".to_string(),
        ));
    }
    let catalog = container.catalog_service()?;
    let service = container.classification_service(catalog);

    let outcome = service
        .classify(query)?
        .ok_or_else(|| CliError::NotFound(format!("no chapter matches {:?}", query)))?;

    output::action(
        "Chapter",
        &format!("{}  {}", outcome.chapter.code, outcome.chapter.local_text),
    );
    output::action("HS code", &outcome.classification.code);
    output::detail(&outcome.classification.reason);
    output::detail(&format!("{} candidates considered", outcome.considered));
    Ok(())
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, code: Option<&str>) -> CliResult<()> {
    let catalog = container.load_catalog()?;
    let tree = catalog
        .tree()
        .to_tree_string(code)
        .ok_or_else(|| CliError::NotFound(format!("code {}", code.unwrap_or_default())))?;
    output::info(&tree);
    Ok(())
}

#[instrument(skip(container))]
fn _export(container: &ServiceContainer, target: Option<&Path>) -> CliResult<()> {
    let catalog = container.load_catalog()?;
    let text = forest_json(catalog.tree())?;

    match target {
        Some(path) => {
            std::fs::write(path, text)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!(
                "HS tree JSON saved to {} ({} nodes)",
                path.display(),
                catalog.tree().len()
            ));
        }
        None => output::info(&text),
    }
    Ok(())
}

#[instrument(skip(container))]
fn _chapters(container: &ServiceContainer) -> CliResult<()> {
    let catalog = container.load_catalog()?;
    let chapters = catalog.chapters();

    output::header(&format!("{} chapters", chapters.len()));
    for chapter in chapters.chapters() {
        output::detail(&format!(
            "{}  {}  ({} title / {} total words)",
            chapter.code.green(),
            chapter.local_text,
            chapter.title_tokens.len(),
            chapter.all_tokens.len()
        ));
    }
    Ok(())
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            let local_dir = match &cli.config_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()
                    .map_err(|e| InfraError::io("resolve working directory", e))?,
            };
            output::action("Local", &local_config_path(&local_dir).display());
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
