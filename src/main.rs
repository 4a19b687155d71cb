//! Command line front end for a local translation project library.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{
    Parser,
    Subcommand,
};
use local_localizator::config::{
    ConfigManager,
    FileMatcher,
};
use local_localizator::storage::{
    DirectoryDialogs,
    LocalFileSystem,
    ProjectStore,
};
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "local-localizator", version, about = "Manage encrypted translation projects")]
struct Cli {
    /// Directory holding `settings.json` and the project library.
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// List the projects of the library.
    Scan,
    /// Create a project from the translation files found under a directory.
    Import {
        /// Directory searched for translation files.
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
    /// Re-save every project and rewrite its language files.
    Export,
}

/// Logs to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

/// Settings loaded from `data_dir` or the platform default.
fn config_manager(data_dir: Option<PathBuf>) -> Result<ConfigManager, Box<dyn std::error::Error>> {
    let mut manager = match data_dir {
        Some(data_dir) => ConfigManager::new(data_dir),
        None => ConfigManager::with_default_data_dir()?,
    };
    manager.load_settings()?;
    Ok(manager)
}

/// Executes one subcommand.
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let manager = config_manager(cli.data_dir)?;
    let settings = manager.get_settings();
    let crypto = manager.encryption_context()?;
    let store =
        ProjectStore::new(Arc::new(LocalFileSystem), Arc::new(crypto), manager.projects_dir())
            .with_settings(settings);

    match cli.command {
        Command::Scan => {
            let projects = store.scan().await?;
            for project in &projects {
                tracing::info!(
                    name = project.name(),
                    progress = project.progress(),
                    status = ?project.status(),
                    empty = project.empty_slots_as_string(),
                    "{}",
                    project.filename()
                );
            }
            tracing::info!(count = projects.len(), "Scan finished");
        }
        Command::Import { dir } => {
            let matcher = FileMatcher::new(dir, &settings.import)?;
            let dialogs = DirectoryDialogs::new(matcher);
            let outcome = store.import_with_dialog(&dialogs).await;
            for project in &outcome.imported {
                tracing::info!(name = project.name(), "Imported project file");
            }
            match outcome.created {
                Some(mut project) => {
                    let report = store.save(&mut project).await?;
                    tracing::info!(
                        name = project.name(),
                        languages = project.languages().len(),
                        written = report.written.len(),
                        failed = report.failed.len(),
                        "Project created"
                    );
                }
                None => {
                    if let Some(e) = outcome.translation_error {
                        return Err(e.into());
                    }
                    if outcome.imported.is_empty() {
                        tracing::warn!("No translation files found");
                    }
                }
            }
        }
        Command::Export => {
            let report = store.save_all().await?;
            for (project, export) in &report.saved {
                tracing::info!(name = project.name(), written = export.written.len(), "Exported");
            }
            let incomplete = report.saved.len() - report.complete_count();
            if incomplete > 0 {
                tracing::warn!(incomplete, "Some language files could not be written");
            }
            if !report.failed.is_empty() {
                return Err(format!("{} project(s) could not be saved", report.failed.len()).into());
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "local-localizator failed");
            ExitCode::FAILURE
        }
    }
}
