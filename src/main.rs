//! MailVerify - Terminal wizard for email verification tasks
//!
//! This application collects an email provider, a username and a password
//! through a step-by-step terminal wizard and queues a verification task
//! for the selected store.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use mailverify::constants::{APP_BINARY_NAME, APP_NAME};
use mailverify::models::{Endpoint, StoreRef};
use mailverify::tui::TaskCreationForm;
use mailverify::wizard::BindingFailurePolicy;
use mailverify::{app, config::Config, logging};

/// MailVerify - Terminal wizard for email verification tasks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Store the verification tasks run for
    #[arg(short, long, value_name = "NAME", default_value = "Default Store")]
    store: String,

    /// Proxy endpoint handed to new tasks (repeatable)
    #[arg(short, long = "proxy", value_name = "URL")]
    proxies: Vec<String>,

    /// Provider catalog file replacing the built-in catalog
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Use this config file instead of the platform default
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Abort a wizard step when one of its key bindings cannot be registered
    #[arg(long)]
    strict_bindings: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write the default configuration and exit
    #[arg(long)]
    init_config: bool,

    /// Print the provider catalog and exit
    #[arg(long)]
    list_providers: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        let config = Config::new();
        let path = match &cli.config {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => config.save()?,
        };
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(catalog) = cli.catalog {
        config.paths.catalog = Some(catalog);
    }
    if cli.strict_bindings {
        config.wizard.binding_failures = BindingFailurePolicy::Strict;
    }
    config.validate().context("Invalid configuration")?;

    let catalog = config.load_catalog()?;

    if cli.list_providers {
        for line in app::list_providers(&catalog) {
            println!("{line}");
        }
        return Ok(());
    }

    // Hold the guard until exit so buffered log lines are flushed
    let log_dir = config.log_dir()?;
    let _log_guard = logging::init_logging(&log_dir, cli.verbose)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        "{APP_NAME} starting"
    );

    if cli.store.trim().is_empty() {
        anyhow::bail!("Store name must not be empty (see `{APP_BINARY_NAME} --help`)");
    }

    let form = TaskCreationForm::new(
        StoreRef::new(cli.store),
        cli.proxies.into_iter().map(Endpoint::new).collect(),
    );

    app::run_wizard_terminal(config, catalog, form)
}
