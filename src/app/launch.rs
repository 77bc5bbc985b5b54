use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::models::ProviderCatalog;
use crate::tasks::{DryRunRunner, TaskRunner};
use crate::tui::{self, AppState, TaskCreationForm};
use crate::wizard::{ProviderCatalogRenderer, Transcript};

/// Starts the terminal application on the task creation page.
pub fn run_wizard_terminal(
    config: Config,
    catalog: ProviderCatalog,
    form: TaskCreationForm,
) -> Result<()> {
    run_with_runner(config, catalog, form, Arc::new(DryRunRunner))
}

/// Starts the terminal application with tasks executed by `runner`.
pub fn run_with_runner(
    config: Config,
    catalog: ProviderCatalog,
    form: TaskCreationForm,
    runner: Arc<dyn TaskRunner>,
) -> Result<()> {
    info!(
        store = %form.store.name,
        proxies = form.proxies.len(),
        providers = catalog.len(),
        "Starting terminal"
    );

    let mut app_state = AppState::new(config, catalog, form, runner);

    // Initialize TUI
    let mut terminal = tui::setup_terminal()?;

    // Run main TUI loop
    let result = tui::run_tui(&mut app_state, &mut terminal);

    // Restore terminal
    tui::restore_terminal(terminal)?;

    // Wait for submitted tasks before leaving
    app_state.queue.shutdown();

    // Check for errors
    result
}

/// Renders the provider grid as plain text lines.
#[must_use]
pub fn list_providers(catalog: &ProviderCatalog) -> Vec<String> {
    let mut transcript = Transcript::new();
    ProviderCatalogRenderer::render(catalog, &mut transcript);
    transcript.plain_lines()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderDescriptor;

    #[test]
    fn test_list_providers_prints_grid() {
        let catalog = ProviderCatalog::new(vec![
            ProviderDescriptor::new("gmail", "Gmail", "imap.gmail.com"),
            ProviderDescriptor::new("aol", "AOL", "imap.aol.com"),
        ])
        .unwrap();

        let lines = list_providers(&catalog);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[ 0] Gmail"));
        assert!(lines[0].ends_with("[ 1] AOL"));
    }
}
