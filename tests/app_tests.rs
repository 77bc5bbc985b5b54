//! Tests for application key routing between pages, the wizard and notices.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mailverify::config::{Config, ThemeMode};
use mailverify::constants::{
    EMAIL_VERIFICATION_PAGE, EMAIL_VERIFICATION_VIEW, TASKS_PAGE, TASK_CREATION_PAGE,
};
use mailverify::models::{Endpoint, ProviderCatalog, StoreRef};
use mailverify::tasks::DryRunRunner;
use mailverify::tui::handlers::handle_key_event;
use mailverify::tui::{AppState, TaskCreationForm};
use mailverify::wizard::controller::EMPTY_CATALOG_MESSAGE;
use mailverify::wizard::WizardStep;

fn app_with(catalog: ProviderCatalog) -> AppState {
    let mut config = Config::new();
    config.ui.theme_mode = ThemeMode::Dark;
    let form = TaskCreationForm::new(
        StoreRef::new("Shop"),
        vec![Endpoint::new("socks5://127.0.0.1:1080")],
    );
    AppState::new(config, catalog, form, Arc::new(DryRunRunner))
}

fn app() -> AppState {
    app_with(ProviderCatalog::builtin())
}

fn press(state: &mut AppState, code: KeyCode) -> bool {
    handle_key_event(state, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
}

fn type_line(state: &mut AppState, text: &str) {
    for ch in text.chars() {
        press(state, KeyCode::Char(ch));
    }
    press(state, KeyCode::Enter);
}

#[test]
fn test_enter_on_task_creation_opens_wizard() {
    let mut state = app();

    press(&mut state, KeyCode::Enter);

    assert_eq!(state.pages.active(), EMAIL_VERIFICATION_PAGE);
    assert!(state.pages.is_view_open(EMAIL_VERIFICATION_VIEW));
    assert!(state.wizard.is_active());
    assert_eq!(state.transcript.plain_lines()[0], "Selected store: Shop");
}

#[test]
fn test_full_wizard_queues_task_and_shows_tasks_page() {
    let mut state = app();
    press(&mut state, KeyCode::Enter);

    type_line(&mut state, "0");
    type_line(&mut state, "me@gmail.com");
    type_line(&mut state, "secret");
    assert_eq!(state.wizard.step(), WizardStep::Confirm);
    press(&mut state, KeyCode::Enter);

    assert_eq!(state.pages.active(), TASKS_PAGE);
    assert!(!state.pages.is_view_open(EMAIL_VERIFICATION_VIEW));
    assert_eq!(state.queue.len(), 1);
    assert!(state.status_message.starts_with("Task "));

    let record = &state.queue.records()[0];
    assert_eq!(record.store, "Shop");
    assert_eq!(record.provider, "Gmail");
    assert_eq!(record.username, "me@gmail.com");
    assert_eq!(record.proxies, 1);
}

#[test]
fn test_esc_returns_to_navigation() {
    let mut state = app();
    press(&mut state, KeyCode::Enter);

    press(&mut state, KeyCode::Esc);

    assert_eq!(state.pages.active(), TASK_CREATION_PAGE);
    assert!(state.pages.navigation_focused());
    assert!(!state.wizard.is_active());

    press(&mut state, KeyCode::Right);
    assert_eq!(state.pages.active(), TASKS_PAGE);

    // Any other key hands focus back to the page
    press(&mut state, KeyCode::Char('x'));
    assert!(!state.pages.navigation_focused());
}

#[test]
fn test_rejected_input_shows_dismissible_notice() {
    let mut state = app();
    press(&mut state, KeyCode::Enter);

    type_line(&mut state, "99");
    assert!(state.notice.is_visible());
    assert_eq!(state.wizard.step(), WizardStep::Provider);

    // The dismissing key does not reach the wizard
    press(&mut state, KeyCode::Char('1'));
    assert!(!state.notice.is_visible());
    assert_eq!(state.wizard.state().editor().field().value(), "");
}

#[test]
fn test_empty_catalog_reports_and_stays_on_task_creation() {
    let mut state = app_with(ProviderCatalog::empty());

    press(&mut state, KeyCode::Enter);

    assert_eq!(state.pages.active(), TASK_CREATION_PAGE);
    assert_eq!(state.notice.message(), Some(EMPTY_CATALOG_MESSAGE));
    assert!(!state.wizard.is_active());
    assert_eq!(state.pages.form().store.name, "Shop");
}

#[test]
fn test_tab_and_new_verification_switch_pages() {
    let mut state = app();

    press(&mut state, KeyCode::Tab);
    assert_eq!(state.pages.active(), TASKS_PAGE);

    press(&mut state, KeyCode::Char('n'));
    assert_eq!(state.pages.active(), TASK_CREATION_PAGE);
}

#[test]
fn test_ctrl_c_quits_from_wizard() {
    let mut state = app();
    press(&mut state, KeyCode::Enter);

    let quit = handle_key_event(
        &mut state,
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
    )
    .unwrap();

    assert!(quit);
    assert!(state.should_quit);
}
