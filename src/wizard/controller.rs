//! The email verification wizard state machine.
//!
//! [`WizardController`] walks the operator through
//! `Provider -> Username -> Password -> Confirm` and hands the collected
//! credentials to [`TaskHandoff`]. Every key event goes through
//! [`WizardController::handle_key`]: keys bound in the wizard view trigger an
//! [`Action`], everything else is fed to the active [`InputEditor`]. All
//! collaborators are borrowed per call through a [`WizardHost`].

use crossterm::event::KeyEvent;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::bindings::{clear_step_bindings, switch_step_bindings, BindingFailurePolicy};
use super::catalog_grid::ProviderCatalogRenderer;
use super::editor::{EditOutcome, FieldLimits, InputEditor, CONFIRM_CHARS};
use super::handoff::{HandoffError, TaskHandoff};
use super::host::{NavigationError, WizardHost};
use super::output::{Segment, StyleOutput, Tone, Transcript};
use super::state::{WizardState, WizardStep};
use super::validation::{
    parse_provider_choice, require_password, require_username, ValidationError, PROVIDER_PROMPT,
};
use crate::constants::{EMAIL_VERIFICATION_VIEW, TASK_CREATION_PAGE};
use crate::models::{Endpoint, ProviderCatalog, StoreRef};
use crate::shortcuts::{Action, BindingError};

/// Message shown when the wizard is opened without any provider to choose from.
pub const EMPTY_CATALOG_MESSAGE: &str = "No email providers are configured!";

const STORE_LABEL: &str = "Selected store: ";
const USERNAME_PROMPT: &str = "Insert username: ";
const PASSWORD_PROMPT: &str = "Insert password: ";

/// Tunables of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardSettings {
    /// Glyph shown for each password character
    pub mask_glyph: char,
    /// Column budget of the free-text fields
    pub text_limits: FieldLimits,
    /// What to do when a key binding cannot be registered
    pub binding_policy: BindingFailurePolicy,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            mask_glyph: '*',
            text_limits: FieldLimits::default(),
            binding_policy: BindingFailurePolicy::default(),
        }
    }
}

/// Inputs the wizard is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardLaunch {
    /// Store the task is created for
    pub store: StoreRef,
    /// Proxies handed to the task
    pub proxies: Vec<Endpoint>,
}

/// Result of one handled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    /// The input field changed
    Edited,
    /// Nothing happened
    Ignored,
    /// The wizard moved to a new step
    StepChanged(WizardStep),
    /// The step input was rejected; the step was redrawn
    Rejected(ValidationError),
    /// A task was handed off under this id
    Submitted(String),
    /// The wizard was cancelled and closed
    Cancelled,
    /// The wizard was closed with a message
    Exited,
    /// The transcript scrolled
    Scrolled,
}

/// Failures that abort a wizard operation.
#[derive(Debug, Error)]
pub enum WizardError {
    /// A step's key bindings could not be applied under the strict policy
    #[error("failed to update wizard key bindings")]
    Binding(#[from] BindingError),

    /// The confirmed task could not be handed off
    #[error("email verification handoff failed")]
    Handoff(#[from] HandoffError),

    /// Leaving the wizard page failed
    #[error("failed to leave the email verification page")]
    Navigation(#[from] NavigationError),
}

/// Step input that passed validation but is not recorded yet.
enum Accepted {
    Provider(usize),
    Username(String),
    Password,
}

/// Drives one wizard instance.
#[derive(Debug)]
pub struct WizardController {
    state: WizardState,
    catalog: ProviderCatalog,
    settings: WizardSettings,
    scroll: usize,
    active: bool,
}

impl WizardController {
    /// Creates an inactive wizard over `catalog`.
    #[must_use]
    pub fn new(catalog: ProviderCatalog, settings: WizardSettings) -> Self {
        Self {
            state: WizardState::new(),
            catalog,
            settings,
            scroll: 0,
            active: false,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    /// Whether the wizard view is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Provider catalog the wizard chooses from.
    #[must_use]
    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// First visible transcript row.
    #[must_use]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Opens the wizard at the Provider step for `launch`.
    ///
    /// Any previous state is wiped first. With an empty catalog the wizard
    /// exits immediately with a message.
    pub fn activate(
        &mut self,
        launch: WizardLaunch,
        host: &mut WizardHost<'_>,
    ) -> Result<WizardOutcome, WizardError> {
        self.state.reset();
        self.scroll = 0;
        self.state.store = Some(launch.store);
        self.state.proxies = launch.proxies;

        if self.catalog.is_empty() {
            return self.exit_with_message(EMPTY_CATALOG_MESSAGE, host);
        }

        if let Err(err) = switch_step_bindings(
            host.bindings,
            EMAIL_VERIFICATION_VIEW,
            None,
            WizardStep::Provider,
            self.settings.binding_policy,
        ) {
            self.state.reset();
            return Err(err.into());
        }

        self.active = true;
        info!(
            store = ?self.state.store.as_ref().map(|s| s.name.as_str()),
            proxies = self.state.proxies.len(),
            providers = self.catalog.len(),
            "Email verification wizard opened"
        );
        Ok(self.show_step(WizardStep::Provider, host))
    }

    /// Handles one key event.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        host: &mut WizardHost<'_>,
    ) -> Result<WizardOutcome, WizardError> {
        if !self.active {
            return Ok(WizardOutcome::Ignored);
        }

        if let Some(action) = host.bindings.lookup(EMAIL_VERIFICATION_VIEW, key) {
            return self.perform(action, host);
        }

        let WizardState {
            editor,
            credentials,
            ..
        } = &mut self.state;
        match editor.handle_key(key, &mut credentials.typed_secret) {
            EditOutcome::Changed => {
                self.render(host.output);
                Ok(WizardOutcome::Edited)
            }
            EditOutcome::Unchanged | EditOutcome::NotHandled => Ok(WizardOutcome::Ignored),
        }
    }

    /// Runs a bound action.
    pub fn perform(
        &mut self,
        action: Action,
        host: &mut WizardHost<'_>,
    ) -> Result<WizardOutcome, WizardError> {
        if !self.active {
            return Ok(WizardOutcome::Ignored);
        }

        match action {
            Action::Advance => self.advance(host),
            Action::Finalize => self.finalize(host),
            Action::CancelAndExit => self.cancel_and_exit(host),
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                Ok(WizardOutcome::Scrolled)
            }
            Action::ScrollDown => {
                let last = self.line_count().saturating_sub(1);
                self.scroll = (self.scroll + 1).min(last);
                Ok(WizardOutcome::Scrolled)
            }
            Action::Quit => Ok(WizardOutcome::Ignored),
        }
    }

    /// Resets the wizard and returns control to page navigation.
    ///
    /// If the task creation page cannot be shown the wizard stays open as it was.
    pub fn cancel_and_exit(
        &mut self,
        host: &mut WizardHost<'_>,
    ) -> Result<WizardOutcome, WizardError> {
        host.navigation.switch_page(TASK_CREATION_PAGE)?;
        info!(step = ?self.state.step, "Email verification wizard cancelled");
        self.reset(host);

        host.navigation.show_navigation();
        host.navigation.discard_view(EMAIL_VERIFICATION_VIEW)?;
        Ok(WizardOutcome::Cancelled)
    }

    /// Closes the wizard and shows `message` on the task creation page.
    ///
    /// The related task creation form is reset with the current store kept selected.
    pub fn exit_with_message(
        &mut self,
        message: &str,
        host: &mut WizardHost<'_>,
    ) -> Result<WizardOutcome, WizardError> {
        warn!(message, "Email verification wizard exited");
        let store = self.state.store.take();
        self.reset(host);

        host.navigation.reset_task_creation(store.as_ref());
        host.navigation.switch_page(TASK_CREATION_PAGE)?;
        host.errors.report(message);
        Ok(WizardOutcome::Exited)
    }

    /// Wipes all wizard state, including credentials and the selected store.
    pub fn reset(&mut self, host: &mut WizardHost<'_>) {
        self.state.reset();
        self.scroll = 0;
        self.active = false;
        clear_step_bindings(host.bindings, EMAIL_VERIFICATION_VIEW);
        host.output.clear();
    }

    /// Renders the current step into `out`.
    pub fn render(&self, out: &mut dyn StyleOutput) {
        out.clear();

        let field_row = self.state.field_row.min(self.state.lines.len());
        for (row, line) in self.state.lines.iter().enumerate() {
            if row == field_row {
                self.render_field(out);
                out.newline();
            }
            for segment in line {
                out.write(segment.tone, &segment.text);
            }
            out.newline();
        }
        if field_row == self.state.lines.len() {
            self.render_field(out);
        }
    }

    /// Cursor position as `(row, column)` in the rendered transcript.
    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        let row = self.state.field_row.min(self.state.lines.len());
        (row, self.state.editor.field().cursor_column())
    }

    /// Number of rendered rows, input field included.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.state.lines.len() + 1
    }

    fn render_field(&self, out: &mut dyn StyleOutput) {
        let field = self.state.editor.field();
        out.write(Tone::Accent, field.prefix());
        out.write(Tone::Plain, field.value());
    }

    fn advance(&mut self, host: &mut WizardHost<'_>) -> Result<WizardOutcome, WizardError> {
        let step = self.state.step;
        let Some(next) = step.next() else {
            return Ok(WizardOutcome::Ignored);
        };
        let value = self.state.editor.field().value();

        let checked = match step {
            WizardStep::Provider => {
                parse_provider_choice(value, self.catalog.len()).map(Accepted::Provider)
            }
            WizardStep::Username => {
                require_username(value).map(|username| Accepted::Username(username.to_string()))
            }
            WizardStep::Password => {
                require_password(self.state.credentials.typed_secret.char_count())
                    .map(|()| Accepted::Password)
            }
            WizardStep::Confirm => return Ok(WizardOutcome::Ignored),
        };
        let accepted = match checked {
            Ok(accepted) => accepted,
            Err(err) => return Ok(self.reject(err, host)),
        };

        // The record is only written once the next step's bindings are in place
        switch_step_bindings(
            host.bindings,
            EMAIL_VERIFICATION_VIEW,
            Some(step),
            next,
            self.settings.binding_policy,
        )?;

        let credentials = &mut self.state.credentials;
        match accepted {
            Accepted::Provider(index) => credentials.provider = self.catalog.get(index).cloned(),
            Accepted::Username(username) => credentials.username = Some(username),
            Accepted::Password => credentials.password = credentials.typed_secret.take(),
        }
        Ok(self.show_step(next, host))
    }

    fn reject(&mut self, err: ValidationError, host: &mut WizardHost<'_>) -> WizardOutcome {
        debug!(step = ?self.state.step, error = %err, "Rejected wizard input");
        host.errors.report(&err.to_string());

        self.state.credentials.typed_secret.clear();
        self.compose_step();
        self.render(host.output);
        WizardOutcome::Rejected(err)
    }

    fn finalize(&mut self, host: &mut WizardHost<'_>) -> Result<WizardOutcome, WizardError> {
        let confirmed = match self.state.editor.field().value() {
            "" | "Y" | "y" => true,
            "N" | "n" => false,
            _ => return Ok(WizardOutcome::Ignored),
        };

        if confirmed {
            let id = TaskHandoff::execute(&mut self.state, host.navigation, host.scheduler)?;
            self.scroll = 0;
            self.active = false;
            clear_step_bindings(host.bindings, EMAIL_VERIFICATION_VIEW);
            host.output.clear();
            Ok(WizardOutcome::Submitted(id))
        } else {
            self.cancel_and_exit(host)
        }
    }

    fn show_step(&mut self, step: WizardStep, host: &mut WizardHost<'_>) -> WizardOutcome {
        self.state.step = step;
        self.scroll = 0;
        self.compose_step();
        self.render(host.output);

        debug!(step = step.title(), "Entered wizard step");
        WizardOutcome::StepChanged(step)
    }

    /// Rebuilds the transcript and a fresh input field for the current step.
    fn compose_step(&mut self) {
        let step = self.state.step;
        let mut lines = vec![self.store_line()];

        let (editor, field_row) = match step {
            WizardStep::Provider => {
                let mut grid = Transcript::new();
                ProviderCatalogRenderer::render(&self.catalog, &mut grid);

                lines.push(Vec::new());
                lines.extend(grid.lines().iter().cloned());
                (InputEditor::plain(PROVIDER_PROMPT, self.settings.text_limits), 1)
            }
            WizardStep::Username => {
                lines.push(self.provider_line());
                lines.push(label(USERNAME_PROMPT, ""));
                let row = lines.len();
                (InputEditor::plain("", self.settings.text_limits), row)
            }
            WizardStep::Password => {
                let username = self.state.credentials.username.as_deref().unwrap_or_default();
                lines.push(self.provider_line());
                lines.push(label(USERNAME_PROMPT, username));
                lines.push(label(PASSWORD_PROMPT, ""));
                let row = lines.len();
                (
                    InputEditor::masked(self.settings.mask_glyph, self.settings.text_limits),
                    row,
                )
            }
            WizardStep::Confirm => {
                lines = self.summary_lines();
                let row = lines.len();
                (InputEditor::restricted(CONFIRM_CHARS), row)
            }
        };

        self.state.lines = lines;
        self.state.field_row = field_row;
        self.state.editor = editor;
    }

    fn store_line(&self) -> Vec<Segment> {
        let store = self.state.store.as_ref().map_or("", |s| s.name.as_str());
        label(STORE_LABEL, store)
    }

    fn provider_line(&self) -> Vec<Segment> {
        let provider = self
            .state
            .credentials
            .provider
            .as_ref()
            .map_or("", |p| p.display_name());
        label(PROVIDER_PROMPT, provider)
    }

    fn summary_lines(&self) -> Vec<Vec<Segment>> {
        let credentials = &self.state.credentials;
        let provider = credentials.provider.as_ref().map_or("", |p| p.display_name());
        let username = credentials.username.as_deref().unwrap_or_default();
        let mask: String = std::iter::repeat(self.settings.mask_glyph)
            .take(credentials.password.char_count())
            .collect();

        vec![
            self.store_line(),
            label("Selected email provider: ", provider),
            label("Email account username: ", username),
            label("Email account password: ", &mask),
            hint("[ENTER]", " to start email verification"),
            hint("[TAB]", " To Go Back"),
        ]
    }
}

fn segment(tone: Tone, text: &str) -> Segment {
    Segment {
        tone,
        text: text.to_string(),
    }
}

fn label(name: &str, value: &str) -> Vec<Segment> {
    let mut line = vec![segment(Tone::Accent, name)];
    if !value.is_empty() {
        line.push(segment(Tone::Plain, value));
    }
    line
}

fn hint(key: &str, text: &str) -> Vec<Segment> {
    vec![
        segment(Tone::Plain, "Press "),
        segment(Tone::Accent, key),
        segment(Tone::Muted, text),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProviderDescriptor, TaskDescriptor};
    use crate::shortcuts::ShortcutRegistry;
    use crate::wizard::host::{ErrorReporter, NavigationHost, Scheduler};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Fakes {
        output: Transcript,
        bindings: ShortcutRegistry,
        navigation: Nav,
        errors: Errors,
        scheduler: Sink,
    }

    #[derive(Default)]
    struct Nav(Vec<String>);

    impl NavigationHost for Nav {
        fn switch_page(&mut self, page: &str) -> Result<(), NavigationError> {
            self.0.push(format!("switch:{page}"));
            Ok(())
        }
        fn discard_view(&mut self, view: &str) -> Result<(), NavigationError> {
            self.0.push(format!("discard:{view}"));
            Ok(())
        }
        fn reset_task_creation(&mut self, _store: Option<&StoreRef>) {
            self.0.push("reset".to_string());
        }
        fn show_navigation(&mut self) {
            self.0.push("navigation".to_string());
        }
    }

    #[derive(Default)]
    struct Errors(Vec<String>);

    impl ErrorReporter for Errors {
        fn report(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    #[derive(Default)]
    struct Sink(RefCell<Vec<TaskDescriptor>>);

    impl Scheduler for Sink {
        fn submit(&self, task: TaskDescriptor) {
            self.0.borrow_mut().push(task);
        }
    }

    impl Fakes {
        fn host(&mut self) -> WizardHost<'_> {
            WizardHost {
                output: &mut self.output,
                bindings: &mut self.bindings,
                navigation: &mut self.navigation,
                errors: &mut self.errors,
                scheduler: &self.scheduler,
            }
        }
    }

    fn launch() -> WizardLaunch {
        WizardLaunch {
            store: StoreRef::new("Shop"),
            proxies: vec![],
        }
    }

    fn press(wizard: &mut WizardController, fakes: &mut Fakes, code: KeyCode) -> WizardOutcome {
        wizard
            .handle_key(KeyEvent::new(code, KeyModifiers::NONE), &mut fakes.host())
            .unwrap()
    }

    fn type_str(wizard: &mut WizardController, fakes: &mut Fakes, text: &str) {
        for ch in text.chars() {
            press(wizard, fakes, KeyCode::Char(ch));
        }
    }

    #[test]
    fn test_provider_step_layout() {
        let mut fakes = Fakes::default();
        let mut wizard = WizardController::new(ProviderCatalog::builtin(), WizardSettings::default());
        wizard.activate(launch(), &mut fakes.host()).unwrap();

        let lines = fakes.output.plain_lines();
        assert_eq!(lines[0], "Selected store: Shop");
        assert_eq!(lines[1], PROVIDER_PROMPT);
        assert_eq!(lines[2], "");
        assert!(lines[3].starts_with("[ 0] "));
        assert_eq!(lines.len(), 3 + ProviderCatalogRenderer::row_count(15));
        assert_eq!(wizard.cursor(), (1, PROVIDER_PROMPT.chars().count()));
    }

    #[test]
    fn test_full_flow_submits_task() {
        let mut fakes = Fakes::default();
        let catalog = ProviderCatalog::new(vec![
            ProviderDescriptor::new("a", "Alpha", "imap.a.test"),
            ProviderDescriptor::new("b", "Beta", "imap.b.test"),
        ])
        .unwrap();
        let mut wizard = WizardController::new(catalog, WizardSettings::default());
        wizard.activate(launch(), &mut fakes.host()).unwrap();

        type_str(&mut wizard, &mut fakes, "1");
        assert_eq!(
            press(&mut wizard, &mut fakes, KeyCode::Enter),
            WizardOutcome::StepChanged(WizardStep::Username)
        );
        assert_eq!(fakes.output.plain_lines()[1], "Choose your email provider: Beta");

        type_str(&mut wizard, &mut fakes, "me");
        press(&mut wizard, &mut fakes, KeyCode::Enter);
        type_str(&mut wizard, &mut fakes, "pw");
        assert_eq!(fakes.output.plain_lines().last().map(String::as_str), Some("**"));
        press(&mut wizard, &mut fakes, KeyCode::Enter);
        assert_eq!(wizard.step(), WizardStep::Confirm);

        let outcome = press(&mut wizard, &mut fakes, KeyCode::Enter);
        let WizardOutcome::Submitted(id) = outcome else {
            panic!("expected a submission, got {outcome:?}");
        };
        let tasks = fakes.scheduler.0.borrow();
        assert_eq!(tasks[0].id(), id);
        assert_eq!(tasks[0].provider().id, "b");
        assert_eq!(tasks[0].username(), "me");
        assert_eq!(tasks[0].password(), "pw");
        assert!(!wizard.is_active());
    }

    #[test]
    fn test_empty_catalog_exits_with_message() {
        let mut fakes = Fakes::default();
        let mut wizard = WizardController::new(ProviderCatalog::empty(), WizardSettings::default());

        let outcome = wizard.activate(launch(), &mut fakes.host()).unwrap();

        assert_eq!(outcome, WizardOutcome::Exited);
        assert_eq!(fakes.errors.0, vec![EMPTY_CATALOG_MESSAGE.to_string()]);
        assert_eq!(
            fakes.navigation.0,
            vec!["reset".to_string(), format!("switch:{TASK_CREATION_PAGE}")]
        );
        assert!(!wizard.is_active());
    }

    #[test]
    fn test_confirm_no_cancels() {
        let mut fakes = Fakes::default();
        let mut wizard = WizardController::new(ProviderCatalog::builtin(), WizardSettings::default());
        wizard.activate(launch(), &mut fakes.host()).unwrap();
        for input in ["0", "me", "pw"] {
            type_str(&mut wizard, &mut fakes, input);
            press(&mut wizard, &mut fakes, KeyCode::Enter);
        }

        type_str(&mut wizard, &mut fakes, "n");
        assert_eq!(
            press(&mut wizard, &mut fakes, KeyCode::Enter),
            WizardOutcome::Cancelled
        );
        assert!(fakes.scheduler.0.borrow().is_empty());
        assert_eq!(wizard.step(), WizardStep::Provider);
        assert!(wizard.state().credentials.password.is_empty());
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut fakes = Fakes::default();
        let mut wizard = WizardController::new(ProviderCatalog::builtin(), WizardSettings::default());
        wizard.activate(launch(), &mut fakes.host()).unwrap();

        press(&mut wizard, &mut fakes, KeyCode::Up);
        assert_eq!(wizard.scroll(), 0);
        for _ in 0..50 {
            press(&mut wizard, &mut fakes, KeyCode::Down);
        }
        assert_eq!(wizard.scroll(), wizard.line_count() - 1);
    }
}
