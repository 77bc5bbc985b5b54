//! Bridges the application state to the email verification wizard.

use anyhow::Result;
use tracing::{debug, error};

use crate::constants::{EMAIL_VERIFICATION_PAGE, EMAIL_VERIFICATION_VIEW};
use crate::tui::AppState;
use crate::wizard::{
    ErrorReporter, NavigationHost, WizardController, WizardError, WizardHost, WizardOutcome,
};

/// Runs `call` against the wizard with the application acting as its host.
///
/// Errors are logged and shown in the notice overlay; `None` is returned in that case.
pub fn wizard_call<F>(state: &mut AppState, call: F) -> Option<WizardOutcome>
where
    F: FnOnce(&mut WizardController, &mut WizardHost<'_>) -> Result<WizardOutcome, WizardError>,
{
    let AppState {
        wizard,
        transcript,
        registry,
        pages,
        notice,
        queue,
        status_message,
        ..
    } = state;

    let mut host = WizardHost {
        output: &mut *transcript,
        bindings: &mut *registry,
        navigation: &mut *pages,
        errors: &mut *notice,
        scheduler: &*queue,
    };

    match call(wizard, &mut host) {
        Ok(outcome) => {
            debug!(?outcome, "Wizard outcome");
            if let Some(message) = status_for(&outcome) {
                *status_message = message;
            }
            Some(outcome)
        }
        Err(err) => {
            let err = anyhow::Error::from(err);
            error!("Email verification wizard failed: {err:#}");
            notice.report(&format!("{err:#}"));
            None
        }
    }
}

/// Opens the wizard view for the current task creation form.
pub fn start_wizard(state: &mut AppState) -> Result<()> {
    state.pages.open_view(EMAIL_VERIFICATION_VIEW);
    state.pages.switch_page(EMAIL_VERIFICATION_PAGE)?;

    let launch = state.pages.form().launch();
    wizard_call(state, |wizard, host| wizard.activate(launch, host));
    Ok(())
}

fn status_for(outcome: &WizardOutcome) -> Option<String> {
    match outcome {
        WizardOutcome::StepChanged(step) => Some(format!("Email verification: {}", step.title())),
        WizardOutcome::Submitted(id) => Some(format!(
            "Task {} submitted",
            id.chars().take(8).collect::<String>()
        )),
        WizardOutcome::Cancelled => Some("Email verification cancelled".to_string()),
        _ => None,
    }
}
