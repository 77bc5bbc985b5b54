//! Per-step key binding sets.
//!
//! Every step maps to a fixed set of (key, action) pairs. Switching steps
//! unbinds every managed key of the wizard view and binds the new step's
//! set, so applying the same step twice leaves the same bindings in place.

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::state::WizardStep;
use crate::shortcuts::{Action, BindingError, KeyBinding, KeyBindingManager};

/// Keys whose bindings the wizard owns in its view.
pub const MANAGED_KEYS: [KeyCode; 5] = [
    KeyCode::Enter,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Tab,
    KeyCode::Esc,
];

const ENTRY_BINDINGS: &[(KeyCode, Action)] = &[
    (KeyCode::Enter, Action::Advance),
    (KeyCode::Up, Action::ScrollUp),
    (KeyCode::Down, Action::ScrollDown),
    (KeyCode::Esc, Action::CancelAndExit),
];

const CONFIRM_BINDINGS: &[(KeyCode, Action)] = &[
    (KeyCode::Enter, Action::Finalize),
    (KeyCode::Tab, Action::CancelAndExit),
    (KeyCode::Up, Action::ScrollUp),
    (KeyCode::Down, Action::ScrollDown),
];

/// What to do when a binding cannot be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingFailurePolicy {
    /// Log the failure and keep going; the key may simply not respond
    #[default]
    Lenient,
    /// Abort the step change with the error
    Strict,
}

/// Binding set of `step`.
#[must_use]
pub const fn bindings_for(step: WizardStep) -> &'static [(KeyCode, Action)] {
    match step {
        WizardStep::Provider | WizardStep::Username | WizardStep::Password => ENTRY_BINDINGS,
        WizardStep::Confirm => CONFIRM_BINDINGS,
    }
}

/// Replaces the wizard view's bindings with the set of `step`.
pub fn apply_step_bindings(
    manager: &mut dyn KeyBindingManager,
    context: &str,
    step: WizardStep,
    policy: BindingFailurePolicy,
) -> Result<(), BindingError> {
    for code in MANAGED_KEYS {
        manager.unbind(context, KeyBinding::plain(code));
    }

    for &(code, action) in bindings_for(step) {
        if let Err(err) = manager.bind(context, KeyBinding::plain(code), action) {
            match policy {
                BindingFailurePolicy::Lenient => {
                    warn!(?step, action = action.id(), error = %err, "Failed to set wizard key binding");
                }
                BindingFailurePolicy::Strict => return Err(err),
            }
        }
    }

    debug!(?step, context, "Applied wizard key bindings");
    Ok(())
}

/// Moves `context` from the binding set of `from` to the set of `to`.
///
/// When the strict policy rejects a binding of `to`, the set of `from` is put
/// back before the error is returned. Without a previous step every wizard
/// binding is removed instead.
pub fn switch_step_bindings(
    manager: &mut dyn KeyBindingManager,
    context: &str,
    from: Option<WizardStep>,
    to: WizardStep,
    policy: BindingFailurePolicy,
) -> Result<(), BindingError> {
    let Err(err) = apply_step_bindings(manager, context, to, policy) else {
        return Ok(());
    };

    match from {
        Some(previous) => {
            if let Err(restore) =
                apply_step_bindings(manager, context, previous, BindingFailurePolicy::Lenient)
            {
                warn!(?previous, error = %restore, "Failed to restore wizard key bindings");
            }
        }
        None => clear_step_bindings(manager, context),
    }
    debug!(?from, ?to, error = %err, "Rolled back wizard key bindings");
    Err(err)
}

/// Removes every wizard binding from `context`.
pub fn clear_step_bindings(manager: &mut dyn KeyBindingManager, context: &str) {
    for code in MANAGED_KEYS {
        manager.unbind(context, KeyBinding::plain(code));
    }
}
