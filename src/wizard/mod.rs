//! Email verification wizard.
//!
//! The wizard collects a provider, a username and a password, asks for
//! confirmation and hands the result off as a [`TaskDescriptor`] to a
//! [`Scheduler`]. It renders into a [`StyleOutput`] and is driven entirely
//! through key events; the terminal layer lives in [`crate::tui`].
//!
//! [`TaskDescriptor`]: crate::models::TaskDescriptor

pub mod bindings;
pub mod catalog_grid;
pub mod controller;
pub mod editor;
pub mod handoff;
pub mod host;
pub mod output;
pub mod state;
pub mod validation;

pub use bindings::{
    apply_step_bindings, bindings_for, switch_step_bindings, BindingFailurePolicy,
};
pub use catalog_grid::ProviderCatalogRenderer;
pub use controller::{WizardController, WizardError, WizardLaunch, WizardOutcome, WizardSettings};
pub use editor::{EditOutcome, FieldLimits, InputEditor};
pub use handoff::{HandoffError, TaskHandoff};
pub use host::{ErrorReporter, NavigationError, NavigationHost, Scheduler, WizardHost};
pub use output::{Segment, StyleOutput, Tone, Transcript};
pub use state::{CredentialRecord, SecretBuffer, WizardState, WizardStep};
pub use validation::{parse_provider_choice, provider_prompt_line, ValidationError};
