//! Final step: bundle the collected credentials and submit them.

use thiserror::Error;
use tracing::info;

use super::host::{NavigationError, NavigationHost, Scheduler};
use super::state::WizardState;
use crate::constants::{EMAIL_VERIFICATION_VIEW, TASKS_PAGE};
use crate::models::TaskDescriptor;

/// Reasons a handoff did not submit its task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandoffError {
    /// A value the task needs was never collected.
    #[error("cannot start the task: no {0} selected")]
    Incomplete(&'static str),
    /// The wizard view could not be discarded.
    #[error("failed to close the email verification view")]
    ViewTeardown(#[source] NavigationError),
    /// The task listing could not be shown.
    #[error("failed to switch to the task list")]
    PageSwitch(#[source] NavigationError),
}

/// Builds the [`TaskDescriptor`] and passes it to the scheduler.
pub struct TaskHandoff;

impl TaskHandoff {
    /// Assembles the descriptor from `state` without modifying it.
    pub fn build(state: &WizardState) -> Result<TaskDescriptor, HandoffError> {
        let store = state.store.clone().ok_or(HandoffError::Incomplete("store"))?;
        let provider = state
            .credentials
            .provider
            .clone()
            .ok_or(HandoffError::Incomplete("provider"))?;
        let username = state
            .credentials
            .username
            .clone()
            .ok_or(HandoffError::Incomplete("username"))?;
        if state.credentials.password.is_empty() {
            return Err(HandoffError::Incomplete("password"));
        }

        Ok(TaskDescriptor::new(
            store,
            state.proxies.clone(),
            provider,
            username,
            state.credentials.password.expose().to_string(),
        ))
    }

    /// Runs the handoff and returns the submitted task id.
    ///
    /// The task list becomes the active page, then the wizard view is
    /// discarded and the task creation form reset before the task is
    /// submitted. If either navigation call fails the task is dropped and the
    /// error is returned. `state` is only reset after a successful submission.
    ///
    /// A failed page switch leaves the view and the form untouched, so the
    /// handoff can simply be run again.
    pub fn execute(
        state: &mut WizardState,
        navigation: &mut dyn NavigationHost,
        scheduler: &dyn Scheduler,
    ) -> Result<String, HandoffError> {
        let task = Self::build(state)?;

        navigation
            .switch_page(TASKS_PAGE)
            .map_err(HandoffError::PageSwitch)?;
        navigation
            .discard_view(EMAIL_VERIFICATION_VIEW)
            .map_err(HandoffError::ViewTeardown)?;
        navigation.reset_task_creation(state.store.as_ref());

        let id = task.id().to_string();
        info!(
            task_id = %id,
            store = %task.store(),
            provider = %task.provider().id,
            proxies = task.proxies().len(),
            "Submitting email verification task"
        );
        scheduler.submit(task);
        state.reset();

        Ok(id)
    }
}
