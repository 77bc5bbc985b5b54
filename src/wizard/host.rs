//! Collaborators the wizard drives but does not own.

use thiserror::Error;

use super::output::StyleOutput;
use crate::models::{StoreRef, TaskDescriptor};
use crate::shortcuts::KeyBindingManager;

/// Navigation failures reported by the hosting shell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// No page with this name exists.
    #[error("unknown page '{0}'")]
    UnknownPage(String),
    /// The view is not open.
    #[error("view '{0}' is not open")]
    ViewNotOpen(String),
}

/// Switches pages and tears down views.
pub trait NavigationHost {
    /// Makes `page` the active page.
    fn switch_page(&mut self, page: &str) -> Result<(), NavigationError>;

    /// Discards the view named `view`.
    fn discard_view(&mut self, view: &str) -> Result<(), NavigationError>;

    /// Clears the transient state of the task creation form, keeping `store` selected.
    fn reset_task_creation(&mut self, store: Option<&StoreRef>);

    /// Hands control back to page navigation.
    fn show_navigation(&mut self);
}

/// Executes submitted tasks asynchronously.
pub trait Scheduler {
    /// Queues `task`; the wizard never waits for it.
    fn submit(&self, task: TaskDescriptor);
}

/// Shows transient, dismissible messages.
pub trait ErrorReporter {
    /// Displays `message`.
    fn report(&mut self, message: &str);
}

/// Everything the wizard needs from its host for one event.
pub struct WizardHost<'a> {
    /// Rendered area of the wizard view
    pub output: &'a mut dyn StyleOutput,
    /// Key binding table
    pub bindings: &'a mut dyn KeyBindingManager,
    /// Page navigation
    pub navigation: &'a mut dyn NavigationHost,
    /// Transient messages
    pub errors: &'a mut dyn ErrorReporter,
    /// Task execution
    pub scheduler: &'a dyn Scheduler,
}
