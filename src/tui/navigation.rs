//! Page navigation of the terminal application.

use tracing::{debug, info};

use crate::constants::{EMAIL_VERIFICATION_PAGE, TASKS_PAGE, TASK_CREATION_PAGE};
use crate::models::StoreRef;
use crate::wizard::{NavigationError, NavigationHost};

use super::task_creation::TaskCreationForm;

/// Every page, in tab order.
pub const PAGES: [&str; 3] = [TASK_CREATION_PAGE, EMAIL_VERIFICATION_PAGE, TASKS_PAGE];

/// Tracks the active page, open views and the task creation form.
#[derive(Debug, Clone)]
pub struct PageHost {
    active: &'static str,
    views: Vec<String>,
    form: TaskCreationForm,
    navigation_focused: bool,
}

impl PageHost {
    /// Starts on the task creation page.
    #[must_use]
    pub fn new(form: TaskCreationForm) -> Self {
        Self {
            active: TASK_CREATION_PAGE,
            views: Vec::new(),
            form,
            navigation_focused: false,
        }
    }

    /// Active page name.
    #[must_use]
    pub fn active(&self) -> &'static str {
        self.active
    }

    /// Whether the page tabs have keyboard focus.
    #[must_use]
    pub fn navigation_focused(&self) -> bool {
        self.navigation_focused
    }

    /// Returns keyboard focus to the active page.
    pub fn release_navigation(&mut self) {
        self.navigation_focused = false;
    }

    /// Opens `view` unless it is already open.
    pub fn open_view(&mut self, view: &str) {
        if !self.is_view_open(view) {
            debug!(view, "Opened view");
            self.views.push(view.to_string());
        }
    }

    /// Whether `view` is open.
    #[must_use]
    pub fn is_view_open(&self, view: &str) -> bool {
        self.views.iter().any(|v| v == view)
    }

    /// Task creation form.
    #[must_use]
    pub fn form(&self) -> &TaskCreationForm {
        &self.form
    }

    /// Task creation form, mutably.
    pub fn form_mut(&mut self) -> &mut TaskCreationForm {
        &mut self.form
    }

    /// Moves to the next (or previous) page that can be entered directly.
    ///
    /// The email verification page is skipped: it is only reachable through
    /// the task creation form.
    pub fn cycle(&mut self, forward: bool) {
        let pages: Vec<&'static str> = PAGES
            .iter()
            .copied()
            .filter(|page| *page != EMAIL_VERIFICATION_PAGE)
            .collect();
        let current = pages.iter().position(|p| *p == self.active).unwrap_or(0);
        let next = if forward {
            (current + 1) % pages.len()
        } else {
            (current + pages.len() - 1) % pages.len()
        };
        self.active = pages[next];
    }
}

impl NavigationHost for PageHost {
    fn switch_page(&mut self, page: &str) -> Result<(), NavigationError> {
        let page = PAGES
            .iter()
            .copied()
            .find(|p| *p == page)
            .ok_or_else(|| NavigationError::UnknownPage(page.to_string()))?;
        info!(page, "Switched page");
        self.active = page;
        Ok(())
    }

    fn discard_view(&mut self, view: &str) -> Result<(), NavigationError> {
        let index = self
            .views
            .iter()
            .position(|v| v == view)
            .ok_or_else(|| NavigationError::ViewNotOpen(view.to_string()))?;
        self.views.remove(index);
        debug!(view, "Discarded view");
        Ok(())
    }

    fn reset_task_creation(&mut self, store: Option<&StoreRef>) {
        self.form.reset(store);
    }

    fn show_navigation(&mut self) {
        self.navigation_focused = true;
    }
}
