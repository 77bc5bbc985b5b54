//! Task creation and task list input handler.

use anyhow::Result;
use crossterm::event::{self, KeyCode};

use crate::constants::{TASKS_PAGE, TASK_CREATION_PAGE};
use crate::tui::{AppState, Component, TaskCreationEvent, TaskListEvent};
use crate::wizard::NavigationHost;

use super::start_wizard;

/// Handle input for the pages reachable from the tabs
pub fn handle_page_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Tab => {
            state.pages.cycle(true);
            return Ok(false);
        }
        KeyCode::BackTab => {
            state.pages.cycle(false);
            return Ok(false);
        }
        _ => {}
    }

    match state.pages.active() {
        TASK_CREATION_PAGE => {
            if let Some(TaskCreationEvent::StartWizard) = state.pages.form_mut().handle_input(key) {
                start_wizard(state)?;
            }
        }
        TASKS_PAGE => {
            if let Some(TaskListEvent::NewVerification) = state.task_list.handle_input(key) {
                state.pages.switch_page(TASK_CREATION_PAGE)?;
            }
        }
        _ => {}
    }

    Ok(false)
}
