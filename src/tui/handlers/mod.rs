//! Input handler modules for the terminal pages.

pub mod main;
pub mod wizard;

use anyhow::Result;
use crossterm::event::{self, KeyCode};

use crate::constants::EMAIL_VERIFICATION_PAGE;
use crate::shortcuts::Action;
use crate::tui::AppState;

// Re-export handler functions
pub use main::handle_page_input;
pub use wizard::{start_wizard, wizard_call};

/// Handle keyboard input events. Returns `true` once the user quits.
pub fn handle_key_event(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    if state.registry.lookup_global(key) == Some(Action::Quit) {
        state.should_quit = true;
        return Ok(true);
    }

    // A shown notice swallows the next key
    if state.notice.is_visible() {
        state.notice.dismiss();
        return Ok(false);
    }

    if state.pages.navigation_focused() {
        match key.code {
            KeyCode::Left => state.pages.cycle(false),
            KeyCode::Right => state.pages.cycle(true),
            _ => state.pages.release_navigation(),
        }
        return Ok(false);
    }

    if state.pages.active() == EMAIL_VERIFICATION_PAGE {
        wizard_call(state, |wizard, host| wizard.handle_key(key, host));
        return Ok(false);
    }

    handle_page_input(state, key)
}
