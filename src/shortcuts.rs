//! Centralized shortcut and action system.
//!
//! Key bindings are registered per context (a view or page name) and map a
//! key + modifier pair to an [`Action`]. The wizard swaps its binding set on
//! every step change through the [`KeyBindingManager`] trait; the
//! [`ShortcutRegistry`] is the in-memory implementation used by the terminal
//! application.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use thiserror::Error;

use crate::constants::GLOBAL_CONTEXT;

/// All possible actions a binding can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // === WIZARD ===
    /// Validate the current step and move to the next one
    Advance,
    /// Commit the confirmation step and hand the task off
    Finalize,
    /// Reset the wizard and return to navigation
    CancelAndExit,

    // === NAVIGATION ===
    ScrollUp,
    ScrollDown,

    // === GENERAL ===
    Quit,
}

impl Action {
    /// Get the action ID string.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Finalize => "finalize",
            Self::CancelAndExit => "cancel_and_exit",
            Self::ScrollUp => "scroll_up",
            Self::ScrollDown => "scroll_down",
            Self::Quit => "quit",
        }
    }
}

/// A key binding (key + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a new key binding.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a binding without modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Create a key binding from a KeyEvent.
    #[must_use]
    pub const fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Reasons a binding could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The key is already bound to a different action in this context.
    #[error("{binding:?} is already bound to '{existing}' in '{context}'")]
    Conflict {
        /// Binding context
        context: String,
        /// Requested binding
        binding: KeyBinding,
        /// Action id currently bound
        existing: &'static str,
    },
    /// The key is reserved by a global shortcut.
    #[error("{0:?} is reserved by a global shortcut")]
    Reserved(KeyBinding),
}

/// Registers and resolves key bindings per context.
pub trait KeyBindingManager {
    /// Binds `binding` to `action` in `context`.
    ///
    /// Binding the same action twice is a no-op.
    fn bind(&mut self, context: &str, binding: KeyBinding, action: Action)
        -> Result<(), BindingError>;

    /// Removes `binding` from `context`. Unbinding an unbound key is a no-op.
    fn unbind(&mut self, context: &str, binding: KeyBinding);

    /// Looks up the action for a key event in `context`.
    fn lookup(&self, context: &str, event: KeyEvent) -> Option<Action>;
}

/// Shortcut registry that maps key events to actions for a given context.
///
/// This is the central source of truth for all keyboard shortcuts in the application.
pub struct ShortcutRegistry {
    /// Maps (context, key_binding) to Action
    bindings: HashMap<(String, KeyBinding), Action>,
}

impl ShortcutRegistry {
    /// Create a new shortcut registry with the global bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            bindings: HashMap::new(),
        };

        registry.register_global_shortcuts();
        registry
    }

    /// Register shortcuts that apply on every page.
    fn register_global_shortcuts(&mut self) {
        self.register(
            GLOBAL_CONTEXT,
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            Action::Quit,
        );
    }

    /// Register a shortcut binding without conflict checks.
    fn register(&mut self, context: &str, code: KeyCode, modifiers: KeyModifiers, action: Action) {
        let binding = KeyBinding::new(code, modifiers);
        self.bindings.insert((context.to_string(), binding), action);
    }

    /// Look up a global shortcut.
    #[must_use]
    pub fn lookup_global(&self, event: KeyEvent) -> Option<Action> {
        self.lookup(GLOBAL_CONTEXT, event)
    }

    /// Check if a key event matches a specific action in the given context.
    #[must_use]
    pub fn matches(&self, context: &str, event: KeyEvent, action: Action) -> bool {
        self.lookup(context, event) == Some(action)
    }

    /// All bindings registered for `context`.
    #[must_use]
    pub fn bindings_in(&self, context: &str) -> Vec<(KeyBinding, Action)> {
        self.bindings
            .iter()
            .filter(|((ctx, _), _)| ctx == context)
            .map(|((_, binding), action)| (*binding, *action))
            .collect()
    }
}

impl KeyBindingManager for ShortcutRegistry {
    fn bind(
        &mut self,
        context: &str,
        binding: KeyBinding,
        action: Action,
    ) -> Result<(), BindingError> {
        if context != GLOBAL_CONTEXT
            && self
                .bindings
                .contains_key(&(GLOBAL_CONTEXT.to_string(), binding))
        {
            return Err(BindingError::Reserved(binding));
        }

        let key = (context.to_string(), binding);
        match self.bindings.get(&key) {
            Some(existing) if *existing == action => Ok(()),
            Some(existing) => Err(BindingError::Conflict {
                context: context.to_string(),
                binding,
                existing: existing.id(),
            }),
            None => {
                self.bindings.insert(key, action);
                Ok(())
            }
        }
    }

    fn unbind(&mut self, context: &str, binding: KeyBinding) {
        self.bindings.remove(&(context.to_string(), binding));
    }

    fn lookup(&self, context: &str, event: KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(event);
        self.bindings.get(&(context.to_string(), binding)).copied()
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_lookup() {
        let mut registry = ShortcutRegistry::new();
        registry
            .bind("view", KeyBinding::plain(KeyCode::Enter), Action::Advance)
            .unwrap();

        let event = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(registry.lookup("view", event), Some(Action::Advance));
        assert!(registry.matches("view", event, Action::Advance));

        // Contexts are independent
        assert_eq!(registry.lookup("other", event), None);
    }

    #[test]
    fn test_global_quit_is_reserved() {
        let mut registry = ShortcutRegistry::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(registry.lookup_global(ctrl_c), Some(Action::Quit));

        let result = registry.bind("view", KeyBinding::from_event(ctrl_c), Action::Advance);
        assert!(matches!(result, Err(BindingError::Reserved(_))));
    }

    #[test]
    fn test_conflicting_bind_is_rejected() {
        let mut registry = ShortcutRegistry::new();
        let enter = KeyBinding::plain(KeyCode::Enter);
        registry.bind("view", enter, Action::Advance).unwrap();

        // Same action again is fine
        assert!(registry.bind("view", enter, Action::Advance).is_ok());

        let result = registry.bind("view", enter, Action::Finalize);
        assert!(matches!(
            result,
            Err(BindingError::Conflict { existing: "advance", .. })
        ));

        // After unbinding, the new action can be bound
        registry.unbind("view", enter);
        assert!(registry.bind("view", enter, Action::Finalize).is_ok());
        assert_eq!(registry.bindings_in("view"), vec![(enter, Action::Finalize)]);
    }
}
