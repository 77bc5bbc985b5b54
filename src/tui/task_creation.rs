//! Task creation page: the store and proxies a new verification starts with.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{Component, Theme};
use crate::models::{Endpoint, StoreRef};
use crate::wizard::WizardLaunch;

/// Events emitted by the task creation page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCreationEvent {
    /// Start the email verification wizard
    StartWizard,
}

/// Store and proxy selection for the next task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCreationForm {
    /// Selected store
    pub store: StoreRef,
    /// Proxies handed to the next task
    pub proxies: Vec<Endpoint>,
    default_store: StoreRef,
    default_proxies: Vec<Endpoint>,
}

impl TaskCreationForm {
    /// Creates a form preselecting `store` and `proxies`.
    #[must_use]
    pub fn new(store: StoreRef, proxies: Vec<Endpoint>) -> Self {
        Self {
            store: store.clone(),
            proxies: proxies.clone(),
            default_store: store,
            default_proxies: proxies,
        }
    }

    /// Clears per-task input. `store` stays selected if given.
    pub fn reset(&mut self, store: Option<&StoreRef>) {
        self.store = store.cloned().unwrap_or_else(|| self.default_store.clone());
        self.proxies.clone_from(&self.default_proxies);
    }

    /// Wizard inputs for the current selection.
    #[must_use]
    pub fn launch(&self) -> WizardLaunch {
        WizardLaunch {
            store: self.store.clone(),
            proxies: self.proxies.clone(),
        }
    }
}

impl Component for TaskCreationForm {
    type Event = TaskCreationEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Enter => Some(TaskCreationEvent::StartWizard),
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let label = Style::default().fg(theme.primary);
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Store: ", label),
                Span::styled(self.store.name.as_str(), Style::default().fg(theme.text)),
            ]),
            Line::from(Span::styled("Proxies:", label)),
        ];

        if self.proxies.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (direct connection)",
                Style::default().fg(theme.text_muted),
            )));
        } else {
            lines.extend(self.proxies.iter().map(|proxy| {
                Line::from(Span::styled(
                    format!("  {proxy}"),
                    Style::default().fg(theme.text_secondary),
                ))
            }));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("Press "),
            Span::styled(
                "[ENTER]",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" to create an email verification task"),
        ]));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Task Creation ")
                    .border_style(Style::default().fg(theme.primary)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_reset_keeps_given_store_and_restores_proxies() {
        let mut form = TaskCreationForm::new(StoreRef::new("Main"), vec![Endpoint::new("http://p:1")]);
        form.store = StoreRef::new("Other");
        form.proxies.clear();

        form.reset(Some(&StoreRef::new("Kept")));
        assert_eq!(form.store.name, "Kept");
        assert_eq!(form.proxies.len(), 1);

        form.reset(None);
        assert_eq!(form.store.name, "Main");
    }

    #[test]
    fn test_enter_starts_wizard() {
        let mut form = TaskCreationForm::new(StoreRef::new("Main"), Vec::new());
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(form.handle_input(enter), Some(TaskCreationEvent::StartWizard));
        let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(form.handle_input(other), None);
        assert_eq!(form.launch().store.name, "Main");
    }
}
