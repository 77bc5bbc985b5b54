//! Task list page: every submitted verification task and its status.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::{Component, Theme};
use crate::tasks::TaskRecord;

/// Events emitted by the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskListEvent {
    /// Create another verification task
    NewVerification,
}

/// Task list state.
#[derive(Debug, Clone, Default)]
pub struct TaskListView {
    records: Vec<TaskRecord>,
    selected: usize,
}

impl TaskListView {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the displayed records, keeping the selection in range.
    pub fn set_records(&mut self, records: Vec<TaskRecord>) {
        self.records = records;
        self.selected = self.selected.min(self.records.len().saturating_sub(1));
    }

    /// Displayed records.
    #[must_use]
    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Selected row.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }
}

impl Component for TaskListView {
    type Event = TaskListEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Char('n') => return Some(TaskListEvent::NewVerification),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.records.len() {
                    self.selected += 1;
                }
            }
            _ => {}
        }
        None
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = if self.records.is_empty() {
            vec![ListItem::new(Line::from(Span::styled(
                "No tasks yet. Press [n] to create an email verification task.",
                Style::default().fg(theme.text_muted),
            )))]
        } else {
            self.records
                .iter()
                .map(|record| {
                    let mut spans = vec![
                        Span::styled(
                            format!("{:<10}", record.status.to_string()),
                            Style::default().fg(theme.status_color(record.status)),
                        ),
                        Span::styled(
                            format!("{} ", record.id.chars().take(8).collect::<String>()),
                            Style::default().fg(theme.text_muted),
                        ),
                        Span::styled(
                            format!("{} / {} / {}", record.store, record.provider, record.username),
                            Style::default().fg(theme.text),
                        ),
                    ];
                    if let Some(error) = &record.error {
                        spans.push(Span::styled(
                            format!("  {error}"),
                            Style::default().fg(theme.error),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Tasks ({}) ", self.records.len()))
                    .border_style(Style::default().fg(theme.primary)),
            )
            .highlight_style(
                Style::default()
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            );

        let mut state = ListState::default();
        if !self.records.is_empty() {
            state.select(Some(self.selected));
        }
        f.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskStatus;
    use crossterm::event::KeyModifiers;

    fn record(id: &str) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            store: "Shop".to_string(),
            provider: "Gmail".to_string(),
            username: "me".to_string(),
            proxies: 0,
            status: TaskStatus::Pending,
            created_at: String::new(),
            started_at: None,
            completed_at: None,
            error: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_selection_stays_in_range() {
        let mut view = TaskListView::new();
        view.set_records(vec![record("a"), record("b")]);

        view.handle_input(key(KeyCode::Down));
        view.handle_input(key(KeyCode::Down));
        assert_eq!(view.selected(), 1);

        view.set_records(vec![record("a")]);
        assert_eq!(view.selected(), 0);

        view.handle_input(key(KeyCode::Up));
        assert_eq!(view.selected(), 0);
    }

    #[test]
    fn test_n_requests_new_verification() {
        let mut view = TaskListView::new();
        assert_eq!(
            view.handle_input(key(KeyCode::Char('n'))),
            Some(TaskListEvent::NewVerification)
        );
    }
}
