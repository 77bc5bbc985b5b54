//! Status bar widget for displaying status messages and help

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{AppState, Theme};
use crate::constants::{EMAIL_VERIFICATION_PAGE, TASKS_PAGE};
use crate::wizard::WizardStep;

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar with contextual help
    pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let status_line = if state.status_message.is_empty() {
            Line::from(Span::styled(
                format!("{} task(s) submitted", state.queue.len()),
                Style::default().fg(theme.text_muted),
            ))
        } else {
            Line::from(state.status_message.as_str())
        };

        let status = Paragraph::new(vec![status_line, Self::help_line(state, theme)])
            .style(Style::default().bg(theme.background))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Status ")
                    .style(Style::default().bg(theme.background)),
            );

        f.render_widget(status, area);
    }

    /// Key hints for the active page (and wizard step).
    #[must_use]
    pub fn hints(state: &AppState) -> &'static [(&'static str, &'static str)] {
        if state.pages.navigation_focused() {
            return &[("Left/Right", "Switch page"), ("Enter", "Select"), ("Ctrl+C", "Quit")];
        }

        match state.pages.active() {
            EMAIL_VERIFICATION_PAGE => match state.wizard.step() {
                WizardStep::Confirm => &[
                    ("Y/N", "Choose"),
                    ("Enter", "Start verification"),
                    ("Tab", "Go back"),
                    ("Up/Down", "Scroll"),
                ],
                _ => &[("Enter", "Next"), ("Esc", "Cancel"), ("Up/Down", "Scroll")],
            },
            TASKS_PAGE => &[
                ("n", "New verification"),
                ("Up/Down", "Select"),
                ("Tab", "Switch page"),
                ("Ctrl+C", "Quit"),
            ],
            _ => &[("Enter", "Create task"), ("Tab", "Switch page"), ("Ctrl+C", "Quit")],
        }
    }

    fn help_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = vec![Span::styled("Help: ", Style::default().fg(theme.primary))];

        for (i, (key, action)) in Self::hints(state).iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(
                *key,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(": "));
            spans.push(Span::raw(*action));
        }

        Line::from(spans)
    }
}
