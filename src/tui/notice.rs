//! Dismissible message overlay.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tracing::debug;

use super::Theme;
use crate::wizard::ErrorReporter;

/// A transient message shown until the next key press.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    message: Option<String>,
}

impl Notice {
    /// Creates an empty notice.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Message currently shown.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether a message is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    /// Hides the message.
    pub fn dismiss(&mut self) {
        self.message = None;
    }

    /// Renders the overlay over `area` if a message is shown.
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let Some(message) = &self.message else {
            return;
        };

        let popup = centered_rect(60, 20, area);
        let text = vec![
            Line::from(Span::styled(message.as_str(), Style::default().fg(theme.text))),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to continue",
                Style::default().fg(theme.text_muted),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Error ")
                    .title_style(Style::default().fg(theme.error).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(theme.error)),
            );

        f.render_widget(Clear, popup);
        f.render_widget(paragraph, popup);
    }
}

impl ErrorReporter for Notice {
    fn report(&mut self, message: &str) {
        debug!(message, "Showing notice");
        self.message = Some(message.to_string());
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Min(5),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_and_dismiss() {
        let mut notice = Notice::new();
        assert!(!notice.is_visible());

        notice.report("You must insert your email account username!");
        assert_eq!(
            notice.message(),
            Some("You must insert your email account username!")
        );

        notice.dismiss();
        assert!(notice.message().is_none());
    }
}
