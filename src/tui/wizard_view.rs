//! Email verification page: draws the wizard transcript.

use ratatui::{
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::Theme;
use crate::constants::EMAIL_VERIFICATION_PAGE;
use crate::wizard::{Segment, Transcript, WizardController};

/// Converts transcript segments into styled lines.
#[must_use]
pub fn transcript_lines<'a>(transcript: &'a Transcript, theme: &Theme) -> Vec<Line<'a>> {
    transcript
        .lines()
        .iter()
        .map(|segments| {
            Line::from(
                segments
                    .iter()
                    .map(|Segment { tone, text }| Span::styled(text.as_str(), theme.tone_style(*tone)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// Renders the wizard page and places the terminal cursor on the input field.
pub fn render(
    f: &mut Frame,
    area: Rect,
    transcript: &Transcript,
    wizard: &WizardController,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {EMAIL_VERIFICATION_PAGE} - {} ", wizard.step().title()))
        .border_style(Style::default().fg(theme.primary));
    let inner = block.inner(area);

    let scroll = wizard.scroll();
    let paragraph = Paragraph::new(transcript_lines(transcript, theme))
        .block(block)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(paragraph, area);

    if !wizard.is_active() {
        return;
    }

    let (row, column) = wizard.cursor();
    let Some(visible_row) = row.checked_sub(scroll) else {
        return;
    };
    let (Ok(y), Ok(x)) = (u16::try_from(visible_row), u16::try_from(column)) else {
        return;
    };
    if y < inner.height && x < inner.width {
        f.set_cursor_position(Position::new(inner.x + x, inner.y + y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{StyleOutput, Tone};

    #[test]
    fn test_transcript_lines_keep_tones() {
        let mut transcript = Transcript::new();
        transcript.write(Tone::Accent, "[ 0] ");
        transcript.write(Tone::Emphasis, "Gmail");
        transcript.newline();
        transcript.write(Tone::Plain, "next");

        let theme = Theme::dark();
        let lines = transcript_lines(&transcript, &theme);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 2);
        assert_eq!(lines[0].spans[0].style, theme.tone_style(Tone::Accent));
        assert_eq!(lines[0].spans[1].content, "Gmail");
    }
}
