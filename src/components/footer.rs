use crate::styles::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Key hint footer
pub struct Footer;

impl Footer {
    /// Height the footer needs (1 for the border, 1 for the text)
    pub const HEIGHT: u16 = 2;

    /// Render a footer with the given hint text.
    ///
    /// Hints are separated by `" | "`; each hint is `label: keys`.
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, text: &str) {
        let mut spans = Vec::new();

        for (i, part) in text.split(" | ").enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", theme.muted_style()));
            }

            if let Some((label, keys)) = part.split_once(": ") {
                spans.push(Span::styled(format!("{}: ", label), theme.title_style()));
                spans.push(Span::styled(keys.to_string(), theme.emphasis_style()));
            } else {
                spans.push(Span::styled(part.to_string(), theme.text_style()));
            }
        }

        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border_style())
            .border_type(BorderType::Rounded);

        let inner = block.inner(area);
        let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);

        frame.render_widget(block, area);
        frame.render_widget(footer, inner);
    }
}
