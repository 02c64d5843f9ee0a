use crate::styles::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

/// Bordered box for notices and errors
pub struct MessageBox;

impl MessageBox {
    /// Render a message box
    ///
    /// # Arguments
    /// * `frame` - The frame to render to
    /// * `area` - The area to render the message box in
    /// * `title` - Border title
    /// * `message` - The message text to display
    /// * `border` - Style of the border and title
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        title: &str,
        message: Text<'_>,
        border: Style,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" {} ", title))
            .title_alignment(Alignment::Center)
            .title_style(border.add_modifier(Modifier::BOLD))
            .border_style(border)
            .padding(Padding::new(2, 2, 1, 1));

        let paragraph = Paragraph::new(message)
            .style(theme.text_style())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);

        frame.render_widget(Clear, area);
        frame.render_widget(paragraph, area);
    }

    pub fn render_error(frame: &mut Frame, area: Rect, theme: &Theme, message: &str) {
        Self::render(
            frame,
            area,
            theme,
            "Error",
            Text::from(message.to_string()),
            theme.error_style(),
        );
    }
}
