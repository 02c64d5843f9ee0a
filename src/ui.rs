//! Presentation adapter.
//!
//! Renders a [`ScreenView`] with the theme it was built with. Nothing here
//! mutates controller state; list selections are cloned for rendering.

use crate::components::{Footer, MessageBox};
use crate::controller::MAIN_MENU_ITEMS;
use crate::state::{ProfileEntry, Screen, ScreenView};
use crate::styles::{Theme, LIST_HIGHLIGHT_SYMBOL, SPINNER_FRAMES};
use crate::utils::NO_BASE_PROFILE;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, Padding, Paragraph};

const APP_TITLE: &str = "EVE Launch Manager";

/// Shown next to each main menu entry
const MENU_DESCRIPTIONS: [&str; 3] = [
    "Load an existing profile",
    "Create a new profile",
    "Backup your profiles",
];

pub struct Ui {
    theme: Theme,
}

impl Ui {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(&self, frame: &mut Frame, view: &ScreenView) {
        let area = frame.area();
        frame.render_widget(Block::default().style(self.theme.background_style()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(Footer::HEIGHT),
            ])
            .split(area);

        self.render_header(frame, chunks[0], view);

        match view.screen {
            Screen::InitLoading => self.render_init_loading(frame, chunks[1], view),
            Screen::Main => self.render_main_menu(frame, chunks[1], view),
            Screen::LoadProfile => self.render_profile_list(frame, chunks[1], view),
            Screen::CreateProfile => self.render_create_profile(frame, chunks[1], view),
            Screen::SelectBaseProfile => self.render_base_profile_list(frame, chunks[1], view),
            Screen::Backup => {
                self.render_progress(frame, chunks[1], view, "Backing up profiles".to_string())
            }
            Screen::LoadingProfile => {
                let target = view.selected_profile.unwrap_or_default();
                self.render_progress(frame, chunks[1], view, format!("Loading profile {}", target))
            }
        }

        self.render_status_line(frame, chunks[2], view);
        Footer::render(frame, chunks[3], &self.theme, footer_text(view));

        if view.is_external_app_running {
            self.render_running_notice(frame, area, view);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, view: &ScreenView) {
        let mut spans = vec![Span::styled(APP_TITLE, self.theme.title_style())];
        if let Some(active) = view.active_profile {
            spans.push(Span::styled("  Profile: ", self.theme.muted_style()));
            spans.push(Span::styled(active.to_string(), self.theme.profile_style()));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_style());
        let header = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(header, area);
    }

    fn render_init_loading(&self, frame: &mut Frame, area: Rect, view: &ScreenView) {
        match view.last_error {
            Some(error) => {
                let popup = centered_rect(70, 9, area);
                let message = format!(
                    "Error initializing: {}\n\nFix the problem and restart.",
                    error
                );
                MessageBox::render_error(frame, popup, &self.theme, &message);
            }
            None => self.render_progress(frame, area, view, "Initializing".to_string()),
        }
    }

    fn render_main_menu(&self, frame: &mut Frame, area: Rect, view: &ScreenView) {
        let items: Vec<ListItem> = MAIN_MENU_ITEMS
            .iter()
            .zip(MENU_DESCRIPTIONS)
            .map(|(item, desc)| {
                ListItem::new(Line::from(vec![
                    Span::styled(*item, self.theme.text_style()),
                    Span::styled(format!("  {}", desc), self.theme.muted_style()),
                ]))
            })
            .collect();
        self.render_list(frame, area, "Menu", items, view);
    }

    fn render_profile_list(&self, frame: &mut Frame, area: Rect, view: &ScreenView) {
        let items = view
            .profiles
            .iter()
            .map(|entry| self.profile_item(entry))
            .collect();
        self.render_list(frame, area, "Select Profile", items, view);
    }

    fn render_base_profile_list(&self, frame: &mut Frame, area: Rect, view: &ScreenView) {
        let mut items = vec![ListItem::new(Line::from(vec![
            Span::styled(NO_BASE_PROFILE, self.theme.text_style()),
            Span::styled("  Create an empty profile", self.theme.muted_style()),
        ]))];
        items.extend(view.profiles.iter().map(|entry| self.profile_item(entry)));

        let name = view.pending_profile_name.unwrap_or_default();
        let title = if view.creating_profile {
            format!("Creating {} {}", name, spinner(view.spinner_frame))
        } else {
            format!("Select Base Profile for '{}'", name)
        };
        self.render_list(frame, area, &title, items, view);
    }

    fn render_create_profile(&self, frame: &mut Frame, area: Rect, view: &ScreenView) {
        let popup = centered_rect(50, 5, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focused_style())
            .title(" Enter profile name ")
            .title_style(self.theme.title_style())
            .padding(Padding::horizontal(1));

        let inner = block.inner(popup);
        let input = Paragraph::new(view.name_input.text().to_string())
            .style(self.theme.text_style())
            .block(block);

        frame.render_widget(Clear, popup);
        frame.render_widget(input, popup);

        let cursor_x = inner
            .x
            .saturating_add(view.name_input.cursor() as u16)
            .min(inner.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(cursor_x, inner.y));
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect, view: &ScreenView, label: String) {
        let popup = centered_rect(50, 3, area);
        let line = Line::from(vec![
            Span::styled(label, self.theme.text_style()),
            Span::raw(" "),
            Span::styled(spinner(view.spinner_frame), self.theme.emphasis_style()),
        ]);
        let paragraph = Paragraph::new(line).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(self.theme.border_style()),
        );
        frame.render_widget(paragraph, popup);
    }

    fn render_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        items: Vec<ListItem>,
        view: &ScreenView,
    ) {
        let list_area = centered_rect(60, items.len() as u16 + 4, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focused_style())
            .title(format!(" {} ", title))
            .title_style(self.theme.title_style())
            .title_alignment(Alignment::Center)
            .padding(Padding::new(1, 1, 1, 1));

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);

        let mut state = view.list_state.clone();
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect, view: &ScreenView) {
        // Init failures are shown in the body instead.
        if view.screen == Screen::InitLoading {
            return;
        }

        let line = match (view.last_error, view.status_message) {
            (Some(error), _) => Line::styled(error.to_string(), self.theme.error_style()),
            (None, Some(status)) => Line::styled(status.to_string(), self.theme.success_style()),
            (None, None) => return,
        };
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn render_running_notice(&self, frame: &mut Frame, area: Rect, view: &ScreenView) {
        let popup = centered_rect(60, 7, area);
        let message = Text::from(vec![
            Line::from(format!(
                "EVE Launcher is running ({}), please close it {}",
                view.active_profile.unwrap_or("unknown profile"),
                spinner(view.spinner_frame)
            )),
            Line::default(),
            Line::styled("Profiles cannot change while it is open", self.theme.muted_style()),
        ]);
        MessageBox::render(
            frame,
            popup,
            &self.theme,
            "Launcher running",
            message,
            self.theme.warning_style(),
        );
    }

    fn profile_item(&self, entry: &ProfileEntry) -> ListItem<'static> {
        let mut spans = vec![Span::styled(entry.name.clone(), self.theme.profile_style())];
        if entry.is_active {
            spans.push(Span::styled("  Active", self.theme.muted_style()));
        }
        ListItem::new(Line::from(spans))
    }
}

fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

fn footer_text(view: &ScreenView) -> &'static str {
    match view.screen {
        Screen::Main => "Navigate: ↑↓ | Select: Enter | Quit: q",
        Screen::LoadProfile => "Navigate: ↑↓ | Load: Enter | Back: Esc | Quit: q",
        Screen::CreateProfile => "Next: Enter | Back: Esc | Quit: Ctrl+C",
        Screen::SelectBaseProfile if view.creating_profile => "Please wait | Quit: q",
        Screen::SelectBaseProfile => "Navigate: ↑↓ | Create: Enter | Back: Esc | Quit: q",
        Screen::InitLoading | Screen::Backup | Screen::LoadingProfile => "Please wait | Quit: q",
    }
}

/// Rectangle of at most `width` x `height` centered in `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ScreenController;
    use crate::services::ProfileConfig;
    use crate::styles::ThemeType;
    use crate::tasks::TaskEvent;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn render_to_string(controller: &ScreenController) -> String {
        let ui = Ui::new(Theme::new(ThemeType::NoColor));
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| ui.render(frame, &controller.view()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn loaded() -> ScreenController {
        let mut controller = ScreenController::new(Duration::from_secs(3));
        controller.handle_task_event(TaskEvent::InitialLoad(Ok(ProfileConfig::default())));
        controller
    }

    #[test]
    fn test_main_menu_lists_entries_and_profile() {
        let screen = render_to_string(&loaded());
        for item in MAIN_MENU_ITEMS {
            assert!(screen.contains(item), "missing {}", item);
        }
        assert!(screen.contains("Profile: main"));
    }

    #[test]
    fn test_running_notice_names_profile() {
        let mut controller = loaded();
        controller.handle_task_event(TaskEvent::Liveness { running: true });
        let screen = render_to_string(&controller);
        assert!(screen.contains("EVE Launcher is running (main), please close it"));
    }

    #[test]
    fn test_init_failure_is_shown() {
        let mut controller = ScreenController::new(Duration::from_secs(3));
        controller.handle_task_event(TaskEvent::InitialLoad(Err("bad record".to_string())));
        let screen = render_to_string(&controller);
        assert!(screen.contains("bad record"));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(40, 4, area), Rect::new(0, 3, 20, 4));
    }
}
