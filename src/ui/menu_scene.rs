//! Main menu: pick the memory game or one of the notes screens.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    MemoryGame,
    NotesWriter,
    NotesReader,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::MemoryGame,
        MenuItem::NotesWriter,
        MenuItem::NotesReader,
        MenuItem::Quit,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::MemoryGame => "Memory Game",
            Self::NotesWriter => "Notes Writer",
            Self::NotesReader => "Notes Reader",
            Self::Quit => "Quit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::MemoryGame => "Click scrambled buttons back in order",
            Self::NotesWriter => "Write notes, saved every few seconds",
            Self::NotesReader => "Watch the notes update live",
            Self::Quit => "",
        }
    }
}

pub struct MenuScreen {
    pub selected_index: usize,
}

impl MenuScreen {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.selected_index.min(MenuItem::ALL.len() - 1)]
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected_index + 1 < MenuItem::ALL.len() {
            self.selected_index += 1;
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, version: &str) {
        f.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(6),    // Items
                Constraint::Length(2), // Controls
            ])
            .split(area);

        let title = Paragraph::new(vec![
            Line::from("Recall"),
            Line::from(Span::styled(
                version.to_string(),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
        f.render_widget(title, chunks[0]);

        let items: Vec<ListItem> = MenuItem::ALL
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let selected = i == self.selected_index;
                let prefix = if selected { "> " } else { "  " };
                let style = if selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let text = if item.description().is_empty() {
                    format!("{}{}", prefix, item.title())
                } else {
                    format!("{}{:<14} {}", prefix, item.title(), item.description())
                };
                ListItem::new(text).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(list, chunks[1]);

        let controls = Paragraph::new("[↑/↓] Select    [Enter] Open    [Q] Quit")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(controls, chunks[2]);
    }
}
