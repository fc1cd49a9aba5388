//! Memory game screen and its terminal presenter.
//!
//! Buttons are drawn as bordered, colored boxes at their container-relative
//! positions. Later buttons are drawn over earlier ones, matching the
//! hit-testing order used for mouse clicks.

use super::game_common::{
    create_screen_layout, render_info_panel_frame, render_result_banner, render_status_bar,
    ResultKind,
};
use recall::core::constants::{
    FALLBACK_CONTAINER_HEIGHT, FALLBACK_CONTAINER_WIDTH, MAX_BUTTONS, MIN_BUTTONS,
};
use recall::memory::{
    Bounds, Button, ButtonColor, Footprint, InvalidCountError, Position, Presenter, RoundMessage,
    RoundStatus,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Longest count-field input accepted from the keyboard.
const COUNT_FIELD_MAX_LEN: usize = 3;

/// Rows above the button container: count field and validation line.
const HEADER_ROWS: u16 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub identity: usize,
    pub position: Position,
    pub color: ButtonColor,
    pub label: String,
}

/// What the memory screen shows, updated by the round controller.
#[derive(Debug, Clone)]
pub struct TerminalPresenter {
    count_field: String,
    container: Option<Rect>,
    /// Size every button is drawn at.
    button_size: Footprint,
    /// `button_size`, once a button has actually been drawn.
    footprint: Option<Footprint>,
    buttons: Vec<ButtonView>,
    status: Option<RoundStatus>,
    message: Option<RoundMessage>,
    validation: Option<String>,
    focus: Option<usize>,
}

impl TerminalPresenter {
    pub fn new(default_count: u8, button_size: Footprint) -> Self {
        Self {
            count_field: default_count.to_string(),
            container: None,
            button_size,
            footprint: None,
            buttons: Vec::new(),
            status: None,
            message: None,
            validation: None,
            focus: None,
        }
    }

    #[cfg(test)]
    pub fn count_field(&self) -> &str {
        &self.count_field
    }

    #[cfg(test)]
    pub fn buttons(&self) -> &[ButtonView] {
        &self.buttons
    }

    #[cfg(test)]
    pub fn status(&self) -> Option<RoundStatus> {
        self.status
    }

    #[cfg(test)]
    pub fn message(&self) -> Option<RoundMessage> {
        self.message
    }

    #[cfg(test)]
    pub fn validation(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    /// Append a typed character to the count field. Returns true if it changed.
    pub fn push_count_char(&mut self, c: char) -> bool {
        if self.count_field.chars().count() >= COUNT_FIELD_MAX_LEN || c.is_control() {
            return false;
        }
        self.count_field.push(c);
        true
    }

    pub fn pop_count_char(&mut self) -> bool {
        self.count_field.pop().is_some()
    }

    /// Record where the button container was drawn this frame.
    pub fn observe_container(&mut self, area: Rect) {
        self.container = Some(area);
    }

    /// Translate absolute terminal coordinates into the container, if inside.
    pub fn to_container(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        let area = self.container?;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| (column - area.x, row - area.y))
    }

    /// Buttons in reading order (top to bottom, left to right).
    fn screen_order(&self) -> Vec<usize> {
        let mut order: Vec<&ButtonView> = self.buttons.iter().collect();
        order.sort_by_key(|b| (b.position.y, b.position.x, b.identity));
        order.into_iter().map(|b| b.identity).collect()
    }

    /// Move keyboard focus forward in reading order, so cycling never hints
    /// at the hidden identities.
    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(-1);
    }

    fn step_focus(&mut self, delta: isize) {
        let order = self.screen_order();
        if order.is_empty() {
            self.focus = None;
            return;
        }
        let len = order.len() as isize;
        let next = match self.focus.and_then(|id| order.iter().position(|&o| o == id)) {
            Some(i) => (i as isize + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        self.focus = Some(order[next as usize]);
    }

    pub fn focused_identity(&self) -> Option<usize> {
        self.focus
    }
}

impl Presenter for TerminalPresenter {
    fn count_value(&self) -> String {
        self.count_field.clone()
    }

    fn container_bounds(&self) -> Bounds {
        match self.container {
            Some(area) => Bounds {
                width: area.width,
                height: area.height,
            },
            None => Bounds {
                width: FALLBACK_CONTAINER_WIDTH,
                height: FALLBACK_CONTAINER_HEIGHT,
            },
        }
    }

    fn button_footprint(&self) -> Option<Footprint> {
        self.footprint
    }

    fn render_buttons(&mut self, buttons: &[Button]) {
        self.buttons = buttons
            .iter()
            .map(|b| ButtonView {
                identity: b.identity,
                position: b.position,
                color: b.color,
                label: b.label.clone(),
            })
            .collect();
        self.message = None;
        self.focus = None;
    }

    fn move_button(&mut self, identity: usize, position: Position) {
        if let Some(view) = self.buttons.iter_mut().find(|b| b.identity == identity) {
            view.position = position;
        }
    }

    fn set_label(&mut self, identity: usize, label: &str) {
        if let Some(view) = self.buttons.iter_mut().find(|b| b.identity == identity) {
            view.label = label.to_string();
        }
    }

    fn show_status(&mut self, status: RoundStatus) {
        self.status = Some(status);
    }

    fn show_message(&mut self, message: RoundMessage) {
        self.message = Some(message);
    }

    fn show_validation(&mut self, error: Option<&InvalidCountError>) {
        self.validation = error.map(|e| e.to_string());
    }
}

/// Render the memory game screen and record the container geometry the next
/// round will use.
pub fn render_memory_scene(frame: &mut Frame, area: Rect, view: &mut TerminalPresenter) {
    let layout = create_screen_layout(frame, area, " Memory ", Color::Cyan, 24);

    let header = Rect {
        height: HEADER_ROWS.min(layout.content.height),
        ..layout.content
    };
    let container = Rect {
        y: layout.content.y + header.height,
        height: layout.content.height.saturating_sub(header.height),
        ..layout.content
    };

    render_count_field(frame, header, view);
    view.observe_container(container);

    if !view.buttons.is_empty() {
        render_buttons(frame, container, view);
        view.footprint = Some(view.button_size);
    }

    // The result replaces the status bar so no button is covered
    match view.message {
        Some(message) => {
            let kind = match message {
                RoundMessage::Won => ResultKind::Win,
                RoundMessage::Lost => ResultKind::Loss,
            };
            render_result_banner(
                frame,
                layout.status_bar,
                kind,
                message.title(),
                message.text(),
                "[Enter] Play again  [Esc] Menu",
            );
        }
        None => render_status_line(frame, layout.status_bar, view),
    }
    render_info_panel(frame, layout.info_panel, view);
}

fn render_count_field(frame: &mut Frame, area: Rect, view: &TerminalPresenter) {
    if area.height == 0 {
        return;
    }
    let field = Line::from(vec![
        Span::styled(
            format!("Buttons ({}-{}): ", MIN_BUTTONS, MAX_BUTTONS),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("[{}_]", view.count_field),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(field), Rect { height: 1, ..area });

    if area.height >= 2 {
        let line = match &view.validation {
            Some(error) => Line::from(Span::styled(
                format!("✗ {}", error),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(""),
        };
        frame.render_widget(
            Paragraph::new(line),
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
        );
    }
}

fn render_buttons(frame: &mut Frame, container: Rect, view: &TerminalPresenter) {
    for button in &view.buttons {
        let x = container.x + button.position.x;
        let y = container.y + button.position.y;
        if x >= container.x + container.width || y >= container.y + container.height {
            continue;
        }
        let rect = Rect {
            x,
            y,
            width: view.button_size.width.min(container.x + container.width - x),
            height: view.button_size.height.min(container.y + container.height - y),
        };

        let (r, g, b) = button.color.rgb();
        let bg = Color::Rgb(r, g, b);
        let fg = if button.color.is_light() {
            Color::Black
        } else {
            Color::White
        };
        let focused = view.focus == Some(button.identity);
        let border_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg).bg(bg)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Double
            } else {
                BorderType::Rounded
            })
            .border_style(border_style)
            .style(Style::default().bg(bg));

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(button.label.as_str())
                .style(
                    Style::default()
                        .fg(fg)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center)
                .block(block),
            rect,
        );
    }
}

fn render_status_line(frame: &mut Frame, area: Rect, view: &TerminalPresenter) {
    let (text, color) = match view.status {
        None => ("Type a count and press Enter to start", Color::Gray),
        Some(status @ RoundStatus::GetReady) => (status.text(), Color::Yellow),
        Some(status @ RoundStatus::Scrambling) => (status.text(), Color::Magenta),
        Some(status @ RoundStatus::StartGuessing) => (status.text(), Color::Cyan),
        Some(status @ RoundStatus::Won) => (status.text(), Color::Green),
        Some(status @ RoundStatus::Lost) => (status.text(), Color::Red),
    };
    render_status_bar(
        frame,
        area,
        text,
        color,
        &[
            ("[Enter]", "Start"),
            ("[Click/Space]", "Pick"),
            ("[Tab]", "Focus"),
            ("[Esc]", "Menu"),
        ],
    );
}

fn render_info_panel(frame: &mut Frame, area: Rect, view: &TerminalPresenter) {
    let inner = render_info_panel_frame(frame, area);

    let revealed = view.buttons.iter().filter(|b| !b.label.is_empty()).count();
    let lines = vec![
        Line::from(Span::styled(
            "Remember the order,",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "then click 1, 2, 3...",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Buttons: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                view.buttons.len().to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Showing: ", Style::default().fg(Color::DarkGray)),
            Span::styled(revealed.to_string(), Style::default().fg(Color::White)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
