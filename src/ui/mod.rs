pub mod game_common;
pub mod memory_scene;
pub mod menu_scene;
pub mod notes_scene;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

/// Shown instead of a screen when the terminal is too small to lay it out.
pub const MIN_TERMINAL_WIDTH: u16 = 60;
pub const MIN_TERMINAL_HEIGHT: u16 = 16;

/// Draws a "terminal too small" notice. Returns true if it did, in which case
/// the caller should skip drawing the real screen.
pub fn draw_size_guard(frame: &mut Frame, area: Rect) -> bool {
    if area.width >= MIN_TERMINAL_WIDTH && area.height >= MIN_TERMINAL_HEIGHT {
        return false;
    }
    let text = format!(
        "Terminal too small ({}x{}), need {}x{}",
        area.width, area.height, MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT
    );
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow)),
        area,
    );
    true
}
