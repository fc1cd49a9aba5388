//! Input handling for every screen.
//!
//! Each handler takes the raw crossterm event plus the state it may mutate
//! and reports what the main loop should do next.

use crate::ui::memory_scene::TerminalPresenter;
use crate::ui::menu_scene::{MenuItem, MenuScreen};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::Rng;
use recall::memory::{GameController, GuessOutcome};
use recall::notes::{KeyValueStore, NotesWriter};
use tracing::warn;

/// Result of handling an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Stay on the current screen.
    Continue,
    /// Return to the main menu.
    Back,
    /// Open a screen from the menu.
    Open(MenuItem),
    /// Leave the program.
    Quit,
}

/// Ignore key release/repeat reports on terminals that send them.
fn is_press(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
}

pub fn handle_menu_input(key: KeyEvent, menu: &mut MenuScreen) -> InputResult {
    if !is_press(&key) {
        return InputResult::Continue;
    }
    if is_ctrl(&key, 'c') {
        return InputResult::Quit;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => menu.move_up(),
        KeyCode::Down | KeyCode::Char('j') => menu.move_down(),
        KeyCode::Enter => {
            return match menu.selected() {
                MenuItem::Quit => InputResult::Quit,
                item => InputResult::Open(item),
            }
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return InputResult::Quit,
        _ => {}
    }
    InputResult::Continue
}

/// Keys on the memory screen: the count field takes typed characters, Enter
/// starts a round, Tab/arrows move focus, Space clicks the focused button.
pub fn handle_memory_key<R: Rng>(
    key: KeyEvent,
    game: &mut GameController<TerminalPresenter, R>,
) -> InputResult {
    if !is_press(&key) {
        return InputResult::Continue;
    }
    if is_ctrl(&key, 'c') {
        return InputResult::Quit;
    }
    match key.code {
        KeyCode::Esc => return InputResult::Back,
        KeyCode::Enter => {
            // Invalid counts are shown on the validation line
            let _ = game.start();
        }
        KeyCode::Backspace => {
            if game.presenter_mut().pop_count_char() {
                let _ = game.count_changed();
            }
        }
        KeyCode::Tab | KeyCode::Right | KeyCode::Down => game.presenter_mut().focus_next(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Up => game.presenter_mut().focus_prev(),
        KeyCode::Char(' ') => {
            if let Some(identity) = game.presenter().focused_identity() {
                game.click(identity);
            }
        }
        KeyCode::Char(c) => {
            if game.presenter_mut().push_count_char(c) {
                let _ = game.count_changed();
            }
        }
        _ => {}
    }
    InputResult::Continue
}

/// Left clicks inside the button container are guesses.
pub fn handle_memory_mouse<R: Rng>(
    mouse: MouseEvent,
    game: &mut GameController<TerminalPresenter, R>,
) -> GuessOutcome {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return GuessOutcome::Ignored;
    }
    match game.presenter().to_container(mouse.column, mouse.row) {
        Some((x, y)) => game.click_at(x, y),
        None => GuessOutcome::Ignored,
    }
}

pub fn handle_writer_input<S: KeyValueStore>(
    key: KeyEvent,
    writer: &mut NotesWriter<S>,
) -> InputResult {
    if !is_press(&key) {
        return InputResult::Continue;
    }
    if is_ctrl(&key, 'c') {
        return InputResult::Quit;
    }
    if is_ctrl(&key, 'n') {
        if let Err(e) = writer.add_note() {
            warn!(error = %e, "saving new note failed");
        }
        return InputResult::Continue;
    }
    if is_ctrl(&key, 'd') {
        if let Err(e) = writer.remove_selected() {
            warn!(error = %e, "saving after remove failed");
        }
        return InputResult::Continue;
    }

    match key.code {
        KeyCode::Esc => {
            // Don't lose the last edits when leaving the screen
            if let Err(e) = writer.flush() {
                warn!(error = %e, "flush on exit failed");
            }
            return InputResult::Back;
        }
        KeyCode::Up => writer.select_prev(),
        KeyCode::Down => writer.select_next(),
        KeyCode::Enter => writer.insert_newline(),
        KeyCode::Backspace => writer.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            writer.insert_char(c)
        }
        _ => {}
    }
    InputResult::Continue
}

pub fn handle_reader_input(key: KeyEvent) -> InputResult {
    if !is_press(&key) {
        return InputResult::Continue;
    }
    if is_ctrl(&key, 'c') {
        return InputResult::Quit;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => InputResult::Back,
        _ => InputResult::Continue,
    }
}
