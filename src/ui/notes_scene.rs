//! Notes writer and reader screens.

use super::game_common::{create_screen_layout, render_info_panel_frame, render_status_bar};
use recall::notes::{KeyValueStore, NotesReader, NotesWriter};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Tallest a single note box grows before its text is cut off.
const MAX_NOTE_HEIGHT: u16 = 6;

const NOTE_PLACEHOLDER: &str = "Enter your note here...";

pub fn render_writer_scene<S: KeyValueStore>(
    frame: &mut Frame,
    area: Rect,
    writer: &NotesWriter<S>,
) {
    let layout = create_screen_layout(frame, area, " Notes Writer ", Color::LightBlue, 26);

    render_note_list(frame, layout.content, writer.notes(), writer.selected());

    let (status, color) = match writer.last_error() {
        Some(error) => (error.to_string(), Color::Red),
        None => (writer.last_saved_text(), Color::Green),
    };
    render_status_bar(
        frame,
        layout.status_bar,
        &status,
        color,
        &[
            ("[Ctrl+N]", "Add"),
            ("[Ctrl+D]", "Remove"),
            ("[↑/↓]", "Select"),
            ("[Esc]", "Back"),
        ],
    );

    let inner = render_info_panel_frame(frame, layout.info_panel);
    let lines = vec![
        Line::from(Span::styled(
            "Typing edits the",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "selected note.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Notes: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                writer.notes().len().to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_reader_scene<S: KeyValueStore>(
    frame: &mut Frame,
    area: Rect,
    reader: &NotesReader<S>,
) {
    let layout = create_screen_layout(frame, area, " Notes Reader ", Color::LightMagenta, 26);

    render_note_list(frame, layout.content, reader.notes(), None);

    let (status, color) = match reader.last_error() {
        Some(error) => (error.to_string(), Color::Red),
        None => (reader.last_retrieved_text(), Color::Green),
    };
    render_status_bar(frame, layout.status_bar, &status, color, &[("[Esc]", "Back")]);

    let inner = render_info_panel_frame(frame, layout.info_panel);
    let lines = vec![
        Line::from(Span::styled(
            "Read-only view.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "Refreshes on its own.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Notes: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                reader.notes().len().to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn note_height(note: &str) -> u16 {
    let lines = note.split('\n').count().max(1) as u16;
    (lines + 2).min(MAX_NOTE_HEIGHT)
}

/// Index of the first note to draw so that `selected` stays on screen.
fn first_visible(notes: &[String], selected: Option<usize>, height: u16) -> usize {
    let Some(selected) = selected else {
        return 0;
    };
    let mut first = selected.min(notes.len().saturating_sub(1));
    let mut used = 0u16;
    // Walk back from the selection while earlier notes still fit
    for i in (0..=first).rev() {
        let h = note_height(&notes[i]);
        if used + h > height {
            break;
        }
        used += h;
        first = i;
    }
    first
}

fn render_note_list(frame: &mut Frame, area: Rect, notes: &[String], selected: Option<usize>) {
    if notes.is_empty() {
        let empty = Paragraph::new("No notes yet.").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (i, note) in notes
        .iter()
        .enumerate()
        .skip(first_visible(notes, selected, area.height))
    {
        let height = note_height(note);
        if y + height > bottom {
            break;
        }

        let is_selected = selected == Some(i);
        let border_style = if is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(format!(" {} ", i + 1))
            .borders(Borders::ALL)
            .border_style(border_style);

        let body = if note.is_empty() {
            Paragraph::new(NOTE_PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
        } else {
            let text = if is_selected {
                format!("{}_", note)
            } else {
                note.clone()
            };
            Paragraph::new(text).style(Style::default().fg(Color::White))
        };

        frame.render_widget(
            body.block(block).wrap(Wrap { trim: false }),
            Rect {
                x: area.x,
                y,
                width: area.width,
                height,
            },
        );
        y += height;
    }
}
