//! Notes writer: edit the list and flush it to the store on a timer.

use super::store::{load_notes, save_notes, KeyValueStore};
use crate::core::scheduler::{CancellationToken, Repeat, Scheduler};
use chrono::{DateTime, Local};
use std::io;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTimer;

pub struct NotesWriter<S: KeyValueStore> {
    store: S,
    notes: Vec<String>,
    selected: Option<usize>,
    scheduler: Scheduler<SyncTimer>,
    token: CancellationToken,
    last_saved: Option<DateTime<Local>>,
    last_error: Option<String>,
}

impl<S: KeyValueStore> NotesWriter<S> {
    /// Load the current notes and arm the periodic flush.
    pub fn new(store: S, flush_interval_ms: u64) -> Self {
        let mut scheduler = Scheduler::new();
        let token = scheduler.issue_token();
        scheduler.schedule_repeating(token, flush_interval_ms, Repeat::Forever, SyncTimer);

        let mut writer = Self {
            store,
            notes: Vec::new(),
            selected: None,
            scheduler,
            token,
            last_saved: None,
            last_error: None,
        };
        writer.reload();
        writer
    }

    fn reload(&mut self) {
        match load_notes(&self.store) {
            Ok(notes) => {
                self.notes = notes;
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, "failed to load notes");
                self.last_error = Some(format!("Load failed: {}", e));
            }
        }
        self.selected = if self.notes.is_empty() {
            None
        } else {
            Some(self.selected.unwrap_or(0).min(self.notes.len() - 1))
        };
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// "Last saved: HH:MM:SS", or a placeholder before the first save.
    pub fn last_saved_text(&self) -> String {
        match self.last_saved {
            Some(at) => format!("Last saved: {}", at.format("%H:%M:%S")),
            None => "Last saved: never".to_string(),
        }
    }

    /// Write the list to the store now.
    pub fn flush(&mut self) -> io::Result<()> {
        match save_notes(&self.store, &self.notes) {
            Ok(()) => {
                self.last_saved = Some(Local::now());
                self.last_error = None;
                debug!(count = self.notes.len(), "notes saved");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to save notes");
                self.last_error = Some(format!("Save failed: {}", e));
                Err(e)
            }
        }
    }

    /// Run the periodic flush. Returns true if a flush happened.
    pub fn tick(&mut self, dt_ms: u64) -> bool {
        let due = self
            .scheduler
            .advance(dt_ms)
            .iter()
            .any(|fired| fired.token == self.token);
        if due {
            // Failure is recorded in last_error and retried next period
            let _ = self.flush();
        }
        due
    }

    /// Append an empty note, select it, and save right away.
    pub fn add_note(&mut self) -> io::Result<()> {
        self.notes.push(String::new());
        self.selected = Some(self.notes.len() - 1);
        self.flush()
    }

    /// Delete the note at `index` and save right away. Returns false if there
    /// is no such note.
    pub fn remove(&mut self, index: usize) -> io::Result<bool> {
        if index >= self.notes.len() {
            return Ok(false);
        }
        self.notes.remove(index);
        self.selected = match self.selected {
            _ if self.notes.is_empty() => None,
            Some(sel) if sel > index || sel >= self.notes.len() => Some(sel.saturating_sub(1)),
            other => other,
        };
        self.flush()?;
        Ok(true)
    }

    /// Delete the selected note.
    pub fn remove_selected(&mut self) -> io::Result<bool> {
        match self.selected {
            Some(index) => self.remove(index),
            None => Ok(false),
        }
    }

    /// Replace the text of the note at `index`.
    pub fn edit(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.notes.get_mut(index) {
            Some(note) => {
                *note = text.into();
                true
            }
            None => false,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(note) = self.selected.and_then(|i| self.notes.get_mut(i)) {
            note.push(c);
        }
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if let Some(note) = self.selected.and_then(|i| self.notes.get_mut(i)) {
            note.pop();
        }
    }

    pub fn select_next(&mut self) {
        if let Some(sel) = self.selected {
            if sel + 1 < self.notes.len() {
                self.selected = Some(sel + 1);
            }
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(sel) = self.selected {
            self.selected = Some(sel.saturating_sub(1));
        }
    }
}
