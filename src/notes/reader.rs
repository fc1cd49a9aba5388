//! Notes reader: a read-only view that re-reads the store on a timer.

use super::store::{load_notes, KeyValueStore};
use crate::core::scheduler::{CancellationToken, Repeat, Scheduler};
use chrono::{DateTime, Local};
use std::io;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTimer;

pub struct NotesReader<S: KeyValueStore> {
    store: S,
    notes: Vec<String>,
    scheduler: Scheduler<RefreshTimer>,
    token: CancellationToken,
    last_retrieved: Option<DateTime<Local>>,
    last_error: Option<String>,
}

impl<S: KeyValueStore> NotesReader<S> {
    /// Read the notes once and arm the periodic refresh.
    pub fn new(store: S, refresh_interval_ms: u64) -> Self {
        let mut scheduler = Scheduler::new();
        let token = scheduler.issue_token();
        scheduler.schedule_repeating(token, refresh_interval_ms, Repeat::Forever, RefreshTimer);

        let mut reader = Self {
            store,
            notes: Vec::new(),
            scheduler,
            token,
            last_retrieved: None,
            last_error: None,
        };
        let _ = reader.refresh();
        reader
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn last_retrieved(&self) -> Option<DateTime<Local>> {
        self.last_retrieved
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_retrieved_text(&self) -> String {
        match self.last_retrieved {
            Some(at) => format!("Last retrieved: {}", at.format("%H:%M:%S")),
            None => "Last retrieved: never".to_string(),
        }
    }

    /// Re-read the notes now. On failure the previous list stays on screen.
    pub fn refresh(&mut self) -> io::Result<()> {
        match load_notes(&self.store) {
            Ok(notes) => {
                self.notes = notes;
                self.last_retrieved = Some(Local::now());
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to read notes");
                self.last_error = Some(format!("Read failed: {}", e));
                Err(e)
            }
        }
    }

    /// Run the periodic refresh. Returns true if a refresh happened.
    pub fn tick(&mut self, dt_ms: u64) -> bool {
        let due = self
            .scheduler
            .advance(dt_ms)
            .iter()
            .any(|fired| fired.token == self.token);
        if due {
            let _ = self.refresh();
        }
        due
    }
}
