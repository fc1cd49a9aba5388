//! User-tunable settings loaded from `~/.recall/settings.json`.
//!
//! Every field has a default, so a missing or partial file is fine.

use super::constants::*;
use crate::memory::types::Footprint;
use crate::utils::persistence::load_json_or_default;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pre-filled value of the count field.
    pub default_count: u8,
    /// Display phase length per button.
    pub display_ms_per_button: u64,
    /// Number of scramble ticks. `None` scrambles once per button.
    pub scramble_ticks: Option<u32>,
    pub scramble_interval_ms: u64,
    /// Substituted when the view has not measured a button yet.
    pub default_footprint: Footprint,
    /// Writer flush and reader refresh period.
    pub notes_sync_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_count: DEFAULT_BUTTON_COUNT,
            display_ms_per_button: DISPLAY_MS_PER_BUTTON,
            scramble_ticks: None,
            scramble_interval_ms: SCRAMBLE_INTERVAL_MS,
            default_footprint: Footprint {
                width: DEFAULT_BUTTON_WIDTH,
                height: DEFAULT_BUTTON_HEIGHT,
            },
            notes_sync_interval_ms: NOTES_SYNC_INTERVAL_MS,
        }
    }
}

impl Settings {
    /// Load settings from disk, falling back to defaults, then normalise.
    pub fn load() -> Self {
        let settings: Settings = load_json_or_default(SETTINGS_FILE);
        settings.normalized()
    }

    /// Clamp values that would stall or break a round.
    pub fn normalized(mut self) -> Self {
        self.default_count = self.default_count.clamp(MIN_BUTTONS, MAX_BUTTONS);
        self.display_ms_per_button = self.display_ms_per_button.max(1);
        self.scramble_interval_ms = self.scramble_interval_ms.max(1);
        self.notes_sync_interval_ms = self.notes_sync_interval_ms.max(1);
        if self.scramble_ticks == Some(0) {
            self.scramble_ticks = Some(1);
        }
        if self.default_footprint.is_empty() {
            self.default_footprint = Settings::default().default_footprint;
        }
        self.default_footprint = Footprint {
            width: self
                .default_footprint
                .width
                .clamp(MIN_BUTTON_WIDTH, MAX_BUTTON_WIDTH),
            height: self
                .default_footprint
                .height
                .clamp(MIN_BUTTON_HEIGHT, MAX_BUTTON_HEIGHT),
        };
        self
    }

    /// Scramble ticks for a round of `count` buttons.
    pub fn scramble_ticks_for(&self, count: u8) -> u32 {
        self.scramble_ticks.unwrap_or(count as u32).max(1)
    }
}
