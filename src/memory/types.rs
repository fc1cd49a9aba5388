//! Memory game data structures.
//!
//! Buttons are shown in order, scrambled around the container, hidden, and
//! must then be clicked back in the order they were created.

use super::validation::ValidCount;
use crate::core::scheduler::CancellationToken;
use serde::{Deserialize, Serialize};

/// Top-left corner of a button, in terminal cells relative to the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

/// Size of the area buttons may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: u16,
    pub height: u16,
}

/// Size of a single rendered button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u16,
    pub height: u16,
}

impl Footprint {
    /// A footprint with no area has not really been measured.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Opaque 24-bit background tag for a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonColor(pub u32);

impl ButtonColor {
    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }

    /// CSS-style `#rrggbb`.
    pub fn hex(&self) -> String {
        format!("#{:06x}", self.0 & 0xFF_FFFF)
    }

    /// Whether dark text reads better than light text on this background.
    pub fn is_light(&self) -> bool {
        let (r, g, b) = self.rgb();
        // Rec. 601 luma
        (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000 > 140
    }
}

/// A numbered button in a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Original index. Never reassigned; guesses are judged against it.
    pub identity: usize,
    pub position: Position,
    pub color: ButtonColor,
    /// Text currently shown on the button (empty while hidden).
    pub label: String,
    /// Whether the number has been revealed by a guess or a loss.
    pub revealed: bool,
}

impl Button {
    /// The 1-based number this button stands for.
    pub fn number_label(&self) -> String {
        (self.identity + 1).to_string()
    }

    /// Hit-test a container-relative cell against this button.
    pub fn contains(&self, x: u16, y: u16, footprint: Footprint) -> bool {
        x >= self.position.x
            && x < self.position.x.saturating_add(footprint.width)
            && y >= self.position.y
            && y < self.position.y.saturating_add(footprint.height)
    }
}

/// Lifecycle of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    Displaying,
    Scrambling,
    AwaitingGuess,
    Won,
    Lost,
}

impl RoundPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Displaying => "Displaying",
            Self::Scrambling => "Scrambling",
            Self::AwaitingGuess => "AwaitingGuess",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }
}

/// Cursor into the order the player must reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessProgress {
    /// Identities in the order they must be clicked.
    pub expected: Vec<usize>,
    /// Index of the next expected identity (0..=expected.len()).
    pub next: usize,
}

impl GuessProgress {
    /// Creation order: 0, 1, ..., count - 1.
    pub fn new(count: usize) -> Self {
        Self {
            expected: (0..count).collect(),
            next: 0,
        }
    }

    pub fn expected_identity(&self) -> Option<usize> {
        self.expected.get(self.next).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.next >= self.expected.len()
    }
}

/// One playthrough, from button creation to win or loss.
#[derive(Debug, Clone)]
pub struct Round {
    pub requested_count: ValidCount,
    pub buttons: Vec<Button>,
    pub phase: RoundPhase,
    pub progress: GuessProgress,
    pub scramble_ticks_done: u32,
    pub scramble_ticks_total: u32,
    /// Owner of every timer armed for this round.
    pub token: CancellationToken,
}

impl Round {
    /// A fresh round in `Idle`, with no buttons yet.
    pub fn new(
        requested_count: ValidCount,
        scramble_ticks_total: u32,
        token: CancellationToken,
    ) -> Self {
        Self {
            requested_count,
            buttons: Vec::new(),
            phase: RoundPhase::Idle,
            progress: GuessProgress::new(requested_count.as_usize()),
            scramble_ticks_done: 0,
            scramble_ticks_total: scramble_ticks_total.max(1),
            token,
        }
    }

    pub fn button(&self, identity: usize) -> Option<&Button> {
        self.buttons.iter().find(|b| b.identity == identity)
    }

    pub fn button_mut(&mut self, identity: usize) -> Option<&mut Button> {
        self.buttons.iter_mut().find(|b| b.identity == identity)
    }
}

/// Timer events that drive a round forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTimer {
    DisplayElapsed,
    ScrambleTick,
}

/// Round-status line shown above the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    GetReady,
    Scrambling,
    StartGuessing,
    Won,
    Lost,
}

impl RoundStatus {
    pub fn text(&self) -> &'static str {
        match self {
            Self::GetReady => "Get ready... memorise the order!",
            Self::Scrambling => "Scrambling...",
            Self::StartGuessing => "Start guessing! Click the buttons in order.",
            Self::Won => "Round won",
            Self::Lost => "Round lost",
        }
    }
}

/// Terminal modal message for a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMessage {
    Won,
    Lost,
}

impl RoundMessage {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Won => "EXCELLENT MEMORY!",
            Self::Lost => "WRONG ORDER!",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Won => "You restored every button in order.",
            Self::Lost => "All numbers are now revealed.",
        }
    }
}

/// What a click did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// No round, wrong phase, or unknown identity.
    Ignored,
    /// Correct click; `next` is the advanced cursor.
    Correct { identity: usize, next: usize },
    /// The final correct click.
    Won,
    /// Incorrect click.
    Lost { expected: usize, clicked: usize },
}
