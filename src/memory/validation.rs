//! Button-count validation for the count field.

use crate::core::constants::{MAX_BUTTONS, MIN_BUTTONS};
use thiserror::Error;

/// Why the count field can't start a round.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidCountError {
    #[error("Please enter a number between {min} and {max} (got \"{input}\")")]
    NotANumber { input: String, min: u8, max: u8 },
    #[error("Please enter a number between {min} and {max} (got {count})")]
    OutOfRange { count: i64, min: u8, max: u8 },
}

/// A button count known to lie in `MIN_BUTTONS..=MAX_BUTTONS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValidCount(u8);

impl ValidCount {
    pub fn new(count: i64) -> Result<Self, InvalidCountError> {
        if (MIN_BUTTONS as i64..=MAX_BUTTONS as i64).contains(&count) {
            Ok(Self(count as u8))
        } else {
            Err(InvalidCountError::OutOfRange {
                count,
                min: MIN_BUTTONS,
                max: MAX_BUTTONS,
            })
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

/// Validate raw count-field text. Surrounding whitespace is ignored; anything
/// else that isn't a base-10 integer is rejected.
pub fn validate(input: &str) -> Result<ValidCount, InvalidCountError> {
    let trimmed = input.trim();
    let count: i64 = trimmed
        .parse()
        .map_err(|_| InvalidCountError::NotANumber {
            input: trimmed.to_string(),
            min: MIN_BUTTONS,
            max: MAX_BUTTONS,
        })?;
    ValidCount::new(count)
}
