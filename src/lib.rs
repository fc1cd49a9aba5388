//! Recall - terminal memory game and shared notes library
//!
//! Round logic, timers, settings, and notes storage, exposed for the binary
//! and for integration tests.

pub mod core;
pub mod memory;
pub mod notes;
pub mod utils;
