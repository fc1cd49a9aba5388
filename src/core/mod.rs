//! Core timing, configuration, and constants shared by every screen.

#![allow(unused_imports)]

pub mod constants;
pub mod scheduler;
pub mod settings;

pub use constants::*;
pub use scheduler::*;
pub use settings::*;
