//! Memory game: remember the order of numbered buttons after they scramble.

pub mod controller;
pub mod logic;
pub mod presenter;
pub mod random;
pub mod types;
pub mod validation;

pub use controller::GameController;
pub use presenter::Presenter;
pub use types::*;
pub use validation::{validate, InvalidCountError, ValidCount};
