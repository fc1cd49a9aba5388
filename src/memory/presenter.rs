//! The seam between the round controller and whatever draws it.

use super::types::{Bounds, Button, Footprint, Position, RoundMessage, RoundStatus};
use super::validation::InvalidCountError;

/// Rendering and input surface for a memory game.
///
/// The controller reads the count field and geometry on demand and pushes
/// every visible change through the output methods.
pub trait Presenter {
    /// Current raw text of the count field.
    fn count_value(&self) -> String;

    /// Area buttons may occupy.
    fn container_bounds(&self) -> Bounds;

    /// Measured button size, or `None` before the first button is drawn.
    fn button_footprint(&self) -> Option<Footprint>;

    /// Replace whatever buttons are shown with `buttons`.
    fn render_buttons(&mut self, buttons: &[Button]);

    fn move_button(&mut self, identity: usize, position: Position);

    fn set_label(&mut self, identity: usize, label: &str);

    fn show_status(&mut self, status: RoundStatus);

    fn show_message(&mut self, message: RoundMessage);

    /// `None` clears any validation message.
    fn show_validation(&mut self, error: Option<&InvalidCountError>);
}
