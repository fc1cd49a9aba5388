//! Random colors and placements for buttons.
//!
//! Nothing here guarantees distinct colors or non-overlapping positions.

use super::types::{Bounds, ButtonColor, Footprint, Position};
use rand::Rng;

/// Any 24-bit color.
pub fn random_color<R: Rng>(rng: &mut R) -> ButtonColor {
    ButtonColor(rng.gen_range(0..=0xFF_FFFF))
}

/// A top-left corner such that the whole footprint stays inside `bounds`.
///
/// When the footprint is larger than the container along an axis, that
/// coordinate is pinned to 0.
pub fn random_position<R: Rng>(rng: &mut R, bounds: Bounds, footprint: Footprint) -> Position {
    let max_x = bounds.width.saturating_sub(footprint.width);
    let max_y = bounds.height.saturating_sub(footprint.height);
    Position {
        x: rng.gen_range(0..=max_x),
        y: rng.gen_range(0..=max_y),
    }
}
