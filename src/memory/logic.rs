//! Round state transitions: creation, scrambling, and guess evaluation.
//!
//! These functions only mutate the [`Round`]; the controller decides what to
//! tell the presenter and which timers to arm.

use super::random::{random_color, random_position};
use super::types::*;
use crate::core::constants::BUTTON_GAP;
use rand::Rng;

/// Left-to-right, top-to-bottom layout in ascending identity order.
///
/// Rows are separated by one blank line when they all fit, packed edge to
/// edge when they don't, and clamped to the bottom as a last resort so every
/// button stays inside `bounds`.
pub fn initial_layout(count: usize, bounds: Bounds, footprint: Footprint) -> Vec<Position> {
    let step_x = footprint.width.saturating_add(BUTTON_GAP).max(1);
    let per_row = (bounds.width.saturating_add(BUTTON_GAP) / step_x).max(1) as usize;
    let rows = count.div_ceil(per_row) as u16;

    let spaced = footprint.height.saturating_add(1);
    let spaced_fits = rows
        .saturating_sub(1)
        .saturating_mul(spaced)
        .saturating_add(footprint.height)
        <= bounds.height;
    let step_y = if spaced_fits { spaced } else { footprint.height };
    let max_y = bounds.height.saturating_sub(footprint.height);

    (0..count)
        .map(|i| {
            let col = (i % per_row) as u16;
            let row = (i / per_row) as u16;
            Position {
                x: col.saturating_mul(step_x),
                y: row.saturating_mul(step_y).min(max_y),
            }
        })
        .collect()
}

/// How long the numbers stay visible before scrambling starts.
pub fn display_duration_ms(count: usize, ms_per_button: u64) -> u64 {
    count as u64 * ms_per_button
}

/// Create the buttons and move `Idle -> Displaying`. Returns false if the
/// round was not idle.
pub fn start_round<R: Rng>(
    round: &mut Round,
    bounds: Bounds,
    footprint: Footprint,
    rng: &mut R,
) -> bool {
    if round.phase != RoundPhase::Idle {
        return false;
    }

    let count = round.requested_count.as_usize();
    round.buttons = initial_layout(count, bounds, footprint)
        .into_iter()
        .enumerate()
        .map(|(identity, position)| Button {
            identity,
            position,
            color: random_color(rng),
            label: (identity + 1).to_string(),
            revealed: false,
        })
        .collect();
    round.progress = GuessProgress::new(count);
    round.scramble_ticks_done = 0;
    round.phase = RoundPhase::Displaying;
    true
}

/// `Displaying -> Scrambling`. Returns false from any other phase.
pub fn begin_scrambling(round: &mut Round) -> bool {
    if round.phase != RoundPhase::Displaying {
        return false;
    }
    round.phase = RoundPhase::Scrambling;
    true
}

/// Redraw every button's position once. After the last tick the labels are
/// cleared and the round moves to `AwaitingGuess`.
///
/// Returns false (and changes nothing) outside `Scrambling`.
pub fn scramble_tick<R: Rng>(
    round: &mut Round,
    bounds: Bounds,
    footprint: Footprint,
    rng: &mut R,
) -> bool {
    if round.phase != RoundPhase::Scrambling {
        return false;
    }

    for button in &mut round.buttons {
        button.position = random_position(rng, bounds, footprint);
    }
    round.scramble_ticks_done += 1;

    if round.scramble_ticks_done >= round.scramble_ticks_total {
        hide_labels(round);
        round.phase = RoundPhase::AwaitingGuess;
    }
    true
}

/// Clear every label so only color and position remain.
pub fn hide_labels(round: &mut Round) {
    for button in &mut round.buttons {
        button.label.clear();
        button.revealed = false;
    }
}

/// Show every button's original number.
pub fn reveal_all(round: &mut Round) {
    for button in &mut round.buttons {
        button.label = button.number_label();
        button.revealed = true;
    }
}

/// Judge a click on `identity`.
///
/// The player must reproduce the exact creation order: at step k only the
/// button with identity k is correct, even if other buttons are still
/// unrevealed. Any other identity loses the round and reveals every number.
pub fn apply_guess(round: &mut Round, identity: usize) -> GuessOutcome {
    if round.phase != RoundPhase::AwaitingGuess || round.button(identity).is_none() {
        return GuessOutcome::Ignored;
    }
    let Some(expected) = round.progress.expected_identity() else {
        return GuessOutcome::Ignored;
    };

    if identity != expected {
        round.phase = RoundPhase::Lost;
        reveal_all(round);
        return GuessOutcome::Lost {
            expected,
            clicked: identity,
        };
    }

    if let Some(button) = round.button_mut(identity) {
        button.label = button.number_label();
        button.revealed = true;
    }
    round.progress.next += 1;

    if round.progress.is_complete() {
        round.phase = RoundPhase::Won;
        GuessOutcome::Won
    } else {
        GuessOutcome::Correct {
            identity,
            next: round.progress.next,
        }
    }
}

/// The button drawn on top at a container-relative cell. Later buttons are
/// drawn over earlier ones, so the search runs back to front.
pub fn button_at(round: &Round, x: u16, y: u16, footprint: Footprint) -> Option<usize> {
    round
        .buttons
        .iter()
        .rev()
        .find(|b| b.contains(x, y, footprint))
        .map(|b| b.identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::MAX_BUTTONS;
    use crate::core::scheduler::Scheduler;
    use crate::memory::validation::ValidCount;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BOUNDS: Bounds = Bounds {
        width: 60,
        height: 16,
    };
    const FP: Footprint = Footprint {
        width: 10,
        height: 3,
    };

    fn idle_round(count: i64, ticks: u32) -> Round {
        let mut sched: Scheduler<RoundTimer> = Scheduler::new();
        Round::new(ValidCount::new(count).unwrap(), ticks, sched.issue_token())
    }

    /// A round that has finished scrambling and awaits guesses.
    fn guessing_round(count: i64) -> Round {
        let mut rng = StdRng::seed_from_u64(1);
        let mut round = idle_round(count, 2);
        assert!(start_round(&mut round, BOUNDS, FP, &mut rng));
        assert!(begin_scrambling(&mut round));
        while round.phase == RoundPhase::Scrambling {
            scramble_tick(&mut round, BOUNDS, FP, &mut rng);
        }
        round
    }

    fn labels(round: &Round) -> Vec<String> {
        round.buttons.iter().map(|b| b.label.clone()).collect()
    }

    #[test]
    fn test_initial_layout_ascending_left_to_right() {
        let positions = initial_layout(4, BOUNDS, FP);
        assert_eq!(positions[0], Position { x: 0, y: 0 });
        assert_eq!(positions[1], Position { x: 12, y: 0 });
        assert_eq!(positions[3], Position { x: 36, y: 0 });
    }

    #[test]
    fn test_initial_layout_wraps_rows() {
        // 60 wide fits 5 buttons of 10 with a gap of 2
        let positions = initial_layout(7, BOUNDS, FP);
        assert_eq!(positions[4], Position { x: 48, y: 0 });
        assert_eq!(positions[5], Position { x: 0, y: 4 });
        assert_eq!(positions[6], Position { x: 12, y: 4 });
    }

    #[test]
    fn test_initial_layout_narrow_container_one_per_row() {
        let narrow = Bounds {
            width: 4,
            height: 30,
        };
        let positions = initial_layout(3, narrow, FP);
        assert!(positions.iter().all(|p| p.x == 0));
        assert_eq!(positions[2].y, 8);
    }

    #[test]
    fn test_initial_layout_packs_rows_in_smallest_container() {
        // Memory screen container at the smallest allowed terminal
        let small = Bounds {
            width: 34,
            height: 10,
        };
        let positions = initial_layout(MAX_BUTTONS as usize, small, FP);
        assert_eq!(positions.len(), 7);
        for p in &positions {
            assert!(p.x + FP.width <= small.width, "{:?} overflows width", p);
            assert!(p.y + FP.height <= small.height, "{:?} overflows height", p);
        }
        // Three rows packed edge to edge, no overlap
        assert_eq!(positions[3], Position { x: 0, y: 3 });
        assert_eq!(positions[6], Position { x: 0, y: 6 });
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                let apart = a.x + FP.width <= b.x
                    || b.x + FP.width <= a.x
                    || a.y + FP.height <= b.y
                    || b.y + FP.height <= a.y;
                assert!(apart, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_initial_layout_clamps_when_rows_cannot_fit() {
        let short = Bounds {
            width: 10,
            height: 5,
        };
        let positions = initial_layout(3, short, FP);
        assert!(positions.iter().all(|p| p.y + FP.height <= short.height));
    }

    #[test]
    fn test_initial_layout_huge_footprint_does_not_overflow() {
        let huge = Footprint {
            width: u16::MAX,
            height: u16::MAX,
        };
        let positions = initial_layout(7, BOUNDS, huge);
        assert!(positions.iter().all(|p| *p == Position { x: 0, y: 0 }));
    }

    #[test]
    fn test_start_round_creates_identities_once_each() {
        let mut rng = StdRng::seed_from_u64(5);
        for count in 3..=7 {
            let mut round = idle_round(count, 1);
            assert!(start_round(&mut round, BOUNDS, FP, &mut rng));
            assert_eq!(round.phase, RoundPhase::Displaying);
            assert_eq!(round.buttons.len(), count as usize);

            let mut ids: Vec<usize> = round.buttons.iter().map(|b| b.identity).collect();
            ids.sort_unstable();
            assert_eq!(ids, (0..count as usize).collect::<Vec<_>>());

            for b in &round.buttons {
                assert_eq!(b.label, (b.identity + 1).to_string());
                assert!(!b.revealed);
            }
        }
    }

    #[test]
    fn test_start_round_only_from_idle() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut round = idle_round(3, 1);
        assert!(start_round(&mut round, BOUNDS, FP, &mut rng));
        assert!(!start_round(&mut round, BOUNDS, FP, &mut rng));
    }

    #[test]
    fn test_display_duration_scales_with_count() {
        assert_eq!(display_duration_ms(3, 1000), 3000);
        assert_eq!(display_duration_ms(7, 250), 1750);
    }

    #[test]
    fn test_labels_stay_until_last_scramble_tick() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut round = idle_round(4, 3);
        start_round(&mut round, BOUNDS, FP, &mut rng);
        assert!(begin_scrambling(&mut round));

        for tick in 1..=2 {
            assert!(scramble_tick(&mut round, BOUNDS, FP, &mut rng));
            assert_eq!(round.phase, RoundPhase::Scrambling, "tick {tick}");
            assert_eq!(labels(&round), vec!["1", "2", "3", "4"]);
        }

        assert!(scramble_tick(&mut round, BOUNDS, FP, &mut rng));
        assert_eq!(round.phase, RoundPhase::AwaitingGuess);
        assert!(round.buttons.iter().all(|b| b.label.is_empty()));
    }

    #[test]
    fn test_scrambled_positions_within_bounds() {
        let round = guessing_round(7);
        for b in &round.buttons {
            assert!(b.position.x + FP.width <= BOUNDS.width);
            assert!(b.position.y + FP.height <= BOUNDS.height);
        }
    }

    #[test]
    fn test_scramble_tick_ignored_outside_scrambling() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut round = idle_round(3, 1);
        assert!(!scramble_tick(&mut round, BOUNDS, FP, &mut rng));
        start_round(&mut round, BOUNDS, FP, &mut rng);
        let before = round.buttons.clone();
        assert!(!scramble_tick(&mut round, BOUNDS, FP, &mut rng));
        assert_eq!(round.buttons, before);
    }

    #[test]
    fn test_ascending_clicks_win() {
        let mut round = guessing_round(3);

        assert_eq!(
            apply_guess(&mut round, 0),
            GuessOutcome::Correct {
                identity: 0,
                next: 1
            }
        );
        assert_eq!(labels(&round), vec!["1", "", ""]);
        assert_eq!(
            apply_guess(&mut round, 1),
            GuessOutcome::Correct {
                identity: 1,
                next: 2
            }
        );
        assert_eq!(labels(&round), vec!["1", "2", ""]);
        assert_eq!(apply_guess(&mut round, 2), GuessOutcome::Won);
        assert_eq!(labels(&round), vec!["1", "2", "3"]);
        assert_eq!(round.phase, RoundPhase::Won);
        assert_eq!(round.progress.next, 3);
    }

    #[test]
    fn test_wrong_click_loses_and_reveals_everything() {
        let mut round = guessing_round(3);
        apply_guess(&mut round, 0);

        assert_eq!(
            apply_guess(&mut round, 2),
            GuessOutcome::Lost {
                expected: 1,
                clicked: 2
            }
        );
        assert_eq!(round.phase, RoundPhase::Lost);
        assert_eq!(labels(&round), vec!["1", "2", "3"]);
        assert!(round.buttons.iter().all(|b| b.revealed));
    }

    #[test]
    fn test_first_click_wrong_loses_immediately() {
        let mut round = guessing_round(5);
        assert!(matches!(
            apply_guess(&mut round, 4),
            GuessOutcome::Lost { expected: 0, .. }
        ));
        assert_eq!(round.progress.next, 0);
        assert_eq!(labels(&round), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_reclicking_revealed_button_loses() {
        let mut round = guessing_round(4);
        apply_guess(&mut round, 0);
        assert!(matches!(apply_guess(&mut round, 0), GuessOutcome::Lost { .. }));
    }

    /// Free recall is not accepted: any unrevealed button other than the
    /// next identity is wrong.
    #[test]
    fn test_exact_order_required_not_free_recall() {
        let mut round = guessing_round(4);
        apply_guess(&mut round, 0);
        apply_guess(&mut round, 1);
        assert!(matches!(
            apply_guess(&mut round, 3),
            GuessOutcome::Lost {
                expected: 2,
                clicked: 3
            }
        ));
    }

    #[test]
    fn test_clicks_after_terminal_are_ignored() {
        let mut round = guessing_round(3);
        for id in 0..3 {
            apply_guess(&mut round, id);
        }
        assert_eq!(round.phase, RoundPhase::Won);
        assert_eq!(apply_guess(&mut round, 0), GuessOutcome::Ignored);
        assert_eq!(apply_guess(&mut round, 1), GuessOutcome::Ignored);
        assert_eq!(round.phase, RoundPhase::Won);
    }

    #[test]
    fn test_clicks_before_guessing_are_ignored() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut round = idle_round(3, 2);
        assert_eq!(apply_guess(&mut round, 0), GuessOutcome::Ignored);

        start_round(&mut round, BOUNDS, FP, &mut rng);
        assert_eq!(apply_guess(&mut round, 0), GuessOutcome::Ignored);

        begin_scrambling(&mut round);
        scramble_tick(&mut round, BOUNDS, FP, &mut rng);
        assert_eq!(round.phase, RoundPhase::Scrambling);
        assert_eq!(apply_guess(&mut round, 0), GuessOutcome::Ignored);
        assert_eq!(round.progress.next, 0);
    }

    #[test]
    fn test_unknown_identity_ignored() {
        let mut round = guessing_round(3);
        assert_eq!(apply_guess(&mut round, 9), GuessOutcome::Ignored);
        assert_eq!(round.phase, RoundPhase::AwaitingGuess);
    }

    #[test]
    fn test_button_at_prefers_topmost() {
        let mut round = guessing_round(3);
        round.buttons[0].position = Position { x: 0, y: 0 };
        round.buttons[1].position = Position { x: 5, y: 1 };
        round.buttons[2].position = Position { x: 40, y: 10 };

        assert_eq!(button_at(&round, 1, 1, FP), Some(0));
        assert_eq!(button_at(&round, 6, 2, FP), Some(1));
        assert_eq!(button_at(&round, 41, 11, FP), Some(2));
        assert_eq!(button_at(&round, 30, 8, FP), None);
    }
}
