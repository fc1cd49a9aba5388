//! Owns the current round and drives it through its timers.
//!
//! Exactly one round exists at a time. Starting a new one issues a fresh
//! cancellation token, which drops every timer the old round armed, and any
//! firing whose token doesn't match the current round is discarded as well.

use super::logic;
use super::presenter::Presenter;
use super::types::*;
use super::validation::{validate, InvalidCountError, ValidCount};
use crate::core::scheduler::{Fired, Repeat, Scheduler};
use crate::core::settings::Settings;
use rand::Rng;
use tracing::{debug, info};

pub struct GameController<P: Presenter, R: Rng> {
    presenter: P,
    rng: R,
    settings: Settings,
    scheduler: Scheduler<RoundTimer>,
    round: Option<Round>,
}

impl<P: Presenter, R: Rng> GameController<P, R> {
    pub fn new(presenter: P, rng: R, settings: Settings) -> Self {
        Self {
            presenter,
            rng,
            settings,
            scheduler: Scheduler::new(),
            round: None,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Phase of the current round; `Idle` when no round has been started.
    pub fn phase(&self) -> RoundPhase {
        self.round.as_ref().map_or(RoundPhase::Idle, |r| r.phase)
    }

    /// Timers still armed for the current round.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Measured footprint, or the configured default when the presenter
    /// hasn't measured a usable one.
    pub fn effective_footprint(&self) -> Footprint {
        self.presenter
            .button_footprint()
            .filter(|fp| !fp.is_empty())
            .unwrap_or(self.settings.default_footprint)
    }

    /// Re-validate the count field and show or clear the message.
    pub fn count_changed(&mut self) -> Result<ValidCount, InvalidCountError> {
        let result = validate(&self.presenter.count_value());
        self.presenter.show_validation(result.as_ref().err());
        result
    }

    /// Start a fresh round from the count field, replacing any current one.
    ///
    /// An invalid count leaves the current round untouched.
    pub fn start(&mut self) -> Result<(), InvalidCountError> {
        let count = self.count_changed()?;

        if let Some(old) = &self.round {
            if !old.phase.is_terminal() {
                info!(phase = old.phase.name(), "abandoning round in progress");
            }
        }

        let token = self.scheduler.issue_token();
        let bounds = self.presenter.container_bounds();
        let footprint = self.effective_footprint();
        let mut round = Round::new(
            count,
            self.settings.scramble_ticks_for(count.get()),
            token,
        );
        logic::start_round(&mut round, bounds, footprint, &mut self.rng);

        self.presenter.render_buttons(&round.buttons);
        self.presenter.show_status(RoundStatus::GetReady);

        let display_ms =
            logic::display_duration_ms(count.as_usize(), self.settings.display_ms_per_button);
        self.scheduler
            .schedule_once(token, display_ms, RoundTimer::DisplayElapsed);

        info!(
            count = count.get(),
            epoch = token.epoch(),
            display_ms,
            scramble_ticks = round.scramble_ticks_total,
            "round started"
        );
        self.round = Some(round);
        Ok(())
    }

    /// Advance the round clock by `dt_ms`, handling every timer that fires.
    pub fn tick(&mut self, dt_ms: u64) {
        let deadline = self.scheduler.now_ms() + dt_ms;
        while let Some(fired) = self.scheduler.pop_due(deadline) {
            self.on_timer(fired);
        }
        self.scheduler.settle(deadline);
    }

    fn on_timer(&mut self, fired: Fired<RoundTimer>) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if round.token != fired.token {
            debug!(epoch = fired.token.epoch(), "dropping stale timer");
            return;
        }

        match fired.event {
            RoundTimer::DisplayElapsed => {
                if !logic::begin_scrambling(round) {
                    return;
                }
                debug!("scrambling");
                self.presenter.show_status(RoundStatus::Scrambling);
                self.scramble_once();

                // First tick runs on entry; the rest are spaced by the interval
                if let Some(round) = &self.round {
                    if round.phase == RoundPhase::Scrambling {
                        let remaining = round.scramble_ticks_total - round.scramble_ticks_done;
                        self.scheduler.schedule_repeating(
                            fired.token,
                            self.settings.scramble_interval_ms,
                            Repeat::Times(remaining),
                            RoundTimer::ScrambleTick,
                        );
                    }
                }
            }
            RoundTimer::ScrambleTick => self.scramble_once(),
        }
    }

    fn scramble_once(&mut self) {
        let bounds = self.presenter.container_bounds();
        let footprint = self.effective_footprint();
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if !logic::scramble_tick(round, bounds, footprint, &mut self.rng) {
            return;
        }

        for button in &round.buttons {
            self.presenter.move_button(button.identity, button.position);
        }

        if round.phase == RoundPhase::AwaitingGuess {
            for button in &round.buttons {
                self.presenter.set_label(button.identity, &button.label);
            }
            self.presenter.show_status(RoundStatus::StartGuessing);
            debug!(ticks = round.scramble_ticks_done, "awaiting guesses");
        }
    }

    /// Handle a click on the button with `identity`.
    pub fn click(&mut self, identity: usize) -> GuessOutcome {
        let Some(round) = self.round.as_mut() else {
            return GuessOutcome::Ignored;
        };

        let outcome = logic::apply_guess(round, identity);
        match outcome {
            GuessOutcome::Ignored => {
                debug!(identity, phase = round.phase.name(), "click ignored");
            }
            GuessOutcome::Correct { identity, next } => {
                if let Some(button) = round.button(identity) {
                    self.presenter.set_label(identity, &button.label);
                }
                debug!(identity, next, "correct guess");
            }
            GuessOutcome::Won => {
                if let Some(button) = round.button(identity) {
                    self.presenter.set_label(identity, &button.label);
                }
                self.presenter.show_status(RoundStatus::Won);
                self.presenter.show_message(RoundMessage::Won);
                self.scheduler.cancel(round.token);
                info!(count = round.requested_count.get(), "round won");
            }
            GuessOutcome::Lost { expected, clicked } => {
                for button in &round.buttons {
                    self.presenter.set_label(button.identity, &button.label);
                }
                self.presenter.show_status(RoundStatus::Lost);
                self.presenter.show_message(RoundMessage::Lost);
                self.scheduler.cancel(round.token);
                info!(
                    expected,
                    clicked,
                    correct = round.progress.next,
                    "round lost"
                );
            }
        }
        outcome
    }

    /// Handle a click at a container-relative cell. Clicks that miss every
    /// button are ignored.
    pub fn click_at(&mut self, x: u16, y: u16) -> GuessOutcome {
        let footprint = self.effective_footprint();
        let hit = self
            .round
            .as_ref()
            .and_then(|round| logic::button_at(round, x, y, footprint));
        match hit {
            Some(identity) => self.click(identity),
            None => GuessOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Presenter that records what the controller told it.
    #[derive(Default)]
    struct Recorder {
        count: String,
        footprint: Option<Footprint>,
        labels: Vec<String>,
        positions: Vec<Position>,
        statuses: Vec<RoundStatus>,
        messages: Vec<RoundMessage>,
        validation: Option<String>,
        renders: usize,
        moves: usize,
    }

    impl Presenter for Recorder {
        fn count_value(&self) -> String {
            self.count.clone()
        }
        fn container_bounds(&self) -> Bounds {
            Bounds {
                width: 50,
                height: 14,
            }
        }
        fn button_footprint(&self) -> Option<Footprint> {
            self.footprint
        }
        fn render_buttons(&mut self, buttons: &[Button]) {
            self.renders += 1;
            self.labels = buttons.iter().map(|b| b.label.clone()).collect();
            self.positions = buttons.iter().map(|b| b.position).collect();
            self.messages.clear();
        }
        fn move_button(&mut self, identity: usize, position: Position) {
            self.moves += 1;
            self.positions[identity] = position;
        }
        fn set_label(&mut self, identity: usize, label: &str) {
            self.labels[identity] = label.to_string();
        }
        fn show_status(&mut self, status: RoundStatus) {
            self.statuses.push(status);
        }
        fn show_message(&mut self, message: RoundMessage) {
            self.messages.push(message);
        }
        fn show_validation(&mut self, error: Option<&InvalidCountError>) {
            self.validation = error.map(|e| e.to_string());
        }
    }

    fn settings() -> Settings {
        Settings {
            display_ms_per_button: 100,
            scramble_interval_ms: 50,
            scramble_ticks: Some(3),
            ..Settings::default()
        }
    }

    fn controller(count: &str) -> GameController<Recorder, StdRng> {
        let presenter = Recorder {
            count: count.to_string(),
            ..Recorder::default()
        };
        GameController::new(presenter, StdRng::seed_from_u64(99), settings())
    }

    /// Start and run the timers until guessing opens.
    fn ready(count: &str) -> GameController<Recorder, StdRng> {
        let mut c = controller(count);
        c.start().unwrap();
        c.tick(10_000);
        assert_eq!(c.phase(), RoundPhase::AwaitingGuess);
        c
    }

    #[test]
    fn test_idle_before_start() {
        let c = controller("4");
        assert_eq!(c.phase(), RoundPhase::Idle);
        assert!(c.round().is_none());
    }

    #[test]
    fn test_invalid_count_refuses_start() {
        let mut c = controller("9");
        assert!(c.start().is_err());
        assert_eq!(c.phase(), RoundPhase::Idle);
        assert_eq!(c.presenter().renders, 0);
        assert!(c.presenter().validation.is_some());
        assert_eq!(c.pending_timers(), 0);
    }

    #[test]
    fn test_count_changed_clears_message_when_fixed() {
        let mut c = controller("abc");
        assert!(c.count_changed().is_err());
        assert!(c.presenter().validation.is_some());

        c.presenter_mut().count = "5".to_string();
        assert_eq!(c.count_changed().map(|v| v.get()), Ok(5));
        assert!(c.presenter().validation.is_none());
    }

    #[test]
    fn test_display_lasts_one_unit_per_button() {
        let mut c = controller("4");
        c.start().unwrap();
        assert_eq!(c.phase(), RoundPhase::Displaying);
        assert_eq!(c.presenter().labels, vec!["1", "2", "3", "4"]);
        assert_eq!(c.presenter().statuses, vec![RoundStatus::GetReady]);

        c.tick(399);
        assert_eq!(c.phase(), RoundPhase::Displaying);
        c.tick(1);
        assert_eq!(c.phase(), RoundPhase::Scrambling);
        assert_eq!(c.round().unwrap().scramble_ticks_done, 1);
    }

    #[test]
    fn test_scramble_ticks_then_hide() {
        let mut c = controller("3");
        c.start().unwrap();
        c.tick(300);
        assert_eq!(c.phase(), RoundPhase::Scrambling);
        assert_eq!(c.presenter().moves, 3);
        assert_eq!(c.presenter().labels, vec!["1", "2", "3"]);

        c.tick(50);
        assert_eq!(c.phase(), RoundPhase::Scrambling);
        assert_eq!(c.presenter().labels, vec!["1", "2", "3"]);

        c.tick(50);
        assert_eq!(c.phase(), RoundPhase::AwaitingGuess);
        assert_eq!(c.presenter().moves, 9);
        assert!(c.presenter().labels.iter().all(String::is_empty));
        assert_eq!(
            c.presenter().statuses,
            vec![
                RoundStatus::GetReady,
                RoundStatus::Scrambling,
                RoundStatus::StartGuessing
            ]
        );
        assert_eq!(c.pending_timers(), 0);
    }

    #[test]
    fn test_single_scramble_tick_hides_on_entry() {
        let mut c = controller("3");
        c.settings.scramble_ticks = Some(1);
        c.start().unwrap();
        c.tick(300);
        assert_eq!(c.phase(), RoundPhase::AwaitingGuess);
        assert_eq!(c.pending_timers(), 0);
    }

    #[test]
    fn test_positions_in_bounds_after_scramble() {
        let c = ready("7");
        let fp = c.effective_footprint();
        for pos in &c.presenter().positions {
            assert!(pos.x + fp.width <= 50);
            assert!(pos.y + fp.height <= 14);
        }
    }

    #[test]
    fn test_clicks_ignored_while_displaying_and_scrambling() {
        let mut c = controller("3");
        c.start().unwrap();
        assert_eq!(c.click(0), GuessOutcome::Ignored);
        c.tick(300);
        assert_eq!(c.phase(), RoundPhase::Scrambling);
        assert_eq!(c.click(0), GuessOutcome::Ignored);
        assert_eq!(c.round().unwrap().progress.next, 0);
    }

    #[test]
    fn test_win_reveals_in_order() {
        let mut c = ready("3");
        c.click(0);
        assert_eq!(c.presenter().labels, vec!["1", "", ""]);
        c.click(1);
        assert_eq!(c.presenter().labels, vec!["1", "2", ""]);
        assert_eq!(c.click(2), GuessOutcome::Won);
        assert_eq!(c.presenter().labels, vec!["1", "2", "3"]);
        assert_eq!(c.presenter().messages, vec![RoundMessage::Won]);
        assert_eq!(c.phase(), RoundPhase::Won);
    }

    #[test]
    fn test_loss_reveals_everything() {
        let mut c = ready("3");
        c.click(0);
        assert!(matches!(c.click(2), GuessOutcome::Lost { .. }));
        assert_eq!(c.presenter().labels, vec!["1", "2", "3"]);
        assert_eq!(c.presenter().messages, vec![RoundMessage::Lost]);

        // Terminal: further clicks change nothing
        assert_eq!(c.click(1), GuessOutcome::Ignored);
        assert_eq!(c.presenter().messages.len(), 1);
    }

    #[test]
    fn test_restart_cancels_old_timers() {
        let mut c = controller("3");
        c.start().unwrap();
        c.tick(250);

        c.presenter_mut().count = "7".to_string();
        c.start().unwrap();
        assert_eq!(c.round().unwrap().buttons.len(), 7);

        // The first round's display timer would have fired at 300ms
        c.tick(100);
        assert_eq!(c.phase(), RoundPhase::Displaying);
        assert_eq!(c.presenter().moves, 0);

        c.tick(600);
        assert_eq!(c.phase(), RoundPhase::Scrambling);
    }

    #[test]
    fn test_restart_mid_guessing_replaces_round() {
        let mut c = ready("4");
        c.click(0);
        c.start().unwrap();
        let round = c.round().unwrap();
        assert_eq!(round.phase, RoundPhase::Displaying);
        assert_eq!(round.progress.next, 0);
        assert_eq!(c.presenter().labels, vec!["1", "2", "3", "4"]);
        assert_eq!(c.presenter().renders, 2);
    }

    #[test]
    fn test_invalid_restart_keeps_current_round() {
        let mut c = ready("3");
        c.presenter_mut().count = "1".to_string();
        assert!(c.start().is_err());
        assert_eq!(c.phase(), RoundPhase::AwaitingGuess);
        assert_eq!(c.click(0), GuessOutcome::Correct { identity: 0, next: 1 });
    }

    #[test]
    fn test_empty_footprint_falls_back_to_default() {
        let mut c = controller("3");
        c.presenter_mut().footprint = Some(Footprint {
            width: 0,
            height: 0,
        });
        assert_eq!(c.effective_footprint(), c.settings().default_footprint);

        c.presenter_mut().footprint = Some(Footprint {
            width: 6,
            height: 2,
        });
        assert_eq!(
            c.effective_footprint(),
            Footprint {
                width: 6,
                height: 2
            }
        );
    }

    #[test]
    fn test_click_at_hits_button_under_cursor() {
        let mut c = ready("3");
        // Move the others out of the way so the hit is unambiguous
        if let Some(round) = c.round.as_mut() {
            round.buttons[1].position = Position { x: 40, y: 0 };
            round.buttons[2].position = Position { x: 40, y: 11 };
            round.buttons[0].position = Position { x: 0, y: 5 };
        }
        assert_eq!(c.click_at(45, 8), GuessOutcome::Ignored);
        assert_eq!(
            c.click_at(2, 6),
            GuessOutcome::Correct {
                identity: 0,
                next: 1
            }
        );
    }
}
