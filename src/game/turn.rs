//! The turn controller.
//!
//! A single state machine owns the board and drives the round-robin:
//!
//! ```text
//! AwaitingRoll(seat) --roll--> AwaitingSelection(seat, roll, legal) --select--> AwaitingRoll(next)
//!        |                                                                      ^
//!        +---------------------- empty legal set (pass) ------------------------+
//! ```
//!
//! Victory is only checked when the last seat of a round has acted, so a
//! seat that finishes early still waits for the rest of the table.
//! [`Phase::GameOver`] is terminal.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::game::{
    apply_move, check_invariants, enumerate_moves, Candidate, DieSource, EventSink, GameEvent,
    GameState, LegalActionSet, MoveOutcome, Seat, SelectionRequest, SelectionSource, DIE_FACES,
};

/// How many invalid selections [`TurnController::play_turn`] tolerates
/// before giving up on a selection source.
///
/// This bound only applies to the collaborator-driven loop. A caller that
/// drives [`TurnController::submit_selection`] itself may retry for as long
/// as it likes: the controller stays in [`Phase::AwaitingSelection`].
pub const MAX_SELECTION_ATTEMPTS: u32 = 32;

/// First violation on `state`, as an engine error.
fn verify_board(state: &GameState) -> EngineResult<()> {
    match check_invariants(state).into_iter().next() {
        Some(violation) => {
            log::error!("{violation}");
            Err(EngineError::Invariant(violation))
        }
        None => Ok(()),
    }
}

/// Where the controller is in the turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for `seat` to roll.
    AwaitingRoll {
        /// Seat to act.
        seat: Seat,
    },
    /// Waiting for `seat` to pick one of `legal`.
    AwaitingSelection {
        /// Seat to act.
        seat: Seat,
        /// Roll being spent.
        roll: u8,
        /// Candidates issued for this roll; never empty.
        legal: LegalActionSet,
    },
    /// The game has ended.
    GameOver {
        /// Winning seat.
        winner: Seat,
    },
}

impl Phase {
    /// Short human-readable name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AwaitingRoll { .. } => "awaiting roll",
            Self::AwaitingSelection { .. } => "awaiting selection",
            Self::GameOver { .. } => "game over",
        }
    }

    /// Seat that must act, if any.
    #[must_use]
    pub const fn seat(&self) -> Option<Seat> {
        match self {
            Self::AwaitingRoll { seat } | Self::AwaitingSelection { seat, .. } => Some(*seat),
            Self::GameOver { .. } => None,
        }
    }
}

/// Result of submitting a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollOutcome {
    /// No token could act; the turn passed.
    Passed,
    /// The seat must now choose among these candidates.
    MustSelect(LegalActionSet),
}

/// What a single turn did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// No legal move.
    Passed,
    /// A token moved.
    Moved(MoveOutcome),
}

/// One entry of the game log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn number, starting at 1.
    pub turn: u32,
    /// Seat that acted.
    pub seat: Seat,
    /// Roll spent.
    pub roll: u8,
    /// What happened.
    pub outcome: TurnOutcome,
}

impl TurnRecord {
    /// Slot that moved, if any.
    #[must_use]
    pub const fn moved_slot(&self) -> Option<u8> {
        match self.outcome {
            TurnOutcome::Passed => None,
            TurnOutcome::Moved(outcome) => Some(outcome.slot),
        }
    }
}

/// Drives one game from the first roll to the winner.
#[derive(Debug, Clone)]
pub struct TurnController {
    state: GameState,
    phase: Phase,
}

impl TurnController {
    /// Start a game. The first seat rolls first; a state that already has a
    /// winner starts in [`Phase::GameOver`].
    ///
    /// # Errors
    ///
    /// [`EngineError::Invariant`] if the board breaks an invariant, such as
    /// two seats sharing a ring cell or a distance past home.
    pub fn new(state: GameState) -> EngineResult<Self> {
        verify_board(&state)?;
        let phase = match state.winner {
            Some(winner) => Phase::GameOver { winner },
            None => Phase::AwaitingRoll { seat: Seat::FIRST },
        };
        Ok(Self { state, phase })
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Read-only view of the board.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Give up the controller and keep the board.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Winner, once the game is over.
    #[must_use]
    pub const fn winner(&self) -> Option<Seat> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Submit a die value for the seat awaiting a roll.
    ///
    /// # Errors
    ///
    /// [`EngineError::WrongPhase`] unless awaiting a roll, and
    /// [`EngineError::InvalidRoll`] for values outside `1..=6`. Neither
    /// changes the state.
    pub fn submit_roll(&mut self, roll: u8) -> EngineResult<RollOutcome> {
        let Phase::AwaitingRoll { seat } = self.phase else {
            return Err(self.wrong_phase("roll"));
        };
        if !(1..=DIE_FACES).contains(&roll) {
            return Err(EngineError::InvalidRoll(roll));
        }

        let tokens = match self.state.player(seat) {
            Some(player) => player.tokens,
            None => return Err(EngineError::InvalidRoll(roll)),
        };
        let legal = enumerate_moves(&tokens, roll, &self.state.rules);

        if legal.is_empty() {
            log::debug!("{seat} rolled {roll}: no legal move, passing");
            self.state.record_pass(seat);
            self.end_turn(seat);
            return Ok(RollOutcome::Passed);
        }

        log::debug!("{seat} rolled {roll}: {} candidate(s)", legal.len());
        self.phase = Phase::AwaitingSelection { seat, roll, legal };
        Ok(RollOutcome::MustSelect(legal))
    }

    /// Submit the pending seat's choice.
    ///
    /// # Errors
    ///
    /// [`EngineError::WrongPhase`] unless awaiting a selection and
    /// [`EngineError::InvalidSelection`] if `candidate` was not issued;
    /// both leave the state untouched. [`EngineError::Invariant`] means the
    /// move left the board corrupt; the turn is not closed.
    pub fn submit_selection(&mut self, candidate: Candidate) -> EngineResult<MoveOutcome> {
        let Phase::AwaitingSelection { seat, roll, legal } = self.phase else {
            return Err(self.wrong_phase("select"));
        };
        if !legal.contains(&candidate) {
            log::warn!(
                "{seat} selected token {} with roll {roll}, not in the legal set",
                candidate.slot
            );
            return Err(EngineError::InvalidSelection {
                seat,
                slot: candidate.slot,
            });
        }

        let outcome = apply_move(&mut self.state.players, seat, candidate)?;
        log::debug!(
            "{seat} moved token {} from {} to {} ({})",
            outcome.slot,
            outcome.from,
            outcome.to,
            outcome.cell
        );
        if let Some(capture) = outcome.capture {
            log::info!(
                "{seat} captured {} token {} on {}",
                capture.seat,
                capture.slot,
                capture.cell
            );
        }

        self.state.record_move(&outcome);
        verify_board(&self.state)?;
        self.end_turn(seat);
        Ok(outcome)
    }

    /// Play one full turn through the collaborators.
    ///
    /// Invalid selections are logged and re-requested, up to
    /// [`MAX_SELECTION_ATTEMPTS`] times. After that the turn is abandoned
    /// with the last [`EngineError::InvalidSelection`] and the controller is
    /// left awaiting a selection, so a selector that never picks a legal
    /// candidate cannot hang the game.
    ///
    /// # Errors
    ///
    /// [`EngineError::WrongPhase`] unless awaiting a roll,
    /// [`EngineError::InvalidRoll`] if the die misbehaves,
    /// [`EngineError::InvalidSelection`] if the selector keeps choosing
    /// illegal candidates, and [`EngineError::Invariant`] on corruption.
    pub fn play_turn(
        &mut self,
        die: &mut dyn DieSource,
        selector: &mut dyn SelectionSource,
        sink: &mut dyn EventSink,
    ) -> EngineResult<TurnRecord> {
        let Phase::AwaitingRoll { seat } = self.phase else {
            return Err(self.wrong_phase("play a turn"));
        };
        let roll = die.roll();
        let turn = self.state.turn + 1;

        let outcome = match self.submit_roll(roll)? {
            RollOutcome::Passed => {
                sink.emit(&GameEvent::Passed { seat, roll });
                TurnOutcome::Passed
            }
            RollOutcome::MustSelect(legal) => {
                let outcome = self.select_until_valid(seat, roll, &legal, selector)?;
                sink.emit(&GameEvent::Moved {
                    seat,
                    slot: outcome.slot,
                    roll,
                    cell: outcome.cell,
                });
                if let Some(capture) = outcome.capture {
                    sink.emit(&GameEvent::Captured(capture));
                }
                TurnOutcome::Moved(outcome)
            }
        };

        if let Some(winner) = self.winner() {
            sink.emit(&GameEvent::GameOver { winner });
        }

        Ok(TurnRecord {
            turn,
            seat,
            roll,
            outcome,
        })
    }

    /// Play turns until someone wins or `max_turns` turns have been taken
    /// (0 means no cap). Returns the log of turns played by this call.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`TurnController::play_turn`].
    pub fn play_to_end(
        &mut self,
        die: &mut dyn DieSource,
        selector: &mut dyn SelectionSource,
        sink: &mut dyn EventSink,
        max_turns: u32,
    ) -> EngineResult<Vec<TurnRecord>> {
        let mut log = Vec::new();
        while self.winner().is_none() {
            if max_turns > 0 && self.state.turn >= max_turns {
                log::info!("turn cap {max_turns} reached without a winner");
                break;
            }
            log.push(self.play_turn(die, selector, sink)?);
        }
        Ok(log)
    }

    fn select_until_valid(
        &mut self,
        seat: Seat,
        roll: u8,
        legal: &LegalActionSet,
        selector: &mut dyn SelectionSource,
    ) -> EngineResult<MoveOutcome> {
        let mut attempts = 0;
        loop {
            let candidate = selector.select(&SelectionRequest {
                seat,
                roll,
                legal,
                state: &self.state,
            });
            match self.submit_selection(candidate) {
                Err(err @ EngineError::InvalidSelection { .. }) => {
                    attempts += 1;
                    if attempts >= MAX_SELECTION_ATTEMPTS {
                        return Err(err);
                    }
                }
                result => return result,
            }
        }
    }

    /// Close `seat`'s turn and hand over to the next seat, checking for a
    /// winner when the round is complete.
    fn end_turn(&mut self, seat: Seat) {
        self.state.turn += 1;

        if seat.is_last() {
            self.state.round += 1;
            log::info!("round {} complete", self.state.round);

            if let Some(winner) = self.state.round_winner() {
                log::info!("{winner} wins after {} rounds", self.state.round);
                self.state.winner = Some(winner);
                self.phase = Phase::GameOver { winner };
                return;
            }
        }

        self.phase = Phase::AwaitingRoll { seat: seat.next() };
    }

    fn wrong_phase(&self, operation: &'static str) -> EngineError {
        EngineError::WrongPhase {
            operation,
            phase: self.phase.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, RuleSet, ScriptedDie, ScriptedSelection};

    fn controller(distances: [[u8; 4]; 4]) -> TurnController {
        TurnController::new(GameState::from_distances(distances, RuleSet::default())).unwrap()
    }

    #[test]
    fn test_pass_advances_seat() {
        let mut tc = controller([[0; 4]; 4]);
        assert_eq!(tc.submit_roll(3).unwrap(), RollOutcome::Passed);
        assert_eq!(tc.phase(), &Phase::AwaitingRoll { seat: Seat::ALL[1] });
        assert_eq!(tc.state().turn, 1);
        assert_eq!(tc.state().seat_stats(Seat::FIRST).passes, 1);
    }

    #[test]
    fn test_roll_then_select() {
        let mut tc = controller([[0; 4]; 4]);
        let RollOutcome::MustSelect(legal) = tc.submit_roll(6).unwrap() else {
            panic!("expected candidates");
        };
        assert_eq!(legal.len(), 4);

        let outcome = tc.submit_selection(legal.get(2).unwrap()).unwrap();
        assert_eq!(outcome.to, 1);
        assert_eq!(tc.state().distances()[0], [0, 0, 1, 0]);
        assert_eq!(tc.phase(), &Phase::AwaitingRoll { seat: Seat::ALL[1] });
    }

    #[test]
    fn test_invalid_selection_leaves_state() {
        let mut tc = controller([[10, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        tc.submit_roll(3).unwrap();
        let before = tc.state().clone();
        let phase = *tc.phase();

        let forged = Candidate {
            slot: 1,
            action: Action::Enter,
        };
        let err = tc.submit_selection(forged).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSelection { slot: 1, .. }));
        assert_eq!(tc.state(), &before);
        assert_eq!(tc.phase(), &phase);
    }

    #[test]
    fn test_wrong_phase() {
        let mut tc = controller([[0; 4]; 4]);
        let err = tc
            .submit_selection(Candidate {
                slot: 0,
                action: Action::Enter,
            })
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::WrongPhase {
                operation: "select",
                phase: "awaiting roll"
            }
        );

        tc.submit_roll(6).unwrap();
        assert!(matches!(
            tc.submit_roll(6),
            Err(EngineError::WrongPhase { .. })
        ));
    }

    #[test]
    fn test_invalid_roll_rejected() {
        let mut tc = controller([[0; 4]; 4]);
        assert_eq!(tc.submit_roll(0), Err(EngineError::InvalidRoll(0)));
        assert_eq!(tc.submit_roll(7), Err(EngineError::InvalidRoll(7)));
        assert_eq!(tc.phase(), &Phase::AwaitingRoll { seat: Seat::FIRST });
        assert_eq!(tc.state().turn, 0);
    }

    #[test]
    fn test_victory_waits_for_end_of_round() {
        // Seat 2 finishes on its turn; seats 3 and 4 still act.
        let mut tc = controller([[0; 4], [58, 58, 58, 55], [0; 4], [0; 4]]);
        tc.submit_roll(3).unwrap(); // P1 passes
        let RollOutcome::MustSelect(legal) = tc.submit_roll(3).unwrap() else {
            panic!("expected candidates");
        };
        tc.submit_selection(legal.get(3).unwrap()).unwrap();
        assert!(tc.state().players[1].all_home());
        assert_eq!(tc.phase(), &Phase::AwaitingRoll { seat: Seat::ALL[2] });

        tc.submit_roll(2).unwrap(); // P3 passes
        assert_eq!(tc.winner(), None);
        tc.submit_roll(2).unwrap(); // P4 passes
        assert_eq!(tc.winner(), Some(Seat::ALL[1]));
        assert_eq!(tc.state().winner, Some(Seat::ALL[1]));
        assert_eq!(tc.state().round, 1);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut tc = controller([[58; 4], [0; 4], [0; 4], [0; 4]]);
        for _ in 0..4 {
            tc.submit_roll(1).unwrap();
        }
        assert_eq!(tc.winner(), Some(Seat::FIRST));
        assert!(matches!(
            tc.submit_roll(6),
            Err(EngineError::WrongPhase { phase: "game over", .. })
        ));
    }

    #[test]
    fn test_first_in_seating_order_wins() {
        let mut tc = controller([[0; 4], [0; 4], [58; 4], [58; 4]]);
        for _ in 0..4 {
            tc.submit_roll(1).unwrap();
        }
        assert_eq!(tc.winner(), Some(Seat::ALL[2]));
    }

    #[test]
    fn test_play_turn_emits_events() {
        // P3 (offset 26) at d=27 sits on P1's entry cell.
        let mut tc = controller([[0; 4], [0; 4], [27, 0, 0, 0], [0; 4]]);
        let mut die = ScriptedDie::new(vec![6]);
        let mut selector = ScriptedSelection::new(vec![0]);
        let mut events: Vec<GameEvent> = Vec::new();

        let record = tc.play_turn(&mut die, &mut selector, &mut events).unwrap();
        assert_eq!(record.turn, 1);
        assert_eq!(record.moved_slot(), Some(0));
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], GameEvent::Captured(c) if c.seat == Seat::ALL[2]));
    }

    #[test]
    fn test_play_turn_reasks_after_invalid_selection() {
        let mut tc = controller([[10, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut die = ScriptedDie::new(vec![3]);
        // Slot 2 is at start, slot 0 is legal.
        let mut selector = ScriptedSelection::new(vec![2, 0]);
        let record = tc
            .play_turn(&mut die, &mut selector, &mut crate::game::NullSink)
            .unwrap();
        assert_eq!(record.moved_slot(), Some(0));
        assert_eq!(selector.remaining(), 0);
    }

    #[test]
    fn test_round_robin_rotation() {
        let mut tc = controller([[0; 4]; 4]);
        let mut die = ScriptedDie::new(vec![1; 10]);
        let mut selector = ScriptedSelection::default();
        let log = tc
            .play_to_end(&mut die, &mut selector, &mut crate::game::NullSink, 10)
            .unwrap();
        let seats: Vec<u8> = log.iter().map(|r| r.seat.number()).collect();
        assert_eq!(seats, vec![1, 2, 3, 4, 1, 2, 3, 4, 1, 2]);
        assert_eq!(tc.state().round, 2);
    }

    #[test]
    fn test_new_rejects_shared_ring_cell() {
        // P1 at d=14 and P2 at d=1 both sit on ring cell 13.
        let state = GameState::from_distances(
            [[14, 0, 30, 0], [1, 0, 0, 0], [0; 4], [0; 4]],
            RuleSet::default(),
        );
        let err = TurnController::new(state).unwrap_err();
        assert!(matches!(err, EngineError::Invariant(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_new_rejects_distance_past_home() {
        let state = GameState::from_distances(
            [[0; 4], [99, 0, 0, 0], [0; 4], [0; 4]],
            RuleSet::default(),
        );
        match TurnController::new(state).unwrap_err() {
            EngineError::Invariant(violation) => assert!(violation.message.contains("P2")),
            other => panic!("expected an invariant error, got {other:?}"),
        }
    }

    #[test]
    fn test_new_accepts_finished_board() {
        let mut state =
            GameState::from_distances([[58; 4], [0; 4], [0; 4], [0; 4]], RuleSet::default());
        state.winner = Some(Seat::FIRST);
        let tc = TurnController::new(state).unwrap();
        assert_eq!(tc.winner(), Some(Seat::FIRST));
    }

    #[test]
    fn test_play_turn_gives_up_after_attempt_limit() {
        let mut tc = controller([[10, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = tc.state().clone();
        let mut die = ScriptedDie::new(vec![3]);
        // Slot 1 is at start and never legal on a 3.
        let mut selector = ScriptedSelection::new(vec![1; MAX_SELECTION_ATTEMPTS as usize + 5]);

        let err = tc
            .play_turn(&mut die, &mut selector, &mut crate::game::NullSink)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSelection { slot: 1, .. }));
        assert_eq!(selector.remaining(), 5);
        assert_eq!(tc.state(), &before);
        assert!(matches!(tc.phase(), Phase::AwaitingSelection { roll: 3, .. }));
    }
}
