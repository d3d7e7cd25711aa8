#![no_main]

//! Turn controller fuzzer.
//!
//! Drives the controller from an arbitrary legal board with arbitrary die
//! values and selections, including out-of-range rolls and forged
//! candidates, and checks the board invariants after every step.

use arbitrary::Arbitrary;
use clipem::game::{
    cell, check_invariants, Action, Candidate, GameState, RollOutcome, RuleSet,
    Seat, TurnController, Zone, HOME_DISTANCE,
};
use libfuzzer_sys::fuzz_target;

/// One fuzzer-generated step.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzStep {
    /// Raw die value; anything outside 1..=6 must be rejected.
    roll: u8,
    /// Slot to select if candidates are offered.
    slot: u8,
    /// Submit a forged enter action instead of the issued candidate.
    forge: bool,
}

/// Structured input for turn fuzzing.
#[derive(Arbitrary, Debug)]
struct GameTurnInput {
    /// Starting distances, settled onto a legal board.
    board: [[u8; 4]; 4],
    /// Whether own tokens block each other.
    block_own_tokens: bool,
    /// Steps to play.
    steps: Vec<FuzzStep>,
}

fuzz_target!(|input: GameTurnInput| {
    let rules = RuleSet {
        block_own_tokens: input.block_own_tokens,
        ..RuleSet::default()
    };

    // Clamp distances and send colliding tokens back to start
    let mut board = input.board.map(|d| d.map(|x| x % (HOME_DISTANCE + 1)));
    let mut taken = std::collections::HashSet::new();
    for seat in Seat::ALL {
        for slot in 0..4u8 {
            let distance = &mut board[seat.index()][usize::from(slot)];
            let c = cell(seat, slot, *distance);
            let shared_ok = !rules.block_own_tokens && Zone::of(*distance) != Zone::OnRing;
            if Zone::of(*distance).in_play() && !shared_ok && !taken.insert(c) {
                *distance = 0;
            }
        }
    }

    let start = GameState::from_distances(board, rules);
    let violations = check_invariants(&start);
    assert!(violations.is_empty(), "Invariants violated at start: {violations:?}");
    let mut tc = TurnController::new(start).expect("settled board is accepted");

    for step in input.steps.into_iter().take(400) {
        if tc.winner().is_some() {
            assert!(tc.submit_roll(step.roll).is_err());
            break;
        }

        let before = tc.state().clone();
        match tc.submit_roll(step.roll) {
            Err(_) => {
                assert!(!(1..=6).contains(&step.roll));
                assert_eq!(tc.state(), &before, "rejected roll changed the board");
                continue;
            }
            Ok(RollOutcome::Passed) => {}
            Ok(RollOutcome::MustSelect(legal)) => {
                let forged = Candidate {
                    slot: step.slot % 4,
                    action: Action::Enter,
                };
                if step.forge && !legal.contains(&forged) {
                    let pending = tc.state().clone();
                    assert!(tc.submit_selection(forged).is_err());
                    assert_eq!(tc.state(), &pending, "rejected selection changed the board");
                }
                let chosen = legal
                    .get(step.slot % 4)
                    .or_else(|| legal.iter().next())
                    .expect("legal set is never empty");
                tc.submit_selection(chosen).expect("issued candidate must apply");
            }
        }

        let violations = check_invariants(tc.state());
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");

        // Home tokens stay home
        for (old, new) in before.distances().iter().zip(tc.state().distances()) {
            for (o, n) in old.iter().zip(new) {
                if *o >= HOME_DISTANCE {
                    assert_eq!(n, HOME_DISTANCE);
                }
            }
        }
    }
});
