//! Multi-turn integration tests for game mechanics.
//!
//! These tests drive the public API end to end: the turn controller through
//! scripted collaborators, complete bot games, recordings on disk and
//! config files.
//!
//! Run with: cargo test --release game_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::io::Write;

use clipem::game::{
    cell, Action, Candidate, Cell, GameEvent, GameState, Phase, RollOutcome, RuleSet,
    ScriptedDie, ScriptedSelection, Seat, TurnController, TurnOutcome, HOME_DISTANCE,
};
use clipem::replay::{Recording, ReplayEngine, ReplayError};
use clipem::tournament::{run_game, Strategy};
use clipem::GameConfig;

const ALL_STRATEGIES: [Strategy; 4] = [
    Strategy::Runner,
    Strategy::Hunter,
    Strategy::Cautious,
    Strategy::Random,
];

fn controller(distances: [[u8; 4]; 4]) -> TurnController {
    TurnController::new(GameState::from_distances(distances, RuleSet::default())).unwrap()
}

fn select_only(tc: &mut TurnController, roll: u8) -> Candidate {
    let RollOutcome::MustSelect(legal) = tc.submit_roll(roll).unwrap() else {
        panic!("expected candidates for roll {roll}");
    };
    assert_eq!(legal.len(), 1, "expected exactly one candidate");
    legal.iter().next().unwrap()
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_ring_to_stretch() {
    let mut tc = controller([[50, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
    let candidate = select_only(&mut tc, 4);
    assert_eq!(candidate.action, Action::Advance { from: 50, to: 54 });

    let outcome = tc.submit_selection(candidate).unwrap();
    assert_eq!(outcome.to, 54);
    assert_eq!(
        outcome.cell,
        Cell::Stretch {
            seat: Seat::FIRST,
            step: 1
        }
    );
}

#[test]
fn test_overshoot_clamps_home() {
    let mut tc = controller([[55, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
    let candidate = select_only(&mut tc, 6);
    let outcome = tc.submit_selection(candidate).unwrap();
    assert_eq!(outcome.to, HOME_DISTANCE);
    assert!(outcome.reached_home());
    assert_eq!(tc.state().seat_stats(Seat::FIRST).tokens_home, 1);
}

#[test]
fn test_entry_captures_third_seat() {
    // P3 enters at ring 26; distance 27 puts it on ring 0, P1's entry cell
    let mut tc = controller([[0, 0, 0, 0], [0; 4], [27, 0, 0, 0], [0; 4]]);
    assert_eq!(cell(Seat::ALL[2], 0, 27), Cell::Ring(0));

    let RollOutcome::MustSelect(legal) = tc.submit_roll(6).unwrap() else {
        panic!("expected candidates");
    };
    let outcome = tc.submit_selection(legal.get(0).unwrap()).unwrap();

    let capture = outcome.capture.unwrap();
    assert_eq!(capture.seat, Seat::ALL[2]);
    assert_eq!(capture.slot, 0);
    assert_eq!(capture.lost_distance, 27);
    assert_eq!(tc.state().distances()[2], [0, 0, 0, 0]);
    assert_eq!(tc.state().distances()[0], [1, 0, 0, 0]);
}

#[test]
fn test_all_at_start_auto_passes() {
    let mut tc = controller([[0; 4]; 4]);
    let before = tc.state().distances();
    for seat in Seat::ALL {
        assert_eq!(tc.phase().seat(), Some(seat));
        assert_eq!(tc.submit_roll(3).unwrap(), RollOutcome::Passed);
    }
    assert_eq!(tc.state().distances(), before);
    assert_eq!(tc.state().round, 1);
}

#[test]
fn test_victory_waits_for_round_end() {
    let mut tc = controller([[0; 4], [58, 58, 58, 55], [0; 4], [0; 4]]);

    // P1 passes, P2 brings its last token home
    assert_eq!(tc.submit_roll(3).unwrap(), RollOutcome::Passed);
    let candidate = select_only(&mut tc, 3);
    tc.submit_selection(candidate).unwrap();
    assert!(tc.state().players[1].all_home());

    // Not over until P3 and P4 have acted
    assert_eq!(tc.winner(), None);
    assert_eq!(tc.phase(), &Phase::AwaitingRoll { seat: Seat::ALL[2] });
    tc.submit_roll(2).unwrap();
    assert_eq!(tc.winner(), None);
    tc.submit_roll(2).unwrap();

    assert_eq!(tc.winner(), Some(Seat::ALL[1]));
    assert!(tc.submit_roll(6).is_err());
}

// =============================================================================
// COLLABORATOR-DRIVEN PLAY
// =============================================================================

#[test]
fn test_scripted_game_events() {
    let mut tc = controller([[0; 4]; 4]);
    // P1 enters token 0, P2 to P4 pass, P1 advances it by 5
    let mut die = ScriptedDie::new([6, 1, 1, 1, 5]);
    let mut selector = ScriptedSelection::new([0, 0]);
    let mut events: Vec<GameEvent> = Vec::new();

    for _ in 0..5 {
        tc.play_turn(&mut die, &mut selector, &mut events).unwrap();
    }

    assert_eq!(tc.state().distances()[0], [6, 0, 0, 0]);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::Passed { .. }))
            .count(),
        3
    );
    assert_eq!(
        events.last(),
        Some(&GameEvent::Moved {
            seat: Seat::FIRST,
            slot: 0,
            roll: 5,
            cell: Cell::Ring(5),
        })
    );
}

#[test]
fn test_capture_exclusivity_in_play() {
    // P1 token 0 sits on ring 3; P2 token 0 reaches ring 3 at distance 43
    let mut tc = controller([[4, 10, 0, 0], [41, 0, 0, 0], [0; 4], [0; 4]]);
    assert_eq!(cell(Seat::ALL[1], 0, 43), cell(Seat::FIRST, 0, 4));

    let RollOutcome::MustSelect(legal) = tc.submit_roll(1).unwrap() else {
        panic!("expected candidates");
    };
    assert_eq!(legal.len(), 2);
    tc.submit_selection(legal.get(1).unwrap()).unwrap();

    let candidate = select_only(&mut tc, 2);
    let outcome = tc.submit_selection(candidate).unwrap();
    let capture = outcome.capture.unwrap();
    assert_eq!(capture.seat, Seat::FIRST);
    assert_eq!(capture.slot, 0);
    assert_eq!(tc.state().distances()[0], [0, 11, 0, 0]);
    assert_eq!(tc.state().distances()[1], [43, 0, 0, 0]);
}

// =============================================================================
// BOT GAMES
// =============================================================================

#[test]
fn test_bot_games_finish() {
    let config = GameConfig::default();
    for seed in 0..20 {
        let result = run_game(seed, &ALL_STRATEGIES, &config).unwrap();
        let winner = result.winner.expect("bot games should finish");
        assert_eq!(result.distances[winner.index()], [HOME_DISTANCE; 4]);
        assert_eq!(result.turns_played as usize, result.log.len());
        assert_eq!(result.turns_played % 4, 0, "games end on a round boundary");
        assert_eq!(result.standings[0], winner);
    }
}

#[test]
fn test_bot_game_deterministic() {
    let config = GameConfig::default();
    let a = run_game(99, &ALL_STRATEGIES, &config).unwrap();
    let b = run_game(99, &ALL_STRATEGIES, &config).unwrap();
    assert_eq!(a.log, b.log);
    assert_eq!(a.winner, b.winner);
    assert_eq!(a.stats, b.stats);
}

#[test]
fn test_turn_cap_stops_game() {
    let config = GameConfig {
        max_turns: 40,
        ..GameConfig::default()
    };
    let result = run_game(5, &[Strategy::First; 4], &config).unwrap();
    assert_eq!(result.turns_played, 40);
    assert_eq!(result.winner, None);
}

#[test]
fn test_captures_balance() {
    let config = GameConfig::default();
    for seed in 0..10 {
        let result = run_game(seed, &[Strategy::Hunter; 4], &config).unwrap();
        let made: u32 = result.stats.iter().map(|s| s.captures).sum();
        let lost: u32 = result.stats.iter().map(|s| s.tokens_lost).sum();
        assert_eq!(made, lost);
        assert_eq!(made, result.total_captures());
    }
}

// =============================================================================
// RECORDINGS AND CONFIG FILES
// =============================================================================

#[test]
fn test_recording_round_trip_replays() {
    let config = GameConfig::default();
    let result = run_game(7, &ALL_STRATEGIES, &config).unwrap();
    let recording = Recording::from_result(config, &result);

    let file = tempfile::NamedTempFile::new().unwrap();
    recording.save(file.path()).unwrap();
    let loaded = Recording::load(file.path()).unwrap();
    assert_eq!(loaded.log, result.log);

    let mut engine = ReplayEngine::new(loaded).unwrap();
    let state = engine.verify_all().unwrap();
    assert_eq!(state.distances(), result.distances);
    assert_eq!(state.winner, result.winner);
}

#[test]
fn test_tampered_recording_diverges() {
    let config = GameConfig::default();
    let result = run_game(8, &ALL_STRATEGIES, &config).unwrap();
    let mut recording = Recording::from_result(config, &result);

    let moved = recording
        .log
        .iter()
        .position(|r| r.moved_slot().is_some())
        .unwrap();
    recording.log[moved].roll = if recording.log[moved].roll == 1 { 2 } else { 1 };

    let mut engine = ReplayEngine::new(recording).unwrap();
    let err = engine.verify_all().unwrap_err();
    assert!(matches!(
        err,
        ReplayError::Diverged { .. } | ReplayError::Engine { .. }
    ));
}

#[test]
fn test_config_file_drives_game() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
max_turns = 400

[rules]
entry_roll = 5

[[players]]
name = "Ada"
color = "green"

[[players]]
name = "Brook"
color = "blue"

[[players]]
name = "Cyd"
color = "white"

[[players]]
name = "Dee"
color = "red"
"#
    )
    .unwrap();

    let config = GameConfig::load(file.path()).unwrap();
    assert_eq!(config.rules.entry_roll, 5);
    assert!(config.rules.block_own_tokens);

    let state = config.build_state().unwrap();
    assert_eq!(state.players[0].name, "Ada");

    let result = run_game(11, &ALL_STRATEGIES, &config).unwrap();
    assert!(result.turns_played <= 400);
    // Every entry happened on a 5
    for record in &result.log {
        if let TurnOutcome::Moved(outcome) = record.outcome {
            assert!(!outcome.entered() || record.roll == 5);
        }
    }
}
