//! Game state management.

use serde::{Deserialize, Serialize};

use crate::game::{
    Color, Distance, MoveOutcome, Player, RuleSet, Seat, Zone, NUM_PLAYERS, TOKENS_PER_PLAYER,
};

/// Per-seat tallies kept for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatStats {
    /// Turns this seat has taken.
    pub turns: u32,
    /// Turns that passed with no legal move.
    pub passes: u32,
    /// Moves applied, entries included.
    pub moves: u32,
    /// Tokens brought out of start.
    pub entries: u32,
    /// Opponent tokens sent back to start.
    pub captures: u32,
    /// Own tokens sent back to start by opponents.
    pub tokens_lost: u32,
    /// Tokens that reached home.
    pub tokens_home: u32,
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The four players, in seat order.
    pub players: Vec<Player>,
    /// Table rules.
    pub rules: RuleSet,
    /// Turns taken so far, passes included.
    pub turn: u32,
    /// Completed rounds.
    pub round: u32,
    /// Per-seat tallies, indexed by seat.
    pub stats: [SeatStats; NUM_PLAYERS],
    /// Winner, once the game is over.
    pub winner: Option<Seat>,
}

impl Default for GameState {
    fn default() -> Self {
        let players = Seat::ALL.map(|seat| {
            Player::new(
                seat,
                format!("Player {}", seat.number()),
                Color::PALETTE[seat.index()],
            )
        });
        Self::new(players, RuleSet::default())
    }
}

impl GameState {
    /// Create a new game with every token at start.
    #[must_use]
    pub fn new(players: [Player; NUM_PLAYERS], rules: RuleSet) -> Self {
        Self {
            players: players.into(),
            rules,
            turn: 0,
            round: 0,
            stats: [SeatStats::default(); NUM_PLAYERS],
            winner: None,
        }
    }

    /// Create a default table with the given token distances, by seat then slot.
    #[must_use]
    pub fn from_distances(
        distances: [[Distance; TOKENS_PER_PLAYER]; NUM_PLAYERS],
        rules: RuleSet,
    ) -> Self {
        let mut state = Self {
            rules,
            ..Self::default()
        };
        for (player, d) in state.players.iter_mut().zip(distances) {
            for (token, distance) in player.tokens.iter_mut().zip(d) {
                token.distance = distance;
            }
        }
        state
    }

    /// Get a player by seat.
    #[must_use]
    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat.index())
    }

    /// Snapshot of every token distance, by seat then slot.
    #[must_use]
    pub fn distances(&self) -> [[Distance; TOKENS_PER_PLAYER]; NUM_PLAYERS] {
        let mut snapshot = [[0; TOKENS_PER_PLAYER]; NUM_PLAYERS];
        for (row, player) in snapshot.iter_mut().zip(&self.players) {
            *row = player.distances();
        }
        snapshot
    }

    /// First seat, in seating order, with all four tokens home.
    #[must_use]
    pub fn round_winner(&self) -> Option<Seat> {
        self.players.iter().find(|p| p.all_home()).map(|p| p.seat)
    }

    /// Whether the game has a winner.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Tally for a seat.
    #[must_use]
    pub fn seat_stats(&self, seat: Seat) -> SeatStats {
        self.stats.get(seat.index()).copied().unwrap_or_default()
    }

    /// Seats ordered by progress, furthest first; ties keep seating order.
    #[must_use]
    pub fn standings(&self) -> Vec<Seat> {
        let mut seats: Vec<&Player> = self.players.iter().collect();
        seats.sort_by_key(|p| std::cmp::Reverse((p.count_in(Zone::Home), p.progress())));
        seats.into_iter().map(|p| p.seat).collect()
    }

    /// Record a turn that passed.
    pub(crate) fn record_pass(&mut self, seat: Seat) {
        if let Some(stats) = self.stats.get_mut(seat.index()) {
            stats.turns += 1;
            stats.passes += 1;
        }
    }

    /// Record an applied move and its capture.
    pub(crate) fn record_move(&mut self, outcome: &MoveOutcome) {
        if let Some(stats) = self.stats.get_mut(outcome.seat.index()) {
            stats.turns += 1;
            stats.moves += 1;
            stats.entries += u32::from(outcome.entered());
            stats.tokens_home += u32::from(outcome.reached_home());
            stats.captures += outcome.capture.map_or(0, |c| c.tokens());
        }
        if let Some(capture) = outcome.capture
            && let Some(stats) = self.stats.get_mut(capture.seat.index())
        {
            stats.tokens_lost += capture.tokens();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CaptureEvent, Cell};

    #[test]
    fn test_default_game() {
        let game = GameState::default();
        assert_eq!(game.players.len(), 4);
        assert_eq!(game.players[2].name, "Player 3");
        assert_eq!(game.players[3].color, Color::Green);
        assert_eq!(game.distances(), [[0; 4]; 4]);
        assert_eq!(game.round_winner(), None);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_round_winner_prefers_seating_order() {
        let game = GameState::from_distances(
            [[58, 58, 58, 57], [58; 4], [0; 4], [58; 4]],
            RuleSet::default(),
        );
        assert_eq!(game.round_winner(), Some(Seat::ALL[1]));
    }

    #[test]
    fn test_standings() {
        let game = GameState::from_distances(
            [[10, 0, 0, 0], [58, 0, 0, 0], [30, 0, 0, 0], [0; 4]],
            RuleSet::default(),
        );
        assert_eq!(
            game.standings(),
            vec![Seat::ALL[1], Seat::ALL[2], Seat::ALL[0], Seat::ALL[3]]
        );
    }

    #[test]
    fn test_record_move_with_capture() {
        let mut game = GameState::default();
        let outcome = MoveOutcome {
            seat: Seat::FIRST,
            slot: 0,
            from: 0,
            to: 1,
            cell: Cell::Ring(0),
            capture: Some(CaptureEvent {
                seat: Seat::ALL[2],
                slot: 1,
                cell: Cell::Ring(0),
                lost_distance: 27,
                stacked: 0,
            }),
        };
        game.record_move(&outcome);
        game.record_pass(Seat::ALL[1]);

        let mover = game.seat_stats(Seat::FIRST);
        assert_eq!(mover.moves, 1);
        assert_eq!(mover.entries, 1);
        assert_eq!(mover.captures, 1);
        assert_eq!(game.seat_stats(Seat::ALL[2]).tokens_lost, 1);
        assert_eq!(game.seat_stats(Seat::ALL[1]).passes, 1);
        assert_eq!(game.seat_stats(Seat::ALL[1]).turns, 1);
    }
}
