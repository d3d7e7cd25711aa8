//! Output formatting utilities for CLI.

// Report text is built with format! + push_str for readability
#![allow(clippy::format_push_string, clippy::cast_precision_loss)]

use clipem::game::Seat;
use clipem::tournament::GameResult;
use serde::Serialize;

/// JSON-serializable game result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGameResult {
    /// Random seed used.
    pub(super) seed: u64,
    /// Winner player number (null if the turn cap was hit).
    pub(super) winner: Option<u8>,
    /// Total turns played.
    pub(super) turns_played: u32,
    /// Completed rounds.
    pub(super) rounds: u32,
    /// Per-player results.
    pub(super) players: Vec<JsonPlayerResult>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult {
    /// Player number (1-4).
    pub(super) seat: u8,
    /// Display name.
    pub(super) name: String,
    /// Strategy played.
    pub(super) strategy: String,
    /// Final token distances by slot.
    pub(super) distances: [u8; 4],
    /// Tokens home.
    pub(super) home: u32,
    /// Opponent tokens captured.
    pub(super) captures: u32,
    /// Own tokens lost to captures.
    pub(super) tokens_lost: u32,
    /// Turns passed without a legal move.
    pub(super) passes: u32,
}

impl JsonGameResult {
    /// Create from a GameResult.
    pub(super) fn from_game_result(result: &GameResult, names: &[String]) -> Self {
        let players = Seat::ALL
            .iter()
            .map(|&seat| {
                let i = seat.index();
                let stats = result.stats[i];
                let distances = result.distances[i];
                JsonPlayerResult {
                    seat: seat.number(),
                    name: names.get(i).cloned().unwrap_or_default(),
                    strategy: result
                        .strategies
                        .get(i)
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                    distances,
                    home: stats.tokens_home,
                    captures: stats.captures,
                    tokens_lost: stats.tokens_lost,
                    passes: stats.passes,
                }
            })
            .collect();

        Self {
            seed: result.seed,
            winner: result.winner.map(|seat| seat.number()),
            turns_played: result.turns_played,
            rounds: result.rounds,
            players,
        }
    }
}

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Game Result (seed: {})\n", result.seed));
    if let Some(winner) = result.winner {
        let name = names.get(winner.index()).map_or("Unknown", String::as_str);
        output.push_str(&format!("  Winner: {winner} ({name})\n"));
    } else {
        output.push_str("  Winner: none (turn cap reached)\n");
    }
    output.push_str(&format!(
        "  Turns: {} ({} rounds)\n\n",
        result.turns_played, result.rounds
    ));

    for (i, stats) in result.stats.iter().enumerate() {
        let name = names.get(i).map_or("Unknown", String::as_str);
        let strategy = result
            .strategies
            .get(i)
            .map_or_else(String::new, ToString::to_string);
        output.push_str(&format!(
            "  P{} {name} [{strategy}]: {} home, {} captures, {} lost, {} passes\n",
            i + 1,
            stats.tokens_home,
            stats.captures,
            stats.tokens_lost,
            stats.passes
        ));
    }

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default)]
pub(super) struct TournamentStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Win count per seat.
    pub(super) wins: Vec<u64>,
    /// Games stopped by the turn cap.
    pub(super) unfinished: u64,
    /// Games the engine aborted.
    pub(super) failed: u64,
    /// Captures made per seat.
    captures: Vec<u64>,
    /// Tokens lost per seat.
    tokens_lost: Vec<u64>,
    /// Total turns across all games.
    total_turns: u64,
}

impl TournamentStats {
    /// Create new stats for n seats.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            games_played: 0,
            wins: vec![0; num_players],
            unfinished: 0,
            failed: 0,
            captures: vec![0; num_players],
            tokens_lost: vec![0; num_players],
            total_turns: 0,
        }
    }

    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);

        if let Some(winner) = result.winner {
            if let Some(wins) = self.wins.get_mut(winner.index()) {
                *wins += 1;
            }
        } else {
            self.unfinished += 1;
        }

        for (i, stats) in result.stats.iter().enumerate() {
            if let Some(c) = self.captures.get_mut(i) {
                *c += u64::from(stats.captures);
            }
            if let Some(l) = self.tokens_lost.get_mut(i) {
                *l += u64::from(stats.tokens_lost);
            }
        }
    }

    /// Count a game the engine aborted.
    pub(super) fn add_failure(&mut self) {
        self.failed += 1;
    }

    /// Merge stats accumulated on another thread.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.unfinished += other.unfinished;
        self.failed += other.failed;
        self.total_turns += other.total_turns;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.captures.iter_mut().zip(&other.captures) {
            *a += b;
        }
        for (a, b) in self.tokens_lost.iter_mut().zip(&other.tokens_lost) {
            *a += b;
        }
    }

    /// Get win rate for a seat (0.0-1.0).
    pub(super) fn win_rate(&self, seat: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(seat).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Average captures per game for a seat.
    pub(super) fn avg_captures(&self, seat: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.captures.get(seat).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Average tokens lost per game for a seat.
    pub(super) fn avg_tokens_lost(&self, seat: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.tokens_lost.get(seat).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get average game length.
    pub(super) fn avg_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Per-seat statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Games stopped by the turn cap.
    unfinished: u64,
    /// Games the engine aborted.
    failed: u64,
    /// Average game length in turns.
    avg_turns: f64,
}

/// JSON-serializable per-seat tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Seat number (1-4).
    seat: usize,
    /// Strategy name.
    strategy: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average captures per game.
    avg_captures: f64,
    /// Average tokens lost per game.
    avg_tokens_lost: f64,
}

impl JsonTournamentResult {
    /// Create from stats and strategy names.
    pub(super) fn from_stats(stats: &TournamentStats, names: &[String]) -> Self {
        let players = (0..names.len())
            .map(|i| JsonTournamentPlayer {
                seat: i + 1,
                strategy: names.get(i).cloned().unwrap_or_default(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_captures: stats.avg_captures(i),
                avg_tokens_lost: stats.avg_tokens_lost(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            unfinished: stats.unfinished,
            failed: stats.failed,
            avg_turns: stats.avg_turns(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Tournament Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        output.push_str(&format!("  P{} ({name}): {rate:.1}% ({wins} wins)\n", i + 1));
    }
    if stats.unfinished > 0 {
        output.push_str(&format!("  Unfinished: {}\n", stats.unfinished));
    }
    if stats.failed > 0 {
        output.push_str(&format!("  Aborted: {}\n", stats.failed));
    }

    output.push_str("\nCaptures per game (made / suffered):\n");
    for (i, name) in names.iter().enumerate() {
        output.push_str(&format!(
            "  P{} ({name}): {:.2} / {:.2}\n",
            i + 1,
            stats.avg_captures(i),
            stats.avg_tokens_lost(i)
        ));
    }

    output.push_str(&format!("\nAverage Game Length: {:.0} turns\n", stats.avg_turns()));

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str("seat,strategy,wins,win_rate,avg_captures,avg_tokens_lost\n");

    for (i, name) in names.iter().enumerate() {
        output.push_str(&format!(
            "{},{},{},{:.4},{:.2},{:.2}\n",
            i + 1,
            name,
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_captures(i),
            stats.avg_tokens_lost(i)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipem::tournament::{run_game, Strategy};
    use clipem::GameConfig;

    const TABLE: [Strategy; 4] = [
        Strategy::Runner,
        Strategy::Random,
        Strategy::Hunter,
        Strategy::First,
    ];

    fn names() -> Vec<String> {
        TABLE.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_stats_merge() {
        let config = GameConfig::default();
        let mut a = TournamentStats::new(4);
        let mut b = TournamentStats::new(4);
        a.add_result(&run_game(1, &TABLE, &config).unwrap());
        b.add_result(&run_game(2, &TABLE, &config).unwrap());
        b.add_failure();
        a.merge(&b);

        assert_eq!(a.games_played, 2);
        assert_eq!(a.failed, 1);
        assert_eq!(a.wins.iter().sum::<u64>() + a.unfinished, 2);
        let rates: f64 = (0..4).map(|i| a.win_rate(i)).sum();
        assert!((rates - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = TournamentStats::new(4);
        assert!(stats.win_rate(0).abs() < f64::EPSILON);
        assert!(stats.avg_turns().abs() < f64::EPSILON);
    }

    #[test]
    fn test_csv_shape() {
        let mut stats = TournamentStats::new(4);
        stats.add_result(&run_game(3, &TABLE, &GameConfig::default()).unwrap());
        let csv = format_tournament_csv(&stats, &names());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("seat,strategy"));
        assert!(lines[1].starts_with("1,runner,"));
    }

    #[test]
    fn test_game_json() {
        let result = run_game(4, &TABLE, &GameConfig::default()).unwrap();
        let json = JsonGameResult::from_game_result(&result, &names());
        assert_eq!(json.players.len(), 4);
        assert_eq!(json.winner, result.winner.map(|s| s.number()));
        let text = serde_json::to_string(&json).unwrap();
        assert!(text.contains("\"strategy\":\"hunter\""));
    }
}
