//! Die sources.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{DieSource, DIE_FACES};

/// A fair six-sided die driven by a seeded RNG.
///
/// The same seed always yields the same sequence of rolls.
#[derive(Debug, Clone)]
pub struct SeededDie {
    rng: StdRng,
}

impl SeededDie {
    /// Create a die from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DieSource for SeededDie {
    fn roll(&mut self) -> u8 {
        self.rng.random_range(1..=DIE_FACES)
    }
}

/// Plays back a fixed list of rolls.
///
/// Once the list is exhausted it yields `0`, which the controller rejects
/// as an invalid roll.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDie {
    rolls: Vec<u8>,
    next: usize,
}

impl ScriptedDie {
    /// Create a die from a list of rolls.
    #[must_use]
    pub fn new(rolls: impl Into<Vec<u8>>) -> Self {
        Self {
            rolls: rolls.into(),
            next: 0,
        }
    }

    /// Rolls not yet used.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rolls.len().saturating_sub(self.next)
    }
}

impl DieSource for ScriptedDie {
    fn roll(&mut self) -> u8 {
        let roll = self.rolls.get(self.next).copied().unwrap_or(0);
        self.next += 1;
        roll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_die_in_range() {
        let mut die = SeededDie::new(7);
        let mut seen = [false; 6];
        for _ in 0..600 {
            let roll = die.roll();
            assert!((1..=6).contains(&roll));
            seen[usize::from(roll - 1)] = true;
        }
        assert!(seen.iter().all(|&s| s), "every face should come up");
    }

    #[test]
    fn test_seeded_die_deterministic() {
        let mut a = SeededDie::new(42);
        let mut b = SeededDie::new(42);
        let rolls_a: Vec<u8> = (0..50).map(|_| a.roll()).collect();
        let rolls_b: Vec<u8> = (0..50).map(|_| b.roll()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_scripted_die() {
        let mut die = ScriptedDie::new(vec![6, 1]);
        assert_eq!(die.roll(), 6);
        assert_eq!(die.remaining(), 1);
        assert_eq!(die.roll(), 1);
        assert_eq!(die.roll(), 0);
        assert_eq!(die.remaining(), 0);
    }
}
