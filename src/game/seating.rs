//! Random seating draw.

use rand::Rng;

use crate::game::NUM_PLAYERS;

/// Assign play order by a random draw.
///
/// Every entrant draws a uniform value and seats are handed out by
/// descending draw. Equal draws keep entry order.
pub fn draw_seating<T, R>(entrants: [T; NUM_PLAYERS], rng: &mut R) -> [T; NUM_PLAYERS]
where
    R: Rng + ?Sized,
{
    let mut drawn = entrants.map(|entrant| (rng.random::<u64>(), entrant));
    // Stable sort keeps entry order on ties.
    drawn.sort_by(|a, b| b.0.cmp(&a.0));
    drawn.map(|(_, entrant)| entrant)
}
