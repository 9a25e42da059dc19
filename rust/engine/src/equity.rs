//! Showdown scoring and Monte Carlo hand-strength estimation.
//!
//! Randomness is always supplied by the caller so that a seeded RNG gives
//! reproducible estimates.

use rand::seq::index::sample;
use rand::Rng;

use crate::cards::{full_deck, Card};
use crate::hand::{evaluate_hand, HandStrength};

/// Rollouts used when a caller has no preference.
pub const DEFAULT_ROLLOUTS: usize = 100;

const BOARD_SIZE: usize = 5;

/// Exact strength of two hole cards plus a complete five-card board.
pub fn score_showdown(hole: &[Card; 2], community: &[Card]) -> HandStrength {
    let mut cards = Vec::with_capacity(7);
    cards.extend_from_slice(hole);
    cards.extend_from_slice(community);
    evaluate_hand(&cards)
}

/// Estimated probability in `[0, 1]` that `hole` beats one random opponent
/// holding once the board is complete. Ties count half.
///
/// Each trial draws the opponent's two cards and any missing board cards
/// uniformly from the unseen cards. Zero `iterations` yields the neutral 0.5.
pub fn estimate_strength<R: Rng + ?Sized>(
    hole: &[Card; 2],
    community: &[Card],
    iterations: usize,
    rng: &mut R,
) -> f64 {
    if iterations == 0 {
        return 0.5;
    }
    let unseen: Vec<Card> = full_deck()
        .into_iter()
        .filter(|c| !hole.contains(c) && !community.contains(c))
        .collect();
    let missing = BOARD_SIZE.saturating_sub(community.len());
    let draw = 2 + missing;

    let mut points = 0.0;
    let mut board = Vec::with_capacity(BOARD_SIZE);
    for _ in 0..iterations {
        let picks = sample(rng, unseen.len(), draw);
        let mut picked = picks.iter().map(|i| unseen[i]);
        let (Some(o1), Some(o2)) = (picked.next(), picked.next()) else {
            return 0.5;
        };
        board.clear();
        board.extend_from_slice(community);
        board.extend(picked);

        let ours = score_showdown(hole, &board);
        let theirs = score_showdown(&[o1, o2], &board);
        points += match ours.cmp(&theirs) {
            std::cmp::Ordering::Greater => 1.0,
            std::cmp::Ordering::Equal => 0.5,
            std::cmp::Ordering::Less => 0.0,
        };
    }
    points / iterations as f64
}
