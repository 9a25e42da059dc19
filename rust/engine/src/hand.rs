//! Five-to-seven card hand ranking.
//!
//! [`evaluate_hand`] picks the best five-card hand from any 5–7 cards and
//! returns a [`HandStrength`] whose derived ordering is the poker ordering:
//! category first, then kickers high to low. [`HandStrength::score`] packs the
//! same ordering into a single integer (higher is better).

use serde::{Deserialize, Serialize};

use crate::cards::Card;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

impl HandStrength {
    /// Total-ordered integer rank; equal scores are exact ties.
    pub fn score(&self) -> u32 {
        self.kickers
            .iter()
            .fold(self.category as u32, |acc, &k| (acc << 4) | u32::from(k))
    }
}

const ACE: u8 = 14;

/// Evaluate the best five-card hand contained in `cards` (5 to 7 cards).
///
/// # Panics
///
/// Panics if fewer than 5 or more than 7 cards are supplied; callers in this
/// crate always pass hole cards plus a full board.
pub fn evaluate_hand(cards: &[Card]) -> HandStrength {
    assert!(
        (5..=7).contains(&cards.len()),
        "hand ranking needs 5 to 7 cards, got {}",
        cards.len()
    );

    let mut rank_counts = [0u8; 15];
    let mut rank_mask: u16 = 0;
    let mut suit_masks = [0u16; 4];
    let mut suit_counts = [0u8; 4];
    for c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        rank_mask |= 1u16 << r;
        suit_masks[c.suit.index()] |= 1u16 << r;
        suit_counts[c.suit.index()] += 1;
    }

    let flush_suit = suit_counts.iter().position(|&n| n >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high_from_mask(suit_masks[s]) {
            return made(Category::StraightFlush, &[high]);
        }
    }

    let (quads, trips, pairs) = group_ranks(&rank_counts);

    if let Some(&q) = quads.first() {
        let kicker = top_ranks(rank_mask, &[q], 1);
        return made(Category::FourOfAKind, &[q, kicker[0]]);
    }

    if let Some(&t) = trips.first() {
        // second trips plays as the pair
        let pair = trips.get(1).copied().into_iter().chain(pairs.first().copied()).max();
        if let Some(p) = pair {
            return made(Category::FullHouse, &[t, p]);
        }
    }

    if let Some(s) = flush_suit {
        return made(Category::Flush, &top_ranks(suit_masks[s], &[], 5));
    }

    if let Some(high) = straight_high_from_mask(rank_mask) {
        return made(Category::Straight, &[high]);
    }

    if let Some(&t) = trips.first() {
        let mut k = vec![t];
        k.extend(top_ranks(rank_mask, &[t], 2));
        return made(Category::ThreeOfAKind, &k);
    }

    if pairs.len() >= 2 {
        let (hi, lo) = (pairs[0], pairs[1]);
        let mut k = vec![hi, lo];
        k.extend(top_ranks(rank_mask, &[hi, lo], 1));
        return made(Category::TwoPair, &k);
    }

    if let Some(&p) = pairs.first() {
        let mut k = vec![p];
        k.extend(top_ranks(rank_mask, &[p], 3));
        return made(Category::OnePair, &k);
    }

    made(Category::HighCard, &top_ranks(rank_mask, &[], 5))
}

fn made(category: Category, ranks: &[u8]) -> HandStrength {
    let mut kickers = [0u8; 5];
    for (slot, &r) in kickers.iter_mut().zip(ranks) {
        *slot = r;
    }
    HandStrength { category, kickers }
}

/// Rank groups by multiplicity, each ordered high to low.
fn group_ranks(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut quads = vec![];
    let mut trips = vec![];
    let mut pairs = vec![];
    for r in (2..=ACE).rev() {
        match rank_counts[r as usize] {
            4 => quads.push(r),
            3 => trips.push(r),
            2 => pairs.push(r),
            _ => {}
        }
    }
    (quads, trips, pairs)
}

fn top_ranks(mask: u16, exclude: &[u8], n: usize) -> Vec<u8> {
    (2..=ACE)
        .rev()
        .filter(|r| mask & (1u16 << *r) != 0 && !exclude.contains(r))
        .take(n)
        .collect()
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    // wheel: Ace also plays low
    if m & (1u16 << ACE) != 0 {
        m |= 1u16 << 1;
    }
    (5..=ACE).rev().find(|&high| {
        let window = 0b11111u16 << (high - 4);
        m & window == window
    })
}
