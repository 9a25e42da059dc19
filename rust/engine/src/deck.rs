use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::InvariantViolation;

/// The 52-card deck for one hand. Dealing always removes cards from the
/// front of `cards`, so a card can never be dealt twice between resets.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    burnt: Vec<Card>,
    rng: ChaCha20Rng,
    preset: Option<Vec<Card>>,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            cards: full_deck(),
            burnt: Vec::new(),
            rng: ChaCha20Rng::seed_from_u64(seed),
            preset: None,
        }
    }

    /// A deck that deals `order` front to back on every reset instead of
    /// shuffling. Cards missing from `order` are appended in canonical order
    /// so the deck always holds all 52.
    pub fn stacked(order: Vec<Card>) -> Self {
        let mut preset = Vec::with_capacity(52);
        for c in order.into_iter().chain(full_deck()) {
            if !preset.contains(&c) {
                preset.push(c);
            }
        }
        Self {
            cards: preset.clone(),
            burnt: Vec::new(),
            rng: ChaCha20Rng::seed_from_u64(0),
            preset: Some(preset),
        }
    }

    /// Restore all 52 cards and shuffle them.
    pub fn reset(&mut self) {
        self.burnt.clear();
        match &self.preset {
            Some(order) => self.cards = order.clone(),
            None => {
                self.cards = full_deck();
                self.cards.shuffle(&mut self.rng);
            }
        }
    }

    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, InvariantViolation> {
        if n > self.cards.len() {
            return Err(InvariantViolation::DeckExhausted {
                requested: n,
                remaining: self.cards.len(),
            });
        }
        Ok(self.cards.drain(..n).collect())
    }

    pub fn burn(&mut self) -> Result<(), InvariantViolation> {
        let burnt = self.deal(1)?;
        self.burnt.extend(burnt);
        Ok(())
    }

    /// Two cards per seat, one card per seat per pass.
    pub fn deal_hole_cards(
        &mut self,
        player_count: usize,
    ) -> Result<Vec<[Card; 2]>, InvariantViolation> {
        let first = self.deal(player_count)?;
        let second = self.deal(player_count)?;
        Ok(first.into_iter().zip(second).map(|(a, b)| [a, b]).collect())
    }

    pub fn deal_community(
        &mut self,
        board: &mut Vec<Card>,
        n: usize,
    ) -> Result<(), InvariantViolation> {
        let cards = self.deal(n)?;
        board.extend(cards);
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn burnt(&self) -> &[Card] {
        &self.burnt
    }
}
