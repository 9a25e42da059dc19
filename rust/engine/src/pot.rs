//! Side-pot construction and showdown distribution.
//!
//! Pots are layered by the distinct non-zero contribution levels. Each layer
//! collects `(level - previous_level)` from every seat that reached it; only
//! seats that reached it without folding may win it. Folded chips stay in the
//! layers they reached.

use serde::{Deserialize, Serialize};

use crate::errors::InvariantViolation;
use crate::hand::HandStrength;
use crate::player::{Player, PlayerStatus};

/// One seat's total commitment to the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub seat: usize,
    pub amount: u32,
    pub folded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePot {
    pub amount: u32,
    /// Non-folded seats that contributed at least this layer, ascending
    pub eligible: Vec<usize>,
}

/// Chips paid out of one pot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotAward {
    pub pot_index: usize,
    pub amount: u32,
    /// (seat, chips) in payout order; the first entry absorbs any odd chips
    pub shares: Vec<(usize, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotManager {
    pots: Vec<SidePot>,
}

impl PotManager {
    pub fn from_contributions(contributions: &[Contribution]) -> Self {
        let mut levels: Vec<u32> = contributions
            .iter()
            .map(|c| c.amount)
            .filter(|&a| a > 0)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots = Vec::with_capacity(levels.len());
        let mut previous = 0;
        for level in levels {
            let reached: Vec<&Contribution> =
                contributions.iter().filter(|c| c.amount >= level).collect();
            let amount = (level - previous) * reached.len() as u32;
            let mut eligible: Vec<usize> = reached
                .iter()
                .filter(|c| !c.folded)
                .map(|c| c.seat)
                .collect();
            eligible.sort_unstable();
            pots.push(SidePot { amount, eligible });
            previous = level;
        }
        Self { pots }
    }

    pub fn from_players(players: &[Player]) -> Self {
        let contributions: Vec<Contribution> = players
            .iter()
            .map(|p| Contribution {
                seat: p.seat(),
                amount: p.hand_contribution(),
                folded: p.status() == PlayerStatus::Folded,
            })
            .collect();
        Self::from_contributions(&contributions)
    }

    /// All layers, main pot first.
    pub fn pots(&self) -> &[SidePot] {
        &self.pots
    }

    pub fn main_pot(&self) -> u32 {
        self.pots.first().map(|p| p.amount).unwrap_or(0)
    }

    pub fn side_pots(&self) -> &[SidePot] {
        self.pots.get(1..).unwrap_or(&[])
    }

    pub fn total(&self) -> u32 {
        self.pots.iter().map(|p| p.amount).sum()
    }

    /// Award every pot to its best eligible hand(s).
    ///
    /// `strengths` holds the showdown strength of each seat still in the
    /// hand. `order_after_dealer` lists seats starting left of the dealer;
    /// tied winners are paid in that order and the first one receives the
    /// remainder of an uneven split.
    pub fn distribute(
        &self,
        strengths: &[(usize, HandStrength)],
        order_after_dealer: &[usize],
    ) -> Result<Vec<PotAward>, InvariantViolation> {
        let mut awards = Vec::with_capacity(self.pots.len());
        for (pot_index, pot) in self.pots.iter().enumerate() {
            let contenders: Vec<(usize, HandStrength)> = strengths
                .iter()
                .filter(|(seat, _)| pot.eligible.contains(seat))
                .copied()
                .collect();
            let Some(best) = contenders.iter().map(|(_, s)| *s).max() else {
                return Err(InvariantViolation::UnassignedPot { amount: pot.amount });
            };
            let winners: Vec<usize> = order_after_dealer
                .iter()
                .copied()
                .filter(|seat| contenders.iter().any(|(s, h)| s == seat && *h == best))
                .collect();
            if winners.is_empty() {
                return Err(InvariantViolation::UnassignedPot { amount: pot.amount });
            }

            let share = pot.amount / winners.len() as u32;
            let remainder = pot.amount % winners.len() as u32;
            let shares = winners
                .iter()
                .enumerate()
                .map(|(i, &seat)| (seat, if i == 0 { share + remainder } else { share }))
                .collect();
            awards.push(PotAward {
                pot_index,
                amount: pot.amount,
                shares,
            });
        }

        let paid: u32 = awards
            .iter()
            .flat_map(|a| a.shares.iter().map(|(_, chips)| *chips))
            .sum();
        if paid != self.total() {
            return Err(InvariantViolation::UnassignedPot {
                amount: self.total().saturating_sub(paid),
            });
        }
        Ok(awards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contrib(seat: usize, amount: u32, folded: bool) -> Contribution {
        Contribution {
            seat,
            amount,
            folded,
        }
    }

    #[test]
    fn zero_contributions_create_no_layer() {
        let pm = PotManager::from_contributions(&[
            contrib(0, 0, true),
            contrib(1, 40, false),
            contrib(2, 40, false),
        ]);
        assert_eq!(pm.pots().len(), 1);
        assert_eq!(pm.main_pot(), 80);
        assert!(pm.side_pots().is_empty());
    }

    #[test]
    fn eligible_seats_missing_from_showdown_leave_pot_unassigned() {
        let pm = PotManager::from_contributions(&[contrib(0, 10, false), contrib(1, 10, false)]);
        assert_eq!(
            pm.distribute(&[], &[0, 1]),
            Err(InvariantViolation::UnassignedPot { amount: 20 })
        );
    }
}
