use crate::cards::Card;
use serde::{Deserialize, Serialize};

/// Who makes decisions for a seat.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    Human,
    Bot,
}

/// A player's standing within the current hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Still able to act
    Active,
    /// Out of this hand; chips already committed stay in the pot
    Folded,
    /// Whole stack committed; eligible to win up to their contribution
    AllIn,
    /// No chips left; not dealt into future hands
    Eliminated,
}

/// An action submitted for the seat to act.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (only valid when nothing is owed)
    Check,
    /// Match the current bet, or commit the rest of the stack if shorter
    Call,
    /// Raise so this street's total commitment becomes the given amount
    RaiseTo(u32),
    /// Commit every remaining chip
    AllIn,
}

/// Default starting stack size for each player in chips
pub const STARTING_STACK: u32 = 1_000;

/// One seat at the table for the lifetime of a game.
#[derive(Debug, Clone)]
pub struct Player {
    seat: usize,
    kind: SeatKind,
    stack: u32,
    hole: Option<[Card; 2]>,
    street_bet: u32,
    hand_contribution: u32,
    status: PlayerStatus,
    has_acted: bool,
}

impl Player {
    pub fn new(seat: usize, kind: SeatKind, stack: u32) -> Self {
        Self {
            seat,
            kind,
            stack,
            hole: None,
            street_bet: 0,
            hand_contribution: 0,
            status: if stack == 0 {
                PlayerStatus::Eliminated
            } else {
                PlayerStatus::Active
            },
            has_acted: false,
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }
    pub fn kind(&self) -> SeatKind {
        self.kind
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn hole_cards(&self) -> Option<[Card; 2]> {
        self.hole
    }
    pub fn street_bet(&self) -> u32 {
        self.street_bet
    }
    pub fn hand_contribution(&self) -> u32 {
        self.hand_contribution
    }
    pub fn status(&self) -> PlayerStatus {
        self.status
    }
    pub fn has_acted(&self) -> bool {
        self.has_acted
    }

    /// Still contesting the pot (active or all-in).
    pub fn in_hand(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Clear per-hand state. A player without chips becomes eliminated.
    pub fn reset_for_hand(&mut self) {
        self.hole = None;
        self.street_bet = 0;
        self.hand_contribution = 0;
        self.has_acted = false;
        self.status = if self.stack == 0 {
            PlayerStatus::Eliminated
        } else {
            PlayerStatus::Active
        };
    }

    pub fn reset_for_street(&mut self) {
        self.street_bet = 0;
        self.has_acted = false;
    }

    pub fn give_cards(&mut self, cards: [Card; 2]) {
        self.hole = Some(cards);
    }

    /// Move up to `amount` chips from the stack into the pot and return how
    /// many moved. Emptying the stack makes the player all-in.
    pub fn commit(&mut self, amount: u32) -> u32 {
        let moved = amount.min(self.stack);
        self.stack -= moved;
        self.street_bet += moved;
        self.hand_contribution += moved;
        if self.stack == 0 && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
        moved
    }

    pub fn fold(&mut self) {
        self.status = PlayerStatus::Folded;
    }

    pub fn mark_acted(&mut self) {
        self.has_acted = true;
    }

    /// A full raise by someone else reopens the action for this player.
    pub fn reopen(&mut self) {
        self.has_acted = false;
    }

    pub fn add_chips(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }

    /// Take back up to `amount` chips this player committed but nobody called.
    pub fn return_chips(&mut self, amount: u32) -> u32 {
        let returned = amount.min(self.hand_contribution);
        self.hand_contribution -= returned;
        self.street_bet = self.street_bet.saturating_sub(returned);
        self.stack += returned;
        returned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committing_whole_stack_goes_all_in() {
        let mut p = Player::new(0, SeatKind::Bot, 30);
        assert_eq!(p.commit(50), 30);
        assert_eq!(p.status(), PlayerStatus::AllIn);
        assert_eq!(p.street_bet(), 30);
        assert_eq!(p.hand_contribution(), 30);
    }

    #[test]
    fn returned_chips_come_off_the_contribution() {
        let mut p = Player::new(1, SeatKind::Bot, 100);
        p.commit(10);
        p.fold();
        assert_eq!(p.return_chips(4), 4);
        assert_eq!(p.stack(), 94);
        assert_eq!(p.street_bet(), 6);
        assert_eq!(p.hand_contribution(), 6);
        assert_eq!(p.return_chips(50), 6);
        assert_eq!(p.stack(), 100);
    }

    #[test]
    fn broke_player_is_eliminated_on_reset() {
        let mut p = Player::new(2, SeatKind::Human, 10);
        p.commit(10);
        p.reset_for_hand();
        assert_eq!(p.status(), PlayerStatus::Eliminated);
        assert!(!p.in_hand());
    }

    #[test]
    fn street_reset_keeps_hand_contribution() {
        let mut p = Player::new(1, SeatKind::Bot, 100);
        p.commit(40);
        p.mark_acted();
        p.reset_for_street();
        assert_eq!(p.street_bet(), 0);
        assert_eq!(p.hand_contribution(), 40);
        assert!(!p.has_acted());
    }
}
