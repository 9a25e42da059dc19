//! Betting round state machine for a single street.
//!
//! The round waits on one seat at a time and completes once every player
//! still able to act has both acted this round and matched the table bet.
//! Requiring `has_acted` is what gives the big blind its option after limpers.
//! A full raise reopens the action for everyone else; a short all-in raise
//! does not, so seats that already acted may then only call or fold.

use serde::{Deserialize, Serialize};

use crate::errors::IllegalAction;
use crate::logger::Street;
use crate::player::{Player, PlayerAction};
use crate::rules::{validate_action, BetContext, LegalActions, ValidatedAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "seat", rename_all = "snake_case")]
pub enum RoundState {
    AwaitingAction(usize),
    Complete,
}

#[derive(Debug, Clone)]
pub struct BettingRound {
    street: Street,
    current_bet: u32,
    big_blind: u32,
    state: RoundState,
}

impl BettingRound {
    /// Open a round. `first_seat` is the first candidate to act; seats that
    /// cannot act are skipped. `opening_bet` is the big blind pre-flop and
    /// zero afterwards.
    pub fn open(
        street: Street,
        players: &[Player],
        first_seat: usize,
        big_blind: u32,
        opening_bet: u32,
    ) -> Self {
        let posted = players.iter().map(Player::street_bet).max().unwrap_or(0);
        let mut round = Self {
            street,
            current_bet: opening_bet.max(posted),
            big_blind,
            state: RoundState::Complete,
        };
        round.state = round.next_state(players, first_seat);
        round
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn to_act(&self) -> Option<usize> {
        match self.state {
            RoundState::AwaitingAction(seat) => Some(seat),
            RoundState::Complete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == RoundState::Complete
    }

    pub fn context_for(&self, player: &Player) -> BetContext {
        BetContext {
            seat: player.seat(),
            stack: player.stack(),
            street_bet: player.street_bet(),
            current_bet: self.current_bet,
            big_blind: self.big_blind,
            // having acted while still facing a bet means only a short
            // all-in raised since
            may_raise: !player.has_acted(),
        }
    }

    pub fn legal_actions(&self, player: &Player) -> LegalActions {
        LegalActions::from_context(&self.context_for(player))
    }

    /// Validate and apply `action` for `seat`, then move to the next seat or
    /// complete the round. Nothing changes when the action is rejected.
    pub fn apply(
        &mut self,
        players: &mut [Player],
        seat: usize,
        action: PlayerAction,
    ) -> Result<ValidatedAction, IllegalAction> {
        let expected = match self.state {
            RoundState::AwaitingAction(expected) => expected,
            RoundState::Complete => return Err(IllegalAction::SeatNotActive { seat }),
        };
        if seat >= players.len() {
            return Err(IllegalAction::UnknownSeat { seat });
        }
        if seat != expected {
            return Err(IllegalAction::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        let validated = validate_action(&self.context_for(&players[seat]), action)?;
        match validated {
            ValidatedAction::Fold => players[seat].fold(),
            ValidatedAction::Check => {}
            ValidatedAction::Call(chips) => {
                players[seat].commit(chips);
            }
            ValidatedAction::RaiseTo { to, full } => {
                let chips = to - players[seat].street_bet();
                players[seat].commit(chips);
                self.current_bet = to;
                if full {
                    for p in players.iter_mut().filter(|p| p.seat() != seat && p.is_active()) {
                        p.reopen();
                    }
                }
            }
        }
        players[seat].mark_acted();

        self.state = self.next_state(players, seat + 1);
        tracing::trace!(street = ?self.street, seat, ?validated, state = ?self.state, "action applied");
        Ok(validated)
    }

    fn needs_action(&self, p: &Player) -> bool {
        p.is_active() && (!p.has_acted() || p.street_bet() < self.current_bet)
    }

    fn next_state(&self, players: &[Player], from: usize) -> RoundState {
        let contenders = players.iter().filter(|p| p.in_hand()).count();
        if contenders <= 1 {
            return RoundState::Complete;
        }
        let active: Vec<&Player> = players.iter().filter(|p| p.is_active()).collect();
        // a lone active player who owes nothing has no one left to bet against
        if let [only] = active.as_slice() {
            if only.street_bet() >= self.current_bet {
                return RoundState::Complete;
            }
        }

        let n = players.len();
        (0..n)
            .map(|offset| (from + offset) % n)
            .find(|&seat| self.needs_action(&players[seat]))
            .map(RoundState::AwaitingAction)
            .unwrap_or(RoundState::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerStatus, SeatKind};

    fn table(stacks: &[u32]) -> Vec<Player> {
        stacks
            .iter()
            .enumerate()
            .map(|(seat, &s)| Player::new(seat, SeatKind::Bot, s))
            .collect()
    }

    #[test]
    fn postflop_round_opens_left_of_dealer_and_closes_after_checks() {
        let mut players = table(&[100, 100, 100]);
        // dealer is seat 2, so seat 0 acts first
        let mut round = BettingRound::open(Street::Flop, &players, 0, 10, 0);
        assert_eq!(round.to_act(), Some(0));
        for seat in [0, 1, 2] {
            round.apply(&mut players, seat, PlayerAction::Check).unwrap();
        }
        assert!(round.is_complete());
    }

    #[test]
    fn full_raise_reopens_action_for_others() {
        let mut players = table(&[100, 100, 100]);
        let mut round = BettingRound::open(Street::Flop, &players, 0, 10, 0);
        round.apply(&mut players, 0, PlayerAction::RaiseTo(10)).unwrap();
        round.apply(&mut players, 1, PlayerAction::Call).unwrap();
        round.apply(&mut players, 2, PlayerAction::RaiseTo(30)).unwrap();
        assert!(!players[0].has_acted());
        assert!(!players[1].has_acted());
        assert_eq!(round.to_act(), Some(0));
        round.apply(&mut players, 0, PlayerAction::Call).unwrap();
        round.apply(&mut players, 1, PlayerAction::Fold).unwrap();
        assert!(round.is_complete());
        assert_eq!(players[1].status(), PlayerStatus::Folded);
    }

    #[test]
    fn rejected_action_leaves_state_untouched() {
        let mut players = table(&[100, 100]);
        let mut round = BettingRound::open(Street::Turn, &players, 1, 10, 0);
        let err = round.apply(&mut players, 0, PlayerAction::Check).unwrap_err();
        assert_eq!(err, IllegalAction::OutOfTurn { expected: 1, actual: 0 });
        let err = round.apply(&mut players, 1, PlayerAction::RaiseTo(5)).unwrap_err();
        assert_eq!(err, IllegalAction::RaiseBelowMinimum { amount: 5, minimum: 10 });
        assert_eq!(round.to_act(), Some(1));
        assert_eq!(players[1].stack(), 100);
        assert!(!players[1].has_acted());
    }

    #[test]
    fn fold_to_one_player_completes_round() {
        let mut players = table(&[100, 100]);
        let mut round = BettingRound::open(Street::Flop, &players, 0, 10, 0);
        round.apply(&mut players, 0, PlayerAction::RaiseTo(20)).unwrap();
        round.apply(&mut players, 1, PlayerAction::Fold).unwrap();
        assert!(round.is_complete());
    }
}
