use serde::{Deserialize, Serialize};

use crate::errors::IllegalAction;
use crate::player::PlayerAction as A;

/// What the seat to act is facing on this street.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetContext {
    pub seat: usize,
    pub stack: u32,
    /// Chips this seat already committed on this street
    pub street_bet: u32,
    /// Table-high bet for this street
    pub current_bet: u32,
    pub big_blind: u32,
    /// False when the seat already acted and only a short all-in has raised
    /// since; such a seat may call or fold but not raise.
    pub may_raise: bool,
}

impl BetContext {
    pub fn to_call(&self) -> u32 {
        self.current_bet.saturating_sub(self.street_bet)
    }

    /// Street total reached by committing the whole stack.
    pub fn all_in_to(&self) -> u32 {
        self.stack + self.street_bet
    }

    pub fn min_raise_to(&self) -> u32 {
        self.current_bet + self.big_blind
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips moved; equal to the stack for an all-in call
    Call(u32),
    /// New street total. `full` is false for a short all-in raise, which does
    /// not reopen the betting.
    RaiseTo { to: u32, full: bool },
}

/// Validates a submitted action against the betting rules.
///
/// Nothing is clamped: an out-of-range amount is rejected with the rule it
/// breaks. A raise must reach `current_bet + big_blind`, except that a raise
/// putting the whole stack in is always allowed.
///
/// # Examples
///
/// ```
/// use felt_engine::rules::{validate_action, BetContext, ValidatedAction};
/// use felt_engine::player::PlayerAction;
/// use felt_engine::errors::IllegalAction;
///
/// let ctx = BetContext {
///     seat: 0, stack: 500, street_bet: 0, current_bet: 10, big_blind: 10, may_raise: true,
/// };
/// assert!(matches!(
///     validate_action(&ctx, PlayerAction::RaiseTo(15)),
///     Err(IllegalAction::RaiseBelowMinimum { minimum: 20, .. })
/// ));
/// assert_eq!(
///     validate_action(&ctx, PlayerAction::RaiseTo(20)),
///     Ok(ValidatedAction::RaiseTo { to: 20, full: true })
/// );
/// ```
pub fn validate_action(ctx: &BetContext, action: A) -> Result<ValidatedAction, IllegalAction> {
    let to_call = ctx.to_call();
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(IllegalAction::CheckFacingBet { to_call })
            }
        }
        A::Call => {
            if to_call == 0 {
                Err(IllegalAction::NothingToCall)
            } else {
                Ok(ValidatedAction::Call(to_call.min(ctx.stack)))
            }
        }
        A::AllIn => validate_raise(ctx, ctx.all_in_to()),
        A::RaiseTo(amount) => validate_raise(ctx, amount),
    }
}

fn validate_raise(ctx: &BetContext, amount: u32) -> Result<ValidatedAction, IllegalAction> {
    let all_in_to = ctx.all_in_to();
    if amount > all_in_to {
        return Err(IllegalAction::RaiseExceedsStack {
            amount,
            maximum: all_in_to,
        });
    }
    let all_in = amount == all_in_to;
    if all_in && amount <= ctx.current_bet {
        // not enough to raise: this is an all-in call
        return if ctx.stack == 0 {
            Err(IllegalAction::NothingToCall)
        } else {
            Ok(ValidatedAction::Call(ctx.stack))
        };
    }
    if !ctx.may_raise {
        return Err(IllegalAction::RaiseNotReopened { seat: ctx.seat });
    }
    let full = amount >= ctx.min_raise_to();
    if !full && !all_in {
        return Err(IllegalAction::RaiseBelowMinimum {
            amount,
            minimum: ctx.min_raise_to(),
        });
    }
    Ok(ValidatedAction::RaiseTo { to: amount, full })
}

/// The legal options for a seat, as offered to strategies and the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub can_check: bool,
    /// Chips a call would move (0 when checking is possible)
    pub call_amount: u32,
    pub can_raise: bool,
    /// Smallest legal raise target; the all-in amount when the stack is short
    pub min_raise_to: u32,
    pub max_raise_to: u32,
}

impl LegalActions {
    pub fn from_context(ctx: &BetContext) -> Self {
        let all_in_to = ctx.all_in_to();
        Self {
            can_check: ctx.to_call() == 0,
            call_amount: ctx.to_call().min(ctx.stack),
            can_raise: ctx.may_raise && all_in_to > ctx.current_bet,
            min_raise_to: ctx.min_raise_to().min(all_in_to),
            max_raise_to: all_in_to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(stack: u32, street_bet: u32, current_bet: u32) -> BetContext {
        BetContext {
            seat: 1,
            stack,
            street_bet,
            current_bet,
            big_blind: 10,
            may_raise: true,
        }
    }

    #[test]
    fn check_facing_bet_is_rejected() {
        assert_eq!(
            validate_action(&ctx(100, 0, 10), A::Check),
            Err(IllegalAction::CheckFacingBet { to_call: 10 })
        );
    }

    #[test]
    fn call_with_nothing_owed_is_rejected() {
        assert_eq!(
            validate_action(&ctx(100, 10, 10), A::Call),
            Err(IllegalAction::NothingToCall)
        );
    }

    #[test]
    fn short_call_moves_whole_stack() {
        assert_eq!(validate_action(&ctx(6, 0, 10), A::Call), Ok(ValidatedAction::Call(6)));
    }

    #[test]
    fn short_all_in_raise_is_legal_but_not_full() {
        // stack 5 on top of a 10 blind: all-in to 15, below the 20 minimum
        assert_eq!(
            validate_action(&ctx(5, 10, 10), A::RaiseTo(15)),
            Ok(ValidatedAction::RaiseTo { to: 15, full: false })
        );
        assert_eq!(
            validate_action(&ctx(5, 10, 10), A::AllIn),
            Ok(ValidatedAction::RaiseTo { to: 15, full: false })
        );
    }

    #[test]
    fn raise_beyond_stack_is_rejected_not_clamped() {
        assert_eq!(
            validate_action(&ctx(50, 0, 10), A::RaiseTo(80)),
            Err(IllegalAction::RaiseExceedsStack { amount: 80, maximum: 50 })
        );
    }

    #[test]
    fn all_in_below_current_bet_is_a_call() {
        assert_eq!(validate_action(&ctx(4, 0, 10), A::AllIn), Ok(ValidatedAction::Call(4)));
    }

    #[test]
    fn closed_action_allows_call_but_not_raise() {
        let mut c = ctx(500, 20, 35);
        c.may_raise = false;
        assert_eq!(validate_action(&c, A::Call), Ok(ValidatedAction::Call(15)));
        assert_eq!(
            validate_action(&c, A::RaiseTo(100)),
            Err(IllegalAction::RaiseNotReopened { seat: 1 })
        );
        assert!(!LegalActions::from_context(&c).can_raise);
    }

    #[test]
    fn legal_actions_cap_min_raise_at_all_in() {
        let legal = LegalActions::from_context(&ctx(8, 0, 10));
        assert!(!legal.can_raise);
        assert_eq!(legal.call_amount, 8);

        let legal = LegalActions::from_context(&ctx(15, 0, 10));
        assert!(legal.can_raise);
        assert_eq!(legal.min_raise_to, 15);
        assert_eq!(legal.max_raise_to, 15);
    }
}
