//! # felt-ai: opponent strategies for Hold'em seats
//!
//! Every algorithmic seat is driven by one of four closed [`Strategy`]
//! variants. They share the [`AIOpponent`] decision interface and read the
//! same inputs: a Monte Carlo hand-strength estimate, the stack-to-pot ratio
//! and the pot odds of calling.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Shared decision interface
//! - [`Strategy`] - The closed set of policies
//! - [`DecisionContext`] - What a seat can see when it must act
//! - [`AIDecision`] - The chosen action plus the numbers behind it
//! - [`create_ai`] - Build a strategy from its name
//!
//! ## Quick Start
//!
//! ```rust
//! use felt_ai::{create_ai, AIOpponent, DecisionContext};
//! use felt_engine::game::{Game, TableConfig};
//! use rand::SeedableRng;
//!
//! let mut config = TableConfig::human_vs_bots(2);
//! config.seed = Some(42);
//! let mut game = Game::new(config).unwrap();
//! game.start_hand().unwrap();
//!
//! let ai = create_ai("mathematical", 50).unwrap();
//! let seat = game.to_act().unwrap();
//! let ctx = DecisionContext::for_seat(&game, seat).unwrap();
//! let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(7);
//! let decision = ai.decide(&ctx, &mut rng);
//! game.apply_action(seat, decision.action).unwrap();
//! ```

use std::fmt;
use std::str::FromStr;

use felt_engine::cards::Card;
use felt_engine::errors::{GameError, IllegalAction};
use felt_engine::game::Game;
use felt_engine::logger::Street;
use felt_engine::player::PlayerAction;
use felt_engine::rules::LegalActions;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod bluffer;
pub mod conservative;
pub mod mathematical;
pub mod risk_taker;

pub use bluffer::Bluffer;
pub use conservative::Conservative;
pub use mathematical::Mathematical;
pub use risk_taker::RiskTaker;

/// Everything a seat may look at when deciding. Built from the game state
/// without exposing other seats' hole cards.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionContext {
    pub seat: usize,
    pub hole: [Card; 2],
    pub board: Vec<Card>,
    /// Chips in the middle, current street included
    pub pot: u32,
    pub current_bet: u32,
    pub street_bet: u32,
    pub stack: u32,
    pub big_blind: u32,
    pub street: Street,
    pub legal: LegalActions,
}

impl DecisionContext {
    /// Context for the seat that is to act.
    pub fn for_seat(game: &Game, seat: usize) -> Result<Self, GameError> {
        let legal = game.legal_actions(seat)?;
        match game.to_act() {
            Some(expected) if expected != seat => {
                return Err(IllegalAction::OutOfTurn {
                    expected,
                    actual: seat,
                }
                .into());
            }
            _ => {}
        }
        let player = &game.players()[seat];
        let hole = player
            .hole_cards()
            .ok_or(IllegalAction::SeatNotActive { seat })?;
        Ok(Self {
            seat,
            hole,
            board: game.board().to_vec(),
            pot: game.pot(),
            current_bet: game.current_bet(),
            street_bet: player.street_bet(),
            stack: player.stack(),
            big_blind: game.big_blind(),
            street: game.street(),
            legal,
        })
    }

    pub fn call_amount(&self) -> u32 {
        self.legal.call_amount
    }

    /// Stack-to-pot ratio; an empty pot counts as one chip.
    pub fn spr(&self) -> f64 {
        f64::from(self.stack) / f64::from(self.pot.max(1))
    }

    /// Share of the final pot a call would pay for; `None` when nothing is owed.
    pub fn pot_odds(&self) -> Option<f64> {
        let call = self.call_amount();
        if call == 0 {
            return None;
        }
        Some(f64::from(call) / f64::from(self.pot + call))
    }

    /// Street total for a raise of `fraction` of the pot on top of the
    /// current bet.
    pub fn pot_raise(&self, fraction: f64) -> u32 {
        let extra = (f64::from(self.pot) * fraction).round() as u32;
        self.current_bet + extra.max(self.big_blind)
    }
}

/// A strategy's choice together with the inputs that produced it. Consumed
/// by coaching and UI layers; the engine only needs `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIDecision {
    pub action: PlayerAction,
    pub hand_strength: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pot_odds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spr: Option<f64>,
    pub rationale: String,
}

impl AIDecision {
    fn new(ctx: &DecisionContext, strength: f64, action: PlayerAction, rationale: String) -> Self {
        Self {
            action,
            hand_strength: strength,
            pot_odds: ctx.pot_odds(),
            spr: Some(ctx.spr()),
            rationale,
        }
    }

    /// Raise target, if the action is a sized raise.
    pub fn amount(&self) -> Option<u32> {
        match self.action {
            PlayerAction::RaiseTo(to) => Some(to),
            _ => None,
        }
    }
}

/// Shared decision interface of every opponent policy.
///
/// Implementations may only propose legal actions: raises are clamped into
/// the legal range with [`clamp_raise`], and the betting round still
/// validates whatever comes back.
pub trait AIOpponent {
    /// Pick an action for the seat described by `ctx`. All randomness comes
    /// from `rng`, so a seeded generator reproduces the same decision.
    fn decide<R: Rng + ?Sized>(&self, ctx: &DecisionContext, rng: &mut R) -> AIDecision;

    fn name(&self) -> &str;
}

/// Check when free, otherwise call.
pub fn passive(legal: &LegalActions) -> PlayerAction {
    if legal.can_check {
        PlayerAction::Check
    } else {
        PlayerAction::Call
    }
}

/// Check when free, otherwise fold.
pub fn fold_or_check(legal: &LegalActions) -> PlayerAction {
    if legal.can_check {
        PlayerAction::Check
    } else {
        PlayerAction::Fold
    }
}

/// Turn a desired raise target into a legal action: targets are clamped to
/// `[min_raise_to, max_raise_to]`, the maximum becomes an all-in, and a seat
/// that may not raise falls back to checking or calling.
pub fn clamp_raise(legal: &LegalActions, target: u32) -> PlayerAction {
    if !legal.can_raise {
        return passive(legal);
    }
    let to = target.clamp(legal.min_raise_to, legal.max_raise_to);
    if to == legal.max_raise_to {
        PlayerAction::AllIn
    } else {
        PlayerAction::RaiseTo(to)
    }
}

/// Names accepted by [`create_ai`] and table configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Conservative,
    RiskTaker,
    Mathematical,
    Bluffer,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Conservative,
        StrategyKind::RiskTaker,
        StrategyKind::Mathematical,
        StrategyKind::Bluffer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Conservative => "conservative",
            StrategyKind::RiskTaker => "risk_taker",
            StrategyKind::Mathematical => "mathematical",
            StrategyKind::Bluffer => "bluffer",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "conservative" | "tight" => Ok(StrategyKind::Conservative),
            "risk_taker" | "risktaker" | "aggressive" => Ok(StrategyKind::RiskTaker),
            "mathematical" | "math" => Ok(StrategyKind::Mathematical),
            "bluffer" | "erratic" => Ok(StrategyKind::Bluffer),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// One opponent policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Conservative(Conservative),
    RiskTaker(RiskTaker),
    Mathematical(Mathematical),
    Bluffer(Bluffer),
}

impl Strategy {
    /// Build `kind` with its default tuning and `rollouts` equity trials per
    /// decision.
    pub fn new(kind: StrategyKind, rollouts: usize) -> Self {
        match kind {
            StrategyKind::Conservative => Strategy::Conservative(Conservative::new(rollouts)),
            StrategyKind::RiskTaker => Strategy::RiskTaker(RiskTaker::new(rollouts)),
            StrategyKind::Mathematical => Strategy::Mathematical(Mathematical::new(rollouts)),
            StrategyKind::Bluffer => Strategy::Bluffer(Bluffer::new(rollouts)),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Conservative(_) => StrategyKind::Conservative,
            Strategy::RiskTaker(_) => StrategyKind::RiskTaker,
            Strategy::Mathematical(_) => StrategyKind::Mathematical,
            Strategy::Bluffer(_) => StrategyKind::Bluffer,
        }
    }
}

impl AIOpponent for Strategy {
    fn decide<R: Rng + ?Sized>(&self, ctx: &DecisionContext, rng: &mut R) -> AIDecision {
        let decision = match self {
            Strategy::Conservative(s) => s.decide(ctx, rng),
            Strategy::RiskTaker(s) => s.decide(ctx, rng),
            Strategy::Mathematical(s) => s.decide(ctx, rng),
            Strategy::Bluffer(s) => s.decide(ctx, rng),
        };
        tracing::debug!(
            strategy = self.name(),
            seat = ctx.seat,
            street = ?ctx.street,
            strength = decision.hand_strength,
            action = ?decision.action,
            "opponent decided"
        );
        decision
    }

    fn name(&self) -> &str {
        match self {
            Strategy::Conservative(s) => s.name(),
            Strategy::RiskTaker(s) => s.name(),
            Strategy::Mathematical(s) => s.name(),
            Strategy::Bluffer(s) => s.name(),
        }
    }
}

/// Factory: build a strategy from its configured name.
///
/// ```rust
/// use felt_ai::{create_ai, AIOpponent, StrategyKind};
///
/// let ai = create_ai("risk-taker", 100).unwrap();
/// assert_eq!(ai.kind(), StrategyKind::RiskTaker);
/// assert!(create_ai("gambler", 100).is_err());
/// ```
pub fn create_ai(name: &str, rollouts: usize) -> Result<Strategy, UnknownStrategy> {
    let kind: StrategyKind = name.parse()?;
    Ok(Strategy::new(kind, rollouts))
}


#[cfg(test)]
mod tests {
    use super::test_support::context;
    use super::*;

    #[test]
    fn strategy_names_parse_loosely() {
        assert_eq!("Risk-Taker".parse(), Ok(StrategyKind::RiskTaker));
        assert_eq!("math".parse(), Ok(StrategyKind::Mathematical));
        for kind in StrategyKind::ALL {
            assert_eq!(kind.as_str().parse(), Ok(kind));
            assert_eq!(Strategy::new(kind, 10).kind(), kind);
        }
        assert_eq!(
            "maniac".parse::<StrategyKind>(),
            Err(UnknownStrategy("maniac".into()))
        );
    }

    #[test]
    fn clamp_raise_respects_legal_range() {
        let ctx = context("As Ks", "", 30, 10, 200);
        assert_eq!(clamp_raise(&ctx.legal, 5), PlayerAction::RaiseTo(20));
        assert_eq!(clamp_raise(&ctx.legal, 80), PlayerAction::RaiseTo(80));
        assert_eq!(clamp_raise(&ctx.legal, 5000), PlayerAction::AllIn);

        let mut capped = ctx.legal;
        capped.can_raise = false;
        assert_eq!(clamp_raise(&capped, 80), PlayerAction::Call);
    }

    #[test]
    fn spr_and_pot_odds() {
        let ctx = context("As Ks", "", 100, 50, 400);
        assert_eq!(ctx.spr(), 4.0);
        let odds = ctx.pot_odds().unwrap();
        assert!((odds - 50.0 / 150.0).abs() < 1e-9);
        assert_eq!(context("As Ks", "", 0, 0, 400).pot_odds(), None);
        assert_eq!(context("As Ks", "", 0, 0, 400).spr(), 400.0);
    }
}
