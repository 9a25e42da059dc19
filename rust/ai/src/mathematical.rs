//! Expected-value opponent: continues whenever calling is +EV and raises
//! only when also a clear favourite. Its rationale is the EV figure itself.

use felt_engine::equity::{estimate_strength, DEFAULT_ROLLOUTS};
use rand::Rng;

use crate::{clamp_raise, fold_or_check, passive, AIDecision, AIOpponent, DecisionContext};

const RAISE_STRENGTH: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct Mathematical {
    pub rollouts: usize,
}

impl Mathematical {
    pub fn new(rollouts: usize) -> Self {
        Self { rollouts }
    }

    /// `strength × (pot + call) − (1 − strength) × call`, in chips.
    pub fn expected_value(strength: f64, pot: u32, call: u32) -> f64 {
        let call = f64::from(call);
        strength * (f64::from(pot) + call) - (1.0 - strength) * call
    }
}

impl Default for Mathematical {
    fn default() -> Self {
        Self::new(DEFAULT_ROLLOUTS)
    }
}

impl AIOpponent for Mathematical {
    fn decide<R: Rng + ?Sized>(&self, ctx: &DecisionContext, rng: &mut R) -> AIDecision {
        let strength = estimate_strength(&ctx.hole, &ctx.board, self.rollouts, rng);
        let ev = Self::expected_value(strength, ctx.pot, ctx.call_amount());

        let action = if ev <= 0.0 {
            fold_or_check(&ctx.legal)
        } else if strength >= RAISE_STRENGTH {
            clamp_raise(&ctx.legal, ctx.pot_raise(0.75))
        } else {
            passive(&ctx.legal)
        };
        AIDecision::new(ctx, strength, action, format!("EV {ev:+.1}"))
    }

    fn name(&self) -> &str {
        "Mathematical"
    }
}
