//! Tight opponent: continues only with hands well above average and never
//! bluffs. Deeper stacks demand stronger hands.

use felt_engine::equity::{estimate_strength, DEFAULT_ROLLOUTS};
use rand::Rng;

use crate::{clamp_raise, fold_or_check, passive, AIDecision, AIOpponent, DecisionContext};

const BASE_THRESHOLD: f64 = 0.55;
const SPR_STEP: f64 = 0.02;
const MAX_THRESHOLD: f64 = 0.8;
/// How far above the threshold a hand must be to raise for value
const VALUE_MARGIN: f64 = 0.15;

#[derive(Debug, Clone, PartialEq)]
pub struct Conservative {
    pub rollouts: usize,
}

impl Conservative {
    pub fn new(rollouts: usize) -> Self {
        Self { rollouts }
    }

    /// Minimum strength needed to continue at the given stack-to-pot ratio.
    pub fn threshold(spr: f64) -> f64 {
        (BASE_THRESHOLD + SPR_STEP * spr.min(10.0)).min(MAX_THRESHOLD)
    }
}

impl Default for Conservative {
    fn default() -> Self {
        Self::new(DEFAULT_ROLLOUTS)
    }
}

impl AIOpponent for Conservative {
    fn decide<R: Rng + ?Sized>(&self, ctx: &DecisionContext, rng: &mut R) -> AIDecision {
        let strength = estimate_strength(&ctx.hole, &ctx.board, self.rollouts, rng);
        let threshold = Self::threshold(ctx.spr());

        let (action, rationale) = if strength >= threshold + VALUE_MARGIN {
            (
                clamp_raise(&ctx.legal, ctx.pot_raise(0.5)),
                format!("value raise: strength {strength:.2} clears {threshold:.2} comfortably"),
            )
        } else if strength >= threshold {
            (
                passive(&ctx.legal),
                format!("strength {strength:.2} meets threshold {threshold:.2}"),
            )
        } else {
            (
                fold_or_check(&ctx.legal),
                format!("strength {strength:.2} below threshold {threshold:.2}"),
            )
        };
        AIDecision::new(ctx, strength, action, rationale)
    }

    fn name(&self) -> &str {
        "Conservative"
    }
}
