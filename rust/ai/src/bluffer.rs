//! Erratic opponent. Plays by strength most of the time, but on a seeded
//! coin flip acts against its own read: raising weak hands and slow-playing
//! strong ones.

use felt_engine::equity::{estimate_strength, DEFAULT_ROLLOUTS};
use rand::Rng;

use crate::{clamp_raise, fold_or_check, passive, AIDecision, AIOpponent, DecisionContext};

pub const DEFAULT_BLUFF_FREQUENCY: f64 = 0.3;
const STRONG: f64 = 0.6;
const MEDIUM: f64 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub struct Bluffer {
    pub rollouts: usize,
    /// Probability of acting against the strength signal, kept within [0, 1]
    bluff_frequency: f64,
}

impl Bluffer {
    pub fn new(rollouts: usize) -> Self {
        Self {
            rollouts,
            bluff_frequency: DEFAULT_BLUFF_FREQUENCY,
        }
    }

    /// Set the bluff probability. Values outside [0, 1] are clamped and NaN
    /// disables bluffing.
    pub fn with_frequency(mut self, bluff_frequency: f64) -> Self {
        self.bluff_frequency = if bluff_frequency.is_nan() {
            0.0
        } else {
            bluff_frequency.clamp(0.0, 1.0)
        };
        self
    }

    pub fn bluff_frequency(&self) -> f64 {
        self.bluff_frequency
    }
}

impl Default for Bluffer {
    fn default() -> Self {
        Self::new(DEFAULT_ROLLOUTS)
    }
}

impl AIOpponent for Bluffer {
    fn decide<R: Rng + ?Sized>(&self, ctx: &DecisionContext, rng: &mut R) -> AIDecision {
        let strength = estimate_strength(&ctx.hole, &ctx.board, self.rollouts, rng);
        let contrary = rng.random_bool(self.bluff_frequency);

        let (action, rationale) = match (contrary, strength >= STRONG, strength >= MEDIUM) {
            (true, true, _) => (
                passive(&ctx.legal),
                format!("slow-playing strength {strength:.2}"),
            ),
            (true, false, _) => (
                clamp_raise(&ctx.legal, ctx.pot_raise(1.0)),
                format!("bluff raise with strength {strength:.2}"),
            ),
            (false, true, _) => (
                clamp_raise(&ctx.legal, ctx.pot_raise(0.66)),
                format!("raising strength {strength:.2}"),
            ),
            (false, false, true) => (
                passive(&ctx.legal),
                format!("continuing with strength {strength:.2}"),
            ),
            (false, false, false) => (
                fold_or_check(&ctx.legal),
                format!("giving up strength {strength:.2}"),
            ),
        };
        AIDecision::new(ctx, strength, action, rationale)
    }

    fn name(&self) -> &str {
        "Bluffer"
    }
}
