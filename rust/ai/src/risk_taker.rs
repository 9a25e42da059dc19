//! Aggressive opponent. Deep stacks make it looser, not tighter, and with a
//! high stack-to-pot ratio it raises weak hands as a pressure play. That
//! bluff is a separate branch from its value raises.

use felt_engine::equity::{estimate_strength, DEFAULT_ROLLOUTS};
use rand::Rng;

use crate::{clamp_raise, fold_or_check, passive, AIDecision, AIOpponent, DecisionContext};

const BASE_THRESHOLD: f64 = 0.5;
const SPR_STEP: f64 = 0.03;
const MIN_THRESHOLD: f64 = 0.25;
const VALUE_MARGIN: f64 = 0.2;
/// Stack-to-pot ratio from which weak hands are raised as bluffs
pub const PRESSURE_SPR: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RiskTaker {
    pub rollouts: usize,
}

impl RiskTaker {
    pub fn new(rollouts: usize) -> Self {
        Self { rollouts }
    }

    pub fn threshold(spr: f64) -> f64 {
        (BASE_THRESHOLD - SPR_STEP * spr.min(10.0)).max(MIN_THRESHOLD)
    }
}

impl Default for RiskTaker {
    fn default() -> Self {
        Self::new(DEFAULT_ROLLOUTS)
    }
}

impl AIOpponent for RiskTaker {
    fn decide<R: Rng + ?Sized>(&self, ctx: &DecisionContext, rng: &mut R) -> AIDecision {
        let strength = estimate_strength(&ctx.hole, &ctx.board, self.rollouts, rng);
        let spr = ctx.spr();
        let threshold = Self::threshold(spr);

        let (action, rationale) = if strength >= threshold + VALUE_MARGIN {
            (
                clamp_raise(&ctx.legal, ctx.pot_raise(1.0)),
                format!("pot-sized value raise with strength {strength:.2}"),
            )
        } else if strength >= threshold {
            if ctx.call_amount() == 0 {
                (
                    clamp_raise(&ctx.legal, ctx.pot_raise(0.5)),
                    format!("betting into a checked pot with strength {strength:.2}"),
                )
            } else {
                (
                    passive(&ctx.legal),
                    format!("strength {strength:.2} good enough to continue"),
                )
            }
        } else if spr >= PRESSURE_SPR {
            (
                clamp_raise(&ctx.legal, ctx.pot_raise(0.75)),
                format!("pressure raise: SPR {spr:.1} leaves room to bluff"),
            )
        } else {
            (
                fold_or_check(&ctx.legal),
                format!("strength {strength:.2} below {threshold:.2} with SPR {spr:.1}"),
            )
        };
        AIDecision::new(ctx, strength, action, rationale)
    }

    fn name(&self) -> &str {
        "RiskTaker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;
    use felt_engine::player::PlayerAction;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn threshold_falls_with_spr() {
        assert!(RiskTaker::threshold(0.5) > RiskTaker::threshold(4.0));
        assert_eq!(RiskTaker::threshold(100.0), MIN_THRESHOLD);
    }

    #[test]
    fn deep_stack_pressures_with_a_weak_hand() {
        let ctx = context("7c 2d", "As Ks Qh Jh 9c", 100, 50, 900);
        let d = RiskTaker::new(200).decide(&ctx, &mut ChaCha20Rng::seed_from_u64(3));
        assert!(d.hand_strength < MIN_THRESHOLD);
        // 50 to call plus three quarters of the pot
        assert_eq!(d.action, PlayerAction::RaiseTo(125));
        assert!(d.rationale.starts_with("pressure raise"));
    }

    #[test]
    fn shallow_stack_gives_up_a_weak_hand() {
        let ctx = context("7c 2d", "As Ks Qh Jh 9c", 400, 50, 200);
        let d = RiskTaker::new(200).decide(&ctx, &mut ChaCha20Rng::seed_from_u64(3));
        assert_eq!(d.action, PlayerAction::Fold);
    }

    #[test]
    fn strong_hand_moves_in_when_raise_exceeds_stack() {
        let ctx = context("As Ks", "Qs Js Ts 2c 3d", 300, 100, 250);
        let d = RiskTaker::default().decide(&ctx, &mut ChaCha20Rng::seed_from_u64(3));
        assert_eq!(d.action, PlayerAction::AllIn);
    }
}
