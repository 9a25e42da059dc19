//! A single game with its algorithmic seats attached.
//!
//! [`Table`] owns the engine [`Game`], one optional [`Strategy`] per seat and
//! the seeded RNG the strategies draw from. Bot seats are played in-line: after
//! every human action (and at the start of each hand) the table keeps asking
//! strategies for decisions until a human seat must act or the hand is over.

use felt_ai::{AIDecision, AIOpponent, DecisionContext, Strategy, StrategyKind};
use felt_engine::errors::GameError;
use felt_engine::game::{Game, GameSnapshot, TableConfig};
use felt_engine::logger::HandRecord;
use felt_engine::player::{PlayerAction, SeatKind};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::settings::TableSettings;

/// Mixed into the game seed so strategy sampling does not replay the shuffle.
const STRATEGY_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Who sits in each seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "policy", rename_all = "snake_case")]
pub enum SeatPolicy {
    Human,
    Bot(StrategyKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    pub seats: Vec<SeatPolicy>,
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub rollouts: usize,
    pub seed: Option<u64>,
}

impl GameOptions {
    /// Human in seat 0, one bot per entry of `policies` after it.
    pub fn human_vs(policies: &[StrategyKind], settings: &TableSettings) -> Self {
        let mut seats = vec![SeatPolicy::Human];
        seats.extend(policies.iter().map(|&p| SeatPolicy::Bot(p)));
        Self::with_seats(seats, settings)
    }

    pub fn all_bots(policies: &[StrategyKind], settings: &TableSettings) -> Self {
        let seats = policies.iter().map(|&p| SeatPolicy::Bot(p)).collect();
        Self::with_seats(seats, settings)
    }

    fn with_seats(seats: Vec<SeatPolicy>, settings: &TableSettings) -> Self {
        Self {
            seats,
            starting_stack: settings.starting_stack,
            small_blind: settings.small_blind,
            big_blind: settings.big_blind,
            rollouts: settings.rollouts,
            seed: settings.seed,
        }
    }
}

/// A strategy decision as it was taken at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotDecision {
    pub hand_number: u64,
    pub seat: usize,
    pub strategy: StrategyKind,
    pub decision: AIDecision,
}

#[derive(Debug)]
pub struct Table {
    game: Game,
    opponents: Vec<Option<Strategy>>,
    rng: ChaCha20Rng,
    history: Vec<HandRecord>,
    decisions: Vec<BotDecision>,
}

impl Table {
    /// Seat the table and deal the first hand.
    pub fn new(options: &GameOptions) -> Result<Self, StoreError> {
        if options.rollouts == 0 {
            return Err(StoreError::InvalidRequest(
                "rollouts must be at least 1".into(),
            ));
        }
        let seats = options
            .seats
            .iter()
            .map(|seat| match seat {
                SeatPolicy::Human => SeatKind::Human,
                SeatPolicy::Bot(_) => SeatKind::Bot,
            })
            .collect();
        let opponents = options
            .seats
            .iter()
            .map(|seat| match seat {
                SeatPolicy::Human => None,
                SeatPolicy::Bot(kind) => Some(Strategy::new(*kind, options.rollouts)),
            })
            .collect();
        let game = Game::new(TableConfig {
            seats,
            starting_stack: options.starting_stack,
            small_blind: options.small_blind,
            big_blind: options.big_blind,
            seed: options.seed,
        })?;
        let rng = ChaCha20Rng::seed_from_u64(game.seed() ^ STRATEGY_SEED_SALT);

        let mut table = Self {
            game,
            opponents,
            rng,
            history: Vec::new(),
            decisions: Vec::new(),
        };
        table.next_hand()?;
        Ok(table)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn is_bot(&self, seat: usize) -> bool {
        self.opponents.get(seat).is_some_and(Option::is_some)
    }

    pub fn snapshot(&self, viewer: Option<usize>) -> GameSnapshot {
        self.game.snapshot(viewer)
    }

    /// Completed hands, oldest first.
    pub fn history(&self) -> &[HandRecord] {
        &self.history
    }

    /// Bot decisions taken during the current (or just finished) hand.
    pub fn decisions(&self) -> &[BotDecision] {
        &self.decisions
    }

    /// Apply a human seat's action, then let the bots respond.
    pub fn act(&mut self, seat: usize, action: PlayerAction) -> Result<(), GameError> {
        if self.is_bot(seat) {
            // bots are never driven from outside
            return Err(felt_engine::errors::IllegalAction::SeatNotActive { seat }.into());
        }
        self.game.apply_action(seat, action)?;
        self.run_bots()
    }

    /// Start the next hand and play bot seats up to the first human decision.
    pub fn next_hand(&mut self) -> Result<(), GameError> {
        self.game.start_hand()?;
        self.decisions.clear();
        self.run_bots()
    }

    /// Play bot seats until a human must act or the hand completes.
    pub fn run_bots(&mut self) -> Result<(), GameError> {
        while let Some(seat) = self.game.to_act() {
            let Some(strategy) = self.opponents.get(seat).and_then(Option::as_ref) else {
                break;
            };
            let ctx = DecisionContext::for_seat(&self.game, seat)?;
            let decision = strategy.decide(&ctx, &mut self.rng);
            let kind = strategy.kind();

            let outcome = self.game.apply_action(seat, decision.action);
            debug_assert!(
                outcome.is_ok(),
                "{kind} proposed {:?} for seat {seat}: {outcome:?}",
                decision.action
            );
            if let Err(e) = outcome {
                if !e.is_recoverable() {
                    return Err(e);
                }
                // release builds keep the hand moving with the cheapest legal action
                tracing::error!(
                    hand_number = self.game.hand_number(),
                    seat,
                    strategy = %kind,
                    action = ?decision.action,
                    error = %e,
                    "strategy proposed an illegal action"
                );
                self.game
                    .apply_action(seat, felt_ai::fold_or_check(&ctx.legal))?;
            }
            self.decisions.push(BotDecision {
                hand_number: self.game.hand_number(),
                seat,
                strategy: kind,
                decision,
            });
        }
        self.history.extend(self.game.take_completed_hands());
        Ok(())
    }
}
