//! # felt-engine: Texas Hold'em simulation core
//!
//! Plays complete no-limit hands for one human seat and several algorithmic
//! seats: dealing, betting-round enforcement, side-pot resolution and button
//! rotation, with chip conservation checked after every action.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation and two-character notation
//! - [`deck`] - Seeded 52-card deck that shrinks as it deals
//! - [`hand`] - 5 to 7 card hand ranking
//! - [`equity`] - Showdown scoring and Monte Carlo strength estimates
//! - [`rules`] - Action validation and legal-action queries
//! - [`betting`] - Per-street betting round state machine
//! - [`pot`] - Side-pot layering and distribution
//! - [`game`] - Hand orchestration, snapshots and hand records
//! - [`logger`] - Streets, action log and JSONL hand records
//! - [`errors`] - Rejections and invariant violations
//!
//! ## Quick Start
//!
//! ```rust
//! use felt_engine::game::{Game, TableConfig};
//! use felt_engine::player::PlayerAction;
//!
//! let mut config = TableConfig::human_vs_bots(2);
//! config.seed = Some(42);
//! let mut game = Game::new(config).unwrap();
//! game.start_hand().unwrap();
//!
//! // everyone folds to the big blind
//! while let Some(seat) = game.to_act() {
//!     game.apply_action(seat, PlayerAction::Fold).unwrap();
//! }
//! assert!(game.is_hand_complete());
//! assert_eq!(game.pot(), 0);
//! ```

pub mod betting;
pub mod cards;
pub mod deck;
pub mod equity;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod pot;
pub mod rules;
