//! # felt-table: running games for callers
//!
//! Hosts any number of independent Hold'em games keyed by id. A human caller
//! sits in one seat and submits actions; every other seat is played in-line by
//! a `felt-ai` strategy, so each call returns only once a human decision is
//! needed again or the hand is over.
//!
//! ```rust
//! use felt_ai::StrategyKind;
//! use felt_engine::player::PlayerAction;
//! use felt_table::{GameStore, HUMAN_SEAT, TableSettings};
//!
//! let store = GameStore::new(TableSettings { seed: Some(5), ..TableSettings::default() });
//! let (id, snapshot) = store
//!     .create_game(3, &[StrategyKind::Conservative, StrategyKind::Bluffer])
//!     .unwrap();
//! assert_eq!(snapshot.to_act, Some(HUMAN_SEAT));
//!
//! store.submit_action(&id, HUMAN_SEAT, PlayerAction::Fold).unwrap();
//! assert_eq!(store.hand_history(&id).unwrap().len(), 1);
//! store.advance_to_next_hand(&id).unwrap();
//! ```

pub mod errors;
pub mod logging;
pub mod settings;
pub mod sim;
pub mod store;
pub mod table;

pub use errors::StoreError;
pub use logging::{LogEntry, TestLogSubscriber, init_logging, init_test_logging};
pub use settings::{ResolvedSettings, SettingsError, TableSettings, ValueSource};
pub use store::{GameId, GameStore, HUMAN_SEAT, parse_policies};
pub use table::{BotDecision, GameOptions, SeatPolicy, Table};
