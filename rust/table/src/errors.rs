use felt_ai::UnknownStrategy;
use felt_engine::errors::GameError;
use thiserror::Error;

use crate::store::GameId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Game not found: {0}")]
    NotFound(GameId),
    #[error("Game expired: {0}")]
    Expired(GameId),
    #[error(transparent)]
    UnknownPolicy(#[from] UnknownStrategy),
    #[error("Invalid game request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Game storage poisoned")]
    StoragePoisoned,
}

impl StoreError {
    /// True when the request was rejected but the game is intact.
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Game(e) => e.is_recoverable(),
            StoreError::StoragePoisoned => false,
            _ => true,
        }
    }
}
