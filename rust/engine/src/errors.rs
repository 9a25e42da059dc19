use thiserror::Error;

/// A submitted action that breaks a betting rule. The game state is left
/// untouched and the caller is expected to re-prompt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("It's not seat {actual}'s turn (expected seat {expected})")]
    OutOfTurn { expected: usize, actual: usize },
    #[error("Unknown seat {seat}")]
    UnknownSeat { seat: usize },
    #[error("Seat {seat} cannot act in this hand")]
    SeatNotActive { seat: usize },
    #[error("Cannot check facing a bet of {to_call}")]
    CheckFacingBet { to_call: u32 },
    #[error("Nothing to call")]
    NothingToCall,
    #[error("Raise to {amount} is below the minimum of {minimum}")]
    RaiseBelowMinimum { amount: u32, minimum: u32 },
    #[error("Raise to {amount} exceeds the maximum of {maximum}")]
    RaiseExceedsStack { amount: u32, maximum: u32 },
    #[error("Betting was not reopened for seat {seat}; only call or fold")]
    RaiseNotReopened { seat: usize },
}

/// An internal consistency failure. These indicate an engine bug and abort
/// the game rather than being repaired.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Deck exhausted: requested {requested}, remaining {remaining}")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Chip conservation broken: expected {expected}, found {actual}")]
    ChipConservation { expected: u64, actual: u64 },
    #[error("Pot of {amount} has no eligible winner")]
    UnassignedPot { amount: u32 },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Illegal action: {0}")]
    IllegalAction(#[from] IllegalAction),
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Hand already complete")]
    HandAlreadyComplete,
    #[error("Hand still in progress")]
    HandInProgress,
    #[error("Not enough players with chips: {funded}")]
    NotEnoughPlayers { funded: usize },
    #[error("Invalid table setup: {0}")]
    InvalidSetup(String),
    #[error("Internal invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
    #[error("Game aborted after invariant violation: {0}")]
    Aborted(InvariantViolation),
}

impl GameError {
    /// True for rejections the caller can recover from by re-prompting.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GameError::Invariant(_) | GameError::Aborted(_))
    }
}
