use thiserror::Error;

use crate::evaluator::EvaluatorError;

/// Errors surfaced by the rules, codec and search layers.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The side to move has no pseudo-legal move; the game is over.
    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("invalid move notation: {0}")]
    InvalidMoveNotation(String),

    #[error("move {0} is not legal in this position")]
    MoveNotLegalHere(String),

    #[error("invalid board layout: {0}")]
    InvalidLayout(String),

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    /// Evaluator put zero (or non-finite) mass on every legal move.
    #[error("evaluator priors over legal moves sum to zero")]
    DegeneratePriors,

    #[error("evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
