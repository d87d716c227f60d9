// Xiangqi rules engine with evaluator-guided MCTS
pub mod board;
pub mod config;
pub mod encoder;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod mcts;
pub mod movegen;
pub mod perft;
pub mod rules;

pub use board::{Board, Move, Piece, PieceKind, Side, Square};
pub use config::MctsConfig;
pub use encoder::{Position, ACTION_SPACE};
pub use error::{EngineError, Result};
pub use evaluator::{Evaluation, Evaluator, EvaluatorError, MaterialEvaluator, UniformEvaluator};
pub use mcts::{SearchResult, Searcher};
