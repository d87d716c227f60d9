use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Move, Side};
use crate::config::MctsConfig;
use crate::encoder::{apply_move, Position};
use crate::error::{EngineError, Result};
use crate::evaluator::Evaluator;
use crate::mcts::Searcher;
use crate::rules::winner;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayParams {
    pub max_plies: usize,
    /// Sampling temperature for the opening plies; 0 => greedy throughout.
    pub temperature: f32,
    /// Number of plies played at `temperature` before switching to greedy.
    pub temperature_plies: usize,
}

impl Default for PlayParams {
    fn default() -> Self {
        Self { max_plies: 200, temperature: 0.0, temperature_plies: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    KingCaptured { winner: Side },
    NoLegalMoves { side: Side },
    MoveLimit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub moves: Vec<String>,
    pub outcome: Outcome,
    pub plies: usize,
}

/// Play the engine against itself from the standard opening.
pub fn play_game<E: Evaluator, R: Rng + ?Sized>(
    evaluator: E,
    config: MctsConfig,
    params: &PlayParams,
    rng: &mut R,
) -> Result<GameRecord> {
    let searcher = Searcher::new(evaluator, config)?;
    play_game_from(&searcher, &Position::startpos(), params, rng, |_, _| {})
}

/// Self-play from `start`; `on_move` sees each ply number and the move played.
pub fn play_game_from<E, R, F>(
    searcher: &Searcher<E>,
    start: &Position,
    params: &PlayParams,
    rng: &mut R,
    mut on_move: F,
) -> Result<GameRecord>
where
    E: Evaluator,
    R: Rng + ?Sized,
    F: FnMut(usize, Move),
{
    let mut position = start.clone();
    let mut moves = Vec::new();
    let outcome = loop {
        if let Some(side) = winner(&position.board()) {
            break Outcome::KingCaptured { winner: side };
        }
        if moves.len() >= params.max_plies {
            break Outcome::MoveLimit;
        }
        let temperature = if moves.len() < params.temperature_plies { params.temperature } else { 0.0 };
        let mv = match searcher.select_move(&position, temperature, rng) {
            Ok(mv) => mv,
            Err(EngineError::NoLegalMoves) => break Outcome::NoLegalMoves { side: position.side_to_move() },
            Err(e) => return Err(e),
        };
        debug!("ply {}: {} plays {}", moves.len() + 1, position.side_to_move(), mv);
        on_move(moves.len(), mv);
        moves.push(mv.to_string());
        position = apply_move(&position, mv);
    };

    info!("game over after {} plies: {:?}", moves.len(), outcome);
    let plies = moves.len();
    Ok(GameRecord { moves, outcome, plies })
}
