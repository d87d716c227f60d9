//! Policy/value oracle consumed by the search.
//!
//! The search treats the evaluator as opaque: given a [`Position`] it must
//! return a distribution over the full [`ACTION_SPACE`] and a scalar value in
//! `[-1, 1]` from the perspective of the side to move. A trained network
//! lives behind this trait; the implementations here are stand-ins for tests
//! and for playing without a model.

use thiserror::Error;

use crate::board::{Board, PieceKind, Side};
use crate::encoder::{Position, ACTION_SPACE};

#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("policy has {actual} entries, expected {expected}")]
    PolicyShape { expected: usize, actual: usize },

    #[error("value {0} is not finite")]
    NonFiniteValue(f32),

    #[error("evaluation backend failed: {0}")]
    Backend(String),
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    /// One probability per action index.
    pub policy: Vec<f32>,
    /// Expected outcome for the side to move, in `[-1, 1]`.
    pub value: f32,
}

impl Evaluation {
    /// Check the shape and value contract the search relies on.
    pub fn check(&self) -> Result<(), EvaluatorError> {
        if self.policy.len() != ACTION_SPACE {
            return Err(EvaluatorError::PolicyShape { expected: ACTION_SPACE, actual: self.policy.len() });
        }
        if !self.value.is_finite() {
            return Err(EvaluatorError::NonFiniteValue(self.value));
        }
        Ok(())
    }
}

pub trait Evaluator {
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError> {
        (**self).evaluate(position)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError> {
        (**self).evaluate(position)
    }
}

fn uniform_policy() -> Vec<f32> {
    vec![1.0 / ACTION_SPACE as f32; ACTION_SPACE]
}

/// Uniform policy over the whole action space and a constant value.
#[derive(Debug, Clone, Default)]
pub struct UniformEvaluator {
    value: f32,
}

impl UniformEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: f32) -> Self {
        Self { value }
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, _position: &Position) -> Result<Evaluation, EvaluatorError> {
        Ok(Evaluation { policy: uniform_policy(), value: self.value })
    }
}

fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => 0,
        PieceKind::Advisor => 200,
        PieceKind::Elephant => 200,
        PieceKind::Horse => 400,
        PieceKind::Chariot => 900,
        PieceKind::Cannon => 450,
        PieceKind::Pawn => 100,
    }
}

/// Material difference in centipawn-like units, positive when `side` is ahead.
pub fn material_balance(board: &Board, side: Side) -> i32 {
    board
        .pieces()
        .map(|(_, p)| if p.side == side { piece_value(p.kind) } else { -piece_value(p.kind) })
        .sum()
}

/// Uniform policy, value squashed from the material balance.
#[derive(Debug, Clone)]
pub struct MaterialEvaluator {
    scale: f32,
}

impl Default for MaterialEvaluator {
    fn default() -> Self {
        Self { scale: 1000.0 }
    }
}

impl MaterialEvaluator {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError> {
        let board = position.board();
        let cp = material_balance(&board, position.side_to_move());
        Ok(Evaluation { policy: uniform_policy(), value: (cp as f32 / self.scale).tanh() })
    }
}
