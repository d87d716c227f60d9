//! AlphaZero-style Monte Carlo Tree Search driven by an [`Evaluator`].
//!
//! One search builds a fresh [`Tree`] for the given position, runs a fixed
//! number of sequential simulations (select, evaluate/expand, backpropagate)
//! and turns the root's child visit counts into a distribution over the
//! full action space. The tree is dropped once the search returns.

pub mod tree;

pub use tree::{calc_uct, Node, NodeId, Tree};

use log::{debug, trace, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_distr::Gamma;

use crate::board::Move;
use crate::config::MctsConfig;
use crate::encoder::{index_to_move, move_to_index, Position, ACTION_SPACE};
use crate::error::{EngineError, Result};
use crate::evaluator::Evaluator;
use crate::movegen::all_moves;
use crate::rules::is_terminal;

/// Value of a position whose king has been captured, for the side to move.
const LOSS_VALUE: f32 = -1.0;
/// Value of a live position with no moves.
const DRAW_VALUE: f32 = 0.0;

#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Root visit share per action index; sums to 1.
    pub policy: Vec<f32>,
    /// Search estimate for the side to move at the root.
    pub root_value: f32,
    pub simulations: u32,
    pub tree_size: usize,
}

impl SearchResult {
    /// Most visited action, lowest index on ties.
    pub fn best_index(&self) -> usize {
        argmax(&self.policy)
    }
}

pub struct Searcher<E> {
    evaluator: E,
    config: MctsConfig,
}

impl<E: Evaluator> Searcher<E> {
    /// Fails with `InvalidConfig` on degenerate settings such as zero simulations.
    pub fn new(evaluator: E, config: MctsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { evaluator, config })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Evaluate `position` and renormalize the policy over `moves`.
    /// Returns the priors (aligned with `moves`) and the evaluator's value.
    fn legal_priors(&self, position: &Position, moves: &[Move]) -> Result<(Vec<f32>, f32)> {
        let eval = self.evaluator.evaluate(position)?;
        eval.check()?;
        let mut priors: Vec<f32> = moves.iter().map(|&mv| eval.policy[move_to_index(mv)]).collect();
        let sum: f32 = priors.iter().sum();
        if !sum.is_finite() || sum <= 0.0 || priors.iter().any(|p| *p < 0.0) {
            return Err(EngineError::DegeneratePriors);
        }
        for p in &mut priors {
            *p /= sum;
        }
        Ok((priors, eval.value))
    }

    /// Mix Dirichlet noise into the root priors.
    fn add_dirichlet_noise<R: Rng + ?Sized>(&self, tree: &mut Tree, rng: &mut R) -> Result<()> {
        let root = tree.root();
        let children: Vec<NodeId> = tree.get(root).children().iter().map(|&(_, c)| c).collect();
        let gamma = Gamma::new(self.config.dirichlet_alpha, 1.0)
            .map_err(|e| EngineError::InvalidConfig(format!("dirichlet_alpha: {e}")))?;
        let mut noise: Vec<f32> = (0..children.len()).map(|_| gamma.sample(rng)).collect();
        let sum: f32 = noise.iter().sum();
        if sum <= 0.0 { return Ok(()); }
        for n in &mut noise { *n /= sum; }

        let eps = self.config.dirichlet_epsilon;
        for (id, n) in children.into_iter().zip(noise) {
            let p = tree.get(id).prior();
            tree.set_prior(id, (1.0 - eps) * p + eps * n);
        }
        Ok(())
    }

    /// One simulation: descend to a leaf, value it, expand it if live, and
    /// push the value back up the path with alternating sign.
    fn rollout(&self, tree: &mut Tree) -> Result<()> {
        let mut path = vec![tree.root()];
        let mut leaf = tree.root();
        while let Some(child) = tree.select_child(leaf, self.config.c_puct) {
            path.push(child);
            leaf = child;
        }

        let position = tree.get(leaf).position().clone();
        let board = position.board();
        let value = if is_terminal(&board) {
            LOSS_VALUE
        } else {
            let moves = all_moves(&board, position.side_to_move());
            if moves.is_empty() {
                DRAW_VALUE
            } else {
                let (priors, value) = self.legal_priors(&position, &moves)?;
                tree.expand(leaf, &priors, &moves);
                value
            }
        };

        // The leaf stores the value for the player who moved into it.
        let mut v = value;
        for &id in path.iter().rev() {
            tree.update(id, -v);
            v = -v;
        }

        trace!("rollout depth={} leaf_value={:.3}", path.len() - 1, value);
        Ok(())
    }

    /// Run a full search and keep the tree for inspection.
    pub fn search_with_tree<R: Rng + ?Sized>(&self, position: &Position, rng: &mut R) -> Result<(SearchResult, Tree)> {
        let board = position.board();
        let moves = all_moves(&board, position.side_to_move());
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        let mut tree = Tree::new(position.clone());
        let (priors, _) = self.legal_priors(position, &moves)?;
        let root = tree.root();
        tree.expand(root, &priors, &moves);
        if self.config.noise_enabled() {
            self.add_dirichlet_noise(&mut tree, rng)?;
        }

        for _ in 0..self.config.num_simulations {
            self.rollout(&mut tree)?;
        }

        let root_node = tree.get(root);
        let total: u32 = root_node.children().iter().map(|&(_, c)| tree.get(c).visits()).sum();
        if total == 0 {
            return Err(EngineError::InvalidConfig("search finished without visiting any root move".into()));
        }
        let mut policy = vec![0.0f32; ACTION_SPACE];
        for &(mv, c) in root_node.children() {
            policy[move_to_index(mv)] = tree.get(c).visits() as f32 / total as f32;
        }

        let result = SearchResult {
            policy,
            root_value: -root_node.mean_value(),
            simulations: root_node.visits(),
            tree_size: tree.len(),
        };
        debug!(
            "search done: sims={} nodes={} root_moves={} value={:.3} best={}",
            result.simulations,
            result.tree_size,
            moves.len(),
            result.root_value,
            index_to_move(result.best_index())
        );
        Ok((result, tree))
    }

    /// Table of the `top` most visited root moves of a finished search.
    pub fn statistics_string(&self, tree: &Tree, top: usize) -> String {
        tree.statistics_string(tree.root(), self.config.c_puct, top)
    }

    /// Run a full search from `position` and return the visit distribution.
    pub fn search<R: Rng + ?Sized>(&self, position: &Position, rng: &mut R) -> Result<SearchResult> {
        self.search_with_tree(position, rng).map(|(result, _)| result)
    }

    /// Search, then pick a move: greedy when `temperature == 0`, otherwise
    /// sampled from the visit distribution raised to `1 / temperature`.
    pub fn select_move<R: Rng + ?Sized>(&self, position: &Position, temperature: f32, rng: &mut R) -> Result<Move> {
        check_temperature(temperature)?;
        let result = self.search(position, rng)?;
        Ok(index_to_move(pick_action(&result.policy, temperature, rng)?))
    }
}

/// Index of the largest entry; the first one wins ties.
fn argmax(v: &[f32]) -> usize {
    let mut best = 0;
    for (i, &p) in v.iter().enumerate() {
        if p > v[best] { best = i; }
    }
    best
}

fn check_temperature(temperature: f32) -> Result<()> {
    if !temperature.is_finite() || temperature < 0.0 {
        return Err(EngineError::InvalidConfig(format!("temperature must be finite and >= 0, got {temperature}")));
    }
    Ok(())
}

/// Choose an action index from a probability vector at `temperature`.
/// Fails with `InvalidConfig` unless `temperature` is finite and `>= 0`.
pub fn pick_action<R: Rng + ?Sized>(policy: &[f32], temperature: f32, rng: &mut R) -> Result<usize> {
    check_temperature(temperature)?;
    if temperature == 0.0 {
        return Ok(argmax(policy));
    }
    let inv = 1.0 / temperature as f64;
    let weights: Vec<f64> = policy.iter().map(|&p| (p.max(0.0) as f64).powf(inv)).collect();
    match WeightedIndex::new(&weights) {
        Ok(dist) => Ok(dist.sample(rng)),
        Err(e) => {
            warn!("temperature {temperature} collapsed the distribution ({e}); falling back to argmax");
            Ok(argmax(policy))
        }
    }
}
