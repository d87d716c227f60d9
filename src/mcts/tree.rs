//! Arena-backed search tree.
//!
//! The tree owns every node; parent links and child edges are `NodeId`
//! indices into the arena. Children are kept in insertion order so that
//! selection ties resolve to the first expanded move.

use crate::board::Move;
use crate::encoder::{apply_move, move_to_notation, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One reachable position plus its search statistics.
///
/// `value_sum` is accumulated from the perspective of the player who made
/// the move into this node, so a parent maximizes its children's mean value
/// directly.
#[derive(Debug, Clone)]
pub struct Node {
    position: Position,
    parent: Option<NodeId>,
    mv: Option<Move>,
    children: Vec<(Move, NodeId)>,
    visits: u32,
    value_sum: f32,
    prior: f32,
}

impl Node {
    fn new(position: Position, parent: Option<NodeId>, mv: Option<Move>, prior: f32) -> Self {
        Self { position, parent, mv, children: Vec::new(), visits: 0, value_sum: 0.0, prior }
    }

    pub fn position(&self) -> &Position { &self.position }

    pub fn parent(&self) -> Option<NodeId> { self.parent }

    /// Move that produced this node; `None` for the root.
    pub fn mv(&self) -> Option<Move> { self.mv }

    pub fn children(&self) -> &[(Move, NodeId)] { &self.children }

    pub fn visits(&self) -> u32 { self.visits }

    pub fn value_sum(&self) -> f32 { self.value_sum }

    pub fn prior(&self) -> f32 { self.prior }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// `W / N`, or exactly 0 for a node never visited.
    pub fn mean_value(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / self.visits as f32
        }
    }

    pub fn update(&mut self, value: f32) {
        self.visits += 1;
        self.value_sum += value;
    }
}

/// Selection score: `Q(child) + c * P(child) * sqrt(N(parent)) / (1 + N(child))`.
#[inline]
pub fn calc_uct(child: &Node, parent_visits_sqrt: f32, c_puct: f32) -> f32 {
    let u = c_puct * child.prior * parent_visits_sqrt / (1.0 + child.visits as f32);
    child.mean_value() + u
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root: Position) -> Self {
        Self { nodes: vec![Node::new(root, None, None, 0.0)] }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child reached from `id` by `mv`, if already expanded.
    pub fn child(&self, id: NodeId, mv: Move) -> Option<NodeId> {
        self.get(id).children.iter().find(|(m, _)| *m == mv).map(|&(_, c)| c)
    }

    /// Highest-scoring child, first one winning ties. `None` on a leaf.
    pub fn select_child(&self, id: NodeId, c_puct: f32) -> Option<NodeId> {
        let node = self.get(id);
        let sqrt_n = (node.visits as f32).sqrt();
        let mut best: Option<(NodeId, f32)> = None;
        for &(_, child_id) in &node.children {
            let score = calc_uct(self.get(child_id), sqrt_n, c_puct);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((child_id, score));
            }
        }
        best.map(|(child_id, _)| child_id)
    }

    /// Add one child per `(prior, move)` pair not already present. Moves
    /// that already have a child are skipped, so repeated calls are no-ops.
    pub fn expand(&mut self, id: NodeId, priors: &[f32], moves: &[Move]) {
        debug_assert_eq!(priors.len(), moves.len());
        for (&prior, &mv) in priors.iter().zip(moves) {
            if self.child(id, mv).is_some() { continue; }
            let position = apply_move(&self.get(id).position, mv);
            let child_id = NodeId(self.nodes.len() as u32);
            self.nodes.push(Node::new(position, Some(id), Some(mv), prior));
            self.get_mut(id).children.push((mv, child_id));
        }
    }

    pub fn update(&mut self, id: NodeId, value: f32) {
        self.get_mut(id).update(value);
    }

    pub(crate) fn set_prior(&mut self, id: NodeId, prior: f32) {
        self.get_mut(id).prior = prior;
    }

    /// Root path from `id`, root first.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut cur = id;
        while let Some(p) = self.get(cur).parent {
            path.push(p);
            cur = p;
        }
        path.reverse();
        path
    }

    /// Table of the most visited children of `id`.
    pub fn statistics_string(&self, id: NodeId, c_puct: f32, top: usize) -> String {
        let mut s = String::from("|   move   |     P     |     N     |     Q     |    UCT    |\n");
        let node = self.get(id);
        let sqrt_n = (node.visits as f32).sqrt();
        let mut children: Vec<_> = node.children.iter().map(|&(mv, c)| (mv, self.get(c))).collect();
        children.sort_by(|a, b| b.1.visits.cmp(&a.1.visits));

        for (mv, child) in children.into_iter().take(top) {
            s.push_str(&format!(
                "|{:^10}|{:^11.4}|{:^11}|{:^11.4}|{:^11.4}|\n",
                move_to_notation(mv),
                child.prior,
                child.visits,
                child.mean_value(),
                calc_uct(child, sqrt_n, c_puct)
            ));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Side;
    use crate::encoder::notation_to_move;
    use crate::movegen::all_moves;

    fn opening_tree() -> (Tree, Vec<Move>) {
        let pos = Position::startpos();
        let moves = all_moves(&pos.board(), Side::Red);
        (Tree::new(pos), moves)
    }

    #[test]
    fn test_mean_value() {
        let (mut tree, _) = opening_tree();
        let root = tree.root();
        assert_eq!(tree.get(root).mean_value(), 0.0);
        tree.update(root, 1.0);
        tree.update(root, 0.0);
        tree.update(root, -0.5);
        assert_eq!(tree.get(root).visits(), 3);
        assert!((tree.get(root).mean_value() - 0.5 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_expand_is_idempotent() {
        let (mut tree, moves) = opening_tree();
        let root = tree.root();
        let priors = vec![1.0 / moves.len() as f32; moves.len()];
        tree.expand(root, &priors[..10], &moves[..10]);
        tree.expand(root, &priors[5..], &moves[5..]);
        assert_eq!(tree.get(root).children().len(), moves.len());
        assert_eq!(tree.len(), moves.len() + 1);
        // first-wins: the earlier prior is kept
        tree.expand(root, &[0.9], &moves[..1]);
        let first = tree.child(root, moves[0]).unwrap();
        assert!((tree.get(first).prior() - priors[0]).abs() < 1e-6);
    }

    #[test]
    fn test_child_positions_and_links() {
        let (mut tree, _) = opening_tree();
        let root = tree.root();
        let mv = notation_to_move("h3-e3").unwrap();
        tree.expand(root, &[1.0], &[mv]);
        let child = tree.child(root, mv).unwrap();
        let node = tree.get(child);
        assert_eq!(node.parent(), Some(root));
        assert_eq!(node.mv(), Some(mv));
        assert_eq!(node.position().side_to_move(), Side::Black);
        assert_eq!(tree.path_to(child), vec![root, child]);
    }

    #[test]
    fn test_select_ties_pick_first() {
        let (mut tree, moves) = opening_tree();
        let root = tree.root();
        tree.expand(root, &[0.1; 3], &moves[..3]);
        // N(root) = 0: every score is 0
        assert_eq!(tree.select_child(root, 1.0), tree.child(root, moves[0]));
    }

    #[test]
    fn test_select_prefers_unvisited_as_parent_grows() {
        let (mut tree, moves) = opening_tree();
        let root = tree.root();
        tree.expand(root, &[0.5, 0.5], &moves[..2]);
        let a = tree.child(root, moves[0]).unwrap();
        let b = tree.child(root, moves[1]).unwrap();
        tree.update(a, 0.0);
        tree.update(root, 0.0);
        assert_eq!(tree.select_child(root, 1.0), Some(b));

        let mut last = f32::MIN;
        for n in 1..50u32 {
            let score = calc_uct(tree.get(b), (n as f32).sqrt(), 1.0);
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn test_select_on_leaf_is_none() {
        let (tree, _) = opening_tree();
        assert_eq!(tree.select_child(tree.root(), 1.0), None);
    }
}
