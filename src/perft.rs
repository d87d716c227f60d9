// Clone-per-child perft over pseudo-legal moves. A position with a king
// missing is a game end and counts as one leaf.
use rayon::prelude::*;

use crate::board::{Board, Side};
use crate::movegen::all_moves;
use crate::rules::is_terminal;

pub fn perft(board: &Board, side: Side, depth: u32) -> u64 {
    if depth == 0 || is_terminal(board) { return 1; }
    let mut nodes = 0u64;
    for mv in all_moves(board, side) {
        let mut child = board.clone();
        child.apply(mv);
        nodes += perft(&child, side.opponent(), depth - 1);
    }
    nodes
}

/// Root-split perft: each root move's subtree is counted on the rayon pool.
pub fn perft_split(board: &Board, side: Side, depth: u32) -> u64 {
    if depth == 0 || is_terminal(board) { return 1; }
    all_moves(board, side)
        .par_iter()
        .map(|&mv| {
            let mut child = board.clone();
            child.apply(mv);
            perft(&child, side.opponent(), depth - 1)
        })
        .sum()
}

/// Per-root-move node counts, in move generation order.
pub fn divide(board: &Board, side: Side, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 { return Vec::new(); }
    all_moves(board, side)
        .into_iter()
        .map(|mv| {
            let mut child = board.clone();
            child.apply(mv);
            (mv.to_string(), perft(&child, side.opponent(), depth - 1))
        })
        .collect()
}
