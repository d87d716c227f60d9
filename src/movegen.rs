//! Pseudo-legal move generation.
//!
//! Moves that leave the mover's own king attacked are not filtered out, and
//! the face-to-face kings rule is not enforced: the game ends when a king is
//! actually captured.

use crate::board::{Board, Move, PieceKind, Side, Square};
use crate::encoder::{move_to_notation, notation_to_move};
use crate::error::{EngineError, Result};

const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ELEPHANT: [(i32, i32); 4] = [(2, 2), (2, -2), (-2, 2), (-2, -2)];
const HORSE: [(i32, i32); 8] = [
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
];

type Generator = fn(&Board, Square, Side, &mut Vec<Move>);

/// One orthogonal step, confined to the palace.
fn king_moves(board: &Board, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in ORTHOGONAL {
        if let Some(to) = from.offset(dr, dc) {
            if to.in_palace(side) && board.can_land(to, side) {
                out.push(Move::new(from, to));
            }
        }
    }
}

/// One diagonal step, confined to the palace.
fn advisor_moves(board: &Board, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in DIAGONAL {
        if let Some(to) = from.offset(dr, dc) {
            if to.in_palace(side) && board.can_land(to, side) {
                out.push(Move::new(from, to));
            }
        }
    }
}

/// Two diagonal steps with an empty eye, never across the river.
fn elephant_moves(board: &Board, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in ELEPHANT {
        let Some(to) = from.offset(dr, dc) else { continue };
        if !to.on_own_half(side) { continue; }
        let Some(eye) = from.offset(dr / 2, dc / 2) else { continue };
        if board.is_empty_at(eye) && board.can_land(to, side) {
            out.push(Move::new(from, to));
        }
    }
}

/// L-shaped jump, blocked by a piece on the leg adjacent along the long axis.
fn horse_moves(board: &Board, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in HORSE {
        let Some(to) = from.offset(dr, dc) else { continue };
        if !board.can_land(to, side) { continue; }
        let leg = if dr.abs() == 2 { from.offset(dr / 2, 0) } else { from.offset(0, dc / 2) };
        if leg.is_some_and(|l| board.is_empty_at(l)) {
            out.push(Move::new(from, to));
        }
    }
}

fn chariot_moves(board: &Board, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in ORTHOGONAL {
        let mut cur = from;
        while let Some(to) = cur.offset(dr, dc) {
            match board.get(to) {
                None => out.push(Move::new(from, to)),
                Some(p) => {
                    if p.side != side { out.push(Move::new(from, to)); }
                    break;
                }
            }
            cur = to;
        }
    }
}

/// Slides like a chariot over empty cells; captures only by jumping exactly
/// one platform piece onto the first occupied cell beyond it.
fn cannon_moves(board: &Board, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in ORTHOGONAL {
        let mut cur = from;
        let mut platform = None;
        while let Some(to) = cur.offset(dr, dc) {
            cur = to;
            if board.is_empty_at(to) {
                out.push(Move::new(from, to));
            } else {
                platform = Some(to);
                break;
            }
        }
        let Some(mut cur) = platform else { continue };
        while let Some(to) = cur.offset(dr, dc) {
            cur = to;
            if board.is_empty_at(to) { continue; }
            if board.is_enemy(to, side) { out.push(Move::new(from, to)); }
            break;
        }
    }
}

/// Forward one step; sideways one step as well once across the river.
fn pawn_moves(board: &Board, from: Square, side: Side, out: &mut Vec<Move>) {
    if let Some(to) = from.offset(side.forward(), 0) {
        if board.can_land(to, side) {
            out.push(Move::new(from, to));
        }
    }
    if !from.on_own_half(side) {
        for dc in [-1, 1] {
            if let Some(to) = from.offset(0, dc) {
                if board.can_land(to, side) {
                    out.push(Move::new(from, to));
                }
            }
        }
    }
}

fn generate_into(board: &Board, from: Square, out: &mut Vec<Move>) {
    let Some(piece) = board.get(from) else { return };
    let generate: Generator = match piece.kind {
        PieceKind::King => king_moves,
        PieceKind::Advisor => advisor_moves,
        PieceKind::Elephant => elephant_moves,
        PieceKind::Horse => horse_moves,
        PieceKind::Chariot => chariot_moves,
        PieceKind::Cannon => cannon_moves,
        PieceKind::Pawn => pawn_moves,
    };
    generate(board, from, piece.side, out);
}

/// Candidate moves of the piece standing on `from`; empty for an empty cell.
pub fn piece_moves(board: &Board, from: Square) -> Vec<Move> {
    let mut out = Vec::new();
    generate_into(board, from, &mut out);
    out
}

/// Every pseudo-legal move for `side`, scanning cells in row-major order.
pub fn all_moves(board: &Board, side: Side) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    for (sq, piece) in board.pieces() {
        if piece.side == side {
            generate_into(board, sq, &mut out);
        }
    }
    out
}

/// Check an externally supplied move against the generated move list.
pub fn validate_move(board: &Board, side: Side, mv: Move) -> Result<Move> {
    if all_moves(board, side).contains(&mv) {
        Ok(mv)
    } else {
        Err(EngineError::MoveNotLegalHere(move_to_notation(mv)))
    }
}

/// Parse notation such as `"h3-e3"` and check it is legal for `side`.
pub fn parse_legal_move(board: &Board, side: Side, text: &str) -> Result<Move> {
    let mv = notation_to_move(text)?;
    validate_move(board, side, mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn lone(kind: PieceKind, side: Side, row: usize, col: usize) -> (Board, Square) {
        let mut b = Board::empty();
        let sq = Square::new(row, col);
        b.put(sq, Piece::new(kind, side));
        (b, sq)
    }

    fn targets(moves: &[Move]) -> Vec<(usize, usize)> {
        let mut t: Vec<_> = moves.iter().map(|m| (m.to.row(), m.to.col())).collect();
        t.sort();
        t
    }

    #[test]
    fn king_stays_in_palace() {
        let (b, sq) = lone(PieceKind::King, Side::Red, 7, 3);
        assert_eq!(targets(&piece_moves(&b, sq)), vec![(7, 4), (8, 3)]);
    }

    #[test]
    fn advisor_center_has_four() {
        let (b, sq) = lone(PieceKind::Advisor, Side::Black, 1, 4);
        assert_eq!(targets(&piece_moves(&b, sq)), vec![(0, 3), (0, 5), (2, 3), (2, 5)]);
    }

    #[test]
    fn elephant_eye_blocks() {
        let (mut b, sq) = lone(PieceKind::Elephant, Side::Red, 9, 2);
        assert_eq!(targets(&piece_moves(&b, sq)), vec![(7, 0), (7, 4)]);
        b.put(Square::new(8, 3), Piece::new(PieceKind::Pawn, Side::Black));
        assert_eq!(targets(&piece_moves(&b, sq)), vec![(7, 0)]);
    }

    #[test]
    fn elephant_cannot_cross_river() {
        let (b, sq) = lone(PieceKind::Elephant, Side::Red, 5, 2);
        assert_eq!(targets(&piece_moves(&b, sq)), vec![(7, 0), (7, 4)]);
        let (b, sq) = lone(PieceKind::Elephant, Side::Black, 4, 6);
        assert_eq!(targets(&piece_moves(&b, sq)), vec![(2, 4), (2, 8)]);
    }

    #[test]
    fn horse_leg_blocks() {
        let (mut b, sq) = lone(PieceKind::Horse, Side::Red, 4, 4);
        assert_eq!(piece_moves(&b, sq).len(), 8);
        b.put(Square::new(3, 4), Piece::new(PieceKind::Pawn, Side::Red));
        let t = targets(&piece_moves(&b, sq));
        assert_eq!(t.len(), 6);
        assert!(!t.contains(&(2, 3)) && !t.contains(&(2, 5)));
    }

    #[test]
    fn chariot_stops_at_blockers() {
        let (mut b, sq) = lone(PieceKind::Chariot, Side::Red, 4, 0);
        b.put(Square::new(4, 3), Piece::new(PieceKind::Pawn, Side::Black));
        b.put(Square::new(2, 0), Piece::new(PieceKind::Pawn, Side::Red));
        let t = targets(&piece_moves(&b, sq));
        assert!(t.contains(&(4, 3)));
        assert!(!t.contains(&(4, 4)));
        assert!(t.contains(&(3, 0)));
        assert!(!t.contains(&(2, 0)));
        // right: 3, up: 1, down: 5
        assert_eq!(t.len(), 9);
    }

    #[test]
    fn cannon_needs_exactly_one_platform() {
        let (mut b, sq) = lone(PieceKind::Cannon, Side::Red, 9, 0);
        b.put(Square::new(6, 0), Piece::new(PieceKind::Pawn, Side::Red));
        b.put(Square::new(4, 0), Piece::new(PieceKind::Pawn, Side::Black));
        b.put(Square::new(2, 0), Piece::new(PieceKind::Chariot, Side::Black));
        let up: Vec<_> = targets(&piece_moves(&b, sq)).into_iter().filter(|&(_, c)| c == 0).collect();
        // slides to rows 8,7 and captures over the platform on row 6
        assert_eq!(up, vec![(4, 0), (7, 0), (8, 0)]);
    }

    #[test]
    fn cannon_does_not_capture_own_piece() {
        let (mut b, sq) = lone(PieceKind::Cannon, Side::Black, 0, 0);
        b.put(Square::new(0, 2), Piece::new(PieceKind::Pawn, Side::Red));
        b.put(Square::new(0, 5), Piece::new(PieceKind::Pawn, Side::Black));
        b.put(Square::new(0, 7), Piece::new(PieceKind::Pawn, Side::Red));
        let row: Vec<_> = targets(&piece_moves(&b, sq)).into_iter().filter(|&(r, _)| r == 0).collect();
        assert_eq!(row, vec![(0, 1)]);
    }

    #[test]
    fn pawn_sideways_only_after_river() {
        let (b, sq) = lone(PieceKind::Pawn, Side::Red, 5, 4);
        assert_eq!(targets(&piece_moves(&b, sq)), vec![(4, 4)]);
        let (b, sq) = lone(PieceKind::Pawn, Side::Red, 4, 4);
        assert_eq!(targets(&piece_moves(&b, sq)), vec![(3, 4), (4, 3), (4, 5)]);
        let (b, sq) = lone(PieceKind::Pawn, Side::Black, 4, 0);
        assert_eq!(targets(&piece_moves(&b, sq)), vec![(5, 0)]);
        let (b, sq) = lone(PieceKind::Pawn, Side::Black, 9, 0);
        assert_eq!(targets(&piece_moves(&b, sq)), vec![(9, 1)]);
    }

    #[test]
    fn validate_rejects_foreign_move() {
        let b = Board::startpos();
        assert!(parse_legal_move(&b, Side::Red, "h3-e3").is_ok());
        assert!(matches!(parse_legal_move(&b, Side::Red, "e1-e3"), Err(EngineError::MoveNotLegalHere(_))));
        // Black piece while Red is to move
        assert!(matches!(parse_legal_move(&b, Side::Black, "h3-e3"), Err(EngineError::MoveNotLegalHere(_))));
        assert!(matches!(parse_legal_move(&b, Side::Red, "zz"), Err(EngineError::InvalidMoveNotation(_))));
    }
}
