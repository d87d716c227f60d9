use std::fmt;

use crate::board::{Board, Move, Piece, PieceKind, Side, Square, CELLS, COLS, ROWS};
use crate::error::{EngineError, Result};

/// Piece planes (7 Red + 7 Black) plus one side-to-move plane.
pub const PLANES: usize = 15;
pub const SIDE_PLANE: usize = 14;
pub const PLANE_SIZE: usize = ROWS * COLS;
pub const TENSOR_LEN: usize = PLANES * PLANE_SIZE;

/// Size of the flat action space: every (source, destination) cell pair.
pub const ACTION_SPACE: usize = CELLS * CELLS;

const FILES: &[u8; COLS] = b"abcdefghi";

/// Encoded position as a 15x10x9 stack of binary planes, row-major.
///
/// Planes 0-6 hold Red King, Advisor, Elephant, Horse, Chariot, Cannon,
/// Pawn; planes 7-13 the same for Black; plane 14 is all ones when Red is
/// to move and all zeros otherwise.
#[derive(Clone, PartialEq)]
pub struct Position {
    planes: Vec<f32>,
}

impl Position {
    /// Wrap raw plane data. Panics unless `data.len() == TENSOR_LEN`.
    pub fn from_planes(data: Vec<f32>) -> Self {
        assert_eq!(data.len(), TENSOR_LEN, "position tensor must have {TENSOR_LEN} values");
        Self { planes: data }
    }

    pub fn startpos() -> Self {
        board_to_tensor(&Board::startpos(), Side::Red)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.planes
    }

    /// Shape of the tensor as (planes, rows, cols).
    pub fn shape(&self) -> [usize; 3] {
        [PLANES, ROWS, COLS]
    }

    #[inline]
    pub fn get(&self, plane: usize, row: usize, col: usize) -> f32 {
        self.planes[plane * PLANE_SIZE + row * COLS + col]
    }

    #[inline]
    fn set(&mut self, plane: usize, row: usize, col: usize, v: f32) {
        self.planes[plane * PLANE_SIZE + row * COLS + col] = v;
    }

    pub fn board(&self) -> Board {
        tensor_to_board(self)
    }

    pub fn side_to_move(&self) -> Side {
        side_to_move(self)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Position ({} to move) {{", self.side_to_move())?;
        for line in self.board().to_layout().lines() {
            writeln!(f, "    {line}")?;
        }
        write!(f, "}}")
    }
}

fn plane_of(piece: Piece) -> usize {
    piece.kind.index() + if piece.side == Side::Black { 7 } else { 0 }
}

/// Encode a board and side to move as plane tensor.
pub fn board_to_tensor(board: &Board, side: Side) -> Position {
    let mut pos = Position { planes: vec![0.0; TENSOR_LEN] };
    for (sq, piece) in board.pieces() {
        pos.set(plane_of(piece), sq.row(), sq.col(), 1.0);
    }
    if side == Side::Red {
        pos.planes[SIDE_PLANE * PLANE_SIZE..].fill(1.0);
    }
    pos
}

/// Decode planes 0-13 back into a board; a cell is occupied when its plane
/// value exceeds 0.5.
pub fn tensor_to_board(pos: &Position) -> Board {
    let mut board = Board::empty();
    for side in [Side::Red, Side::Black] {
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind, side);
            let plane = plane_of(piece);
            for sq in Square::all() {
                if pos.get(plane, sq.row(), sq.col()) > 0.5 {
                    board.put(sq, piece);
                }
            }
        }
    }
    board
}

/// Plane 14 is uniform, so any cell will do.
pub fn side_to_move(pos: &Position) -> Side {
    if pos.get(SIDE_PLANE, 0, 0) > 0.5 { Side::Red } else { Side::Black }
}

/// `(src_row*9 + src_col) * 90 + (dst_row*9 + dst_col)`
#[inline]
pub fn move_to_index(mv: Move) -> usize {
    mv.from.index() * CELLS + mv.to.index()
}

/// Inverse of [`move_to_index`]. Panics on `index >= ACTION_SPACE`.
#[inline]
pub fn index_to_move(index: usize) -> Move {
    assert!(index < ACTION_SPACE, "action index {index} out of range");
    Move::new(Square::from_index(index / CELLS), Square::from_index(index % CELLS))
}

fn square_to_notation(sq: Square) -> String {
    format!("{}{}", FILES[sq.col()] as char, ROWS - sq.row())
}

/// Format as `<file><rank>-<file><rank>`, files `a..i` left to right and
/// rank `10 - row`, e.g. `"a3-e3"`.
pub fn move_to_notation(mv: Move) -> String {
    format!("{}-{}", square_to_notation(mv.from), square_to_notation(mv.to))
}

fn notation_to_square(text: &str) -> Option<Square> {
    let mut chars = text.chars();
    let file = chars.next()?;
    let col = FILES.iter().position(|&f| f as char == file)?;
    let rank_str = chars.as_str();
    if rank_str.is_empty() || rank_str.starts_with('0') || !rank_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let rank: usize = rank_str.parse().ok()?;
    if !(1..=ROWS).contains(&rank) { return None; }
    Some(Square::new(ROWS - rank, col))
}

/// Parse the notation produced by [`move_to_notation`]. Ranks run 1..=10.
pub fn notation_to_move(text: &str) -> Result<Move> {
    let err = || EngineError::InvalidMoveNotation(text.to_string());
    let (src, dst) = text.trim().split_once('-').ok_or_else(err)?;
    let from = notation_to_square(src).ok_or_else(err)?;
    let to = notation_to_square(dst).ok_or_else(err)?;
    Ok(Move::new(from, to))
}

/// Apply `mv` to the position and flip the side to move. The piece on the
/// destination (if any) is overwritten; legality is not checked.
pub fn apply_move(pos: &Position, mv: Move) -> Position {
    let mut board = tensor_to_board(pos);
    board.apply(mv);
    board_to_tensor(&board, side_to_move(pos).opponent())
}
