//! Board model: sides, pieces, squares, moves and the 10x9 grid.
//!
//! Row 0 is Black's back rank and row 9 is Red's. Red moves first and
//! advances toward decreasing rows.

pub mod layout;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use layout::STARTPOS_LAYOUT;

pub const ROWS: usize = 10;
pub const COLS: usize = 9;
pub const CELLS: usize = ROWS * COLS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Red,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Row delta of a forward step.
    pub fn forward(self) -> i32 {
        if self == Side::Red { -1 } else { 1 }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if *self == Side::Red { "Red" } else { "Black" })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Pawn,
}

impl PieceKind {
    /// Plane order used by the tensor encoding.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::King,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Pawn,
    ];

    pub fn index(self) -> usize {
        match self {
            PieceKind::King => 0,
            PieceKind::Advisor => 1,
            PieceKind::Elephant => 2,
            PieceKind::Horse => 3,
            PieceKind::Chariot => 4,
            PieceKind::Cannon => 5,
            PieceKind::Pawn => 6,
        }
    }

    fn letter(self) -> char {
        match self {
            PieceKind::King => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Pawn => 'p',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// Layout character: uppercase for Red, lowercase for Black.
    pub fn to_char(self) -> char {
        let c = self.kind.letter();
        if self.side == Side::Red { c.to_ascii_uppercase() } else { c }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let side = if c.is_ascii_uppercase() { Side::Red } else { Side::Black };
        let kind = PieceKind::ALL
            .into_iter()
            .find(|k| k.letter() == c.to_ascii_lowercase())?;
        Some(Piece::new(kind, side))
    }
}

/// A board coordinate. Always on the board once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Panics if the coordinate is off the board.
    pub fn new(row: usize, col: usize) -> Self {
        assert!(row < ROWS && col < COLS, "square ({row}, {col}) is off the board");
        Self { row: row as u8, col: col as u8 }
    }

    pub fn try_new(row: i32, col: i32) -> Option<Self> {
        if (0..ROWS as i32).contains(&row) && (0..COLS as i32).contains(&col) {
            Some(Self { row: row as u8, col: col as u8 })
        } else {
            None
        }
    }

    pub fn row(self) -> usize { self.row as usize }

    pub fn col(self) -> usize { self.col as usize }

    /// Flat row-major index in `0..90`.
    pub fn index(self) -> usize {
        self.row() * COLS + self.col()
    }

    pub fn from_index(index: usize) -> Self {
        assert!(index < CELLS, "square index {index} out of range");
        Self::new(index / COLS, index % COLS)
    }

    pub fn offset(self, dr: i32, dc: i32) -> Option<Self> {
        Self::try_new(self.row as i32 + dr, self.col as i32 + dc)
    }

    /// The 3x3 palace: cols 3..=5, rows 7..=9 for Red, 0..=2 for Black.
    pub fn in_palace(self, side: Side) -> bool {
        let rows_ok = match side {
            Side::Red => (7..=9).contains(&self.row),
            Side::Black => self.row <= 2,
        };
        rows_ok && (3..=5).contains(&self.col)
    }

    /// True on the side's own half of the river.
    pub fn on_own_half(self, side: Side) -> bool {
        match side {
            Side::Red => self.row >= 5,
            Side::Black => self.row <= 4,
        }
    }

    /// Every square in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..CELLS).map(Square::from_index)
    }
}

/// A source/destination pair. Carries no piece or capture metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encoder::move_to_notation(*self))
    }
}

/// The 10x9 grid of optional pieces.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Option<Piece>; COLS]; ROWS],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard Xiangqi opening position.
    pub fn startpos() -> Self {
        let mut b = Self::empty();
        let back = [
            PieceKind::Chariot,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::King,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Chariot,
        ];
        for (col, kind) in back.into_iter().enumerate() {
            b.put(Square::new(0, col), Piece::new(kind, Side::Black));
            b.put(Square::new(9, col), Piece::new(kind, Side::Red));
        }
        for col in [1, 7] {
            b.put(Square::new(2, col), Piece::new(PieceKind::Cannon, Side::Black));
            b.put(Square::new(7, col), Piece::new(PieceKind::Cannon, Side::Red));
        }
        for col in (0..COLS).step_by(2) {
            b.put(Square::new(3, col), Piece::new(PieceKind::Pawn, Side::Black));
            b.put(Square::new(6, col), Piece::new(PieceKind::Pawn, Side::Red));
        }
        b
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.row()][sq.col()]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.row()][sq.col()] = piece;
    }

    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.set(sq, Some(piece));
    }

    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.row()][sq.col()].take()
    }

    #[inline]
    pub fn is_empty_at(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// True if `sq` holds a piece of the side opposing `side`.
    #[inline]
    pub fn is_enemy(&self, sq: Square, side: Side) -> bool {
        matches!(self.get(sq), Some(p) if p.side != side)
    }

    /// Empty or enemy-occupied: a square a non-cannon piece may land on.
    #[inline]
    pub fn can_land(&self, sq: Square, side: Side) -> bool {
        match self.get(sq) {
            None => true,
            Some(p) => p.side != side,
        }
    }

    /// Moves the piece at `mv.from` onto `mv.to`, overwriting whatever was
    /// there. Legality is not checked. Returns the overwritten piece.
    pub fn apply(&mut self, mv: Move) -> Option<Piece> {
        let moving = self.remove(mv.from);
        let captured = self.get(mv.to);
        self.set(mv.to, moving);
        captured
    }

    /// Occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    pub fn count(&self, piece: Piece) -> usize {
        self.pieces().filter(|&(_, p)| p == piece).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_layout())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for line in self.to_layout().lines() {
            writeln!(f, "    {line}")?;
        }
        write!(f, "}}")
    }
}
