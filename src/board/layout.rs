use super::{Board, Piece, Square, COLS, ROWS};
use crate::error::{EngineError, Result};

/// Human-readable layout of the opening position, Black on top.
pub const STARTPOS_LAYOUT: &str = "\
rnbakabnr
.........
.c.....c.
p.p.p.p.p
.........
.........
P.P.P.P.P
.C.....C.
.........
RNBAKABNR";

impl Board {
    /// Parse ten rows of nine characters, separated by newlines or `/`.
    /// `.` is empty, uppercase `KABNRCP` is Red and lowercase is Black.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_layout(text: &str) -> Result<Board> {
        let rows: Vec<&str> = text
            .split(['\n', '/'])
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if rows.len() != ROWS {
            return Err(EngineError::InvalidLayout(format!("expected {ROWS} rows, found {}", rows.len())));
        }
        let mut board = Board::empty();
        for (row, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != COLS {
                return Err(EngineError::InvalidLayout(format!(
                    "row {row} has {} cells, expected {COLS}",
                    chars.len()
                )));
            }
            for (col, c) in chars.into_iter().enumerate() {
                if c == '.' { continue; }
                let piece = Piece::from_char(c)
                    .ok_or_else(|| EngineError::InvalidLayout(format!("unknown piece '{c}' at row {row}")))?;
                board.put(Square::new(row, col), piece);
            }
        }
        Ok(board)
    }

    /// Inverse of [`Board::from_layout`], rows joined by `\n`.
    pub fn to_layout(&self) -> String {
        let mut s = String::with_capacity(ROWS * (COLS + 1));
        for row in 0..ROWS {
            if row > 0 { s.push('\n'); }
            for col in 0..COLS {
                s.push(self.get(Square::new(row, col)).map_or('.', Piece::to_char));
            }
        }
        s
    }
}
