use crate::board::{Board, Piece, PieceKind, Side};

const RED_KING: Piece = Piece::new(PieceKind::King, Side::Red);
const BLACK_KING: Piece = Piece::new(PieceKind::King, Side::Black);

fn kings_present(board: &Board) -> (bool, bool) {
    let mut red = false;
    let mut black = false;
    for (_, p) in board.pieces() {
        if p == RED_KING { red = true; }
        if p == BLACK_KING { black = true; }
    }
    (red, black)
}

/// The game is over unless both kings are on the board.
pub fn is_terminal(board: &Board) -> bool {
    let (red, black) = kings_present(board);
    !(red && black)
}

/// Side whose king survives when exactly one king is left.
pub fn winner(board: &Board) -> Option<Side> {
    match kings_present(board) {
        (true, false) => Some(Side::Red),
        (false, true) => Some(Side::Black),
        _ => None,
    }
}
