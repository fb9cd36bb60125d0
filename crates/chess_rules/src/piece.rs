//! Move geometry for each piece kind.
//!
//! Everything here is a pure function of kind, color, square and the board's
//! occupancy. Turn order, check and castling live in `board`.

use crate::square_set::SquareSet;
use crate::types::{Color, PieceKind, Square};

pub const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const QUEEN_DIRS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

/// En-passant record left behind by a pawn double-step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnPassant {
    /// Where the double-stepped pawn stands.
    pub captured: Square,
    /// The square it skipped over, where a capturing pawn lands.
    pub landing: Square,
}

/// Squares a piece of `kind` and `color` on `from` attacks, given which squares
/// are occupied.
pub fn attack_set(kind: PieceKind, color: Color, from: Square, occupied: SquareSet) -> SquareSet {
    match kind {
        PieceKind::Pawn => pawn_attacks(color, from),
        PieceKind::Knight => leaps(from, &KNIGHT_DELTAS),
        PieceKind::Bishop => slide(from, &BISHOP_DIRS, 7, occupied),
        PieceKind::Rook => slide(from, &ROOK_DIRS, 7, occupied),
        PieceKind::Queen => slide(from, &QUEEN_DIRS, 7, occupied),
        PieceKind::King => slide(from, &QUEEN_DIRS, 1, occupied),
    }
}

/// Walk each direction up to `max_len` steps. The first occupied square is
/// included, whoever stands on it, and ends that ray.
fn slide(from: Square, dirs: &[(i8, i8)], max_len: i8, occupied: SquareSet) -> SquareSet {
    let mut out = SquareSet::EMPTY;
    for &(df, dr) in dirs {
        for step in 1..=max_len {
            let Some(to) = from.offset(df * step, dr * step) else {
                break;
            };
            out.insert(to);
            if occupied.contains(to) {
                break;
            }
        }
    }
    out
}

fn leaps(from: Square, deltas: &[(i8, i8)]) -> SquareSet {
    deltas
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .collect()
}

/// The two forward diagonals, occupied or not.
pub fn pawn_attacks(color: Color, from: Square) -> SquareSet {
    let dir = color.forward();
    [-1, 1]
        .into_iter()
        .filter_map(|df| from.offset(df, dir))
        .collect()
}

/// Pawn destinations before the self-check filter.
///
/// Diagonals need an enemy piece or the en-passant landing square; pushes need
/// empty squares, and the double push needs an unmoved pawn.
pub fn pawn_candidates(
    color: Color,
    from: Square,
    has_moved: bool,
    occupied: SquareSet,
    enemies: SquareSet,
    en_passant: Option<EnPassant>,
) -> SquareSet {
    let mut out = SquareSet::EMPTY;
    let dir = color.forward();

    for to in pawn_attacks(color, from) {
        let ep_landing = match en_passant {
            Some(ep) => ep.landing == to && enemies.contains(ep.captured),
            None => false,
        };
        if enemies.contains(to) || ep_landing {
            out.insert(to);
        }
    }

    if let Some(one) = from.offset(0, dir) {
        if !occupied.contains(one) {
            out.insert(one);
            if !has_moved {
                if let Some(two) = from.offset(0, 2 * dir) {
                    if !occupied.contains(two) {
                        out.insert(two);
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
#[path = "piece_tests.rs"]
mod piece_tests;
