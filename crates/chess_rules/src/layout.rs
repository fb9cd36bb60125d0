//! Text layout of a board: eight rows of eight codes, top row first.
//!
//! Uppercase letters are Black, lowercase White, `.` an empty square.

use crate::error::RulesError;
use crate::types::{Color, Piece, PieceKind, Square};

pub const EMPTY_CODE: char = '.';

pub const STANDARD_LAYOUT: [&str; 8] = [
    "RNBQKBNR",
    "PPPPPPPP",
    "........",
    "........",
    "........",
    "........",
    "pppppppp",
    "rnbqkbnr",
];

/// Parse layout rows into a grid. Attack sets are left empty for the caller
/// to compute.
pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<[Option<Piece>; 64], RulesError> {
    if rows.len() != 8 {
        return Err(RulesError::InvalidLayout(format!(
            "expected 8 rows, got {}",
            rows.len()
        )));
    }

    let mut grid = [None; 64];
    for (rank, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let codes: Vec<char> = row.chars().collect();
        if codes.len() != 8 {
            return Err(RulesError::InvalidLayout(format!(
                "row {} has {} squares: {:?}",
                rank,
                codes.len(),
                row
            )));
        }
        for (file, ch) in codes.into_iter().enumerate() {
            if ch == EMPTY_CODE {
                continue;
            }
            let kind = PieceKind::from_code(ch).ok_or_else(|| {
                RulesError::InvalidLayout(format!("unknown piece code {ch:?} in row {rank}"))
            })?;
            let color = if ch.is_ascii_uppercase() {
                Color::Black
            } else {
                Color::White
            };
            let mut piece = Piece::new(kind, color);
            // A pawn away from its starting row has already used its double step.
            if kind == PieceKind::Pawn && rank as u8 != color.pawn_rank() {
                piece.has_moved = true;
            }
            grid[Square::new(file as u8, rank as u8).index()] = Some(piece);
        }
    }
    Ok(grid)
}

pub fn render_rows(grid: &[Option<Piece>; 64]) -> Vec<String> {
    (0..8u8)
        .map(|rank| {
            (0..8u8)
                .map(|file| match grid[Square::new(file, rank).index()] {
                    Some(pc) => pc.code(),
                    None => EMPTY_CODE,
                })
                .collect()
        })
        .collect()
}
