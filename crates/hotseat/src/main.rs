//! Hotseat chess in the terminal.
//!
//! Two players share one keyboard. Moves are typed as `e2 e4` or `e2e4`;
//! `moves e2` lists where a piece may go, `restart` sets the board up again
//! and `quit` leaves. Logs go to stderr so the board on stdout stays readable.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_rules::{
    Color, Game, GameConfig, GameState, GameStatus, MoveOutcome, PieceKind, Square,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with a custom layout and first mover
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset, e.g. `chess_rules=debug`
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let mut game = Game::from_config(&config).context("setting up the board")?;
    tracing::info!(config = ?args.config, first = %game.turn(), "hotseat game started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print_position(&mut stdout, &game)?;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "quit" | "exit" => break,
            "restart" => {
                game.restart();
                print_position(&mut stdout, &game)?;
            }
            "moves" => match parts.get(1).map(|s| s.parse::<Square>()) {
                Some(Ok(sq)) => {
                    let dests: Vec<String> = game
                        .legal_destinations(sq)
                        .iter()
                        .map(|d| d.to_string())
                        .collect();
                    writeln!(stdout, "{sq}: {}", dests.join(" "))?;
                }
                Some(Err(e)) => writeln!(stdout, "{e}")?,
                None => writeln!(stdout, "usage: moves <square>")?,
            },
            "help" => print_help(&mut stdout)?,
            _ if matches!(game.state(), GameState::PromotionPending(_)) => {
                match parse_promotion(parts[0]) {
                    Some(kind) => match game.promote(kind) {
                        Ok(()) => print_position(&mut stdout, &game)?,
                        Err(e) => writeln!(stdout, "{e}")?,
                    },
                    None => writeln!(stdout, "promote to q, r, b or n")?,
                }
            }
            _ => match parse_move(&parts) {
                Some((from, to)) => match game.play(from, to) {
                    Ok(outcome) => {
                        if let Some(pc) = outcome.captured() {
                            writeln!(stdout, "{} takes {} {}", pc.color.other(), pc.color, pc.kind)?;
                        }
                        if let MoveOutcome::Promotion { square, .. } = outcome {
                            writeln!(stdout, "pawn on {square} promotes to? (q/r/b/n)")?;
                        } else {
                            print_position(&mut stdout, &game)?;
                        }
                    }
                    Err(e) => writeln!(stdout, "{e}")?,
                },
                None => writeln!(stdout, "unrecognised input, try `help`")?,
            },
        }
        stdout.flush()?;
    }

    Ok(())
}

fn parse_move(parts: &[&str]) -> Option<(Square, Square)> {
    match parts {
        [from, to] => Some((from.parse().ok()?, to.parse().ok()?)),
        [mv] if mv.len() == 4 && mv.is_ascii() => {
            let (from, to) = mv.split_at(2);
            Some((from.parse().ok()?, to.parse().ok()?))
        }
        _ => None,
    }
}

fn parse_promotion(s: &str) -> Option<PieceKind> {
    let mut chars = s.chars();
    let kind = PieceKind::from_code(chars.next()?)?;
    match chars.next() {
        None if kind.is_promotion_choice() => Some(kind),
        _ => None,
    }
}

fn print_position(out: &mut impl Write, game: &Game) -> io::Result<()> {
    writeln!(out, "{}", game.board())?;
    for color in [Color::White, Color::Black] {
        let taken: String = game.captures(color).iter().map(|pc| pc.code()).collect();
        if !taken.is_empty() {
            writeln!(out, "{color} has taken: {taken}")?;
        }
    }
    match game.state() {
        GameState::Finished(GameStatus::Checkmate) => {
            let winner = game.turn().other();
            writeln!(out, "checkmate, {winner} wins (`restart` or `quit`)")
        }
        GameState::Finished(GameStatus::Stalemate) => {
            writeln!(out, "stalemate (`restart` or `quit`)")
        }
        GameState::PromotionPending(sq) => writeln!(out, "pawn on {sq} promotes to? (q/r/b/n)"),
        GameState::Ongoing => {
            let check = if game.board().is_king_attacked(game.turn()) {
                " (check)"
            } else {
                ""
            };
            writeln!(out, "{} to move{check}", game.turn())
        }
    }
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  e2 e4 | e2e4   play a move")?;
    writeln!(out, "  moves e2       list destinations for a piece")?;
    writeln!(out, "  q | r | b | n  choose a promotion piece")?;
    writeln!(out, "  restart        start over")?;
    writeln!(out, "  quit           leave")
}
