//! Headless game driver: lets an engine play a board to the end.

use log::info;
use serde::Serialize;

use crate::board::{Board, Score};
use crate::engine::{Engine, Report, Status};
use crate::error::GameError;

/// How a game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    /// Probes issued to the board.
    pub moves: usize,
    pub report: Report,
    pub score: Score,
}

/// Probe the engine's recommended cell, feed the result back, repeat.
///
/// The game ends when the engine finishes, the board runs out of cells, or
/// `max_moves` probes have been played; the engine's report is then scored.
pub fn play(board: &mut Board, engine: &mut Engine, max_moves: usize) -> Result<GameSummary, GameError> {
    let mut moves = 0;

    let report = loop {
        let Some((x, y)) = engine.next_move() else {
            break engine.finalize();
        };
        if moves >= max_moves || !board.is_active() {
            break engine.finalize();
        }

        let result = board.probe(x, y)?;
        moves += 1;

        match engine.update(x, y, result)? {
            Status::Next { .. } => {}
            Status::Finished(report) => break report,
        }
    };

    let score = board.verify(&report);
    info!(
        "game over after {moves} moves: {}/{} mines, {}",
        score.correct,
        score.total,
        if score.won { "won" } else { "lost" }
    );

    Ok(GameSummary { moves, report, score })
}
