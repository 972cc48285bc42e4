//! Bomb deduction by local counting.
//!
//! An unknown cell whose accumulated risk exceeds the number of unknown cells
//! in its kernel cannot spread that risk over its surroundings: it is marked
//! as a certain bomb.

use crate::types::{Flag, KnowledgeGrid, ScoreMap};

/// First cell in reading order that the counting rule proves to be a mine.
pub fn find_certain_bomb(grid: &KnowledgeGrid, explore_gain: &ScoreMap) -> Option<(usize, usize)> {
    grid.coords().find(|&(x, y)| {
        let cell = grid.get(x, y);
        cell.flag == Flag::Unknown && cell.value > 0 && cell.value > explore_gain.get(x, y)
    })
}
