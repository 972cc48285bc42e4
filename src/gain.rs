//! Knowledge-gain estimation and candidate collection.
//!
//! For every cell that has not been probed, two scores are derived from its
//! 3×3 kernel (centre included):
//! - explore gain: how many kernel cells are still `Unknown`;
//! - risk gain: the summed risk of those `Unknown` cells.
//!
//! The same sweep collects the cells tied for the best rank under each
//! ranking the move selector may need.

use std::cmp::Reverse;

use crate::config::Strategy;
use crate::types::{Flag, KernelCache, KnowledgeGrid, ScoreMap};

/// Cells tied for the best key seen so far.
#[derive(Clone, Debug)]
pub struct CandidateSet<K: Ord + Copy> {
    best: Option<K>,
    cells: Vec<(usize, usize)>,
}

impl<K: Ord + Copy> CandidateSet<K> {
    pub fn new() -> Self {
        Self { best: None, cells: Vec::new() }
    }

    /// A strictly better key replaces the set; an equal key joins it.
    pub fn offer(&mut self, key: K, cell: (usize, usize)) {
        match self.best {
            Some(best) if key < best => {}
            Some(best) if key == best => self.cells.push(cell),
            _ => {
                self.best = Some(key);
                self.cells.clear();
                self.cells.push(cell);
            }
        }
    }

    pub fn best(&self) -> Option<K> {
        self.best
    }

    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.best = None;
        self.cells.clear();
    }
}

impl<K: Ord + Copy> Default for CandidateSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidate rankings rebuilt on every estimation sweep.
#[derive(Clone, Debug, Default)]
pub struct Candidates {
    /// `Safe` cells by (risk gain, explore gain), both descending.
    pub safe: CandidateSet<(i32, i32)>,
    /// `Unknown` cells by risk minus explore gain, ascending.
    pub cautious: CandidateSet<Reverse<i32>>,
    /// `Unknown` cells by (risk, explore gain), both descending.
    pub risky: CandidateSet<(i32, i32)>,
}

impl Candidates {
    pub fn clear(&mut self) {
        self.safe.clear();
        self.cautious.clear();
        self.risky.clear();
    }
}

/// Recompute both gain maps from scratch and rebuild the candidate sets.
pub fn estimate(
    grid: &KnowledgeGrid,
    kc: &KernelCache,
    strategy: Strategy,
    risk_gain: &mut ScoreMap,
    explore_gain: &mut ScoreMap,
    candidates: &mut Candidates,
) {
    risk_gain.clear();
    explore_gain.clear();
    candidates.clear();

    for (x, y) in grid.coords() {
        let cell = grid.get(x, y);

        if cell.flag != Flag::Mined {
            let mut risk = 0;
            let mut explore = 0;
            for &(nx, ny) in kc.get(x, y) {
                let neighbor = grid.get(nx, ny);
                if neighbor.flag == Flag::Unknown {
                    risk += neighbor.value;
                    explore += 1;
                }
            }
            if strategy.tracks_risk_gain() {
                risk_gain.set(x, y, risk);
            }
            explore_gain.set(x, y, explore);
        }

        let risk = risk_gain.get(x, y);
        let explore = explore_gain.get(x, y);
        match (strategy, cell.flag) {
            (Strategy::RiskFirstWithSafetyBias, Flag::Safe) => {
                candidates.safe.offer((risk, explore), (x, y));
            }
            (Strategy::RiskFirstWithSafetyBias, Flag::Unknown) => {
                candidates.cautious.offer(Reverse(cell.value - explore), (x, y));
            }
            (Strategy::UniformRiskRanking, Flag::Unknown) => {
                candidates.risky.offer((cell.value, explore), (x, y));
            }
            _ => {}
        }
    }
}
