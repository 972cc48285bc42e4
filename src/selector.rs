//! Move selection for both strategies.

use log::trace;

use crate::gain::Candidates;
use crate::rng::SolverRng;
use crate::types::{KernelCache, ScoreMap};

/// Sparse, evenly spaced cells used to break into untouched regions:
/// every third row and column starting at 1, in reading order.
pub fn scan_order(cols: usize, rows: usize) -> Vec<(usize, usize)> {
    (1..rows)
        .step_by(3)
        .flat_map(|y| (1..cols).step_by(3).map(move |x| (x, y)))
        .collect()
}

/// Prefer the most informative proven-safe cell; otherwise guess the unknown
/// cell whose risk is lowest relative to what it would reveal.
///
/// Returns `None` when there is nothing left to probe.
pub fn select_risk_first(candidates: &Candidates, rng: &mut SolverRng) -> Option<(usize, usize)> {
    let safe_is_useful = matches!(candidates.safe.best(), Some(best) if best != (0, 0));
    if safe_is_useful {
        trace!("choosing among {} safe candidates", candidates.safe.cells().len());
        rng.choose(candidates.safe.cells())
    } else {
        trace!("no useful safe cell, guessing among {} unknown cells", candidates.cautious.cells().len());
        rng.choose(candidates.cautious.cells())
    }
}

/// Probe the riskiest unknown cell, or a fully unexplored scan-order cell
/// when no unknown cell carries any risk.
pub fn select_uniform(
    candidates: &Candidates,
    explore_gain: &ScoreMap,
    scan_order: &[(usize, usize)],
    rng: &mut SolverRng,
) -> Option<(usize, usize)> {
    let top_risk = candidates.risky.best()?.0;

    if top_risk == 0 {
        let untouched = scan_order
            .iter()
            .copied()
            .find(|&(x, y)| explore_gain.get(x, y) == KernelCache::FULL as i32);
        if let Some(cell) = untouched {
            trace!("no risky cell, opening untouched region at ({}|{})", cell.0, cell.1);
            return Some(cell);
        }
    }

    rng.choose(candidates.risky.cells())
}
