//! Constraint propagation over the 3×3 kernel.
//!
//! Two passes run after every probe:
//! - the offset pass rewrites each probed cell's count as its raw count minus
//!   the mines already identified around it;
//! - the knowledge pass flags cells next to a zero as safe and accumulates the
//!   remaining counts of probed neighbours into every unknown cell's risk.

use log::warn;

use crate::types::{Flag, KernelCache, KnowledgeGrid};

/// Recompute every `Mined` cell's value from its raw count.
///
/// Only `Mined` values change and only flags are read, so the pass is
/// independent of scan order and runs in place.
pub fn offset_pass(grid: &mut KnowledgeGrid, kc: &KernelCache) {
    for x in 0..grid.cols {
        for y in 0..grid.rows {
            let cell = grid.get(x, y);
            if cell.flag != Flag::Mined {
                continue;
            }

            let known = kc
                .get(x, y)
                .iter()
                .filter(|&&(nx, ny)| grid.get(nx, ny).flag.is_bomb())
                .count() as i32;
            let raw = grid.raw(x, y);

            let mut value = raw - known;
            if value < 0 {
                warn!("({x}|{y}) reported {raw} but {known} mines are marked around it, clamping to 0");
                value = 0;
            }

            let idx = grid.index(x, y);
            grid.cells[idx].value = value;
        }
    }
}

/// Flag safe cells and accumulate risk into unknown cells.
///
/// Every decision reads the pre-pass snapshot, so a cell flagged earlier in
/// the sweep never influences a neighbour in the same sweep.
pub fn knowledge_pass(grid: &mut KnowledgeGrid, kc: &KernelCache) {
    let snapshot = grid.cells.clone();

    for x in 0..grid.cols {
        for y in 0..grid.rows {
            let idx = grid.index(x, y);
            let mut cell = snapshot[idx];
            if cell.flag == Flag::Mined {
                continue;
            }
            if cell.flag == Flag::Unknown {
                cell.value = 0;
            }

            for &(nx, ny) in kc.get(x, y) {
                let neighbor = snapshot[grid.index(nx, ny)];
                if neighbor.flag != Flag::Mined || cell.flag != Flag::Unknown {
                    continue;
                }
                if neighbor.value == 0 {
                    cell.flag = Flag::Safe;
                } else {
                    cell.value += neighbor.value;
                }
            }

            grid.cells[idx] = cell;
        }
    }
}

/// Offset pass followed by knowledge pass.
pub fn propagate(grid: &mut KnowledgeGrid, kc: &KernelCache) {
    offset_pass(grid, kc);
    knowledge_pass(grid, kc);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn grid_with(cols: usize, rows: usize) -> (KnowledgeGrid, KernelCache) {
        (KnowledgeGrid::new(cols, rows, 0, 0), KernelCache::new(cols, rows))
    }

    #[test]
    fn test_zero_flags_neighbours_safe() {
        let (mut g, kc) = grid_with(3, 3);
        g.reveal(0, 0, 0);
        propagate(&mut g, &kc);

        assert_eq!(g.get(1, 0).flag, Flag::Safe);
        assert_eq!(g.get(0, 1).flag, Flag::Safe);
        assert_eq!(g.get(1, 1).flag, Flag::Safe);
        assert_eq!(g.get(2, 2), Cell::UNKNOWN);
    }

    #[test]
    fn test_risk_accumulates_from_each_probed_neighbour() {
        let (mut g, kc) = grid_with(4, 3);
        g.reveal(0, 0, 1);
        g.reveal(2, 0, 2);
        propagate(&mut g, &kc);

        // (1,0) and (1,1) touch both probed cells
        assert_eq!(g.get(1, 0), Cell { value: 3, flag: Flag::Unknown });
        assert_eq!(g.get(1, 1), Cell { value: 3, flag: Flag::Unknown });
        assert_eq!(g.get(0, 1).value, 1);
        assert_eq!(g.get(3, 1).value, 2);
        assert_eq!(g.get(0, 2).value, 0);
    }

    #[test]
    fn test_offset_subtracts_identified_mines() {
        let (mut g, kc) = grid_with(3, 3);
        g.reveal(1, 1, 2);
        g.set(2, 2, Cell { value: 3, flag: Flag::CertainBomb });
        g.set(0, 2, Cell { value: 9, flag: Flag::Hit });
        offset_pass(&mut g, &kc);

        assert_eq!(g.get(1, 1).value, 0);
        assert_eq!(g.raw(1, 1), 2);
    }

    #[test]
    fn test_offset_clamps_at_zero() {
        let (mut g, kc) = grid_with(3, 3);
        g.reveal(0, 0, 1);
        g.set(1, 0, Cell { value: 1, flag: Flag::CertainBomb });
        g.set(1, 1, Cell { value: 1, flag: Flag::CertainBomb });
        offset_pass(&mut g, &kc);

        assert_eq!(g.get(0, 0).value, 0);
    }

    #[test]
    fn test_safe_cell_not_overwritten_by_risk() {
        let (mut g, kc) = grid_with(3, 1);
        g.reveal(0, 0, 0);
        g.reveal(2, 0, 1);
        // (1,0) touches a zero and a one; it becomes safe regardless of order
        propagate(&mut g, &kc);
        assert_eq!(g.get(1, 0).flag, Flag::Safe);

        propagate(&mut g, &kc);
        assert_eq!(g.get(1, 0).flag, Flag::Safe);
    }

    #[test]
    fn test_safety_does_not_chain() {
        let (mut g, kc) = grid_with(3, 1);
        g.reveal(0, 0, 0);
        knowledge_pass(&mut g, &kc);
        // (1,0) became safe in this sweep; only probed zeros clear neighbours
        assert_eq!(g.get(1, 0).flag, Flag::Safe);
        assert_eq!(g.get(2, 0).flag, Flag::Unknown);
    }

    #[test]
    fn test_terminal_cells_untouched() {
        let (mut g, kc) = grid_with(3, 3);
        g.reveal(0, 0, 0);
        g.set(1, 1, Cell { value: 9, flag: Flag::Hit });
        propagate(&mut g, &kc);
        assert_eq!(g.get(1, 1), Cell { value: 9, flag: Flag::Hit });
    }

    #[test]
    fn test_propagation_is_idempotent() {
        let (mut g, kc) = grid_with(5, 4);
        g.reveal(0, 0, 1);
        g.reveal(2, 1, 3);
        g.reveal(4, 3, 0);
        g.set(1, 2, Cell { value: 4, flag: Flag::CertainBomb });
        propagate(&mut g, &kc);
        let once = g.clone();
        propagate(&mut g, &kc);
        assert_eq!(g, once);
    }
}
