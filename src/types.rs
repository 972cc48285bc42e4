//! Core data types for the knowledge engine.
//!
//! All grid types use flat `Vec` storage with column-major layout:
//! `cells[x * rows + y]`, where `x` is the column and `y` the row.

use serde::Serialize;

/// Value stored in a cell that was hit while play continues.
pub const HIT_VALUE: i32 = 9;

/// What the engine knows about a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Flag {
    /// Nothing proven yet; `value` is the accumulated risk score.
    Unknown,
    /// Probed; `value` is the offset adjacency count.
    Mined,
    /// Proven safe by a neighbouring zero.
    Safe,
    /// Proven to be a mine by local counting.
    CertainBomb,
    /// Probed and turned out to be a mine.
    Hit,
}

impl Flag {
    /// `CertainBomb` and `Hit` never change once set.
    pub fn is_terminal(self) -> bool {
        matches!(self, Flag::CertainBomb | Flag::Hit)
    }

    /// Flags that count as an identified mine for the offset pass.
    pub fn is_bomb(self) -> bool {
        self.is_terminal()
    }

    /// Single-letter code used by the heat-map view.
    pub fn code(self) -> char {
        match self {
            Flag::Unknown => 'U',
            Flag::Mined => 'M',
            Flag::Safe => 'S',
            Flag::CertainBomb => 'X',
            Flag::Hit => 'H',
        }
    }
}

/// One cell of engine knowledge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Offset count for `Mined` cells, accumulated risk for `Unknown` ones.
    pub value: i32,
    pub flag: Flag,
}

impl Cell {
    pub const UNKNOWN: Cell = Cell { value: 0, flag: Flag::Unknown };
    pub const SAFE: Cell = Cell { value: 0, flag: Flag::Safe };
}

/// Outcome of probing a cell on the authoritative board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeResult {
    /// Number of adjacent mines (0-8).
    Count(u8),
    /// The probed cell was a mine.
    Mine,
}

impl ProbeResult {
    /// Decode a fixture digit: 0-8 are counts, 9 is a mine.
    pub fn from_digit(value: u8) -> Option<Self> {
        match value {
            0..=8 => Some(ProbeResult::Count(value)),
            9 => Some(ProbeResult::Mine),
            _ => None,
        }
    }
}

/// Per-cell knowledge plus the raw values reported when cells were probed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeGrid {
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<Cell>,
    raw: Vec<i32>,
}

impl KnowledgeGrid {
    /// All cells unknown except the pre-seeded safe start.
    pub fn new(cols: usize, rows: usize, safe_x: usize, safe_y: usize) -> Self {
        let mut grid = Self {
            cols,
            rows,
            cells: vec![Cell::UNKNOWN; cols * rows],
            raw: vec![0; cols * rows],
        };
        grid.set(safe_x, safe_y, Cell::SAFE);
        grid
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        x * self.rows + y
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[x * self.rows + y]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }

    #[inline(always)]
    pub fn raw(&self, x: usize, y: usize) -> i32 {
        self.raw[x * self.rows + y]
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    /// Record a probed count: stores the raw value and marks the cell `Mined`.
    pub fn reveal(&mut self, x: usize, y: usize, count: i32) {
        let idx = self.index(x, y);
        self.raw[idx] = count;
        self.cells[idx] = Cell { value: count, flag: Flag::Mined };
    }

    /// Coordinates in reading order (row by row).
    pub fn coords(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |y| (0..cols).map(move |x| (x, y)))
    }

    pub fn count_flag(&self, flag: Flag) -> usize {
        self.cells.iter().filter(|c| c.flag == flag).count()
    }
}

/// Derived integer score per cell (risk gain, explore gain).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreMap {
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<i32>,
}

impl ScoreMap {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![0; cols * rows],
        }
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> i32 {
        self.cells[x * self.rows + y]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, val: i32) {
        self.cells[x * self.rows + y] = val;
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|v| *v = 0);
    }
}

/// Pre-computed 3×3 kernels for all cells.
///
/// Each kernel is clipped to the grid and includes the centre cell itself,
/// so an interior cell has 9 entries.
pub struct KernelCache {
    pub cols: usize,
    pub rows: usize,
    /// Flat storage of all kernel pairs.
    data: Vec<(usize, usize)>,
    /// offsets[i] = start index in `data` for cell i.
    offsets: Vec<usize>,
}

impl KernelCache {
    /// Largest kernel an interior cell can have.
    pub const FULL: usize = 9;

    pub fn new(cols: usize, rows: usize) -> Self {
        let total = cols * rows;
        let mut data = Vec::with_capacity(total * Self::FULL);
        let mut offsets = Vec::with_capacity(total + 1);

        for x in 0..cols {
            for y in 0..rows {
                offsets.push(data.len());
                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx >= 0 && nx < cols as i32 && ny >= 0 && ny < rows as i32 {
                            data.push((nx as usize, ny as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            cols,
            rows,
            data,
            offsets,
        }
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> &[(usize, usize)] {
        let idx = x * self.rows + y;
        &self.data[self.offsets[idx]..self.offsets[idx + 1]]
    }
}
