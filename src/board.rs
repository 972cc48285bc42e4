//! The authoritative board the engine plays against.
//!
//! Boards are decoded from the JSON fixture format or generated randomly
//! with a mine-free zone around the start. The board answers probes and
//! scores the engine's final report.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::Report;
use crate::error::BoardError;
use crate::rng::SolverRng;
use crate::types::{KernelCache, ProbeResult};

/// Fixture digit marking a mine.
pub const MINE: u8 = 9;

/// Serialized board: `dim` is `"rows,cols"`, `safe` is `"row,col"` and
/// `board` holds one digit per cell in reading order (9 = mine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDescription {
    pub dim: String,
    pub safe: String,
    pub bombs: usize,
    pub board: String,
}

impl BoardDescription {
    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, BoardError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Outcome of checking a report against the real mine layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Correctly identified mines (or mines hit, for a tally).
    pub correct: usize,
    /// Mines on the board.
    pub total: usize,
    /// Cells the report claimed.
    pub guessed: usize,
    pub won: bool,
}

pub struct Board {
    pub cols: usize,
    pub rows: usize,
    /// Column-major: 0-8 adjacency counts, 9 = mine.
    values: Vec<u8>,
    safe: (usize, usize),
    num_bombs: usize,
    pub end_game_on_bomb: bool,
    visited: Vec<bool>,
    accesses: usize,
    active: bool,
}

impl Board {
    fn with_values(cols: usize, rows: usize, values: Vec<u8>, safe: (usize, usize)) -> Self {
        let num_bombs = values.iter().filter(|&&v| v == MINE).count();
        Self {
            cols,
            rows,
            values,
            safe,
            num_bombs,
            end_game_on_bomb: false,
            visited: vec![false; cols * rows],
            accesses: 0,
            active: true,
        }
    }

    /// Build a board from explicit mine coordinates.
    pub fn from_mines(
        cols: usize,
        rows: usize,
        mines: &[(usize, usize)],
        safe: (usize, usize),
    ) -> Result<Self, BoardError> {
        let mut layout = vec![false; cols * rows];
        for &(x, y) in mines {
            if x >= cols || y >= rows {
                return Err(BoardError::OutOfBounds { x, y });
            }
            layout[x * rows + y] = true;
        }
        if safe.0 >= cols || safe.1 >= rows || layout[safe.0 * rows + safe.1] {
            return Err(BoardError::Invalid(format!("safe cell {safe:?} is not a free cell")));
        }
        let values = calculate_numbers(cols, rows, &layout);
        Ok(Self::with_values(cols, rows, values, safe))
    }

    pub fn from_description(desc: &BoardDescription) -> Result<Self, BoardError> {
        let (rows, cols) = parse_pair(&desc.dim, "dim")?;
        let (safe_row, safe_col) = parse_pair(&desc.safe, "safe")?;

        let digits: Vec<u8> = desc
            .board
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|d| d as u8)
                    .ok_or_else(|| BoardError::Invalid(format!("unexpected cell character {c:?}")))
            })
            .collect::<Result<_, _>>()?;
        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| BoardError::Invalid(format!("board size {rows}x{cols} overflows")))?;
        if digits.len() != len {
            return Err(BoardError::Invalid(format!(
                "expected {len} cells for a {rows}x{cols} board, found {}",
                digits.len()
            )));
        }

        // Fixture is row-major; storage is column-major.
        let mut values = vec![0; len];
        for y in 0..rows {
            for x in 0..cols {
                values[x * rows + y] = digits[y * cols + x];
            }
        }

        if safe_col >= cols || safe_row >= rows || values[safe_col * rows + safe_row] == MINE {
            return Err(BoardError::Invalid(format!(
                "safe cell ({safe_col}, {safe_row}) is not a free cell"
            )));
        }

        let layout: Vec<bool> = values.iter().map(|&v| v == MINE).collect();
        if calculate_numbers(cols, rows, &layout) != values {
            return Err(BoardError::Invalid("adjacency counts do not match the mines".to_string()));
        }

        let board = Self::with_values(cols, rows, values, (safe_col, safe_row));
        if board.num_bombs != desc.bombs {
            return Err(BoardError::Invalid(format!(
                "description claims {} mines but the board holds {}",
                desc.bombs, board.num_bombs
            )));
        }
        Ok(board)
    }

    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        Self::from_description(&BoardDescription::from_json(json)?)
    }

    /// Random board with no mine within `safe_radius` of `safe`.
    pub fn random(
        cols: usize,
        rows: usize,
        bomb_count: usize,
        safe: (usize, usize),
        safe_radius: usize,
        rng: &mut SolverRng,
    ) -> Self {
        let layout = place_mines_random(cols, rows, bomb_count, safe, safe_radius, rng);
        let values = calculate_numbers(cols, rows, &layout);
        Self::with_values(cols, rows, values, safe)
    }

    pub fn to_description(&self) -> BoardDescription {
        let mut board = String::with_capacity(self.cols * self.rows);
        for y in 0..self.rows {
            for x in 0..self.cols {
                board.push(char::from(b'0' + self.value(x, y)));
            }
        }
        BoardDescription {
            dim: format!("{},{}", self.rows, self.cols),
            safe: format!("{},{}", self.safe.1, self.safe.0),
            bombs: self.num_bombs,
            board,
        }
    }

    /// Configuration handed to an engine playing this board.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.cols, self.rows, self.safe, self.num_bombs)
            .with_end_game_on_bomb(self.end_game_on_bomb)
    }

    /// Reveal a cell.
    pub fn probe(&mut self, x: usize, y: usize) -> Result<ProbeResult, BoardError> {
        if !self.active {
            return Err(BoardError::Inactive);
        }
        if x >= self.cols || y >= self.rows {
            return Err(BoardError::OutOfBounds { x, y });
        }
        let idx = x * self.rows + y;
        if self.visited[idx] {
            return Err(BoardError::AlreadyProbed { x, y });
        }

        self.visited[idx] = true;
        self.accesses += 1;

        let value = self.values[idx];
        let result = if value == MINE {
            if self.end_game_on_bomb {
                self.active = false;
            }
            ProbeResult::Mine
        } else {
            ProbeResult::Count(value)
        };

        if self.accesses == self.cols * self.rows {
            self.active = false;
        }
        Ok(result)
    }

    /// Score the engine's report and close the board.
    pub fn verify(&mut self, report: &Report) -> Score {
        self.active = false;
        match report {
            Report::BombLocations(cells) => {
                let correct = cells
                    .iter()
                    .filter(|&&(x, y)| x < self.cols && y < self.rows && self.is_mine(x, y))
                    .count();
                Score {
                    correct,
                    total: self.num_bombs,
                    guessed: cells.len(),
                    won: correct == self.num_bombs && cells.len() == self.num_bombs,
                }
            }
            Report::HitTally { hits } => Score {
                correct: *hits,
                total: self.num_bombs,
                guessed: *hits,
                won: *hits == self.num_bombs,
            },
        }
    }

    #[inline(always)]
    pub fn value(&self, x: usize, y: usize) -> u8 {
        self.values[x * self.rows + y]
    }

    #[inline(always)]
    pub fn is_mine(&self, x: usize, y: usize) -> bool {
        self.value(x, y) == MINE
    }

    pub fn safe(&self) -> (usize, usize) {
        self.safe
    }

    pub fn num_bombs(&self) -> usize {
        self.num_bombs
    }

    pub fn accesses(&self) -> usize {
        self.accesses
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn was_probed(&self, x: usize, y: usize) -> bool {
        self.visited[x * self.rows + y]
    }
}

fn parse_pair(text: &str, field: &str) -> Result<(usize, usize), BoardError> {
    let invalid = || BoardError::Invalid(format!("{field} must look like \"a,b\", got {text:?}"));
    let (a, b) = text.split_once(',').ok_or_else(invalid)?;
    let a = a.trim().parse().map_err(|_| invalid())?;
    let b = b.trim().parse().map_err(|_| invalid())?;
    Ok((a, b))
}

/// Place mines randomly with a safe zone exclusion.
///
/// Cells within `safe_radius` (Chebyshev distance) of `safe` never get a
/// mine. Returns a column-major layout.
pub fn place_mines_random(
    cols: usize,
    rows: usize,
    bomb_count: usize,
    safe: (usize, usize),
    safe_radius: usize,
    rng: &mut SolverRng,
) -> Vec<bool> {
    let mut layout = vec![false; cols * rows];
    let mut placed = 0;
    let mut attempts = 0;
    let max_placement_attempts = 100_000;

    while placed < bomb_count && attempts < max_placement_attempts {
        attempts += 1;
        let x = rng.gen_range(cols);
        let y = rng.gen_range(rows);

        if x.abs_diff(safe.0) <= safe_radius && y.abs_diff(safe.1) <= safe_radius {
            continue;
        }

        let idx = x * rows + y;
        if !layout[idx] {
            layout[idx] = true;
            placed += 1;
        }
    }

    layout
}

/// Adjacency counts for a flat column-major layout where any non-zero byte
/// is a mine.
pub fn numbers_for_layout(cols: usize, rows: usize, mines_flat: &[u8]) -> Result<Vec<u8>, BoardError> {
    if cols.checked_mul(rows) != Some(mines_flat.len()) {
        return Err(BoardError::Invalid(format!(
            "expected {cols}x{rows} cells, found {}",
            mines_flat.len()
        )));
    }
    let layout: Vec<bool> = mines_flat.iter().map(|&m| m != 0).collect();
    Ok(calculate_numbers(cols, rows, &layout))
}

/// Adjacency counts for every free cell; mines get `MINE`.
pub fn calculate_numbers(cols: usize, rows: usize, layout: &[bool]) -> Vec<u8> {
    let kc = KernelCache::new(cols, rows);
    let mut values = vec![0; cols * rows];

    for x in 0..cols {
        for y in 0..rows {
            let idx = x * rows + y;
            if layout[idx] {
                values[idx] = MINE;
                continue;
            }
            values[idx] = kc
                .get(x, y)
                .iter()
                .filter(|&&(nx, ny)| layout[nx * rows + ny])
                .count() as u8;
        }
    }

    values
}
