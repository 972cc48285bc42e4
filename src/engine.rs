//! The knowledge engine: owns the grid and drives the pipeline.
//!
//! Every probe result flows through the same stages:
//! offset pass → knowledge pass → gain estimation → bomb deduction (which
//! restarts the stages while it keeps finding mines) → move selection.

use log::{debug, info};
use serde::Serialize;

use crate::config::{EngineConfig, Strategy};
use crate::deduction::find_certain_bomb;
use crate::error::EngineError;
use crate::gain::{estimate, Candidates};
use crate::propagate::propagate;
use crate::rng::SolverRng;
use crate::selector::{scan_order, select_risk_first, select_uniform};
use crate::types::{Cell, Flag, KernelCache, KnowledgeGrid, ProbeResult, ScoreMap, HIT_VALUE};

/// What the engine hands to the board once it stops playing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Report {
    /// Cells proven to be mines, as `(x, y)`.
    BombLocations(Vec<(usize, usize)>),
    /// Number of mines hit while probing.
    HitTally { hits: usize },
}

/// Result of feeding one probe result to the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// The next cell to probe.
    Next { x: usize, y: usize },
    /// The engine deactivated.
    Finished(Report),
}

/// Serializable view of the engine's knowledge, one entry per cell.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<CellView>,
    pub next_move: Option<(usize, usize)>,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub x: usize,
    pub y: usize,
    pub value: i32,
    pub flag: char,
    pub risk_gain: i32,
    pub explore_gain: i32,
}

pub struct Engine {
    strategy: Strategy,
    num_bombs: usize,
    end_game_on_bomb: bool,
    grid: KnowledgeGrid,
    kc: KernelCache,
    risk_gain: ScoreMap,
    explore_gain: ScoreMap,
    candidates: Candidates,
    scan_order: Vec<(usize, usize)>,
    rng: SolverRng,
    bombs: Vec<(usize, usize)>,
    hits: usize,
    next_move: Option<(usize, usize)>,
    active: bool,
    report: Option<Report>,
    deduction_rounds: usize,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let EngineConfig {
            rows,
            cols,
            safe,
            num_bombs,
            end_game_on_bomb,
            strategy,
            seed,
        } = config;

        let scan_order = if strategy.uses_scan_order() {
            scan_order(cols, rows)
        } else {
            Vec::new()
        };

        Ok(Self {
            strategy,
            num_bombs,
            end_game_on_bomb,
            grid: KnowledgeGrid::new(cols, rows, safe.0, safe.1),
            kc: KernelCache::new(cols, rows),
            risk_gain: ScoreMap::new(cols, rows),
            explore_gain: ScoreMap::new(cols, rows),
            candidates: Candidates::default(),
            scan_order,
            rng: SolverRng::from_optional_seed(seed),
            bombs: Vec::new(),
            hits: 0,
            next_move: Some(safe),
            active: true,
            report: None,
            deduction_rounds: 0,
        })
    }

    /// Integrate the result of probing `(x, y)` and pick the next probe.
    pub fn update(&mut self, x: usize, y: usize, result: ProbeResult) -> Result<Status, EngineError> {
        if !self.active {
            return Err(EngineError::Inactive);
        }
        if !self.grid.in_bounds(x, y) {
            return Err(EngineError::OutOfBounds {
                x,
                y,
                cols: self.grid.cols,
                rows: self.grid.rows,
            });
        }
        match self.grid.get(x, y).flag {
            Flag::Unknown | Flag::Safe => {}
            Flag::Mined | Flag::CertainBomb | Flag::Hit => {
                return Err(EngineError::AlreadyResolved { x, y });
            }
        }

        match result {
            ProbeResult::Mine if self.end_game_on_bomb => {
                info!("mine hit at ({x}|{y}), ending the game");
                return Ok(Status::Finished(self.finish()));
            }
            ProbeResult::Mine => {
                info!("mine hit at ({x}|{y})");
                self.grid.set(x, y, Cell { value: HIT_VALUE, flag: Flag::Hit });
                self.hits += 1;
            }
            ProbeResult::Count(count) => {
                self.grid.reveal(x, y, i32::from(count));
            }
        }

        Ok(self.run_pipeline())
    }

    /// Deactivate and report. Repeated calls return the same report.
    pub fn finalize(&mut self) -> Report {
        match &self.report {
            Some(report) => report.clone(),
            None => self.finish(),
        }
    }

    fn run_pipeline(&mut self) -> Status {
        self.deduction_rounds = 0;

        loop {
            self.refresh();

            if self.identified() >= self.num_bombs {
                info!("all {} mines accounted for", self.num_bombs);
                return Status::Finished(self.finish());
            }
            // Every round identifies one more mine, so the check above ends
            // the loop within `num_bombs` rounds; the bound makes it explicit.
            if !self.strategy.deduces_bombs() || self.deduction_rounds >= self.num_bombs {
                break;
            }

            let Some((x, y)) = find_certain_bomb(&self.grid, &self.explore_gain) else {
                break;
            };
            let value = self.grid.get(x, y).value;
            self.grid.set(x, y, Cell { value, flag: Flag::CertainBomb });
            self.bombs.push((x, y));
            self.deduction_rounds += 1;
            info!("mine deduced at ({x}|{y}), {} of {}", self.identified(), self.num_bombs);
        }

        let choice = match self.strategy {
            Strategy::RiskFirstWithSafetyBias => select_risk_first(&self.candidates, &mut self.rng),
            Strategy::UniformRiskRanking => select_uniform(
                &self.candidates,
                &self.explore_gain,
                &self.scan_order,
                &mut self.rng,
            ),
        };

        match choice {
            Some((x, y)) => {
                debug!("next move: ({x}|{y})");
                self.next_move = Some((x, y));
                Status::Next { x, y }
            }
            None => {
                info!("no candidate cells left");
                Status::Finished(self.finish())
            }
        }
    }

    /// Propagation and gain estimation, without deduction or selection.
    fn refresh(&mut self) {
        propagate(&mut self.grid, &self.kc);
        estimate(
            &self.grid,
            &self.kc,
            self.strategy,
            &mut self.risk_gain,
            &mut self.explore_gain,
            &mut self.candidates,
        );
        debug!("knowledge updated");
    }

    fn finish(&mut self) -> Report {
        self.active = false;
        self.next_move = None;
        let report = match self.strategy {
            Strategy::RiskFirstWithSafetyBias => Report::BombLocations(self.bombs.clone()),
            Strategy::UniformRiskRanking => Report::HitTally { hits: self.hits },
        };
        self.report = Some(report.clone());
        report
    }

    /// Deduced plus hit mines.
    pub fn identified(&self) -> usize {
        self.bombs.len() + self.hits
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn next_move(&self) -> Option<(usize, usize)> {
        self.next_move
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn num_bombs(&self) -> usize {
        self.num_bombs
    }

    pub fn bomb_locations(&self) -> &[(usize, usize)] {
        &self.bombs
    }

    pub fn bombs_hit(&self) -> usize {
        self.hits
    }

    /// Mines deduced by the fixed-point loop during the last update.
    pub fn deduction_rounds(&self) -> usize {
        self.deduction_rounds
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn grid(&self) -> &KnowledgeGrid {
        &self.grid
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.grid.in_bounds(x, y).then(|| self.grid.get(x, y))
    }

    pub fn risk_gain(&self) -> &ScoreMap {
        &self.risk_gain
    }

    pub fn explore_gain(&self) -> &ScoreMap {
        &self.explore_gain
    }

    pub fn kernel(&self, x: usize, y: usize) -> &[(usize, usize)] {
        self.kc.get(x, y)
    }

    pub fn snapshot(&self) -> Snapshot {
        let cells = self
            .grid
            .coords()
            .map(|(x, y)| {
                let cell = self.grid.get(x, y);
                CellView {
                    x,
                    y,
                    value: cell.value,
                    flag: cell.flag.code(),
                    risk_gain: self.risk_gain.get(x, y),
                    explore_gain: self.explore_gain.get(x, y),
                }
            })
            .collect();

        Snapshot {
            cols: self.grid.cols,
            rows: self.grid.rows,
            cells,
            next_move: self.next_move,
            active: self.active,
        }
    }
}
