//! Knowledge-map Minesweeper AI.
//!
//! The engine never sees the mines. It is told the grid size, the mine
//! count and one safe cell, then fed probe results one at a time; after each
//! it propagates risk over 3×3 kernels, deduces mines where local counting
//! proves them, and recommends the next cell to probe.
//!
//! Grid data is stored flat in column-major layout: `cells[x * rows + y]`.

pub mod board;
pub mod config;
pub mod deduction;
pub mod engine;
pub mod error;
pub mod gain;
pub mod game;
pub mod propagate;
pub mod rng;
pub mod selector;
pub mod types;

pub use board::{Board, BoardDescription, Score};
pub use config::{EngineConfig, Strategy};
pub use engine::{Engine, Report, Status};
pub use error::{BoardError, EngineError, GameError};
pub use types::{Cell, Flag, ProbeResult};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;

    use crate::board::{self, Board};
    use crate::config::{EngineConfig, Strategy};
    use crate::engine::{Engine, Status};
    use crate::game;
    use crate::types::ProbeResult;

    fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
    }

    fn js_error(err: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    /// One engine instance, owned by the JS side.
    #[wasm_bindgen(js_name = "Engine")]
    pub struct WasmEngine {
        inner: Engine,
    }

    #[wasm_bindgen(js_class = "Engine")]
    impl WasmEngine {
        /// `config`: `{ rows, cols, safe: [x, y], numBombs, endGameOnBomb?, strategy?, seed? }`
        #[wasm_bindgen(constructor)]
        pub fn new(config: JsValue) -> Result<WasmEngine, JsValue> {
            let config: EngineConfig = serde_wasm_bindgen::from_value(config)?;
            let inner = Engine::new(config).map_err(js_error)?;
            Ok(Self { inner })
        }

        /// Feed a probe result (0-8, or 9 for a mine).
        /// Returns `{ x, y }` for the next probe or `{ finished: report }`.
        pub fn update(&mut self, x: usize, y: usize, value: u8) -> Result<JsValue, JsValue> {
            let result = ProbeResult::from_digit(value)
                .ok_or_else(|| js_error(format!("invalid probe value {value}")))?;
            let obj = js_sys::Object::new();
            match self.inner.update(x, y, result).map_err(js_error)? {
                Status::Next { x, y } => {
                    js_sys::Reflect::set(&obj, &"x".into(), &(x as u32).into())?;
                    js_sys::Reflect::set(&obj, &"y".into(), &(y as u32).into())?;
                }
                Status::Finished(report) => {
                    js_sys::Reflect::set(&obj, &"finished".into(), &to_js(&report)?)?;
                }
            }
            Ok(obj.into())
        }

        /// Next recommended `[x, y]`, or `null` once the engine has stopped.
        #[wasm_bindgen(js_name = "nextMove")]
        pub fn next_move(&self) -> Result<JsValue, JsValue> {
            to_js(&self.inner.next_move())
        }

        /// Heat-map view of every cell for rendering.
        pub fn snapshot(&self) -> Result<JsValue, JsValue> {
            to_js(&self.inner.snapshot())
        }

        pub fn finalize(&mut self) -> Result<JsValue, JsValue> {
            to_js(&self.inner.finalize())
        }

        #[wasm_bindgen(js_name = "isActive")]
        pub fn is_active(&self) -> bool {
            self.inner.is_active()
        }
    }

    /// Play a JSON fixture board to the end and return the game summary.
    #[wasm_bindgen(js_name = "playBoard")]
    pub fn wasm_play_board(
        json: &str,
        uniform: bool,
        end_game_on_bomb: bool,
        seed: Option<u64>,
    ) -> Result<JsValue, JsValue> {
        let mut board = Board::from_json(json).map_err(js_error)?;
        board.end_game_on_bomb = end_game_on_bomb;

        let mut config = board.engine_config();
        if uniform {
            config = config.with_strategy(Strategy::UniformRiskRanking);
        }
        config.seed = seed;

        let max_moves = board.cols * board.rows;
        let mut engine = Engine::new(config).map_err(js_error)?;
        let summary = game::play(&mut board, &mut engine, max_moves).map_err(js_error)?;
        to_js(&summary)
    }

    /// Adjacency counts for a column-major 0/1 mine layout (mines become 9).
    #[wasm_bindgen(js_name = "calculateNumbers")]
    pub fn wasm_calculate_numbers(
        cols: usize,
        rows: usize,
        mines_flat: &[u8],
    ) -> Result<js_sys::Uint8Array, JsValue> {
        let values = board::numbers_for_layout(cols, rows, mines_flat).map_err(js_error)?;

        let arr = js_sys::Uint8Array::new_with_length(values.len() as u32);
        arr.copy_from(&values);
        Ok(arr)
    }
}
