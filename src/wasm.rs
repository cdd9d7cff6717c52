//! WASM bindings for gobblet-engine
//!
//! The browser page wires its buttons and cells to these calls and redraws
//! from `snapshot()`. Colors and sizes travel as lowercase names
//! ("black", "large").

use wasm_bindgen::prelude::*;

use crate::{Color, EngineError, Event, GameConfig, GameEngine, Pos, Size};

/// WASM-friendly wrapper around GameEngine
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameEngine,
    message: String,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a standard game
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame::from_engine(GameEngine::new())
    }

    /// Create a game from a config object, e.g. `{ starting_reserve: { large: 1 } }`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<WasmGame, JsError> {
        let config: GameConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(WasmGame::from_engine(GameEngine::with_config(config)))
    }

    /// Select a piece. Returns true if successful.
    #[wasm_bindgen(js_name = selectPiece)]
    pub fn select_piece(&mut self, color: &str, size: &str) -> bool {
        let parsed = color
            .parse::<Color>()
            .and_then(|color| size.parse::<Size>().map(|size| (color, size)));
        match parsed {
            Ok((color, size)) => {
                let result = self.inner.select_piece(color, size);
                self.report(result)
            }
            Err(e) => {
                self.message = e.to_string();
                false
            }
        }
    }

    /// Place the selected piece on cell 0-8. Returns true if successful.
    #[wasm_bindgen(js_name = placePiece)]
    pub fn place_piece(&mut self, index: u8) -> bool {
        let pos = Pos(index);
        if !pos.is_valid() {
            self.message = format!("No cell {index} on the board.");
            return false;
        }
        let result = self.inner.place_piece(pos);
        self.report(result)
    }

    /// Undo the last placement. Returns true if successful.
    pub fn undo(&mut self) -> bool {
        let result = self.inner.undo_last();
        self.report(result)
    }

    pub fn reset(&mut self) {
        let event = self.inner.reset();
        self.message = event.to_string();
    }

    /// Status line for the last call
    pub fn message(&self) -> String {
        self.message.clone()
    }

    /// Current player ("black" or "white")
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> String {
        self.inner.current_player().name().to_string()
    }

    /// Winner name, or undefined while the game is active
    pub fn winner(&self) -> Option<String> {
        self.inner.status().winner().map(|c| c.name().to_string())
    }

    /// Board, status, inventory and selection as a plain JS object
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.snapshot())?)
    }
}

impl WasmGame {
    fn from_engine(inner: GameEngine) -> WasmGame {
        let message = format!("New game, {} moves first.", inner.current_player());
        WasmGame { inner, message }
    }

    fn report(&mut self, result: Result<Event, EngineError>) -> bool {
        match result {
            Ok(event) => {
                self.message = event.to_string();
                true
            }
            Err(e) => {
                self.message = e.to_string();
                false
            }
        }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
