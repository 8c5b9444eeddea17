use seatmarket_core::{Density, SeatError, SeatField, SortMode};
use seatmarket_store::SeatStore;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::storage::BrowserStorage;

/// Seat board engine exposed to JavaScript.
///
/// The page renders whatever this engine reports and routes every user
/// intent through it. PIN prompts and confirmations stay on the JS side:
/// callers check `requiresPin()` and pass the collected PIN along.
#[wasm_bindgen]
pub struct SeatMarketEngine {
    store: SeatStore<BrowserStorage>,
}

/// Structured error object for JavaScript
#[derive(Serialize)]
pub struct JsSeatError {
    code: String,
    message: String,
}

impl From<SeatError> for JsSeatError {
    fn from(err: SeatError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

fn to_js_error(err: SeatError) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&format!("[SeatMarket] {}", err).into());

    let js_error = JsSeatError::from(err);
    serde_wasm_bindgen::to_value(&js_error).unwrap_or(JsValue::NULL)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Settings snapshot for the settings panel
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsData {
    pub pin: String,
    pub locked: bool,
    pub board_top: bool,
    pub density: Density,
    pub wrap: bool,
    pub seat_min_height: u32,
}

impl Default for SeatMarketEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SeatMarketEngine {
    /// Create an engine backed by `localStorage`
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_storage(BrowserStorage::local())
    }

    // --- Reads ---

    /// All 24 seats as a JSON array, in board order
    #[wasm_bindgen(js_name = getSeats)]
    pub fn get_seats(&self) -> String {
        to_json(self.store.seats())
    }

    /// One seat as JSON, or `null`
    #[wasm_bindgen(js_name = getSeat)]
    pub fn get_seat(&self, id: u32) -> String {
        to_json(&self.store.seats().get(id))
    }

    /// Grid layout: 3 blocks of 4 rows of 2 seats
    #[wasm_bindgen(js_name = getBlocks)]
    pub fn get_blocks(&self) -> String {
        to_json(&self.store.seats().blocks())
    }

    /// Filtered and sorted seats as a JSON array.
    /// `sort` is one of "label", "priceDesc", "priceAsc", "vacant".
    #[wasm_bindgen(js_name = getView)]
    pub fn get_view(&self, query: &str, sort: &str) -> Result<String, JsValue> {
        self.view_json(query, sort).map_err(to_js_error)
    }

    /// `{ totalPrice, averagePrice, topSeat }` over the whole board
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> String {
        to_json(&self.store.stats())
    }

    // --- Mutations ---

    /// Whether edits and imports currently need a PIN
    #[wasm_bindgen(js_name = requiresPin)]
    pub fn requires_pin(&self) -> bool {
        self.store.edit_gate().requires_pin()
    }

    /// Edit one field of one seat from raw form input.
    /// `field` is one of "owner", "tenant", "price", "rentFee".
    #[wasm_bindgen(js_name = updateField)]
    pub fn update_field(
        &mut self,
        id: u32,
        field: &str,
        value: &str,
        pin: Option<String>,
    ) -> Result<(), JsValue> {
        self.edit(id, field, value, pin.as_deref())
            .map_err(to_js_error)
    }

    /// Reset the board to defaults. Pass the user's answer to the confirmation dialog.
    #[wasm_bindgen(js_name = resetAll)]
    pub fn reset_all(&mut self, confirmed: bool) -> Result<(), JsValue> {
        self.store.reset_all(|| confirmed).map_err(to_js_error)
    }

    /// Undo the last change; returns its description
    #[wasm_bindgen]
    pub fn undo(&mut self) -> Result<String, JsValue> {
        self.store.undo().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    #[wasm_bindgen(js_name = undoCount)]
    pub fn undo_count(&self) -> usize {
        self.store.undo_count()
    }

    // --- Import / Export ---

    /// Pretty-printed JSON of the board
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.store.export_collection().map_err(to_js_error)
    }

    /// Replace the board with pasted JSON
    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, text: &str, pin: Option<String>) -> Result<(), JsValue> {
        self.store
            .import_json(text, pin.as_deref())
            .map_err(to_js_error)
    }

    // --- Settings ---

    #[wasm_bindgen(js_name = getSettings)]
    pub fn get_settings(&self) -> String {
        to_json(&self.settings_data())
    }

    #[wasm_bindgen(js_name = setPin)]
    pub fn set_pin(&mut self, pin: &str) {
        self.store.set_pin(pin);
    }

    #[wasm_bindgen(js_name = setLocked)]
    pub fn set_locked(&mut self, locked: bool) {
        self.store.set_locked(locked);
    }

    #[wasm_bindgen(js_name = setBoardTop)]
    pub fn set_board_top(&mut self, board_top: bool) {
        self.store.set_board_top(board_top);
    }

    /// Flip the blackboard between top and bottom; returns the new position
    #[wasm_bindgen(js_name = toggleBoardPosition)]
    pub fn toggle_board_position(&mut self) -> bool {
        self.store.toggle_board_position()
    }

    /// `density` is one of "small", "medium", "large"
    #[wasm_bindgen(js_name = setDensity)]
    pub fn set_density(&mut self, density: &str) -> Result<(), JsValue> {
        let density: Density = density.parse().map_err(to_js_error)?;
        self.store.set_density(density);
        Ok(())
    }

    #[wasm_bindgen(js_name = setWrap)]
    pub fn set_wrap(&mut self, wrap: bool) {
        self.store.set_wrap(wrap);
    }

    /// Minimum seat cell height in pixels for the current density and wrap mode
    #[wasm_bindgen(js_name = seatMinHeight)]
    pub fn seat_min_height(&self) -> u32 {
        let settings = self.store.settings();
        settings.density.seat_min_height(settings.wrap)
    }
}

impl SeatMarketEngine {
    pub fn with_storage(storage: BrowserStorage) -> Self {
        Self {
            store: SeatStore::open(storage),
        }
    }

    fn view_json(&self, query: &str, sort: &str) -> Result<String, SeatError> {
        let sort: SortMode = sort.parse()?;
        Ok(to_json(&self.store.view(query, sort)))
    }

    fn edit(&mut self, id: u32, field: &str, value: &str, pin: Option<&str>) -> Result<(), SeatError> {
        let field: SeatField = field.parse()?;
        self.store.edit_field(id, field, value, pin)
    }

    fn settings_data(&self) -> SettingsData {
        let settings = self.store.settings();
        SettingsData {
            pin: settings.pin.clone(),
            locked: settings.locked,
            board_top: settings.board_top,
            density: settings.density,
            wrap: settings.wrap,
            seat_min_height: settings.density.seat_min_height(settings.wrap),
        }
    }
}
