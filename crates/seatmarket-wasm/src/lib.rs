mod api;
mod storage;

pub use api::SeatMarketEngine;
pub use storage::BrowserStorage;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Format an amount for display, e.g. `50000` -> `"50,000원"`
#[wasm_bindgen(js_name = formatPrice)]
pub fn format_price(amount: f64) -> String {
    seatmarket_core::format_price(amount)
}
