//! Browser WASM bindings using wasm-bindgen
//!
//! Same JSON contract as the raw ABI in the crate root, but passed as
//! JavaScript strings instead of (ptr, len) pairs.

use wasm_bindgen::prelude::*;

/// Route Rust panics to console.error instead of "RuntimeError: unreachable".
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Parse a selector. Returns the JSON described by [`crate::parse_json`].
#[wasm_bindgen]
pub fn parse_query(input: &str) -> String {
    crate::parse_json(input)
}

/// Suggest continuations for the text typed so far.
///
/// Returns: `[{"type":"literal","value":"{"},{"type":"profileName","typeahead":""}]`
#[wasm_bindgen]
pub fn suggest_query(input: &str) -> String {
    crate::suggest_json(input)
}

/// Get the bridge version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
