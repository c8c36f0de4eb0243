//! Profile selector WASM bridge
//!
//! Exposes profsel-core's `parse` and `suggest` through a WASM-compatible
//! ABI for hosts that embed the engine as a plain WebAssembly module. No WASI
//! imports are needed; every export is pure computation over strings in
//! shared linear memory. Browser bindings live behind the `browser` feature.
//!
//! # Memory Protocol
//!
//! Strings cross the WASM boundary as (ptr, len) pairs in linear memory.
//! The host allocates via [`wasm_alloc`], writes bytes, calls the function,
//! reads the result, then frees via [`wasm_free`].
//!
//! Return values pack pointer and length into a single u64:
//! `(ptr << 32) | len`

#[cfg(feature = "browser")]
mod browser;

use profsel_core::{Query, Suggestion};
use serde::Serialize;
use std::alloc::{self, Layout};
use std::borrow::Cow;

// ============================================================================
// Memory management
// ============================================================================

/// Byte-aligned layout for a host buffer; `None` for empty or oversized ones
fn byte_layout(size: u32) -> Option<Layout> {
    match Layout::array::<u8>(size as usize) {
        Ok(layout) if layout.size() > 0 => Some(layout),
        _ => None,
    }
}

/// `(ptr << 32) | len`, the shape every string-returning export uses
fn pack(ptr: u32, len: u32) -> u64 {
    (u64::from(ptr) << 32) | u64::from(len)
}

/// Allocate `size` bytes in WASM linear memory. Returns a pointer, or 0 for
/// an empty or failed allocation. The host must call `wasm_free` to release.
#[no_mangle]
pub extern "C" fn wasm_alloc(size: u32) -> u32 {
    let Some(layout) = byte_layout(size) else {
        return 0;
    };
    unsafe { alloc::alloc(layout) as u32 }
}

/// Free a buffer previously allocated by `wasm_alloc` or returned by an
/// export function.
#[no_mangle]
pub extern "C" fn wasm_free(ptr: u32, size: u32) {
    if ptr == 0 {
        return;
    }
    if let Some(layout) = byte_layout(size) {
        unsafe { alloc::dealloc(ptr as *mut u8, layout) }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Read a string from WASM linear memory at (ptr, len).
unsafe fn read_str(ptr: u32, len: u32) -> Cow<'static, str> {
    if ptr == 0 || len == 0 {
        return Cow::Borrowed("");
    }
    decode(std::slice::from_raw_parts(ptr as *const u8, len as usize))
}

/// Invalid UTF-8 is replaced rather than trusted; the selector grammar
/// rejects the replacement character anyway.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Copy `s` into a fresh host-owned buffer. Returns 0 when nothing could be
/// written; otherwise the host frees the buffer via `wasm_free`.
fn write_result(s: &str) -> u64 {
    let Ok(len) = u32::try_from(s.len()) else {
        return 0;
    };
    let ptr = wasm_alloc(len);
    if ptr == 0 {
        return 0;
    }
    let dst = unsafe { std::slice::from_raw_parts_mut(ptr as *mut u8, s.len()) };
    dst.copy_from_slice(s.as_bytes());
    pack(ptr, len)
}

/// `{"error":"..."}` with the message properly escaped
pub fn error_json(msg: &str) -> String {
    serde_json::json!({ "error": msg }).to_string()
}

fn to_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => error_json(&format!("serialization failed: {}", e)),
    }
}

// ============================================================================
// JSON entry points (shared by the raw ABI and the browser bindings)
// ============================================================================

/// Parsed query as it crosses the boundary
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseResponse<'a> {
    profile_name: &'a str,
    #[serde(flatten)]
    query: &'a Query,
    selector: String,
}

/// Parse a selector to JSON:
/// `{"profileName":"cpu","matchers":[..],"rawTrailingMatcherText":"","selector":"cpu{..}"}`
pub fn parse_json(input: &str) -> String {
    let query = Query::parse(input);
    to_json(&ParseResponse {
        profile_name: query.profile_name(),
        query: &query,
        selector: query.to_string(),
    })
}

/// Suggestions for `input` as a JSON array:
/// `[{"type":"literal","value":"{"},{"type":"profileName","typeahead":""}]`
pub fn suggest_json(input: &str) -> String {
    let suggestions: Vec<Suggestion> = Query::suggest(input);
    to_json(&suggestions)
}

// ============================================================================
// Version info
// ============================================================================

/// Get the bridge version. Returns a packed u64 (ptr << 32 | len) pointing
/// to a string such as "0.1.0".
#[no_mangle]
pub extern "C" fn profsel_version() -> u64 {
    write_result(env!("CARGO_PKG_VERSION"))
}

// ============================================================================
// Parser
// ============================================================================

/// Parse a selector. Takes (ptr, len) pointing to the input in WASM memory
/// and returns a packed u64 pointing to the JSON produced by [`parse_json`].
#[no_mangle]
pub extern "C" fn parse_selector(ptr: u32, len: u32) -> u64 {
    let input = unsafe { read_str(ptr, len) };
    write_result(&parse_json(&input))
}

/// Suggest continuations. Takes (ptr, len) pointing to the input in WASM
/// memory and returns a packed u64 pointing to the JSON produced by
/// [`suggest_json`].
#[no_mangle]
pub extern "C" fn suggest_selector(ptr: u32, len: u32) -> u64 {
    let input = unsafe { read_str(ptr, len) };
    write_result(&suggest_json(&input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn parse_value(input: &str) -> Value {
        serde_json::from_str(&parse_json(input)).unwrap()
    }

    #[test]
    fn test_parse_json_complete() {
        assert_eq!(
            parse_value(r#"cpu{job="api"}"#),
            json!({
                "profileName": "cpu",
                "matchers": [
                    {"key": "__name__", "operator": "=", "value": "cpu"},
                    {"key": "job", "operator": "=", "value": "api"}
                ],
                "rawTrailingMatcherText": "",
                "selector": r#"cpu{job="api"}"#
            })
        );
    }

    #[test]
    fn test_parse_json_partial() {
        let value = parse_value(r#"cpu{job="ap"#);
        assert_eq!(value["profileName"], "cpu");
        assert_eq!(value["rawTrailingMatcherText"], r#"{job="ap"#);
        assert_eq!(value["selector"], r#"cpu{job="ap}"#);
    }

    #[test]
    fn test_suggest_json() {
        assert_eq!(
            suggest_json(""),
            r#"[{"type":"literal","value":"{"},{"type":"profileName","typeahead":""}]"#
        );
        assert_eq!(suggest_json("{}x"), "[]");
    }

    #[test]
    fn test_error_json_escapes() {
        let value: Value = serde_json::from_str(&error_json(r#"bad "quote" \ here"#)).unwrap();
        assert_eq!(value["error"], r#"bad "quote" \ here"#);
    }

    #[test]
    fn test_byte_layout() {
        assert!(byte_layout(0).is_none());
        let layout = byte_layout(17).unwrap();
        assert_eq!(layout.size(), 17);
        assert_eq!(layout.align(), 1);
    }

    #[test]
    fn test_pack() {
        assert_eq!(pack(0x10, 3), 0x0000_0010_0000_0003);
        assert_eq!(pack(u32::MAX, u32::MAX) >> 32, u64::from(u32::MAX));
    }

    #[test]
    fn test_decode_is_lossy() {
        let input = decode(b"cpu{\xffa");
        assert_eq!(input, "cpu{\u{fffd}a");
        // the replacement char stops the lexer; the profile name survives
        assert_eq!(Query::parse(&input).profile_name(), "cpu");
    }
}
