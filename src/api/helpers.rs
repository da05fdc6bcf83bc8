//! Shared helpers for WASM API operations
//!
//! Serialization to and from JavaScript values, and error conversion. Every error
//! that crosses into JavaScript is logged first.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| js_error(format!("{}: {}", error_context, e)))
}

/// Serialize a value to a plain JavaScript object
///
/// Uses the JSON-compatible serializer so `None` becomes `null` (the sparse
/// signature array keeps its holes) and maps become objects.
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| js_error(format!("{}: {}", error_context, e)))
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Log `msg` and wrap it for JavaScript
pub fn js_error(msg: impl Into<String>) -> JsValue {
    let msg = msg.into();
    log::error!("{}", msg);
    JsValue::from_str(&msg)
}

/// Validate a `num/den` pair coming from JavaScript
pub fn validate_fraction(num: i32, den: i32) -> Result<(), String> {
    if den == 0 {
        return Err(format!("Invalid fraction {}/{}: zero denominator", num, den));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_fraction() {
        assert!(validate_fraction(3, 4).is_ok());
        assert!(validate_fraction(-1, -8).is_ok());
        assert!(validate_fraction(1, 0).is_err());
    }
}
