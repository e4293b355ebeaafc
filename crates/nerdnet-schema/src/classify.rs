//! Managed versus external classification of configuration lists.

use serde_json::Value;

/// Top-level field that marks a configuration list as written by nerdnet.
///
/// The key predates this tool and is kept so that lists generated by
/// nerdctl are recognized as managed.
pub const MARKER_FIELD: &str = "nerdctl";

/// Returns `true` when the configuration list is managed outside nerdnet.
///
/// Only a body that parses as a JSON object with `"nerdctl": true` counts as
/// managed. Unparseable input, a missing marker, `false`, or a non-boolean
/// value all classify as external.
pub fn is_external(bytes: &[u8]) -> bool {
    let Ok(value) = serde_json::from_slice::<Value>(bytes) else {
        return true;
    };
    value.get(MARKER_FIELD).and_then(Value::as_bool) != Some(true)
}
