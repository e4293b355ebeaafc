pub mod completions;
pub mod create;
pub mod doctor;
pub mod inspect;
pub mod ls;
pub mod man_pages;

use nerdnet_store::Provenance;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_STORE_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn colorize_kind(kind: Provenance) -> String {
    use console::Style;
    let text = kind.to_string();
    match kind {
        Provenance::Builtin => Style::new().cyan().apply_to(text).to_string(),
        Provenance::Managed => Style::new().green().apply_to(text).to_string(),
        Provenance::External => Style::new().yellow().apply_to(text).to_string(),
    }
}
