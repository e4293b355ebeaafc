use super::EXIT_SUCCESS;
use nerdnet_store::NativeNetwork;
use serde::Serialize;
use std::path::Path;

pub fn run(netconf: &Path, names: &[String]) -> Result<u8, String> {
    let found = nerdnet_store::inspect(netconf, names).map_err(|e| e.to_string())?;
    let result = found
        .iter()
        .map(NativeNetwork::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    println!("{}", to_json_indent4(&result)?);
    Ok(EXIT_SUCCESS)
}

/// Inspect output is indented with four spaces, unlike the rest of the CLI.
fn to_json_indent4(value: &impl Serialize) -> Result<String, String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| format!("JSON serialization failed: {e}"))?;
    String::from_utf8(buf).map_err(|e| format!("JSON serialization failed: {e}"))
}
