use super::{json_pretty, EXIT_SUCCESS};
use std::path::Path;

pub fn run(netconf: &Path, name: &str, subnet: &str, json: bool) -> Result<u8, String> {
    let created = nerdnet_store::create(netconf, name, subnet).map_err(|e| e.to_string())?;
    if json {
        let payload = serde_json::json!({
            "status": "created",
            "name": name,
            "file": created.path,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("created network '{name}' at {}", created.path.display());
    }
    Ok(EXIT_SUCCESS)
}
