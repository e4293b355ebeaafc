use super::{colorize_kind, json_pretty, EXIT_SUCCESS};
use std::path::Path;

pub fn run(netconf: &Path, json: bool) -> Result<u8, String> {
    let networks = nerdnet_store::list(netconf).map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&networks)?);
        return Ok(EXIT_SUCCESS);
    }

    let width = networks
        .iter()
        .map(|n| n.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len())
        + 4;
    println!("{:<width$}KIND", "NAME");
    for net in &networks {
        println!("{:<width$}{}", net.name, colorize_kind(net.kind));
    }
    Ok(EXIT_SUCCESS)
}
