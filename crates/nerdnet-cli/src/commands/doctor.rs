use super::{EXIT_FAILURE, EXIT_SUCCESS};
use nerdnet_store::{resolve, DirLock, NetConfDir, NetworkDescriptor};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

pub fn run(netconf: &Path, cni_path: &Path, json_output: bool) -> Result<u8, String> {
    let mut checks: Vec<Check> = Vec::new();
    let mut all_pass = true;

    if netconf.is_dir() {
        checks.push(Check::pass(
            "netconf_exists",
            &format!("Configuration directory {} exists", netconf.display()),
        ));
        check_lock(&NetConfDir::new(netconf), &mut checks);
    } else {
        checks.push(Check::info(
            "netconf_exists",
            &format!(
                "{} does not exist (will be created on first create)",
                netconf.display()
            ),
        ));
    }

    match resolve(netconf) {
        Ok(networks) => {
            checks.push(Check::pass(
                "netconf_parse",
                &format!("{} networks resolved", networks.len()),
            ));
            check_duplicates(&networks, &mut checks);
            check_plugins(&networks, cni_path, &mut checks, &mut all_pass);
        }
        Err(e) => {
            all_pass = false;
            checks.push(Check::fail("netconf_parse", &e.to_string()));
        }
    }

    print_results(&checks, all_pass, json_output)
}

fn check_lock(dir: &NetConfDir, checks: &mut Vec<Check>) {
    match DirLock::try_acquire(dir.root()) {
        Ok(Some(_)) => checks.push(Check::pass("netconf_lock", "Directory lock is free")),
        Ok(None) => checks.push(Check::warn(
            "netconf_lock",
            "Directory lock is held by another process",
        )),
        Err(e) => checks.push(Check::warn(
            "netconf_lock",
            &format!("Cannot check directory lock: {e}"),
        )),
    }
}

fn check_duplicates(networks: &[NetworkDescriptor], checks: &mut Vec<Check>) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for n in networks {
        *counts.entry(n.name()).or_default() += 1;
    }
    let dups: Vec<&str> = counts
        .into_iter()
        .filter(|(_, c)| *c > 1)
        .map(|(name, _)| name)
        .collect();
    if dups.is_empty() {
        checks.push(Check::pass("unique_names", "Network names are unique"));
    } else {
        checks.push(Check::warn(
            "unique_names",
            &format!("Duplicate network names: {}", dups.join(", ")),
        ));
    }
}

fn check_plugins(
    networks: &[NetworkDescriptor],
    cni_path: &Path,
    checks: &mut Vec<Check>,
    all_pass: &mut bool,
) {
    let required: BTreeSet<&str> = networks
        .iter()
        .flat_map(|n| n.list.required_plugins())
        .collect();
    let missing = missing_plugins(&required, cni_path);
    if missing.is_empty() {
        checks.push(Check::pass(
            "cni_plugins",
            &format!(
                "All {} required plugins found in {}",
                required.len(),
                cni_path.display()
            ),
        ));
    } else {
        *all_pass = false;
        checks.push(Check::fail(
            "cni_plugins",
            &format!(
                "Missing plugins in {}: {}",
                cni_path.display(),
                missing.join(", ")
            ),
        ));
    }
}

fn missing_plugins<'a>(required: &BTreeSet<&'a str>, cni_path: &Path) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|plugin| !is_executable(&cni_path.join(plugin)))
        .collect()
}

fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.is_file() && meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        meta.is_file()
    }
}

fn print_results(checks: &[Check], all_pass: bool, json_output: bool) -> Result<u8, String> {
    if json_output {
        let json = serde_json::json!({
            "healthy": all_pass,
            "checks": checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "status": c.status,
                "message": c.message,
            })).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?
        );
    } else {
        println!("nerdnet doctor\n");
        for check in checks {
            let icon = match check.status.as_str() {
                "pass" => "✓",
                "fail" => "✗",
                "warn" => "⚠",
                _ => "ℹ",
            };
            println!("  {icon} {}", check.message);
        }
        println!();
        if all_pass {
            println!("All checks passed.");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }
    Ok(if all_pass { EXIT_SUCCESS } else { EXIT_FAILURE })
}

struct Check {
    name: String,
    status: String,
    message: String,
}

impl Check {
    fn new(name: &str, status: &str, message: &str) -> Self {
        Self {
            name: name.to_owned(),
            status: status.to_owned(),
            message: message.to_owned(),
        }
    }

    fn pass(name: &str, message: &str) -> Self {
        Self::new(name, "pass", message)
    }

    fn fail(name: &str, message: &str) -> Self {
        Self::new(name, "fail", message)
    }

    fn warn(name: &str, message: &str) -> Self {
        Self::new(name, "warn", message)
    }

    fn info(name: &str, message: &str) -> Self {
        Self::new(name, "info", message)
    }
}
