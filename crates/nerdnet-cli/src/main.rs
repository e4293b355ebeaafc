mod commands;
mod config;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_STORE_ERROR};
use config::{CliConfig, Settings};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "nerdnet",
    version,
    about = "Manage CNI network configuration lists for containers"
)]
struct Cli {
    /// Directory holding CNI network configuration files [default: /etc/cni/net.d].
    #[arg(long, global = true)]
    cni_netconfpath: Option<PathBuf>,

    /// Directory holding CNI plugin binaries [default: /opt/cni/bin].
    #[arg(long, global = true)]
    cni_path: Option<PathBuf>,

    /// Config file to read instead of ~/.config/nerdnet/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List networks.
    #[command(alias = "list")]
    Ls,
    /// Display detailed information on one or more networks.
    Inspect {
        /// Network names.
        #[arg(required = true)]
        networks: Vec<String>,
    },
    /// Create a network. No isolation is provided across different networks.
    Create {
        /// Network name ([a-zA-Z0-9]+).
        network: String,
        /// Subnet in CIDR format that represents a network segment, e.g. "10.5.0.0/16".
        #[arg(long)]
        subnet: String,
    },
    /// Check the configuration directory and plugin binaries.
    Doctor,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("NERDNET_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = load_settings(&cli).and_then(|settings| run(cli, &settings));

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(exit_code_for(&msg))
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, String> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(&expand_tilde(path))?,
        None => CliConfig::load_default()?,
    };
    let settings = Settings::resolve(
        cli.cni_netconfpath.as_deref().map(expand_tilde),
        cli.cni_path.as_deref().map(expand_tilde),
        &config,
    );
    tracing::debug!(
        netconfpath = %settings.netconfpath.display(),
        cni_path = %settings.cni_path.display(),
        "settings resolved"
    );
    Ok(settings)
}

fn run(cli: Cli, settings: &Settings) -> Result<u8, String> {
    let json_output = cli.json;
    let netconf = settings.netconfpath.as_path();
    match cli.command {
        Commands::Ls => commands::ls::run(netconf, json_output),
        Commands::Inspect { networks } => commands::inspect::run(netconf, &networks),
        Commands::Create { network, subnet } => {
            commands::create::run(netconf, &network, &subnet, json_output)
        }
        Commands::Doctor => commands::doctor::run(netconf, &settings.cni_path, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    }
}

fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("network config error:")
        || msg.starts_with("invalid network name:")
        || msg.starts_with("config error:")
    {
        EXIT_CONFIG_ERROR
    } else if msg.starts_with("store I/O error:") || msg.starts_with("lock acquisition failed:") {
        EXIT_STORE_ERROR
    } else {
        EXIT_FAILURE
    }
}

fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}
