mod logging;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use tracing::{debug, info, warn};
use wazuh_inventory_core::{build_inventory, HOSTS_ENV};
use wazuh_inventory_render::{render_host_vars, render_inventory, OutputStyle};

use crate::logging::Logging;

const ERROR_PREFIX: &str = "[ERROR] Failed to generate inventory:";

#[derive(Parser, Debug)]
#[command(
    name = "wazuh-inventory",
    version,
    about = "Dynamic inventory for the Wazuh server, indexer and dashboard groups"
)]
struct Cli {
    /// Comma-separated hosts, in order: server, indexer, dashboard
    #[arg(long, env = HOSTS_ENV, value_name = "LIST")]
    hosts: Option<OsString>,

    /// Print the whole inventory (the default)
    #[arg(long, conflicts_with = "host")]
    list: bool,

    /// Print the variables of a single host
    #[arg(long, value_name = "NAME")]
    host: Option<String>,

    /// Pretty-print the JSON over several lines
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn output_style(&self) -> OutputStyle {
        if self.pretty {
            OutputStyle::Pretty
        } else {
            OutputStyle::Spaced
        }
    }

    /// Non-UTF-8 bytes are replaced rather than rejected.
    fn host_source(&self) -> Option<String> {
        self.hosts.as_ref().map(|hosts| match hosts.to_str() {
            Some(value) => value.to_string(),
            None => {
                let lossy = hosts.to_string_lossy().into_owned();
                warn!(hosts = %lossy, "host list is not valid UTF-8, invalid bytes replaced");
                lossy
            }
        })
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("{ERROR_PREFIX} {}", usage_error_summary(&err));
            std::process::exit(1);
        }
    };
    if let Err(err) = run(&cli) {
        eprintln!("{ERROR_PREFIX} {err:#}");
        std::process::exit(1);
    }
}

/// First line of clap's report, without the usage block.
fn usage_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}

fn run(cli: &Cli) -> Result<()> {
    Logging::try_init()?;
    debug!(list = cli.list, host = ?cli.host, "generating inventory");

    let inventory = build_inventory(cli.host_source().as_deref())?;
    let style = cli.output_style();
    let output = match cli.host.as_deref() {
        Some(host) => render_host_vars(&inventory.host_vars(host), style)?,
        None => render_inventory(&inventory, style)?,
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}")?;
    stdout.flush()?;
    info!("inventory written");
    Ok(())
}
