use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use iniconf::{Document, merge_optional, resource};
use tracing_subscriber::EnvFilter;

/// Parse INI configuration files and print the merged result.
#[derive(Debug, Parser)]
#[command(name = "iniconf", version, about)]
struct Cli {
    /// Files to merge, in order; keys in later files override earlier ones.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Fail if any file is missing or contains no configuration.
    #[arg(long)]
    required: bool,

    /// Only print this section. An empty name selects the default section.
    #[arg(short, long)]
    section: Option<String>,

    /// Print only the value of this key, looked up in `--section`.
    #[arg(short, long)]
    get: Option<String>,

    /// Increase logging verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut merged = None::<Document>;

    for path in &cli.files {
        let document = resource::load_path(path, cli.required)
            .with_context(|| format!("failed to load '{}'", path.display()))?;
        merged = merge_optional(merged.as_ref(), document.as_ref());
    }

    let Some(document) = merged.filter(|d| !d.is_empty()) else {
        bail!("no INI configuration found");
    };

    let section_name = cli.section.as_deref().unwrap_or_default();

    if let Some(key) = &cli.get {
        let Some(value) = document.get(section_name, key) else {
            bail!("key '{key}' not found in section [{section_name}]");
        };
        println!("{value}");
        return Ok(());
    }

    if cli.section.is_some() {
        let Some(section) = document.section(section_name) else {
            bail!("section [{section_name}] not found");
        };
        print!("{section}");
        return Ok(());
    }

    print!("{document}");

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
