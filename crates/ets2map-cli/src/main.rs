mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .init();

    match cli.command {
        Command::Sector {
            path,
            nodes,
            items,
            format,
        } => commands::sector::run(&path, nodes, items, format),
        Command::Prefab {
            path,
            entry,
            exit,
            polygon,
            format,
        } => commands::prefab::run(&path, entry, exit, polygon, format),
        Command::Map {
            config,
            sector_dir,
            prefab_dir,
            serial,
            output,
            format,
        } => commands::map::run(commands::map::MapArgs {
            config,
            sector_dir,
            prefab_dir,
            serial,
            output,
            format,
        }),
        Command::Search {
            path,
            uid,
            token,
            pattern,
            limit,
        } => commands::search::run(&path, uid, token, pattern, limit),
    }
}

/// `RUST_LOG` when set and valid, otherwise this crate and the core at
/// info (debug with `-v`)
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty())
        && let Ok(filter) = EnvFilter::try_new(directives)
    {
        return filter;
    }

    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(format!("ets2map={},ets2map_core={}", level, level))
}
