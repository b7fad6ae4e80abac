//! Map command: load every sector and prefab and report the resolved graph.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use ets2map_core::{MapConfig, MapSummary, Mapper};
use owo_colors::OwoColorize;
use tracing::{info, warn};

use crate::cli::OutputFormat;

pub struct MapArgs {
    pub config: PathBuf,
    pub sector_dir: Option<PathBuf>,
    pub prefab_dir: Option<PathBuf>,
    pub serial: bool,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Run the map command
pub fn run(args: MapArgs) -> Result<()> {
    let mut config = match MapConfig::load(&args.config) {
        Ok(c) => {
            info!("Loaded config from {:?}", args.config);
            c
        }
        Err(e) if e.is_not_found() => {
            info!("No config at {:?}, using defaults", args.config);
            MapConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(dir) = args.sector_dir {
        config.sector_dir = dir;
    }
    if let Some(dir) = args.prefab_dir {
        config.prefab_dir = dir;
    }
    if args.serial {
        config.parallel = false;
    }

    let started = Instant::now();
    let mut mapper = Mapper::new(config);
    mapper.load()?;

    // Prefabs are optional; a map without them still has a full road graph
    if let Err(e) = mapper.load_prefabs() {
        warn!(
            "Failed to load prefabs from {:?}: {}",
            mapper.config().prefab_dir,
            e
        );
    }
    info!("Map loaded in {:.2?}", started.elapsed());

    let summary = mapper.summary();

    if let Some(path) = &args.output {
        summary.save(path)?;
        info!("Summary written to {:?}", path);
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_summary(&summary),
    }

    Ok(())
}

fn print_summary(summary: &MapSummary) {
    println!("{}", "Map summary".bold());
    println!(
        "  Sectors:    {} ({} empty, {} without footer)",
        summary.sectors, summary.empty_sectors, summary.footer_errors
    );
    println!("  Nodes:      {}", summary.nodes);
    println!(
        "  Items:      {} ({} hidden)",
        summary.items, summary.hidden_items
    );
    for (kind, count) in &summary.items_by_type {
        println!("    {:<14} {}", kind, count);
    }
    println!("  Prefabs:    {}", summary.prefabs);

    if summary.pending_links == 0 {
        println!("  {}", "All item links resolved".green());
    } else {
        println!(
            "  {}",
            format!("{} item links unresolved", summary.pending_links).yellow()
        );
    }

    let broken: Vec<_> = summary
        .sector_details
        .iter()
        .filter(|s| s.state == "no footer")
        .collect();
    if !broken.is_empty() {
        println!();
        println!("{}", "Sectors without node footer".red());
        for sector in broken {
            println!("  {} ({} bytes)", sector.name, sector.size);
        }
    }
}
