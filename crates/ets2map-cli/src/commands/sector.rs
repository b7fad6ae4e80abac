//! Sector command: decode one sector file in isolation.
//!
//! Links to items outside the file cannot be resolved here; they are listed
//! as deferred requests instead.

use std::path::Path;

use anyhow::Result;
use ets2map_core::{GraphTables, ItemKind, PendingQueue, Sector, SectorSummary};
use owo_colors::OwoColorize;

use crate::cli::OutputFormat;
use crate::commands::hex_utils::format_hex;

/// Run the sector command
pub fn run(path: &Path, show_nodes: bool, show_items: bool, format: OutputFormat) -> Result<()> {
    let tables = GraphTables::new();
    let queue = PendingQueue::new();

    let mut sector = Sector::load(path)?;
    sector.parse_nodes(&tables);
    sector.parse_items(&tables, &queue);

    let summary = SectorSummary::from_sector(&sector, &tables);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Sector {} ({} bytes)", summary.name.bold(), summary.size);
    let state = if sector.has_footer_error() {
        summary.state.red().to_string()
    } else {
        summary.state.green().to_string()
    };
    println!("  State:      {}", state);
    if let Some(footer) = &summary.footer_start {
        println!("  Footer at:  {}", footer);
    }
    println!("  Nodes:      {}", summary.nodes);
    println!("  Items:      {}", summary.items);
    for (kind, count) in &summary.items_by_type {
        println!("    {:<14} {}", kind, count);
    }

    let deferred = queue.snapshot();
    if !deferred.is_empty() {
        println!(
            "  {}",
            format!("Deferred:   {} links point outside this sector", deferred.len()).yellow()
        );
    }

    if show_nodes {
        println!();
        println!("{}", "Nodes".bold());
        for node in &sector.nodes {
            println!(
                "  {:<20} ({:>10.2}, {:>8.2}, {:>10.2})  yaw {:>6.3}  fwd {:<20} bwd {}",
                format_hex(node.uid),
                node.position.x,
                node.position.y,
                node.position.z,
                node.yaw,
                link_label(node.forward_item_uid, node.forward_item),
                link_label(node.backward_item_uid, node.backward_item),
            );
        }
    }

    if show_items {
        println!();
        println!("{}", "Items".bold());
        for item in &sector.items {
            let kind = item
                .item_type()
                .map(|t| t.to_string())
                .unwrap_or_else(|| format!("tag 0x{:02X}", item.tag));
            let detail = match &item.kind {
                ItemKind::Road { look_id, start, end } => format!(
                    "look {} {} -> {}",
                    look_id,
                    format_hex(start.uid),
                    format_hex(end.uid)
                ),
                ItemKind::Prefab { prefab_id, nodes, origin } => {
                    format!("prefab {} nodes {} origin {}", prefab_id, nodes.len(), origin)
                }
                ItemKind::City { name, node } => format!("{} at {}", name, format_hex(node.uid)),
                ItemKind::Other(_) => String::new(),
            };
            let hidden = if item.is_hidden() { " (hidden)" } else { "" };
            println!(
                "  {:<20} {:<10} @0x{:06X} {}{}",
                format_hex(item.uid),
                kind,
                item.offset,
                detail,
                hidden.dimmed()
            );
        }
    }

    Ok(())
}

fn link_label(declared: u64, resolved: Option<u64>) -> String {
    match (declared, resolved) {
        (0, _) => "-".to_string(),
        (_, Some(uid)) => format_hex(uid),
        (uid, None) => format!("{}?", format_hex(uid)),
    }
}
