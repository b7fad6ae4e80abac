//! Prefab command: decode a prefab file and list its routes.

use std::path::Path;

use anyhow::{Result, bail};
use ets2map_core::{Node, Point, Prefab, PrefabRoute, PrefabSummary};
use glam::{Vec3, Vec4};
use owo_colors::OwoColorize;
use serde_json::json;

use crate::cli::OutputFormat;

/// Run the prefab command
pub fn run(
    path: &Path,
    entry: Option<usize>,
    exit: Option<usize>,
    polygon: bool,
    format: OutputFormat,
) -> Result<()> {
    let prefab = Prefab::load(path)?;
    let summary = PrefabSummary::from_prefab(&prefab);

    for index in entry.iter().chain(exit.iter()) {
        if *index >= prefab.nodes.len() {
            bail!(
                "Prefab {} has {} nodes, no node {}",
                prefab.name,
                prefab.nodes.len(),
                index
            );
        }
    }

    let routes: Vec<PrefabRoute> = match (entry, exit) {
        (Some(entry), Some(exit)) => prefab.route(entry, exit),
        (Some(entry), None) => prefab.route_options(entry),
        (None, exit) => prefab
            .all_routes()
            .into_iter()
            .filter(|r| exit.is_none_or(|x| r.exit == x))
            .collect(),
    };

    // Identity rotation gives the same yaw as an unrotated prefab node
    let origin = Node::placement(Vec3::ZERO, Vec4::new(1.0, 0.0, 0.0, 0.0));
    let polygons: Vec<Vec<Point>> = if polygon {
        routes
            .iter()
            .map(|r| prefab.polygon_for_route(r, &origin, r.entry))
            .collect()
    } else {
        Vec::new()
    };

    if format == OutputFormat::Json {
        let mut output = json!({
            "summary": summary,
            "header": prefab.header,
            "routes": routes,
        });
        if polygon {
            output["polygons"] = json!(polygons);
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let version = if summary.known_version {
        summary.version.to_string().green().to_string()
    } else {
        format!("{} (unknown)", summary.version).yellow().to_string()
    };

    println!("Prefab {}", summary.name.bold());
    println!("  Version:    {}", version);
    println!("  Nodes:      {}", summary.nodes);
    println!(
        "  Curves:     {} ({} dead ends)",
        summary.curves, summary.dead_end_curves
    );

    println!();
    println!("{}", "Nodes".bold());
    for node in &prefab.nodes {
        println!(
            "  #{:<3} ({:>8.2}, {:>8.2}, {:>8.2})  yaw {:>6.3}  in {:?}  out {:?}",
            node.index,
            node.position.x,
            node.position.y,
            node.position.z,
            node.yaw,
            node.input_curves,
            node.output_curves
        );
    }

    println!();
    println!("{} ({})", "Routes".bold(), routes.len());
    for (k, route) in routes.iter().enumerate() {
        let chain = route
            .curves
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        println!("  node {} => node {}: {}", route.entry, route.exit, chain.dimmed());

        if let Some(points) = polygons.get(k) {
            for p in points {
                println!(
                    "      ({:>9.3}, {:>9.3}, {:>9.3})  heading {:>6.3}",
                    p.x, p.y, p.z, p.heading
                );
            }
        }
    }

    Ok(())
}
