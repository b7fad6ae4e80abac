//! Serializable decode summaries for diagnostics and the CLI's JSON output.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::map::{GraphTables, Item, ItemType, Mapper, Sector, SectorState};
use crate::prefab::Prefab;

/// Per-sector decode outcome
#[derive(Debug, Clone, Serialize)]
pub struct SectorSummary {
    pub name: String,
    pub size: usize,
    pub state: String,
    pub footer_start: Option<String>,
    pub nodes: usize,
    pub items: usize,
    pub items_by_type: BTreeMap<String, usize>,
    /// Node links still without an item, according to the shared tables
    pub unresolved_links: usize,
}

impl SectorSummary {
    pub fn from_sector(sector: &Sector, tables: &GraphTables) -> Self {
        let state = match sector.state() {
            SectorState::Unparsed => "unparsed",
            SectorState::Empty => "empty",
            SectorState::Parsed { .. } => "parsed",
            SectorState::NoFooter => "no footer",
        };

        let unresolved_links = sector
            .nodes
            .iter()
            .map(|node| {
                tables
                    .node(node.uid)
                    .map_or_else(|| node.unresolved().count(), |n| n.unresolved().count())
            })
            .sum();

        Self {
            name: sector.name.clone(),
            size: sector.bytes().len(),
            state: state.to_string(),
            footer_start: sector.footer_start().map(|o| format!("0x{:X}", o)),
            nodes: sector.nodes.len(),
            items: sector.items.len(),
            items_by_type: count_by_type(&sector.items),
            unresolved_links,
        }
    }
}

/// Header and route statistics for one prefab
#[derive(Debug, Clone, Serialize)]
pub struct PrefabSummary {
    pub name: String,
    pub version: i32,
    pub known_version: bool,
    pub nodes: usize,
    pub curves: usize,
    pub dead_end_curves: usize,
    pub routes: usize,
}

impl PrefabSummary {
    pub fn from_prefab(prefab: &Prefab) -> Self {
        Self {
            name: prefab.name.clone(),
            version: prefab.header.version,
            known_version: prefab.header.is_known_version(),
            nodes: prefab.nodes.len(),
            curves: prefab.curves.len(),
            dead_end_curves: prefab.curves.iter().filter(|c| c.is_dead_end()).count(),
            routes: prefab.all_routes().len(),
        }
    }
}

/// Whole-map totals after loading
#[derive(Debug, Clone, Serialize)]
pub struct MapSummary {
    pub sectors: usize,
    pub empty_sectors: usize,
    pub footer_errors: usize,
    pub nodes: usize,
    pub items: usize,
    pub hidden_items: usize,
    pub items_by_type: BTreeMap<String, usize>,
    pub pending_links: usize,
    pub prefabs: usize,
    pub sector_details: Vec<SectorSummary>,
}

impl MapSummary {
    pub fn from_mapper(mapper: &Mapper) -> Self {
        let tables = mapper.tables();
        let sectors = mapper.sectors();
        let items = tables.items();

        Self {
            sectors: sectors.len(),
            empty_sectors: sectors.iter().filter(|s| s.is_empty()).count(),
            footer_errors: sectors.iter().filter(|s| s.has_footer_error()).count(),
            nodes: tables.node_count(),
            items: items.len(),
            hidden_items: items.iter().filter(|i| i.is_hidden()).count(),
            items_by_type: count_by_type(&items),
            pending_links: mapper.pending().len(),
            prefabs: mapper.prefabs().count(),
            sector_details: sectors
                .iter()
                .map(|s| SectorSummary::from_sector(s, tables))
                .collect(),
        }
    }

    /// Save summary to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn count_by_type(items: &[Item]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        let name = match ItemType::from_tag(item.tag) {
            Some(kind) => kind.to_string(),
            None => format!("unknown(0x{:02X})", item.tag),
        };
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}
