//! Map-wide coordinator.
//!
//! Loading happens in three phases:
//!
//! 1. Read every sector file and decode its node records (parallel)
//! 2. Resolve each sector's item links against the shared tables and the
//!    sector's own bytes (parallel); misses go to the pending queue
//! 3. Retry the pending queue against the tables and every loaded sector
//!    until a pass makes no progress
//!
//! ## Example
//!
//! ```ignore
//! use ets2map_core::{MapConfig, Mapper};
//!
//! let config = MapConfig::builder().sector_dir("map/europe").build();
//! let mut mapper = Mapper::new(config);
//! mapper.load()?;
//! mapper.load_prefabs()?;
//!
//! println!("{} nodes", mapper.tables().node_count());
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::error::Result;
use crate::map::item::Item;
use crate::map::pending::{PendingQueue, PendingRequest};
use crate::map::sector::Sector;
use crate::map::tables::GraphTables;
use crate::prefab::Prefab;
use crate::summary::MapSummary;

/// Result of retrying one pending request
enum Resolution {
    /// Item already in the table accepted the node
    Linked,
    /// Item found in the bytes of the sector at this index
    Found(usize, Item),
    /// Item exists but does not reference the node; the request is dropped
    Rejected,
    /// Nothing found yet
    Missing,
}

/// Owns every loaded sector and prefab plus the shared graph tables
#[derive(Debug)]
pub struct Mapper {
    config: MapConfig,
    tables: GraphTables,
    pending: PendingQueue,
    sectors: Vec<Sector>,
    prefabs: HashMap<String, Prefab>,
}

impl Mapper {
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            tables: GraphTables::new(),
            pending: PendingQueue::new(),
            sectors: Vec::new(),
            prefabs: HashMap::new(),
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn tables(&self) -> &GraphTables {
        &self.tables
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sector(&self, name: &str) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.name == name)
    }

    pub fn prefab(&self, name: &str) -> Option<&Prefab> {
        self.prefabs.get(name)
    }

    pub fn prefabs(&self) -> impl Iterator<Item = &Prefab> {
        self.prefabs.values()
    }

    pub fn summary(&self) -> MapSummary {
        MapSummary::from_mapper(self)
    }

    /// Load every sector file in the configured sector directory.
    ///
    /// Unreadable files are logged and skipped. Returns the number of
    /// sectors added.
    pub fn load(&mut self) -> Result<usize> {
        let paths = list_files(&self.config.sector_dir, &self.config.sector_extension, false)?;
        info!(
            "Loading {} sectors from {}",
            paths.len(),
            self.config.sector_dir.display()
        );

        let first_new = self.sectors.len();
        let loaded = self.read_sectors(&paths);
        self.sectors.extend(loaded);

        let tables = &self.tables;
        let pending = &self.pending;
        let new_sectors = &mut self.sectors[first_new..];
        if self.config.parallel {
            new_sectors
                .par_iter_mut()
                .for_each(|sector| sector.parse_items(tables, pending));
        } else {
            new_sectors
                .iter_mut()
                .for_each(|sector| sector.parse_items(tables, pending));
        }

        let added = self.sectors.len() - first_new;
        info!(
            "Decoded {} sectors: {} nodes, {} items, {} deferred links",
            added,
            self.tables.node_count(),
            self.tables.item_count(),
            self.pending.len()
        );

        self.resolve_pending();
        Ok(added)
    }

    /// Phase 1: read and decode node records
    fn read_sectors(&self, paths: &[PathBuf]) -> Vec<Sector> {
        let tables = &self.tables;
        let read = |path: &PathBuf| match Sector::load(path) {
            Ok(mut sector) => {
                sector.parse_nodes(tables);
                Some(sector)
            }
            Err(e) => {
                warn!("Skipping sector {}: {}", path.display(), e);
                None
            }
        };

        if self.config.parallel {
            paths.par_iter().filter_map(read).collect()
        } else {
            paths.iter().filter_map(read).collect()
        }
    }

    /// Decode one more sector and retry everything still pending.
    ///
    /// Returns the number of deferred links resolved by the retry.
    pub fn add_sector(&mut self, mut sector: Sector) -> usize {
        sector.parse_nodes(&self.tables);
        sector.parse_items(&self.tables, &self.pending);
        debug!(
            "Added sector {} ({} nodes, {} items)",
            sector.name,
            sector.nodes.len(),
            sector.items.len()
        );
        self.sectors.push(sector);
        self.resolve_pending()
    }

    /// Retry deferred links until a pass resolves nothing or the configured
    /// pass limit is reached. Returns the number of links resolved.
    pub fn resolve_pending(&mut self) -> usize {
        let mut resolved_total = 0;

        for pass in 1..=self.config.max_resolve_passes {
            let requests = self.pending.drain();
            if requests.is_empty() {
                break;
            }

            let mut progress = 0;
            let mut still_pending = Vec::new();
            for request in requests {
                match self.resolve_request(&request) {
                    Resolution::Linked => {
                        progress += 1;
                        resolved_total += 1;
                    }
                    Resolution::Found(owner, item) => {
                        self.sectors[owner].items.push(item);
                        progress += 1;
                        resolved_total += 1;
                    }
                    Resolution::Rejected => {
                        debug!(
                            "Item {:#x} does not reference node {:#x}, dropping link",
                            request.item_uid, request.node_uid
                        );
                        progress += 1;
                    }
                    Resolution::Missing => still_pending.push(request),
                }
            }

            debug!(
                "Resolve pass {}: {} settled, {} pending",
                pass,
                progress,
                still_pending.len()
            );
            self.pending.extend(still_pending);

            if progress == 0 {
                break;
            }
        }

        self.refresh_sectors();

        for request in self.pending.snapshot() {
            debug!(
                "Unresolved: node {:#x} {:?} -> item {:#x}",
                request.node_uid, request.direction, request.item_uid
            );
        }

        resolved_total
    }

    /// Bring every sector's node and item lists in line with the tables
    fn refresh_sectors(&mut self) {
        let tables = &self.tables;
        if self.config.parallel {
            self.sectors
                .par_iter_mut()
                .for_each(|sector| sector.refresh(tables));
        } else {
            self.sectors
                .iter_mut()
                .for_each(|sector| sector.refresh(tables));
        }
    }

    fn resolve_request(&self, request: &PendingRequest) -> Resolution {
        let Some(node) = self.tables.node(request.node_uid) else {
            return Resolution::Missing;
        };

        if let Some(applied) = self.tables.apply_item(request.item_uid, &node) {
            if !applied {
                return Resolution::Rejected;
            }
            self.tables
                .link_node(node.uid, request.direction, request.item_uid);
            return Resolution::Linked;
        }

        let Some((owner, mut item)) = self.search_sectors(request.item_uid) else {
            return Resolution::Missing;
        };

        item.apply(&node);
        if !self.tables.insert_item(item.clone()) {
            self.tables.apply_item(item.uid, &node);
        }
        self.tables
            .link_node(node.uid, request.direction, request.item_uid);
        Resolution::Found(owner, item)
    }

    /// First sector, in load order, whose bytes hold a valid record for `uid`
    fn search_sectors(&self, uid: u64) -> Option<(usize, Item)> {
        let find = |(index, sector): (usize, &Sector)| {
            sector.find_item(uid, &self.tables).map(|item| (index, item))
        };

        if self.config.parallel {
            self.sectors.par_iter().enumerate().find_map_first(find)
        } else {
            self.sectors.iter().enumerate().find_map(find)
        }
    }

    /// Load every prefab under the configured prefab directory, recursively.
    ///
    /// Files that fail to decode are logged and skipped. Returns the number
    /// of prefabs loaded.
    pub fn load_prefabs(&mut self) -> Result<usize> {
        let paths = list_files(&self.config.prefab_dir, &self.config.prefab_extension, true)?;
        let expected = self.config.expected_prefab_version;

        let read = |path: &PathBuf| match Prefab::load(path) {
            Ok(prefab) => {
                if prefab.header.version != expected {
                    warn!(
                        "{}: prefab version {} (expected {})",
                        path.display(),
                        prefab.header.version,
                        expected
                    );
                }
                Some(prefab)
            }
            Err(e) => {
                warn!("Skipping prefab {}: {}", path.display(), e);
                None
            }
        };

        let loaded: Vec<Prefab> = if self.config.parallel {
            paths.par_iter().filter_map(read).collect()
        } else {
            paths.iter().filter_map(read).collect()
        };

        let count = loaded.len();
        for prefab in loaded {
            if let Some(previous) = self.prefabs.insert(prefab.name.clone(), prefab) {
                debug!("Prefab {} loaded twice, keeping the later file", previous.name);
            }
        }

        info!(
            "Loaded {} prefabs from {}",
            count,
            self.config.prefab_dir.display()
        );
        Ok(count)
    }
}

/// Files in `dir` with extension `ext`, sorted by path
fn list_files(dir: &Path, ext: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files(dir, ext, recursive, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(dir: &Path, ext: &str, recursive: bool, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_files(&path, ext, recursive, out)?;
            }
        } else if path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext)) {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::fixtures::{ItemRecord, NodeRecord, SectorBuilder, Terminator};
    use crate::prefab::fixtures::{CurveRecord, NodeRecord as PrefabNodeRecord, PrefabBuilder};
    use tempfile::TempDir;

    const ROAD: u64 = 0x0bad_0000_0000_0001;
    const CITY: u64 = 0x0bad_0000_0000_0002;
    const NODE_A: u64 = 0x0a00_0000_0000_0001;
    const NODE_B: u64 = 0x0a00_0000_0000_0002;

    fn serial() -> MapConfig {
        MapConfig::builder().parallel(false).build()
    }

    /// Node A points at a road defined in another sector
    fn needs_road() -> Sector {
        let bytes = SectorBuilder::new(Terminator::CountField)
            .node(NodeRecord::new(NODE_A).forward(ROAD))
            .build();
        Sector::new("needs_road", bytes)
    }

    /// Defines the road between A and B, but only node B
    fn has_road() -> Sector {
        let bytes = SectorBuilder::new(Terminator::CountField)
            .item(ItemRecord::road(ROAD, NODE_A, NODE_B))
            .node(NodeRecord::new(NODE_B))
            .build();
        Sector::new("has_road", bytes)
    }

    #[test]
    fn test_incremental_resolution() {
        let mut mapper = Mapper::new(serial());

        assert_eq!(mapper.add_sector(needs_road()), 0);
        assert_eq!(mapper.pending().len(), 1);

        assert_eq!(mapper.add_sector(has_road()), 1);
        assert!(mapper.pending().is_empty());

        let node = mapper.tables().node(NODE_A).unwrap();
        assert_eq!(node.forward_item, Some(ROAD));
        assert_eq!(mapper.tables().item(ROAD).unwrap().start_node(), Some(NODE_A));
        // The road is recorded against the sector whose bytes hold it
        assert_eq!(mapper.sector("has_road").unwrap().items.len(), 1);
    }

    #[test]
    fn test_sector_copies_follow_tables() {
        let mut mapper = Mapper::new(serial());
        mapper.add_sector(needs_road());
        mapper.add_sector(has_road());

        let table_node = mapper.tables().node(NODE_A).unwrap();
        let sector_node = &mapper.sector("needs_road").unwrap().nodes[0];
        assert_eq!(sector_node.forward_item, Some(ROAD));
        assert_eq!(sector_node.forward_item, table_node.forward_item);
    }

    #[test]
    fn test_sector_item_sees_later_nodes() {
        let mut mapper = Mapper::new(serial());

        // Node B resolves the road locally, before node A exists
        let definer = SectorBuilder::new(Terminator::CountField)
            .item(ItemRecord::road(ROAD, NODE_A, NODE_B))
            .node(NodeRecord::new(NODE_B).backward(ROAD))
            .build();
        mapper.add_sector(Sector::new("definer", definer));
        assert_eq!(mapper.sector("definer").unwrap().items[0].start_node(), None);

        mapper.add_sector(needs_road());

        let table_road = mapper.tables().item(ROAD).unwrap();
        let sector_road = &mapper.sector("definer").unwrap().items[0];
        assert_eq!(sector_road.kind, table_road.kind);
        assert_eq!(sector_road.start_node(), Some(NODE_A));
        assert_eq!(sector_road.end_node(), Some(NODE_B));
    }

    #[test]
    fn test_item_rejecting_node_is_dropped() {
        let mut mapper = Mapper::new(serial());

        let definer = SectorBuilder::new(Terminator::CountField)
            .item(ItemRecord::city(CITY, "berlin", NODE_B))
            .node(NodeRecord::new(NODE_B).forward(CITY))
            .build();
        mapper.add_sector(Sector::new("definer", definer));
        assert!(mapper.tables().contains_item(CITY));

        // Node A claims the city, which anchors to node B only
        let claimant = SectorBuilder::new(Terminator::CountField)
            .node(NodeRecord::new(NODE_A).backward(CITY))
            .build();
        let resolved = mapper.add_sector(Sector::new("claimant", claimant));

        assert_eq!(resolved, 0);
        assert!(mapper.pending().is_empty());
        assert_eq!(mapper.tables().node(NODE_A).unwrap().backward_item, None);
    }

    #[test]
    fn test_dangling_link_stays_pending() {
        let mut mapper = Mapper::new(serial());
        mapper.add_sector(needs_road());
        mapper.resolve_pending();

        let pending = mapper.pending().snapshot();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].item_uid, ROAD);
    }

    #[test]
    fn test_zero_passes_leaves_queue() {
        let config = MapConfig::builder()
            .parallel(false)
            .max_resolve_passes(0)
            .build();
        let mut mapper = Mapper::new(config);
        mapper.add_sector(needs_road());
        assert_eq!(mapper.add_sector(has_road()), 0);
        assert_eq!(mapper.pending().len(), 1);
    }

    #[test]
    fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sec+0000+0000.base"), needs_road().bytes()).unwrap();
        fs::write(dir.path().join("sec+0001+0000.base"), has_road().bytes()).unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        for parallel in [false, true] {
            let config = MapConfig::builder()
                .sector_dir(dir.path())
                .parallel(parallel)
                .build();
            let mut mapper = Mapper::new(config);

            assert_eq!(mapper.load().unwrap(), 2);
            assert_eq!(mapper.sectors()[0].name, "sec+0000+0000");
            assert_eq!(mapper.tables().node_count(), 2);
            assert!(mapper.pending().is_empty());
            assert_eq!(
                mapper.tables().node(NODE_A).unwrap().forward_item,
                Some(ROAD)
            );
        }
    }

    #[test]
    fn test_load_missing_directory() {
        let config = MapConfig::builder()
            .sector_dir("/nonexistent/sectors")
            .build();
        let err = Mapper::new(config).load().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_prefabs_recursively() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("cross");
        fs::create_dir(&nested).unwrap();

        let good = PrefabBuilder::new()
            .curve(CurveRecord::new().end(0.0, 0.0, 10.0))
            .node(PrefabNodeRecord::new().inputs(&[0]))
            .build();
        let broken = PrefabBuilder::new()
            .curve(CurveRecord::new().next(&[7]))
            .build();
        fs::write(dir.path().join("straight.ppd"), &good).unwrap();
        fs::write(nested.join("cross_2x2.ppd"), &good).unwrap();
        fs::write(nested.join("broken.ppd"), &broken).unwrap();

        let config = MapConfig::builder()
            .prefab_dir(dir.path())
            .parallel(false)
            .build();
        let mut mapper = Mapper::new(config);

        assert_eq!(mapper.load_prefabs().unwrap(), 2);
        assert!(mapper.prefab("straight").is_some());
        assert!(mapper.prefab("cross_2x2").is_some());
        assert!(mapper.prefab("broken").is_none());
        assert_eq!(mapper.prefab("straight").unwrap().route_options(0).len(), 1);
    }
}
