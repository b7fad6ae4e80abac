//! Sector file decoder.
//!
//! A sector file ends with a run of 56-byte node records whose start is not
//! recorded anywhere, so the records are found by scanning backward from the
//! end of the file until a terminator is seen. Items have no index either;
//! they are located by searching the file for the uid a node links to.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::layout::{node, sector};
use crate::map::item::{Item, is_plausible_tag};
use crate::map::node::{Direction, Node};
use crate::map::pending::ItemRequester;
use crate::map::tables::GraphTables;
use crate::reader::ReadBytes;
use crate::search::indexes_of_uid;

/// Outcome of the backward node scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorState {
    /// Not parsed yet
    Unparsed,
    /// Buffer too small to hold a header; nothing to decode
    Empty,
    /// Node region located; `footer_start` marks where it is terminated
    Parsed { footer_start: usize },
    /// Backward scan ran into the header without finding a terminator
    NoFooter,
}

/// One decoded sector file
#[derive(Debug, Clone)]
pub struct Sector {
    pub name: String,
    bytes: Vec<u8>,
    state: SectorState,
    pub nodes: Vec<Node>,
    pub items: Vec<Item>,
}

impl Sector {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let state = if bytes.len() < sector::MIN_SIZE {
            SectorState::Empty
        } else {
            SectorState::Unparsed
        };

        Self {
            name: name.into(),
            bytes,
            state,
            nodes: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Read a sector file; the sector is named after the file stem
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn state(&self) -> SectorState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.state == SectorState::Empty
    }

    pub fn has_footer_error(&self) -> bool {
        self.state == SectorState::NoFooter
    }

    pub fn footer_start(&self) -> Option<usize> {
        match self.state {
            SectorState::Parsed { footer_start } => Some(footer_start),
            _ => None,
        }
    }

    /// Decode the node records and publish them to the shared node table.
    ///
    /// Runs once; later calls are no-ops.
    pub fn parse_nodes(&mut self, tables: &GraphTables) {
        if self.state != SectorState::Unparsed {
            return;
        }

        self.state = match self.scan_nodes(tables) {
            Some(footer_start) => SectorState::Parsed { footer_start },
            None => {
                warn!(
                    "{}: no node footer found ({} candidate nodes)",
                    self.name,
                    self.nodes.len()
                );
                SectorState::NoFooter
            }
        };
        debug!("{}: {} nodes", self.name, self.nodes.len());
    }

    fn scan_nodes(&mut self, tables: &GraphTables) -> Option<usize> {
        let declared = self.bytes.read_u32(sector::NODE_COUNT).ok()? as usize;
        let mut offset = self.bytes.len();

        while offset >= node::SIZE {
            offset -= node::SIZE;

            let candidate = Node::parse(&self.bytes, offset).ok()?;
            if candidate.uid == 0 {
                return Some(offset + node::SIZE - 4);
            }

            tables.insert_node(candidate.clone());
            self.nodes.push(candidate);

            if let Some(count_offset) = offset.checked_sub(4)
                && let Ok(count) = self.bytes.read_u32(count_offset)
                && count as usize == declared
                && count as usize == self.nodes.len()
            {
                return Some(count_offset);
            }

            if offset <= sector::DATA_START {
                break;
            }
        }

        None
    }

    /// Resolve every node's item links.
    ///
    /// Links are looked up in the shared item table first, then in this
    /// sector's own bytes. Links found in neither are handed to `requester`.
    /// Skipped for empty sectors and sectors without a footer.
    pub fn parse_items(&mut self, tables: &GraphTables, requester: &dyn ItemRequester) {
        if !matches!(self.state, SectorState::Parsed { .. }) {
            return;
        }

        for index in 0..self.nodes.len() {
            for direction in [Direction::Forward, Direction::Backward] {
                self.resolve_link(index, direction, tables, requester);
            }
        }
        debug!("{}: {} items", self.name, self.items.len());
    }

    fn resolve_link(
        &mut self,
        index: usize,
        direction: Direction,
        tables: &GraphTables,
        requester: &dyn ItemRequester,
    ) {
        let node = &self.nodes[index];
        let item_uid = node.item_uid(direction);
        if item_uid == 0 {
            return;
        }

        if let Some(applied) = tables.apply_item(item_uid, node) {
            if applied {
                if let Some(local) = self.items.iter_mut().find(|i| i.uid == item_uid) {
                    local.apply(node);
                }
                self.link(index, direction, item_uid, tables);
            }
            return;
        }

        match self.find_item(item_uid, tables) {
            Some(mut item) => {
                let node = &self.nodes[index];
                item.apply(node);
                if !tables.insert_item(item.clone()) {
                    // Another sector published it first
                    tables.apply_item(item_uid, node);
                }
                self.items.push(item);
                self.link(index, direction, item_uid, tables);
            }
            None => requester.request_item(node.uid, item_uid, direction),
        }
    }

    fn link(&mut self, index: usize, direction: Direction, item_uid: u64, tables: &GraphTables) {
        let node = &mut self.nodes[index];
        node.link(direction, item_uid);
        tables.link_node(node.uid, direction, item_uid);
    }

    /// Pull links and node attachments resolved through the shared tables
    /// back into this sector's node and item lists.
    pub fn refresh(&mut self, tables: &GraphTables) {
        for node in &mut self.nodes {
            let Some(stored) = tables.node(node.uid) else {
                continue;
            };
            for direction in [Direction::Forward, Direction::Backward] {
                if node.item(direction).is_none()
                    && let Some(item_uid) = stored.item(direction)
                    && item_uid == node.item_uid(direction)
                {
                    node.link(direction, item_uid);
                }
            }
        }

        for item in &mut self.items {
            if let Some(stored) = tables.item(item.uid)
                && stored.tag == item.tag
            {
                item.kind = stored.kind;
            }
        }
    }

    /// Locate the item record for `uid` in this sector's bytes.
    ///
    /// Each match of the uid is a candidate whose type tag sits in the 4
    /// bytes before it; the first candidate with a plausible tag that parses
    /// as a valid item wins.
    pub fn find_item(&self, uid: u64, tables: &GraphTables) -> Option<Item> {
        if uid == 0 {
            return None;
        }

        for pos in indexes_of_uid(&self.bytes, uid) {
            let Some(tag_offset) = pos.checked_sub(4) else {
                continue;
            };
            let Ok(tag) = self.bytes.read_u32(tag_offset) else {
                continue;
            };
            if !is_plausible_tag(tag) {
                continue;
            }

            match Item::parse(&self.bytes, tag_offset, tables) {
                Ok(item) if item.valid => return Some(item),
                _ => debug!(
                    "{}: rejected candidate for item {:#x} at {:#x}",
                    self.name, uid, tag_offset
                ),
            }
        }

        None
    }
}
