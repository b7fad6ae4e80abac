use serde::Serialize;
use strum::{Display, FromRepr, IntoStaticStr};

use crate::error::Result;
use crate::layout::item;
use crate::map::node::Node;
use crate::map::tables::GraphTables;
use crate::reader::ReadBytes;
use crate::token::token_to_string;

/// Item type tags stored in front of every item record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, FromRepr, IntoStaticStr, Display,
)]
#[repr(u32)]
pub enum ItemType {
    Building = 0x01,
    Road = 0x02,
    Prefab = 0x03,
    Model = 0x04,
    Company = 0x05,
    Service = 0x06,
    CutPlane = 0x07,
    City = 0x0B,
    MapOverlay = 0x11,
    Ferry = 0x12,
    Garage = 0x15,
    Trigger = 0x21,
    FuelPump = 0x22,
    RoadSideItem = 0x23,
    BusStop = 0x24,
    TrafficRule = 0x25,
    Trajectory = 0x29,
    MapArea = 0x2A,
}

impl ItemType {
    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::from_repr(tag)
    }
}

/// Whether a type tag can belong to an item record at all
pub fn is_plausible_tag(tag: u32) -> bool {
    tag != 0 && tag < item::MAX_TYPE_TAG
}

/// A road endpoint or prefab node slot: the uid is declared by the record,
/// `resolved` is set once the node has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub uid: u64,
    pub resolved: bool,
}

impl NodeRef {
    fn new(uid: u64) -> Self {
        Self {
            uid,
            resolved: false,
        }
    }

    fn try_resolve(&mut self, node_uid: u64) -> bool {
        if self.uid != 0 && self.uid == node_uid {
            self.resolved = true;
            true
        } else {
            false
        }
    }
}

/// Type-specific item payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ItemKind {
    Road {
        look_id: u32,
        start: NodeRef,
        end: NodeRef,
    },
    Prefab {
        prefab_id: u32,
        nodes: Vec<NodeRef>,
        /// Index into `nodes` of the node the prefab is placed by
        origin: u8,
    },
    City {
        name: String,
        node: NodeRef,
    },
    /// Any other tag; passed through without payload
    Other(Option<ItemType>),
}

/// Placed map object anchored to one or more world nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub uid: u64,
    pub tag: u32,
    /// Offset of the type tag in the sector that defines this item
    pub offset: usize,
    pub flags: u8,
    pub valid: bool,
    pub kind: ItemKind,
}

impl Item {
    /// Decode the item whose type tag sits at `offset`.
    ///
    /// Structurally broken candidates come back with `valid == false` rather
    /// than as errors; only the tag and uid must be readable. A record too
    /// short to hold its flags byte is never valid.
    pub fn parse(buf: &[u8], offset: usize, tables: &GraphTables) -> Result<Self> {
        let tag = buf.read_u32(offset + item::TYPE)?;
        let uid = buf.read_u64(offset + item::UID)?;
        let flags = buf.read_u8(offset + item::FLAGS).ok();

        let kind = Self::parse_kind(buf, offset, tag, tables);
        let valid = is_plausible_tag(tag) && flags.is_some() && kind.is_some();

        Ok(Self {
            uid,
            tag,
            offset,
            flags: flags.unwrap_or(0),
            valid,
            kind: kind.unwrap_or(ItemKind::Other(ItemType::from_tag(tag))),
        })
    }

    fn parse_kind(buf: &[u8], offset: usize, tag: u32, tables: &GraphTables) -> Option<ItemKind> {
        match ItemType::from_tag(tag) {
            Some(ItemType::Road) => {
                use item::road;

                let start = buf.read_u64(offset + road::START_NODE).ok()?;
                let end = buf.read_u64(offset + road::END_NODE).ok()?;
                // A road must connect to at least one node the map knows about
                if !tables.contains_node(start) && !tables.contains_node(end) {
                    return None;
                }

                Some(ItemKind::Road {
                    look_id: buf.read_u32(offset + road::LOOK_ID).ok()?,
                    start: NodeRef::new(start),
                    end: NodeRef::new(end),
                })
            }
            Some(ItemType::Prefab) => {
                use item::prefab;

                let count = buf.read_u32(offset + prefab::NODE_COUNT).ok()?;
                if count == 0 || count > prefab::MAX_NODES {
                    return None;
                }

                let list = offset + prefab::NODE_LIST;
                let nodes = (0..count as usize)
                    .map(|k| buf.read_u64(list + k * 8).map(NodeRef::new))
                    .collect::<Result<Vec<_>>>()
                    .ok()?;

                Some(ItemKind::Prefab {
                    prefab_id: buf.read_u32(offset + prefab::PREFAB_ID).ok()?,
                    origin: buf.read_u8(list + nodes.len() * 8).ok()?,
                    nodes,
                })
            }
            Some(ItemType::City) => {
                use item::city;

                Some(ItemKind::City {
                    name: token_to_string(buf.read_u64(offset + city::NAME_TOKEN).ok()?),
                    node: NodeRef::new(buf.read_u64(offset + city::NODE).ok()?),
                })
            }
            other => Some(ItemKind::Other(other)),
        }
    }

    pub fn item_type(&self) -> Option<ItemType> {
        ItemType::from_tag(self.tag)
    }

    pub fn is_hidden(&self) -> bool {
        self.flags & item::HIDE_UI != 0
    }

    /// Attach `node` to whichever role it plays for this item.
    ///
    /// Returns false when the node is not one this item expects.
    pub fn apply(&mut self, node: &Node) -> bool {
        match &mut self.kind {
            ItemKind::Road { start, end, .. } => {
                start.try_resolve(node.uid) || end.try_resolve(node.uid)
            }
            ItemKind::Prefab { nodes, .. } => nodes
                .iter_mut()
                .find(|slot| slot.uid == node.uid)
                .is_some_and(|slot| slot.try_resolve(node.uid)),
            ItemKind::City { node: anchor, .. } => anchor.try_resolve(node.uid),
            ItemKind::Other(_) => false,
        }
    }

    /// Node uids this item declares, in record order
    pub fn node_uids(&self) -> Vec<u64> {
        match &self.kind {
            ItemKind::Road { start, end, .. } => vec![start.uid, end.uid],
            ItemKind::Prefab { nodes, .. } => nodes.iter().map(|n| n.uid).collect(),
            ItemKind::City { node, .. } => vec![node.uid],
            ItemKind::Other(_) => Vec::new(),
        }
    }

    /// Start node once resolved (road start, city anchor)
    pub fn start_node(&self) -> Option<u64> {
        match &self.kind {
            ItemKind::Road { start, .. } | ItemKind::City { node: start, .. } => {
                start.resolved.then_some(start.uid)
            }
            _ => None,
        }
    }

    /// End node once resolved (roads only)
    pub fn end_node(&self) -> Option<u64> {
        match &self.kind {
            ItemKind::Road { end, .. } => end.resolved.then_some(end.uid),
            _ => None,
        }
    }
}
