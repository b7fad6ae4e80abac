//! Session-wide node and item tables shared by all sector decoders.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::map::item::Item;
use crate::map::node::{Direction, Node};

/// Node and item arenas keyed by uid.
///
/// Both maps are sharded, so decoders running on different threads insert
/// concurrently without a global lock. Inserts never overwrite: the first
/// writer for a uid wins and later inserts are ignored.
#[derive(Debug, Default)]
pub struct GraphTables {
    nodes: DashMap<u64, Node>,
    items: DashMap<u64, Item>,
}

impl GraphTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node unless one with the same uid exists. Returns true if inserted.
    pub fn insert_node(&self, node: Node) -> bool {
        match self.nodes.entry(node.uid) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
        }
    }

    /// Insert an item unless one with the same uid exists. Returns true if inserted.
    pub fn insert_item(&self, item: Item) -> bool {
        match self.items.entry(item.uid) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(item);
                true
            }
        }
    }

    pub fn contains_node(&self, uid: u64) -> bool {
        uid != 0 && self.nodes.contains_key(&uid)
    }

    pub fn contains_item(&self, uid: u64) -> bool {
        uid != 0 && self.items.contains_key(&uid)
    }

    pub fn node(&self, uid: u64) -> Option<Node> {
        self.nodes.get(&uid).map(|entry| entry.clone())
    }

    pub fn item(&self, uid: u64) -> Option<Item> {
        self.items.get(&uid).map(|entry| entry.clone())
    }

    /// Apply `node` to the stored item `item_uid`.
    ///
    /// Returns `None` if the item is unknown, otherwise the result of [`Item::apply`].
    pub fn apply_item(&self, item_uid: u64, node: &Node) -> Option<bool> {
        self.items.get_mut(&item_uid).map(|mut item| item.apply(node))
    }

    /// Record a resolved item on the stored node
    pub fn link_node(&self, node_uid: u64, direction: Direction, item_uid: u64) {
        if let Some(mut node) = self.nodes.get_mut(&node_uid) {
            node.link(direction, item_uid);
        }
    }

    /// Stored nodes that reference `item_uid` through either link
    pub fn nodes_of_item(&self, item_uid: u64) -> Vec<u64> {
        self.nodes
            .iter()
            .filter(|n| n.forward_item_uid == item_uid || n.backward_item_uid == item_uid)
            .map(|n| n.uid)
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Snapshot of all items
    pub fn items(&self) -> Vec<Item> {
        self.items.iter().map(|entry| entry.clone()).collect()
    }

    /// Snapshot of all nodes
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.iter().map(|entry| entry.clone()).collect()
    }
}
