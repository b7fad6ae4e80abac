//! Builders for synthetic sector buffers used by unit tests.

use crate::layout::{item, node, sector};
use crate::token::string_to_token;

fn put<const N: usize>(buf: &mut [u8], offset: usize, bytes: [u8; N]) {
    buf[offset..offset + N].copy_from_slice(&bytes);
}

/// One 56-byte node record
#[derive(Debug, Clone)]
pub struct NodeRecord {
    uid: u64,
    position: [f32; 3],
    rotation: [f32; 4],
    forward: u64,
    backward: u64,
}

impl NodeRecord {
    pub fn new(uid: u64) -> Self {
        Self {
            uid,
            position: [0.0; 3],
            rotation: [1.0, 0.0, 0.0, 0.0],
            forward: 0,
            backward: 0,
        }
    }

    pub fn position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = [x, y, z];
        self
    }

    pub fn rotation(mut self, x: f32, y: f32, z: f32, w: f32) -> Self {
        self.rotation = [x, y, z, w];
        self
    }

    pub fn forward(mut self, uid: u64) -> Self {
        self.forward = uid;
        self
    }

    pub fn backward(mut self, uid: u64) -> Self {
        self.backward = uid;
        self
    }

    pub fn to_bytes(&self) -> [u8; node::SIZE] {
        let mut buf = [0u8; node::SIZE];
        let fixed = |v: f32| ((v * node::FIXED_POINT_SCALE) as i32).to_le_bytes();

        put(&mut buf, node::UID, self.uid.to_le_bytes());
        put(&mut buf, node::X, fixed(self.position[0]));
        put(&mut buf, node::Y, fixed(self.position[1]));
        put(&mut buf, node::Z, fixed(self.position[2]));
        put(&mut buf, node::ROTATION_X, self.rotation[0].to_le_bytes());
        put(&mut buf, node::ROTATION_Y, self.rotation[1].to_le_bytes());
        put(&mut buf, node::ROTATION_Z, self.rotation[2].to_le_bytes());
        put(&mut buf, node::ROTATION_W, self.rotation[3].to_le_bytes());
        put(&mut buf, node::BACKWARD_ITEM, self.backward.to_le_bytes());
        put(&mut buf, node::FORWARD_ITEM, self.forward.to_le_bytes());
        buf
    }
}

/// One item record, starting at its type tag
#[derive(Debug, Clone)]
pub struct ItemRecord {
    bytes: Vec<u8>,
}

impl ItemRecord {
    fn with_tag(tag: u32, uid: u64, size: usize) -> Self {
        let mut bytes = vec![0u8; size];
        put(&mut bytes, item::TYPE, tag.to_le_bytes());
        put(&mut bytes, item::UID, uid.to_le_bytes());
        Self { bytes }
    }

    pub fn road(uid: u64, start: u64, end: u64) -> Self {
        let mut record = Self::with_tag(0x02, uid, item::road::END_NODE + 8);
        put(&mut record.bytes, item::road::START_NODE, start.to_le_bytes());
        put(&mut record.bytes, item::road::END_NODE, end.to_le_bytes());
        record
    }

    pub fn prefab(uid: u64, prefab_id: u32, nodes: &[u64], origin: u8) -> Self {
        let list = item::prefab::NODE_LIST;
        let mut record = Self::with_tag(0x03, uid, list + nodes.len() * 8 + 1);
        put(&mut record.bytes, item::prefab::PREFAB_ID, prefab_id.to_le_bytes());
        put(
            &mut record.bytes,
            item::prefab::NODE_COUNT,
            (nodes.len() as u32).to_le_bytes(),
        );
        for (k, node_uid) in nodes.iter().enumerate() {
            put(&mut record.bytes, list + k * 8, node_uid.to_le_bytes());
        }
        record.bytes[list + nodes.len() * 8] = origin;
        record
    }

    pub fn city(uid: u64, name: &str, node_uid: u64) -> Self {
        let mut record = Self::with_tag(0x0B, uid, item::city::NODE + 8);
        let token = string_to_token(name).unwrap_or(0);
        put(&mut record.bytes, item::city::NAME_TOKEN, token.to_le_bytes());
        put(&mut record.bytes, item::city::NODE, node_uid.to_le_bytes());
        record
    }

    pub fn other(uid: u64, tag: u32) -> Self {
        Self::with_tag(tag, uid, item::FLAGS + 1)
    }

    pub fn look(mut self, look_id: u32) -> Self {
        put(&mut self.bytes, item::road::LOOK_ID, look_id.to_le_bytes());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.bytes[item::FLAGS] |= item::HIDE_UI;
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// How the node region of a synthetic sector is terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// A 56-byte block with a zero uid in front of the node records
    ZeroBlock,
    /// The node count repeated in the 4 bytes in front of the node records
    CountField,
    /// Nothing; the backward scan runs into the header
    Missing,
}

/// Sector layout: header, item records, terminator, node records up to EOF
#[derive(Debug, Clone)]
pub struct SectorBuilder {
    nodes: Vec<NodeRecord>,
    items: Vec<ItemRecord>,
    terminator: Terminator,
}

/// Filler byte for the header; never a plausible uid or count
const HEADER_FILL: u8 = 0xAB;
const HEADER_SIZE: usize = 64;

impl SectorBuilder {
    pub fn new(terminator: Terminator) -> Self {
        Self {
            nodes: Vec::new(),
            items: Vec::new(),
            terminator,
        }
    }

    pub fn node(mut self, record: NodeRecord) -> Self {
        self.nodes.push(record);
        self
    }

    pub fn item(mut self, record: ItemRecord) -> Self {
        self.items.push(record);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = vec![HEADER_FILL; HEADER_SIZE];
        put(
            &mut buf,
            sector::NODE_COUNT,
            (self.nodes.len() as u32).to_le_bytes(),
        );

        for record in &self.items {
            buf.extend_from_slice(&record.bytes);
        }

        match self.terminator {
            Terminator::ZeroBlock => buf.extend_from_slice(&[0u8; node::SIZE]),
            Terminator::CountField => {
                buf.extend_from_slice(&(self.nodes.len() as u32).to_le_bytes())
            }
            Terminator::Missing => {}
        }

        for record in &self.nodes {
            buf.extend_from_slice(&record.to_bytes());
        }
        buf
    }
}
