//! Builders for synthetic prefab buffers used by unit tests.

use crate::layout::{curve, prefab, prefab_node};

fn put<const N: usize>(buf: &mut [u8], offset: usize, bytes: [u8; N]) {
    buf[offset..offset + N].copy_from_slice(&bytes);
}

fn put_vec3(buf: &mut [u8], offset: usize, v: [f32; 3]) {
    for (k, value) in v.iter().enumerate() {
        put(buf, offset + k * 4, value.to_le_bytes());
    }
}

fn put_links(buf: &mut [u8], offset: usize, slots: usize, links: &[i32]) {
    for k in 0..slots {
        let value = links.get(k).copied().unwrap_or(prefab::NO_LINK);
        put(buf, offset + k * 4, value.to_le_bytes());
    }
}

/// One 128-byte curve record
#[derive(Debug, Clone, Default)]
pub struct CurveRecord {
    start: [f32; 3],
    end: [f32; 3],
    start_rotation: [f32; 3],
    end_rotation: [f32; 3],
    length: f32,
    next: Vec<i32>,
    prev: Vec<i32>,
}

impl CurveRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, x: f32, y: f32, z: f32) -> Self {
        self.start = [x, y, z];
        self
    }

    pub fn end(mut self, x: f32, y: f32, z: f32) -> Self {
        self.end = [x, y, z];
        self
    }

    pub fn start_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.start_rotation = [x, y, z];
        self
    }

    pub fn end_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.end_rotation = [x, y, z];
        self
    }

    pub fn length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    pub fn next(mut self, next: &[i32]) -> Self {
        self.next = next.to_vec();
        self
    }

    pub fn prev(mut self, prev: &[i32]) -> Self {
        self.prev = prev.to_vec();
        self
    }

    pub fn to_bytes(&self) -> [u8; curve::SIZE] {
        let mut buf = [0u8; curve::SIZE];
        put_vec3(&mut buf, curve::START_X, self.start);
        put_vec3(&mut buf, curve::END_X, self.end);
        put_vec3(&mut buf, curve::START_ROTATION_X, self.start_rotation);
        put_vec3(&mut buf, curve::END_ROTATION_X, self.end_rotation);
        put(&mut buf, curve::LENGTH, self.length.to_le_bytes());
        put_links(&mut buf, curve::NEXT, curve::LINKS, &self.next);
        put_links(&mut buf, curve::PREV, curve::LINKS, &self.prev);
        buf
    }
}

/// One 104-byte prefab node record
#[derive(Debug, Clone)]
pub struct NodeRecord {
    position: [f32; 3],
    rotation: [f32; 3],
    inputs: Vec<i32>,
    outputs: Vec<i32>,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [1.0, 0.0, 0.0],
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

impl NodeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = [x, y, z];
        self
    }

    pub fn rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = [x, y, z];
        self
    }

    pub fn inputs(mut self, inputs: &[i32]) -> Self {
        self.inputs = inputs.to_vec();
        self
    }

    pub fn outputs(mut self, outputs: &[i32]) -> Self {
        self.outputs = outputs.to_vec();
        self
    }

    pub fn to_bytes(&self) -> [u8; prefab_node::SIZE] {
        let mut buf = [0u8; prefab_node::SIZE];
        put_vec3(&mut buf, prefab_node::X, self.position);
        put_vec3(&mut buf, prefab_node::ROTATION_X, self.rotation);
        put_links(&mut buf, prefab_node::INPUT_CURVES, prefab_node::LANES, &self.inputs);
        put_links(&mut buf, prefab_node::OUTPUT_CURVES, prefab_node::LANES, &self.outputs);
        buf
    }
}

/// Prefab layout: header, curve section, node section
#[derive(Debug, Clone)]
pub struct PrefabBuilder {
    version: i32,
    curves: Vec<CurveRecord>,
    nodes: Vec<NodeRecord>,
}

impl Default for PrefabBuilder {
    fn default() -> Self {
        Self {
            version: prefab::KNOWN_VERSION,
            curves: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

impl PrefabBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    pub fn curve(mut self, record: CurveRecord) -> Self {
        self.curves.push(record);
        self
    }

    pub fn node(mut self, record: NodeRecord) -> Self {
        self.nodes.push(record);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let curve_offset = prefab::HEADER_SIZE;
        let node_offset = curve_offset + self.curves.len() * curve::SIZE;
        let end = node_offset + self.nodes.len() * prefab_node::SIZE;

        let mut buf = vec![0u8; prefab::HEADER_SIZE];
        put(&mut buf, prefab::VERSION, self.version.to_le_bytes());
        put(&mut buf, prefab::NODE_COUNT, (self.nodes.len() as i32).to_le_bytes());
        put(&mut buf, prefab::CURVE_COUNT, (self.curves.len() as i32).to_le_bytes());
        put(&mut buf, prefab::NODE_SECTION, (node_offset as i32).to_le_bytes());
        put(&mut buf, prefab::CURVE_SECTION, (curve_offset as i32).to_le_bytes());
        put(&mut buf, prefab::SECTION_3, (end as i32).to_le_bytes());
        put(&mut buf, prefab::SECTION_4, (end as i32).to_le_bytes());

        for record in &self.curves {
            buf.extend_from_slice(&record.to_bytes());
        }
        for record in &self.nodes {
            buf.extend_from_slice(&record.to_bytes());
        }
        buf
    }
}
