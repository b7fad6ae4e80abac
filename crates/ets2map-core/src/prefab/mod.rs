//! Prefab file decoder and route engine.
//!
//! A prefab is a reusable junction: a small directed graph of navigation
//! curves, entered and left through prefab nodes. This module decodes the
//! fixed-layout prefab file, enumerates the drivable routes through it and
//! projects its curves into world space for rendering.

mod curve;
#[cfg(test)]
pub(crate) mod fixtures;
mod node;
mod polygon;
mod route;

pub use curve::PrefabCurve;
pub use node::PrefabNode;
pub use polygon::Point;
pub use route::PrefabRoute;

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::layout::{curve as curve_layout, prefab, prefab_node};
use crate::reader::ReadBytes;

/// Section counts and offsets from the prefab header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefabHeader {
    pub version: i32,
    pub node_count: i32,
    pub curve_count: i32,
    pub terrain_count: i32,
    pub sign_count: i32,
    pub spawn_count: i32,
    pub semaphore_count: i32,
    pub map_point_count: i32,
    pub trigger_count: i32,
    pub intersection_count: i32,
    pub node_offset: i32,
    pub curve_offset: i32,
    pub section_3_offset: i32,
    pub section_4_offset: i32,
}

impl PrefabHeader {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        Ok(Self {
            version: buf.read_i32(prefab::VERSION)?,
            node_count: buf.read_i32(prefab::NODE_COUNT)?,
            curve_count: buf.read_i32(prefab::CURVE_COUNT)?,
            terrain_count: buf.read_i32(prefab::TERRAIN_COUNT)?,
            sign_count: buf.read_i32(prefab::SIGN_COUNT)?,
            spawn_count: buf.read_i32(prefab::SPAWN_COUNT)?,
            semaphore_count: buf.read_i32(prefab::SEMAPHORE_COUNT)?,
            map_point_count: buf.read_i32(prefab::MAP_POINT_COUNT)?,
            trigger_count: buf.read_i32(prefab::TRIGGER_COUNT)?,
            intersection_count: buf.read_i32(prefab::INTERSECTION_COUNT)?,
            node_offset: buf.read_i32(prefab::NODE_SECTION)?,
            curve_offset: buf.read_i32(prefab::CURVE_SECTION)?,
            section_3_offset: buf.read_i32(prefab::SECTION_3)?,
            section_4_offset: buf.read_i32(prefab::SECTION_4)?,
        })
    }

    pub fn is_known_version(&self) -> bool {
        self.version == prefab::KNOWN_VERSION
    }
}

/// Decoded prefab: header, curve graph and entry/exit nodes
#[derive(Debug, Clone, Serialize)]
pub struct Prefab {
    pub name: String,
    pub header: PrefabHeader,
    pub nodes: Vec<PrefabNode>,
    pub curves: Vec<PrefabCurve>,
}

impl Prefab {
    /// Read and decode a prefab file; the prefab is named after the file stem
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::parse(name, &bytes)
    }

    /// Decode a prefab buffer.
    ///
    /// A version other than the known one is logged and tolerated. Sections
    /// running past the end of the buffer and curve indices outside the curve
    /// list are errors.
    pub fn parse(name: impl Into<String>, buf: &[u8]) -> Result<Self> {
        let name = name.into();
        let header = PrefabHeader::parse(buf)?;

        if !header.is_known_version() {
            debug!(
                "{}: prefab version {} (expected {}), decoding anyway",
                name,
                header.version,
                prefab::KNOWN_VERSION
            );
        }

        let curve_count = section_len(header.curve_count, "curve count")?;
        let node_count = section_len(header.node_count, "node count")?;
        let curve_offset = section_len(header.curve_offset, "curve section offset")?;
        let node_offset = section_len(header.node_offset, "node section offset")?;
        check_section(buf, curve_offset, curve_count, curve_layout::SIZE)?;
        check_section(buf, node_offset, node_count, prefab_node::SIZE)?;

        // First pass: records only. Links may point forward in the list.
        let mut curves = Vec::with_capacity(curve_count);
        let mut links = Vec::with_capacity(curve_count);
        for index in 0..curve_count {
            let offset = curve_offset + index * curve_layout::SIZE;
            let (curve, raw) = PrefabCurve::parse(buf, offset, index)?;
            curves.push(curve);
            links.push(raw);
        }

        // Second pass: every curve exists now, so links can be checked
        for (curve, raw) in curves.iter_mut().zip(links) {
            curve.next = resolve_indices(&raw.next, curve_count, "successor curve")?;
            curve.prev = resolve_indices(&raw.prev, curve_count, "predecessor curve")?;
        }

        let mut nodes = Vec::with_capacity(node_count);
        for index in 0..node_count {
            let offset = node_offset + index * prefab_node::SIZE;
            let (mut node, inputs, outputs) = PrefabNode::parse(buf, offset, index)?;
            node.input_curves = resolve_indices(&inputs, curve_count, "input curve")?;
            node.output_curves = resolve_indices(&outputs, curve_count, "output curve")?;
            nodes.push(node);
        }

        Ok(Self {
            name,
            header,
            nodes,
            curves,
        })
    }

    pub fn node(&self, index: usize) -> Option<&PrefabNode> {
        self.nodes.get(index)
    }

    pub fn curve(&self, index: usize) -> Option<&PrefabCurve> {
        self.curves.get(index)
    }

    /// Whether `file` names this prefab, ignoring directory and extension
    pub fn is_file<P: AsRef<Path>>(&self, file: P) -> bool {
        file.as_ref()
            .file_stem()
            .is_some_and(|stem| stem.to_string_lossy() == self.name)
    }
}

fn section_len(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::InvalidPrefab(format!("negative {}: {}", what, value)))
}

/// Fail unless `count` records of `size` bytes starting at `offset` fit in `buf`
fn check_section(buf: &[u8], offset: usize, count: usize, size: usize) -> Result<()> {
    let len = count.checked_mul(size).ok_or_else(|| {
        Error::InvalidPrefab(format!("section of {} records overflows", count))
    })?;
    match offset.checked_add(len) {
        Some(end) if end <= buf.len() => Ok(()),
        _ => Err(Error::OutOfBounds {
            offset,
            len,
            size: buf.len(),
        }),
    }
}

fn resolve_indices(raw: &[i32], len: usize, what: &str) -> Result<Vec<usize>> {
    raw.iter()
        .map(|&i| {
            usize::try_from(i)
                .ok()
                .filter(|&i| i < len)
                .ok_or_else(|| Error::InvalidPrefab(format!("{} index {} out of range", what, i)))
        })
        .collect()
}
