use std::f32::consts::PI;

use glam::Vec3;
use serde::Serialize;

use crate::error::Result;
use crate::layout::prefab_node;
use crate::prefab::curve::linked_indices;
use crate::reader::ReadBytes;

/// Entry/exit point of a prefab, in prefab-local space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefabNode {
    pub index: usize,
    pub position: Vec3,
    pub rotation: Vec3,
    /// `PI - atan2(rotation.z, rotation.x)`; note the offset compared to curve yaw
    pub yaw: f32,
    /// Curves driving into the prefab through this node
    pub input_curves: Vec<usize>,
    /// Curves leaving the prefab through this node
    pub output_curves: Vec<usize>,
}

impl PrefabNode {
    /// Decode the node record at `offset`, returning the raw input/output
    /// curve groups alongside it
    pub(crate) fn parse(
        buf: &[u8],
        offset: usize,
        index: usize,
    ) -> Result<(Self, Vec<i32>, Vec<i32>)> {
        let position = Vec3::new(
            buf.read_f32(offset + prefab_node::X)?,
            buf.read_f32(offset + prefab_node::Y)?,
            buf.read_f32(offset + prefab_node::Z)?,
        );
        let rotation = Vec3::new(
            buf.read_f32(offset + prefab_node::ROTATION_X)?,
            buf.read_f32(offset + prefab_node::ROTATION_Y)?,
            buf.read_f32(offset + prefab_node::ROTATION_Z)?,
        );

        let inputs = linked_indices(
            buf.read_i32_group(offset + prefab_node::INPUT_CURVES, prefab_node::LANES)?,
        );
        let outputs = linked_indices(
            buf.read_i32_group(offset + prefab_node::OUTPUT_CURVES, prefab_node::LANES)?,
        );

        let parsed = Self {
            index,
            position,
            rotation,
            yaw: PI - rotation.z.atan2(rotation.x),
            input_curves: Vec::new(),
            output_curves: Vec::new(),
        };

        Ok((parsed, inputs, outputs))
    }
}
