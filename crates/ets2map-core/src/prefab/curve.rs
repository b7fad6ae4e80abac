use glam::Vec3;
use serde::Serialize;

use crate::error::Result;
use crate::layout::{curve, prefab};
use crate::reader::ReadBytes;

/// Navigation curve inside a prefab, in prefab-local space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefabCurve {
    pub index: usize,
    pub start: Vec3,
    pub end: Vec3,
    pub start_rotation: Vec3,
    pub end_rotation: Vec3,
    /// `atan2(rotation.z, rotation.x)` of the start/end rotation vectors
    pub start_yaw: f32,
    pub end_yaw: f32,
    pub length: f32,
    /// Successor curve indices
    pub next: Vec<usize>,
    /// Predecessor curve indices
    pub prev: Vec<usize>,
}

/// Link groups as stored, before they are checked against the curve list
#[derive(Debug, Clone, Default)]
pub(crate) struct RawLinks {
    pub next: Vec<i32>,
    pub prev: Vec<i32>,
}

impl PrefabCurve {
    /// Decode the curve record at `offset`. Links are left empty and
    /// returned separately, since they may point at curves not parsed yet.
    pub(crate) fn parse(buf: &[u8], offset: usize, index: usize) -> Result<(Self, RawLinks)> {
        let vec3 = |x: usize, y: usize, z: usize| -> Result<Vec3> {
            Ok(Vec3::new(
                buf.read_f32(offset + x)?,
                buf.read_f32(offset + y)?,
                buf.read_f32(offset + z)?,
            ))
        };

        let start_rotation = vec3(
            curve::START_ROTATION_X,
            curve::START_ROTATION_Y,
            curve::START_ROTATION_Z,
        )?;
        let end_rotation = vec3(
            curve::END_ROTATION_X,
            curve::END_ROTATION_Y,
            curve::END_ROTATION_Z,
        )?;

        let links = RawLinks {
            next: linked_indices(buf.read_i32_group(offset + curve::NEXT, curve::LINKS)?),
            prev: linked_indices(buf.read_i32_group(offset + curve::PREV, curve::LINKS)?),
        };

        let parsed = Self {
            index,
            start: vec3(curve::START_X, curve::START_Y, curve::START_Z)?,
            end: vec3(curve::END_X, curve::END_Y, curve::END_Z)?,
            start_yaw: start_rotation.z.atan2(start_rotation.x),
            end_yaw: end_rotation.z.atan2(end_rotation.x),
            start_rotation,
            end_rotation,
            length: buf.read_f32(offset + curve::LENGTH)?,
            next: Vec::new(),
            prev: Vec::new(),
        };

        Ok((parsed, links))
    }

    pub fn is_dead_end(&self) -> bool {
        self.next.is_empty()
    }
}

/// Drop "no link" sentinels from a stored index group
pub(crate) fn linked_indices(group: Vec<i32>) -> Vec<i32> {
    group.into_iter().filter(|&i| i != prefab::NO_LINK).collect()
}
