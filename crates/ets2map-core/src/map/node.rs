use std::f32::consts::PI;

use glam::{Vec3, Vec4};
use serde::Serialize;

use crate::error::Result;
use crate::layout::node;
use crate::reader::ReadBytes;

/// Which of a node's two item links a reference belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn is_backward(self) -> bool {
        self == Direction::Backward
    }
}

/// World node decoded from a 56-byte sector record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub uid: u64,
    pub position: Vec3,
    pub rotation: Vec4,
    /// Heading in radians, `PI - atan2(rotation.z, rotation.x)`
    pub yaw: f32,
    pub flags: u32,

    /// Declared item links, 0 when absent
    pub forward_item_uid: u64,
    pub backward_item_uid: u64,

    /// Set once the linked item has been located and applied
    pub forward_item: Option<u64>,
    pub backward_item: Option<u64>,
}

fn yaw_of(rotation: Vec4) -> f32 {
    PI - rotation.z.atan2(rotation.x)
}

impl Node {
    /// Free-standing node with no uid or links, for placing a prefab at an
    /// arbitrary world position
    pub fn placement(position: Vec3, rotation: Vec4) -> Self {
        Self {
            uid: 0,
            position,
            rotation,
            yaw: yaw_of(rotation),
            flags: 0,
            forward_item_uid: 0,
            backward_item_uid: 0,
            forward_item: None,
            backward_item: None,
        }
    }

    /// Decode the node record starting at `offset`
    pub fn parse(buf: &[u8], offset: usize) -> Result<Self> {
        let fixed = |field: usize| -> Result<f32> {
            Ok(buf.read_i32(offset + field)? as f32 / node::FIXED_POINT_SCALE)
        };

        let position = Vec3::new(fixed(node::X)?, fixed(node::Y)?, fixed(node::Z)?);
        let rotation = Vec4::new(
            buf.read_f32(offset + node::ROTATION_X)?,
            buf.read_f32(offset + node::ROTATION_Y)?,
            buf.read_f32(offset + node::ROTATION_Z)?,
            buf.read_f32(offset + node::ROTATION_W)?,
        );

        Ok(Self {
            uid: buf.read_u64(offset + node::UID)?,
            position,
            rotation,
            yaw: yaw_of(rotation),
            flags: buf.read_u32(offset + node::FLAGS)?,
            forward_item_uid: buf.read_u64(offset + node::FORWARD_ITEM)?,
            backward_item_uid: buf.read_u64(offset + node::BACKWARD_ITEM)?,
            forward_item: None,
            backward_item: None,
        })
    }

    /// Declared item uid for a direction (0 = none)
    pub fn item_uid(&self, direction: Direction) -> u64 {
        match direction {
            Direction::Forward => self.forward_item_uid,
            Direction::Backward => self.backward_item_uid,
        }
    }

    /// Resolved item for a direction
    pub fn item(&self, direction: Direction) -> Option<u64> {
        match direction {
            Direction::Forward => self.forward_item,
            Direction::Backward => self.backward_item,
        }
    }

    pub fn link(&mut self, direction: Direction, item_uid: u64) {
        match direction {
            Direction::Forward => self.forward_item = Some(item_uid),
            Direction::Backward => self.backward_item = Some(item_uid),
        }
    }

    /// Declared links that still have no resolved item
    pub fn unresolved(&self) -> impl Iterator<Item = (Direction, u64)> + '_ {
        [Direction::Forward, Direction::Backward]
            .into_iter()
            .filter(|&d| self.item_uid(d) != 0 && self.item(d).is_none())
            .map(|d| (d, self.item_uid(d)))
    }

    /// Resolved item uids, forward first
    pub fn items(&self) -> impl Iterator<Item = u64> {
        self.forward_item.into_iter().chain(self.backward_item)
    }
}
