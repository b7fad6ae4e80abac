use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::Serialize;

use crate::map::Node;
use crate::prefab::{Prefab, PrefabRoute};

/// World-space point with a heading in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub heading: f32,
}

impl Point {
    pub fn new(x: f32, y: f32, z: f32, heading: f32) -> Self {
        Self { x, y, z, heading }
    }
}

/// Maps prefab-local positions onto the world, given the world node the
/// prefab is placed at and the prefab node that placement refers to
struct Projection {
    origin: Vec3,
    reference: Vec3,
    yaw: f32,
}

impl Projection {
    /// Projected (x, z) and the angle used to get there
    fn project(&self, local: Vec3) -> (f32, f32, f32) {
        let dx = local.x - self.reference.x;
        let dz = local.z - self.reference.z;
        let radius = (dx * dx + dz * dz).sqrt();
        let angle = self.yaw - dz.atan2(dx);

        (
            self.origin.x - radius * angle.sin(),
            self.origin.z - radius * angle.cos(),
            angle,
        )
    }
}

impl Prefab {
    fn projection(&self, placement: &Node, reference: usize) -> Option<Projection> {
        let reference = self.nodes.get(reference).or_else(|| self.nodes.first())?;
        Some(Projection {
            origin: placement.position,
            reference: reference.position,
            yaw: placement.yaw - reference.yaw + FRAC_PI_2,
        })
    }

    /// Project every curve of `route` into world space.
    ///
    /// Two points per curve (start, end) at the placement's height, joined
    /// linearly. A `reference` outside the node list falls back to node 0.
    pub fn polygon_for_route(&self, route: &PrefabRoute, placement: &Node, reference: usize) -> Vec<Point> {
        let Some(projection) = self.projection(placement, reference) else {
            return Vec::new();
        };

        route
            .curves
            .iter()
            .filter_map(|&index| self.curves.get(index))
            .flat_map(|curve| {
                let (sx, sz, start_angle) = projection.project(curve.start);
                let (ex, ez, end_angle) = projection.project(curve.end);
                [
                    Point::new(sx, placement.position.y, sz, start_angle),
                    Point::new(ex, placement.position.y, ez, end_angle),
                ]
            })
            .collect()
    }

    /// Project every curve of the prefab into world space, one start/end
    /// pair per curve, for drawing the whole junction.
    pub fn polygon_curves(&self, placement: &Node, reference: usize) -> Vec<Vec<Point>> {
        let Some(projection) = self.projection(placement, reference) else {
            return Vec::new();
        };

        self.curves
            .iter()
            .map(|curve| {
                let (sx, sz, _) = projection.project(curve.start);
                let (ex, ez, _) = projection.project(curve.end);
                vec![Point::new(sx, 0.0, sz, 0.0), Point::new(ex, 0.0, ez, 0.0)]
            })
            .collect()
    }
}
