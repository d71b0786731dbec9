//! Plane geometry for portal surfaces
//!
//! Rotations, reflections, and the box-vs-segment test used to decide
//! whether an impact actually touches a portal.

use glam::Vec2;

use crate::consts::PORTAL_EDGE_HALF_LENGTH;
use crate::unit_from_angle;

/// Rotate `v` counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Reflect `v` about a unit surface normal
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

/// Endpoints of a portal's surface, given its center and orientation
pub fn segment_from_portal(center: Vec2, angle: f32) -> (Vec2, Vec2) {
    let along = unit_from_angle(angle) * PORTAL_EDGE_HALF_LENGTH;
    (center - along, center + along)
}

/// Whether an axis-aligned box touches the segment `start..end`
///
/// Clips the segment against each slab of the box (Liang-Barsky).
/// Touching an edge counts as an intersection.
pub fn aabb_intersects_segment(top_left: Vec2, size: Vec2, start: Vec2, end: Vec2) -> bool {
    let min = top_left;
    let max = top_left + size;
    let d = end - start;

    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    let slabs = [
        (-d.x, start.x - min.x),
        (d.x, max.x - start.x),
        (-d.y, start.y - min.y),
        (d.y, max.y - start.y),
    ];

    for (p, q) in slabs {
        if p == 0.0 {
            // Parallel to this slab: must already be inside it
            if q < 0.0 {
                return false;
            }
            continue;
        }

        let t = q / p;
        if p < 0.0 {
            if t > t_exit {
                return false;
            }
            t_enter = t_enter.max(t);
        } else {
            if t < t_enter {
                return false;
            }
            t_exit = t_exit.min(t);
        }
    }

    t_enter <= t_exit
}
