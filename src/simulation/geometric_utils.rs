//! Geometric utility functions for distance calculations and vector steering.
//!
//! Positions and velocities are 2-element `Array1<f32>` vectors throughout the
//! simulation. Every normalization goes through [`normalize`], which refuses to
//! divide by an effectively-zero length.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};
use ndarray::Array1;

/// Squared lengths at or below this value are treated as zero.
pub const EPSILON_SQUARED: f32 = 0.001;

/// Builds a 2D vector from its components.
pub fn vec2(x: f32, y: f32) -> Array1<f32> {
    Array1::from_vec(vec![x, y])
}

/// Returns the unit vector pointing along `angle` (radians).
pub fn from_angle(angle: f32) -> Array1<f32> {
    vec2(angle.cos(), angle.sin())
}

/// Squared Euclidean length of a 2D vector.
pub fn length_squared(v: &Array1<f32>) -> f32 {
    v.dot(v)
}

/// Squared distance between two positions.
pub fn distance_squared(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Euclidean distance between two positions.
///
/// # Arguments
///
/// * `a` - First position
/// * `b` - Second position
///
/// # Returns
///
/// The straight-line distance between `a` and `b`.
pub fn distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    Euclidean.distance(Point::new(a[0], a[1]), Point::new(b[0], b[1]))
}

/// Normalizes a vector, or returns `None` when its squared length is within
/// [`EPSILON_SQUARED`] of zero.
pub fn normalize(v: &Array1<f32>) -> Option<Array1<f32>> {
    let len_sq = length_squared(v);
    if len_sq > EPSILON_SQUARED {
        Some(v / len_sq.sqrt())
    } else {
        None
    }
}

/// Heading angle (radians) of a vector, measured from the positive x axis.
pub fn heading_of(v: &Array1<f32>) -> f32 {
    v[1].atan2(v[0])
}

/// Keeps a body of extent `size` inside the `[0, box_width] x [0, box_height]`
/// arena.
///
/// Each axis is handled independently: if the body's edge crosses an arena
/// edge, the position is clamped so the edge touches the wall and the matching
/// velocity component is negated.
///
/// # Arguments
///
/// * `pos` - Mutable position of the body's center
/// * `vel` - Mutable velocity of the body
/// * `size` - Side length of the body
/// * `box_width` - Width of the arena
/// * `box_height` - Height of the arena
///
/// # Returns
///
/// `true` if the body bounced off at least one wall.
pub fn reflect_in_box_mut(
    pos: &mut Array1<f32>,
    vel: &mut Array1<f32>,
    size: f32,
    box_width: f32,
    box_height: f32,
) -> bool {
    let half = size / 2.0;
    let mut bounced = false;

    for (axis, extent) in [(0, box_width), (1, box_height)] {
        if pos[axis] - half < 0.0 {
            pos[axis] = half;
            vel[axis] = -vel[axis];
            bounced = true;
        } else if pos[axis] + half > extent {
            pos[axis] = extent - half;
            vel[axis] = -vel[axis];
            bounced = true;
        }
    }

    bounced
}
