//! End caps for the open winding tube.

use super::helix::RingLayout;
use super::{Point3, Vec3};

/// Cap variants; both may be enabled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapOptions {
    /// One polygon per end over the whole end ring.
    pub ngon: bool,
    /// A triangle fan per end to a synthesized apex vertex.
    pub triangles: bool,
    /// Also close the seam gap between samples `0` and `ws` in the triangle fans.
    pub inner_faces: bool,
}

/// Number of `(vertices, faces)` [`build_caps`] appends for `layout`.
#[must_use]
pub fn cap_element_count(layout: RingLayout, options: CapOptions) -> (usize, usize) {
    let mut vertices = 0;
    let mut faces = 0;
    if options.ngon {
        faces += 2;
    }
    if options.triangles {
        vertices += 2;
        faces += 2 * layout.winding_segments;
        if options.inner_faces {
            faces += 2;
        }
    }
    (vertices, faces)
}

/// Append cap faces (and, for triangle caps, the two apex vertices).
///
/// `positions` must hold exactly the sweep vertices of `layout`.
pub fn build_caps(
    layout: RingLayout,
    options: CapOptions,
    winding_radius: f64,
    positions: &mut Vec<[f64; 3]>,
    faces: &mut Vec<Vec<u32>>,
) {
    debug_assert_eq!(positions.len(), layout.vertex_count());
    let ws = layout.winding_segments;
    let last = layout.last_ring();

    if options.ngon {
        faces.push((0..=ws).map(|k| layout.vertex(0, k)).collect());
        faces.push((0..=ws).rev().map(|k| layout.vertex(last, k)).collect());
    }

    if options.triangles {
        let (Some(&first_vertex), Some(&last_vertex)) = (positions.first(), positions.last()) else {
            return;
        };

        let start_apex = Point3::from(first_vertex)
            + Vec3::new(0.0, -winding_radius / 3.0, winding_radius);
        let end_apex = Point3::from(last_vertex)
            + Vec3::new(0.0, winding_radius / 3.0, -winding_radius);

        let start_pt = positions.len() as u32;
        let end_pt = start_pt + 1;
        positions.push(start_apex.to_array());
        positions.push(end_apex.to_array());

        for k in 0..ws {
            faces.push(vec![start_pt, layout.vertex(0, k), layout.vertex(0, k + 1)]);
        }
        if options.inner_faces {
            faces.push(vec![start_pt, layout.vertex(0, ws), layout.vertex(0, 0)]);
        }

        for k in 0..ws {
            faces.push(vec![end_pt, layout.vertex(last, k + 1), layout.vertex(last, k)]);
        }
        if options.inner_faces {
            faces.push(vec![end_pt, layout.vertex(last, 0), layout.vertex(last, ws)]);
        }
    }
}
