use std::collections::HashSet;

use crate::geom::{
    CapOptions, RingLayout, StitchOptions, SweepShape, TaperRamp, WindingProfile, build_caps,
    cap_element_count, stitch_faces, sweep_helix_vertices,
};
use crate::geom::mesh::count_edge_topology;

const WINDING_RADIUS: f64 = 0.3;

fn swept_positions(layout: RingLayout) -> Vec<[f64; 3]> {
    let profile = WindingProfile::sample(layout.winding_segments, WINDING_RADIUS, 1.0, 2.0);
    let taper = TaperRamp::new(1.0, 0.01, layout.helix_segments, layout.last_ring());
    let shape = SweepShape {
        helix_radius: 1.0,
        winding_radius: WINDING_RADIUS,
        stretch: 0.5,
    };
    sweep_helix_vertices(layout, &profile, &taper, shape).positions
}

fn capped(layout: RingLayout, options: CapOptions) -> (Vec<[f64; 3]>, Vec<Vec<u32>>) {
    let mut positions = swept_positions(layout);
    let mut faces = Vec::new();
    build_caps(layout, options, WINDING_RADIUS, &mut positions, &mut faces);
    (positions, faces)
}

#[test]
fn no_caps_adds_nothing() {
    let layout = RingLayout::new(1, 4, 3);
    let (positions, faces) = capped(layout, CapOptions::default());
    assert_eq!(positions.len(), layout.vertex_count());
    assert!(faces.is_empty());
    assert_eq!(cap_element_count(layout, CapOptions::default()), (0, 0));
}

#[test]
fn ngon_caps_cover_end_rings() {
    let layout = RingLayout::new(2, 4, 5);
    let options = CapOptions { ngon: true, ..CapOptions::default() };
    let (positions, faces) = capped(layout, options);

    assert_eq!(positions.len(), layout.vertex_count());
    assert_eq!(faces.len(), 2);
    assert_eq!(cap_element_count(layout, options), (0, 2));

    assert_eq!(faces[0], vec![0, 1, 2, 3, 4, 5]);
    let last = layout.last_ring();
    let expected_end: Vec<u32> = (0..=5).rev().map(|k| layout.vertex(last, k)).collect();
    assert_eq!(faces[1], expected_end);
}

#[test]
fn triangle_caps_add_apexes_and_fans() {
    let layout = RingLayout::new(1, 6, 4);
    let options = CapOptions { triangles: true, ..CapOptions::default() };
    let (positions, faces) = capped(layout, options);

    let sweep_count = layout.vertex_count();
    assert_eq!(positions.len(), sweep_count + 2);
    assert_eq!(faces.len(), 8);
    assert_eq!(cap_element_count(layout, options), (2, 8));

    let start_pt = sweep_count as u32;
    let end_pt = start_pt + 1;
    assert!(faces[..4].iter().all(|f| f.len() == 3 && f[0] == start_pt));
    assert!(faces[4..].iter().all(|f| f.len() == 3 && f[0] == end_pt));
    assert_eq!(faces[0], vec![start_pt, 0, 1]);

    let last = layout.last_ring();
    assert_eq!(faces[4], vec![end_pt, layout.vertex(last, 1), layout.vertex(last, 0)]);

    let first = positions[0];
    let start_apex = positions[sweep_count];
    assert!((start_apex[0] - first[0]).abs() < 1e-12);
    assert!((start_apex[1] - (first[1] - WINDING_RADIUS / 3.0)).abs() < 1e-12);
    assert!((start_apex[2] - (first[2] + WINDING_RADIUS)).abs() < 1e-12);

    let last_vertex = positions[sweep_count - 1];
    let end_apex = positions[sweep_count + 1];
    assert!((end_apex[0] - last_vertex[0]).abs() < 1e-12);
    assert!((end_apex[1] - (last_vertex[1] + WINDING_RADIUS / 3.0)).abs() < 1e-12);
    assert!((end_apex[2] - (last_vertex[2] - WINDING_RADIUS)).abs() < 1e-12);
}

#[test]
fn inner_faces_close_triangle_fans() {
    let layout = RingLayout::new(1, 6, 4);
    let options = CapOptions {
        triangles: true,
        inner_faces: true,
        ..CapOptions::default()
    };
    let (positions, faces) = capped(layout, options);

    assert_eq!(faces.len(), 10);
    assert_eq!(cap_element_count(layout, options), (2, 10));

    let start_pt = layout.vertex_count() as u32;
    assert_eq!(faces[4], vec![start_pt, 4, 0]);

    let last = layout.last_ring();
    assert_eq!(
        faces[9],
        vec![start_pt + 1, layout.vertex(last, 0), layout.vertex(last, 4)]
    );
    assert_eq!(positions.len(), layout.vertex_count() + 2);
}

#[test]
fn both_cap_kinds_can_combine() {
    let layout = RingLayout::new(2, 5, 3);
    let options = CapOptions {
        ngon: true,
        triangles: true,
        inner_faces: false,
    };
    let (positions, faces) = capped(layout, options);

    assert_eq!(positions.len(), layout.vertex_count() + 2);
    assert_eq!(faces.len(), 2 + 2 * 3);
    assert_eq!(faces[0].len(), 4);
    assert_eq!(faces[1].len(), 4);
}

#[test]
fn capped_tube_with_inner_wall_is_closed() {
    let layout = RingLayout::new(2, 8, 4);
    for caps in [
        CapOptions { ngon: true, triangles: false, inner_faces: true },
        CapOptions { ngon: false, triangles: true, inner_faces: true },
    ] {
        let mut positions = swept_positions(layout);
        let mut faces = Vec::new();
        stitch_faces(
            layout,
            StitchOptions { inner_faces: true, join_windings: false },
            &mut faces,
        );
        build_caps(layout, caps, WINDING_RADIUS, &mut positions, &mut faces);

        let (open, non_manifold) = count_edge_topology(&faces);
        assert_eq!(open, 0, "{caps:?}");
        assert_eq!(non_manifold, 0, "{caps:?}");

        let mut seen = HashSet::new();
        for face in &faces {
            for i in 0..face.len() {
                assert!(seen.insert((face[i], face[(i + 1) % face.len()])), "{caps:?}");
            }
        }
    }
}
