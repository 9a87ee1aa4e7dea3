use crate::geom::{
    GeomContext, PolyMesh, ScrewOptions, Tolerance, TurnSpec, build_screw, generate_screw,
    generate_screw_with_context, weld_mesh_vertices,
};

#[test]
fn weld_merges_seam_of_stretch_free_screw() {
    let options = ScrewOptions {
        weld: true,
        ..ScrewOptions::default()
    };
    let raw = build_screw(&options).expect("raw screw");
    let (mesh, diag) = generate_screw(&options).expect("welded screw");

    // Seam of every turn meets the next turn: (turns - 1) · hs + 1 pairs.
    let expected_merges = 2 * 32 + 1;
    assert_eq!(diag.welded_vertex_count, expected_merges);
    assert_eq!(mesh.vertex_count(), raw.vertex_count() - expected_merges);
    assert_eq!(diag.collapsed_face_count, 0);
    assert_eq!(mesh.face_count(), raw.face_count());
    assert_eq!(diag.non_manifold_edge_count, 0);
    assert!(diag.open_edge_count > 0);
    assert_eq!(diag.repair_count(), expected_merges);
    assert!(diag.to_string().contains("Welded vertices: 65"));
    mesh.validate().expect("welded mesh valid");
}

#[test]
fn weld_merges_seam_of_square_profiles() {
    for winding_profile in [9.0, 10.0, 25.0] {
        let options = ScrewOptions {
            winding_profile,
            weld: true,
            ..ScrewOptions::default()
        };
        let (_, diag) = generate_screw(&options).expect("welded screw");

        assert_eq!(diag.welded_vertex_count, 2 * 32 + 1, "profile {winding_profile}");
        assert_eq!(diag.collapsed_face_count, 0);
        assert_eq!(diag.non_manifold_edge_count, 0);
    }
}

#[test]
fn stretch_keeps_seams_apart() {
    let options = ScrewOptions {
        stretch: 0.5,
        weld: true,
        ..ScrewOptions::default()
    };
    let (mesh, diag) = generate_screw(&options).expect("screw");
    assert_eq!(diag.welded_vertex_count, 0);
    assert_eq!(mesh.vertex_count(), (3 * 32 + 1) * 8);
}

#[test]
fn weld_drops_collapsed_join_quads() {
    let options = ScrewOptions {
        turns: TurnSpec::Count(3),
        helix_segments: 8,
        winding_segments: 4,
        join_windings: true,
        weld: true,
        ..ScrewOptions::default()
    };
    let raw = build_screw(&options).expect("raw screw");
    let (mesh, diag) = generate_screw(&options).expect("welded screw");

    assert_eq!(diag.welded_vertex_count, 2 * 8 + 1);
    assert_eq!(diag.collapsed_face_count, 2 * 8);
    assert_eq!(mesh.face_count(), raw.face_count() - 2 * 8);
    assert_eq!(diag.non_manifold_edge_count, 0);
    assert!(mesh.has_distinct_face_indices());
}

#[test]
fn welding_twice_is_stable() {
    let options = ScrewOptions {
        turns: TurnSpec::Count(2),
        helix_segments: 12,
        winding_segments: 5,
        smooth_faces: false,
        weld: true,
        ..ScrewOptions::default()
    };
    let (mesh, _) = generate_screw(&options).expect("screw");
    let (again, stats) = weld_mesh_vertices(mesh.clone(), Tolerance::MERGE_DISTANCE);

    assert_eq!(stats.welded_vertex_count, 0);
    assert_eq!(stats.collapsed_face_count, 0);
    assert_eq!(again, mesh);
}

#[test]
fn weld_remaps_faces_and_keeps_smooth_flags() {
    let mut mesh = PolyMesh::new(
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
        ],
        vec![vec![0, 1, 2], vec![3, 4, 5], vec![1, 3, 2]],
    );
    mesh.smooth[1] = true;

    let (welded, stats) = weld_mesh_vertices(mesh, Tolerance::MERGE_DISTANCE);
    assert_eq!(stats.welded_vertex_count, 1);
    assert_eq!(stats.collapsed_face_count, 1);
    assert_eq!(welded.vertex_count(), 5);
    assert_eq!(welded.faces, vec![vec![0, 1, 2], vec![1, 3, 4]]);
    assert_eq!(welded.smooth, vec![false, true]);
    assert!(welded.normals.is_none());
}

#[test]
fn unusable_merge_distance_skips_weld_with_warning() {
    let options = ScrewOptions {
        turns: TurnSpec::Count(2),
        helix_segments: 6,
        winding_segments: 3,
        weld: true,
        ..ScrewOptions::default()
    };
    let mut ctx = GeomContext::with_tolerance(Tolerance::new(0.0));
    let (mesh, diag) = generate_screw_with_context(&options, &mut ctx).expect("screw");

    assert_eq!(diag.welded_vertex_count, 0);
    assert_eq!(mesh.vertex_count(), (2 * 6 + 1) * 4);
    assert!(diag.has_warnings());
    assert!(diag.warnings.iter().any(|w| w.contains("weld skipped")));
}

#[test]
fn smoothing_is_idempotent() {
    let options = ScrewOptions {
        turns: TurnSpec::Count(1),
        helix_segments: 8,
        winding_segments: 3,
        ..ScrewOptions::default()
    };
    let (mut mesh, diag) = generate_screw(&options).expect("screw");
    assert_eq!(diag.smooth_face_count, mesh.face_count());

    let before = mesh.clone();
    mesh.mark_smooth();
    assert_eq!(mesh, before);

    let normals = mesh.normals.as_ref().expect("normals");
    for n in normals {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-9);
    }
}
