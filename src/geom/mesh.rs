use std::collections::HashMap;

use super::diagnostics::GeomMeshDiagnostics;
use super::metrics::{GeomMetrics, TimingBucket};
use super::{Point3, Tolerance, Vec3};

/// Polygon mesh handed out by the generator.
///
/// Faces are ordered index lists (triangles, quads and n-gon caps) whose
/// winding gives the outward normal. `smooth` holds one shading flag per face.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyMesh {
    pub positions: Vec<[f64; 3]>,
    pub faces: Vec<Vec<u32>>,
    pub smooth: Vec<bool>,
    /// Area-weighted vertex normals, filled in by [`PolyMesh::mark_smooth`].
    pub normals: Option<Vec<[f64; 3]>>,
}

impl PolyMesh {
    /// Create a flat-shaded mesh from positions and faces.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, faces: Vec<Vec<u32>>) -> Self {
        let smooth = vec![false; faces.len()];
        Self {
            positions,
            faces,
            smooth,
            normals: None,
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().filter(|f| f.len() == 3).count()
    }

    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.faces.iter().filter(|f| f.len() == 4).count()
    }

    #[must_use]
    pub fn ngon_count(&self) -> usize {
        self.faces.iter().filter(|f| f.len() > 4).count()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all face indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.faces
            .iter()
            .flatten()
            .all(|&i| (i as usize) < n)
    }

    /// Returns true if every face has at least three corners and no repeated index.
    #[must_use]
    pub fn has_distinct_face_indices(&self) -> bool {
        self.faces.iter().all(|face| face.len() >= 3 && !has_repeated_index(face))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if !self.has_distinct_face_indices() {
            return Err("mesh has degenerate faces (fewer than 3 corners or repeated indices)".to_string());
        }
        if self.smooth.len() != self.faces.len() {
            return Err("mesh smooth flags do not match face count".to_string());
        }
        if self
            .normals
            .as_ref()
            .is_some_and(|normals| normals.len() != self.positions.len())
        {
            return Err("mesh normals do not match vertex count".to_string());
        }
        Ok(())
    }

    /// Flag every face as smooth shaded and compute vertex normals.
    ///
    /// Idempotent: calling it again recomputes the same normals.
    pub fn mark_smooth(&mut self) {
        self.smooth = vec![true; self.faces.len()];
        self.normals = Some(compute_smooth_normals(&self.positions, &self.faces));
    }
}

fn has_repeated_index(face: &[u32]) -> bool {
    face.iter()
        .enumerate()
        .any(|(i, a)| face[i + 1..].contains(a))
}

#[derive(Debug)]
pub struct GeomContext {
    /// Merge distance used by the weld pass.
    pub tolerance: Tolerance,
    pub metrics: GeomMetrics,
}

impl GeomContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tolerance: Tolerance::MERGE_DISTANCE,
            metrics: GeomMetrics::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            metrics: GeomMetrics::default(),
        }
    }
}

impl Default for GeomContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Post-processing requested from the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitOptions {
    /// Merge coincident vertices (within the context tolerance).
    pub weld: bool,
    /// Flag faces smooth and compute vertex normals.
    pub smooth_faces: bool,
}

/// Counts reported by [`weld_mesh_vertices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeldStats {
    pub welded_vertex_count: usize,
    pub collapsed_face_count: usize,
}

/// Apply the requested post-processing and compute diagnostics.
pub(crate) fn finalize_mesh(
    mesh: PolyMesh,
    emit: EmitOptions,
    ctx: &mut GeomContext,
) -> (PolyMesh, GeomMeshDiagnostics) {
    let mut weld_skipped = false;
    let tol = ctx.tolerance;

    let (mut mesh, weld_stats) = if emit.weld {
        if tol.is_usable() {
            ctx.metrics.time(TimingBucket::Welding, || weld_mesh_vertices(mesh, tol))
        } else {
            log::warn!("weld skipped: merge distance {} is not usable", tol.eps);
            weld_skipped = true;
            (mesh, WeldStats::default())
        }
    } else {
        (mesh, WeldStats::default())
    };

    if emit.smooth_faces {
        ctx.metrics.time(TimingBucket::Shading, || mesh.mark_smooth());
    }

    let (open_edge_count, non_manifold_edge_count) = ctx
        .metrics
        .time(TimingBucket::Diagnostics, || count_edge_topology(&mesh.faces));

    let mut diagnostics = GeomMeshDiagnostics {
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        quad_count: mesh.quad_count(),
        triangle_count: mesh.triangle_count(),
        ngon_count: mesh.ngon_count(),
        smooth_face_count: mesh.smooth.iter().filter(|s| **s).count(),
        welded_vertex_count: weld_stats.welded_vertex_count,
        collapsed_face_count: weld_stats.collapsed_face_count,
        open_edge_count,
        non_manifold_edge_count,
        timing: None,
        warnings: Vec::new(),
    };

    if weld_skipped {
        diagnostics.add_warning("weld skipped (invalid merge distance)");
    }
    if non_manifold_edge_count > 0 {
        diagnostics.add_warning("mesh has non-manifold edges");
    }

    (mesh, diagnostics)
}

/// Merge vertices closer than `tol` and drop faces the merge collapses.
///
/// The first vertex of each coincident cluster is kept, so the output order
/// follows the input order. Faces are remapped; repeated neighbouring corners
/// are removed and faces left with fewer than three distinct corners are
/// dropped. Vertex normals are discarded (recompute with
/// [`PolyMesh::mark_smooth`]); per-face smooth flags follow their faces.
#[must_use]
pub fn weld_mesh_vertices(mesh: PolyMesh, tol: Tolerance) -> (PolyMesh, WeldStats) {
    if !tol.is_usable() {
        return (mesh, WeldStats::default());
    }

    let inv = 1.0 / tol.eps;

    /// Quantize a coordinate value to a grid cell index.
    /// Returns None for non-finite values (NaN/Inf) to prevent incorrect welding.
    fn quantize(value: f64, inv: f64) -> Option<i64> {
        if !value.is_finite() {
            return None;
        }
        let q = (value * inv).floor();
        Some(q.clamp(i64::MIN as f64, i64::MAX as f64) as i64)
    }

    let PolyMesh {
        positions,
        faces,
        smooth,
        normals: _,
    } = mesh;

    let mut buckets: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    let mut remap: Vec<u32> = Vec::with_capacity(positions.len());
    let mut out_points: Vec<Point3> = Vec::with_capacity(positions.len());

    for p in positions.iter().copied().map(Point3::from) {
        let key = match (quantize(p.x, inv), quantize(p.y, inv), quantize(p.z, inv)) {
            (Some(kx), Some(ky), Some(kz)) => Some((kx, ky, kz)),
            _ => None,
        };

        // Non-finite points never merge; they keep their own vertex.
        let found = key.filter(|_| p.is_finite()).and_then(|key| {
            for dx in -1i64..=1 {
                for dy in -1i64..=1 {
                    for dz in -1i64..=1 {
                        let lookup = (key.0 + dx, key.1 + dy, key.2 + dz);
                        let Some(candidates) = buckets.get(&lookup) else {
                            continue;
                        };
                        if let Some(&cand) = candidates
                            .iter()
                            .find(|&&cand| tol.approx_eq_point3(out_points[cand as usize], p))
                        {
                            return Some(cand);
                        }
                    }
                }
            }
            None
        });

        let out_idx = if let Some(existing) = found {
            existing
        } else {
            let new_idx = out_points.len() as u32;
            out_points.push(p);
            if let Some(key) = key {
                buckets.entry(key).or_default().push(new_idx);
            }
            new_idx
        };

        remap.push(out_idx);
    }

    let mut out_faces = Vec::with_capacity(faces.len());
    let mut out_smooth = Vec::with_capacity(faces.len());
    let mut collapsed = 0usize;

    for (face, flag) in faces.into_iter().zip(smooth) {
        let mut welded: Vec<u32> = Vec::with_capacity(face.len());
        for idx in face {
            let mapped = remap.get(idx as usize).copied().unwrap_or(idx);
            if welded.last() != Some(&mapped) {
                welded.push(mapped);
            }
        }
        while welded.len() > 1 && welded.first() == welded.last() {
            welded.pop();
        }

        if welded.len() < 3 || has_repeated_index(&welded) {
            collapsed += 1;
            continue;
        }
        out_faces.push(welded);
        out_smooth.push(flag);
    }

    let stats = WeldStats {
        welded_vertex_count: positions.len().saturating_sub(out_points.len()),
        collapsed_face_count: collapsed,
    };

    let mesh = PolyMesh {
        positions: out_points.into_iter().map(Point3::to_array).collect(),
        faces: out_faces,
        smooth: out_smooth,
        normals: None,
    };

    (mesh, stats)
}

/// Count boundary edges (one face) and non-manifold edges (more than two faces).
pub(crate) fn count_edge_topology(faces: &[Vec<u32>]) -> (usize, usize) {
    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();

    for face in faces {
        let n = face.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            let ea = face[i];
            let eb = face[(i + 1) % n];
            if ea == eb {
                continue;
            }
            let (lo, hi) = if ea <= eb { (ea, eb) } else { (eb, ea) };
            *edge_counts.entry((lo, hi)).or_insert(0) += 1;
        }
    }

    let mut open_edge_count = 0usize;
    let mut non_manifold_edge_count = 0usize;
    for count in edge_counts.into_values() {
        if count == 1 {
            open_edge_count += 1;
        } else if count > 2 {
            non_manifold_edge_count += 1;
        }
    }

    (open_edge_count, non_manifold_edge_count)
}

/// Newell normal of a polygon; its length is twice the polygon area.
fn face_normal(positions: &[[f64; 3]], face: &[u32]) -> Option<Vec3> {
    let n = face.len();
    let mut normal = Vec3::ZERO;
    for i in 0..n {
        let a = positions.get(face[i] as usize)?;
        let b = positions.get(face[(i + 1) % n] as usize)?;
        normal = normal
            + Vec3::new(
                (a[1] - b[1]) * (a[2] + b[2]),
                (a[2] - b[2]) * (a[0] + b[0]),
                (a[0] - b[0]) * (a[1] + b[1]),
            );
    }
    Some(normal)
}

fn compute_smooth_normals(positions: &[[f64; 3]], faces: &[Vec<u32>]) -> Vec<[f64; 3]> {
    let mut sums = vec![Vec3::ZERO; positions.len()];

    for face in faces {
        let Some(normal) = face_normal(positions, face) else {
            continue;
        };
        for &idx in face {
            sums[idx as usize] = sums[idx as usize] + normal;
        }
    }

    sums.into_iter()
        .map(|n| n.normalized().map_or([0.0, 0.0, 1.0], Vec3::to_array))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> PolyMesh {
        PolyMesh::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            vec![vec![0, 1, 2, 3]],
        )
    }

    #[test]
    fn face_normal_of_ccw_square_points_up() {
        let mesh = unit_square();
        let n = face_normal(&mesh.positions, &mesh.faces[0]).unwrap();
        assert!((n.z - 2.0).abs() < 1e-12);
        assert!(n.x.abs() < 1e-12 && n.y.abs() < 1e-12);
    }

    #[test]
    fn repeated_index_detection() {
        assert!(has_repeated_index(&[0, 1, 2, 1]));
        assert!(!has_repeated_index(&[0, 1, 2, 3]));
    }

    #[test]
    fn edge_topology_of_single_quad() {
        let mesh = unit_square();
        assert_eq!(count_edge_topology(&mesh.faces), (4, 0));
    }
}
