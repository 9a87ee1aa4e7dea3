//! Mesh diagnostics for generated screw meshes.
//!
//! Diagnostics are collected by the mesh emitter after the optional weld and
//! smooth passes. They report the face mix (quads, triangles, n-gons), what the
//! weld merged or dropped, and the edge topology of the final mesh.
//!
//! # Example
//!
//! ```ignore
//! use screw_engine::geom::{ScrewOptions, generate_screw};
//!
//! let (mesh, diagnostics) = generate_screw(&ScrewOptions::default())?;
//! println!("{}", diagnostics.summary());
//! if !diagnostics.is_manifold() {
//!     eprintln!("{} non-manifold edges", diagnostics.non_manifold_edge_count);
//! }
//! ```

use std::fmt;

/// Diagnostics for a finished polygon mesh.
///
/// # Topology Metrics
///
/// - `open_edge_count`: edges used by exactly one face (tube ends, uncapped seams)
/// - `non_manifold_edge_count`: edges used by more than two faces
///
/// # Repair Statistics
///
/// - `welded_vertex_count`: vertices merged into an earlier coincident vertex
/// - `collapsed_face_count`: faces dropped because welding left fewer than three corners
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeomMeshDiagnostics {
    /// Total number of vertices in the final mesh.
    pub vertex_count: usize,

    /// Total number of faces in the final mesh.
    pub face_count: usize,

    /// Number of four-sided faces.
    pub quad_count: usize,

    /// Number of three-sided faces.
    pub triangle_count: usize,

    /// Number of faces with more than four corners (n-gon caps).
    pub ngon_count: usize,

    /// Number of faces flagged for smooth shading.
    pub smooth_face_count: usize,

    /// Number of vertices merged during tolerance-based welding.
    pub welded_vertex_count: usize,

    /// Number of faces removed because welding collapsed them.
    ///
    /// Join-winding quads of a stretch-free screw bridge coincident seam
    /// vertices and always end up here after a weld.
    pub collapsed_face_count: usize,

    /// Number of open (boundary) edges in the mesh.
    pub open_edge_count: usize,

    /// Number of edges shared by more than two faces.
    pub non_manifold_edge_count: usize,

    /// Optional timing breakdown by pipeline stage.
    ///
    /// Only populated when the `mesh_engine_metrics` feature is enabled
    /// and the target is not WASM.
    pub timing: Option<super::metrics::GeomTimingReport>,

    /// Human-readable warnings about the mesh and the passes applied to it.
    pub warnings: Vec<String>,
}

impl GeomMeshDiagnostics {
    /// Returns `true` if the mesh has no open edges.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    /// Returns `true` if no edge is shared by more than two faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// Returns `true` if the mesh is manifold, nothing was collapsed and no
    /// warnings were recorded. Open edges are expected on an uncapped screw and
    /// do not count against it.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.non_manifold_edge_count == 0
            && self.collapsed_face_count == 0
            && self.warnings.is_empty()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the total number of repairs performed (welded vertices + collapsed faces).
    #[must_use]
    pub fn repair_count(&self) -> usize {
        self.welded_vertex_count + self.collapsed_face_count
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Returns a short summary string suitable for logging.
    ///
    /// Format: `"V:{vertices} F:{faces} [details...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} F:{}", self.vertex_count, self.face_count)];

        if self.quad_count > 0 {
            parts.push(format!("quads:{}", self.quad_count));
        }
        if self.triangle_count > 0 {
            parts.push(format!("tris:{}", self.triangle_count));
        }
        if self.ngon_count > 0 {
            parts.push(format!("ngons:{}", self.ngon_count));
        }
        if self.welded_vertex_count > 0 {
            parts.push(format!("welded:{}", self.welded_vertex_count));
        }
        if self.collapsed_face_count > 0 {
            parts.push(format!("collapsed:{}", self.collapsed_face_count));
        }
        if self.open_edge_count > 0 {
            parts.push(format!("open:{}", self.open_edge_count));
        }
        if self.non_manifold_edge_count > 0 {
            parts.push(format!("non-manifold:{}", self.non_manifold_edge_count));
        }
        if self.smooth_face_count > 0 {
            parts.push(format!("smooth:{}", self.smooth_face_count));
        }

        parts.join(" ")
    }
}

impl fmt::Display for GeomMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(
            f,
            "  Faces: {} (quads {}, triangles {}, n-gons {})",
            self.face_count, self.quad_count, self.triangle_count, self.ngon_count
        )?;

        if self.repair_count() > 0 {
            writeln!(f, "  Repairs:")?;
            if self.welded_vertex_count > 0 {
                writeln!(f, "    - Welded vertices: {}", self.welded_vertex_count)?;
            }
            if self.collapsed_face_count > 0 {
                writeln!(f, "    - Collapsed faces removed: {}", self.collapsed_face_count)?;
            }
        }

        if self.open_edge_count > 0 || self.non_manifold_edge_count > 0 {
            writeln!(f, "  Topology:")?;
            if self.open_edge_count > 0 {
                writeln!(f, "    - Open edges: {}", self.open_edge_count)?;
            }
            if self.non_manifold_edge_count > 0 {
                writeln!(f, "    - Non-manifold edges: {}", self.non_manifold_edge_count)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }

        let status = if self.is_clean() {
            "CLEAN"
        } else if self.is_manifold() {
            "MANIFOLD (with repairs)"
        } else {
            "ISSUES DETECTED"
        };
        writeln!(f, "  Status: {status}")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_clean() {
        let diag = GeomMeshDiagnostics::default();
        assert!(diag.is_clean());
        assert!(diag.is_watertight());
        assert!(diag.is_manifold());
        assert!(!diag.has_warnings());
    }

    #[test]
    fn test_open_edges_are_not_an_issue_for_cleanliness() {
        let diag = GeomMeshDiagnostics {
            open_edge_count: 3,
            ..Default::default()
        };
        assert!(!diag.is_watertight());
        assert!(diag.is_clean());
    }

    #[test]
    fn test_non_manifold_not_clean() {
        let diag = GeomMeshDiagnostics {
            non_manifold_edge_count: 2,
            ..Default::default()
        };
        assert!(!diag.is_manifold());
        assert!(!diag.is_clean());
    }

    #[test]
    fn test_summary() {
        let diag = GeomMeshDiagnostics {
            vertex_count: 100,
            face_count: 50,
            quad_count: 48,
            triangle_count: 2,
            welded_vertex_count: 5,
            open_edge_count: 2,
            ..Default::default()
        };

        let summary = diag.summary();
        assert!(summary.contains("V:100"));
        assert!(summary.contains("F:50"));
        assert!(summary.contains("quads:48"));
        assert!(summary.contains("tris:2"));
        assert!(summary.contains("welded:5"));
        assert!(summary.contains("open:2"));
        assert!(!summary.contains("ngons"));
    }

    #[test]
    fn test_display() {
        let diag = GeomMeshDiagnostics {
            vertex_count: 100,
            face_count: 50,
            collapsed_face_count: 4,
            warnings: vec!["test warning".to_string()],
            ..Default::default()
        };

        let output = format!("{diag}");
        assert!(output.contains("Vertices: 100"));
        assert!(output.contains("Faces: 50"));
        assert!(output.contains("Collapsed faces removed: 4"));
        assert!(output.contains("test warning"));
        assert!(output.contains("MANIFOLD (with repairs)"));
    }

    #[test]
    fn test_topology_and_repair_counts() {
        let mut diag = GeomMeshDiagnostics {
            welded_vertex_count: 10,
            collapsed_face_count: 3,
            open_edge_count: 2,
            non_manifold_edge_count: 1,
            ..Default::default()
        };

        assert_eq!(diag.repair_count(), 13);

        diag.add_warning("test warning");
        assert!(diag.has_warnings());
        assert_eq!(diag.warnings[0], "test warning");
    }
}
