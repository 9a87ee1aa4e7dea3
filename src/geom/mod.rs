mod caps;
mod core;
mod diagnostics;
mod helix;
mod mesh;
mod metrics;
mod profile;
mod screw;
mod stitch;
mod taper;

pub use caps::{CapOptions, build_caps, cap_element_count};
pub use self::core::{Point3, Tolerance, Vec3};
pub use diagnostics::GeomMeshDiagnostics;
pub use helix::{HelixSweep, RingLayout, SweepShape, sweep_helix_vertices};
pub use mesh::{EmitOptions, GeomContext, PolyMesh, WeldStats, weld_mesh_vertices};
pub use metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
pub use profile::WindingProfile;
pub use screw::{
    MAX_MESH_ELEMENTS, MIN_HELIX_SEGMENTS, ScrewError, ScrewOptions, TurnSpec,
    build_screw, generate_screw, generate_screw_with_context,
};
pub use stitch::{StitchOptions, stitch_face_count, stitch_faces};
pub use taper::TaperRamp;

#[cfg(test)]
mod tests;
