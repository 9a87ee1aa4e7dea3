//! Screw mesh generation: options, domain checks and the full pipeline.
//!
//! The pipeline samples the winding profile, sweeps it along the main helix
//! (with end taper and axial stretch), stitches rings into quads, adds the
//! optional caps and finally hands the mesh to the emitter for welding,
//! smooth shading and diagnostics.

use serde::{Deserialize, Serialize};

use super::caps::{CapOptions, build_caps, cap_element_count};
use super::diagnostics::GeomMeshDiagnostics;
use super::helix::{RingLayout, SweepShape, sweep_helix_vertices};
use super::mesh::{EmitOptions, GeomContext, PolyMesh, finalize_mesh};
use super::metrics::{GeomMetrics, TimingBucket};
use super::profile::WindingProfile;
use super::stitch::{StitchOptions, stitch_face_count, stitch_faces};
use super::taper::TaperRamp;
use super::Tolerance;

/// Upper bound on generated vertices and on generated faces.
pub const MAX_MESH_ELEMENTS: usize = 1 << 24;

/// Minimum angular resolution of the main helix.
pub const MIN_HELIX_SEGMENTS: u32 = 3;

/// How many revolutions the main helix makes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnSpec {
    /// A fixed number of turns.
    Count(u32),
    /// Enough turns to cover this length along the axis:
    /// `ceil(length / (2 · winding_radius))`, at least one.
    Length(f64),
}

impl Default for TurnSpec {
    fn default() -> Self {
        Self::Count(3)
    }
}

/// Parameters of a screw mesh. Defaults match the classic "add screw" tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrewOptions {
    pub turns: TurnSpec,
    pub helix_radius: f64,
    pub helix_segments: u32,
    pub winding_radius: f64,
    pub winding_segments: u32,
    /// Scales the outward bulge of the winding profile (negative flips it inwards).
    pub winding_height: f64,
    /// Profile shape; 2 is round, larger is squarer, smaller is pinched.
    pub winding_profile: f64,
    /// Extra axial rise of `stretch / 2` per helix turn.
    pub stretch: f64,
    /// Radius factor at both ends of the helix.
    pub end_taper: f64,
    /// Length of each taper ramp in turns (must be > 0).
    pub taper_turns: f64,
    pub inner_faces: bool,
    pub ngon_caps: bool,
    pub tri_caps: bool,
    pub join_windings: bool,
    pub smooth_faces: bool,
    /// Merge coincident seam vertices after construction.
    pub weld: bool,
}

impl Default for ScrewOptions {
    fn default() -> Self {
        Self {
            turns: TurnSpec::default(),
            helix_radius: 1.0,
            helix_segments: 32,
            winding_radius: 0.3,
            winding_segments: 7,
            winding_height: 1.0,
            winding_profile: 2.0,
            stretch: 0.0,
            end_taper: 1.0,
            taper_turns: 0.01,
            inner_faces: false,
            ngon_caps: false,
            tri_caps: false,
            join_windings: false,
            smooth_faces: true,
            weld: false,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ScrewError {
    #[error("screw requires at least one turn")]
    NoTurns,
    #[error("screw length must be finite and > 0")]
    InvalidLength,
    #[error("helix requires at least {} segments", MIN_HELIX_SEGMENTS)]
    NotEnoughHelixSegments,
    #[error("winding requires at least 1 segment")]
    NotEnoughWindingSegments,
    #[error("screw inputs must be finite")]
    NonFiniteInput,
    #[error("winding radius must be > 0")]
    InvalidWindingRadius,
    #[error("winding profile must be > 0")]
    InvalidWindingProfile,
    #[error("taper turns must be > 0")]
    InvalidTaperTurns,
    #[error("n-gon caps require at least 2 winding segments")]
    NgonCapsNeedTwoWindingSegments,
    #[error("screw mesh too large: {vertices} vertices, {faces} faces (limit {limit})")]
    MeshTooLarge { vertices: u64, faces: u64, limit: usize },
}

impl ScrewOptions {
    /// Number of helix turns after resolving [`TurnSpec::Length`].
    pub fn resolved_turns(&self) -> Result<u64, ScrewError> {
        match self.turns {
            TurnSpec::Count(0) => Err(ScrewError::NoTurns),
            TurnSpec::Count(turns) => Ok(u64::from(turns)),
            TurnSpec::Length(length) => {
                if !length.is_finite() || length <= 0.0 {
                    return Err(ScrewError::InvalidLength);
                }
                if !self.winding_radius.is_finite() || self.winding_radius <= 0.0 {
                    return Err(ScrewError::InvalidWindingRadius);
                }
                let turns = (length / (2.0 * self.winding_radius)).ceil().max(1.0);
                // `as` saturates, oversize counts are caught by the element limit.
                Ok(turns as u64)
            }
        }
    }

    fn stitch_options(&self) -> StitchOptions {
        StitchOptions {
            inner_faces: self.inner_faces,
            join_windings: self.join_windings,
        }
    }

    fn cap_options(&self) -> CapOptions {
        CapOptions {
            ngon: self.ngon_caps,
            triangles: self.tri_caps,
            inner_faces: self.inner_faces,
        }
    }

    fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            weld: self.weld,
            smooth_faces: self.smooth_faces,
        }
    }

    /// Check the parameter domain and size the mesh.
    ///
    /// Returns the ring layout the options resolve to.
    pub fn validate(&self) -> Result<RingLayout, ScrewError> {
        let floats = [
            self.helix_radius,
            self.winding_radius,
            self.winding_height,
            self.winding_profile,
            self.stretch,
            self.end_taper,
            self.taper_turns,
        ];
        if floats.iter().any(|v| !v.is_finite()) {
            return Err(ScrewError::NonFiniteInput);
        }
        if self.winding_radius <= 0.0 {
            return Err(ScrewError::InvalidWindingRadius);
        }
        if self.winding_profile <= 0.0 {
            return Err(ScrewError::InvalidWindingProfile);
        }
        if self.taper_turns <= 0.0 {
            return Err(ScrewError::InvalidTaperTurns);
        }
        if self.helix_segments < MIN_HELIX_SEGMENTS {
            return Err(ScrewError::NotEnoughHelixSegments);
        }
        if self.winding_segments < 1 {
            return Err(ScrewError::NotEnoughWindingSegments);
        }
        if self.ngon_caps && self.winding_segments < 2 {
            return Err(ScrewError::NgonCapsNeedTwoWindingSegments);
        }

        let turns = self.resolved_turns()?;
        let (vertices, faces) = self.expected_counts(turns);
        let limit = MAX_MESH_ELEMENTS as u64;
        if vertices > limit || faces > limit {
            return Err(ScrewError::MeshTooLarge {
                vertices,
                faces,
                limit: MAX_MESH_ELEMENTS,
            });
        }

        // Both counts fit under the limit, so the casts below are lossless.
        Ok(RingLayout::new(
            turns as usize,
            self.helix_segments as usize,
            self.winding_segments as usize,
        ))
    }

    /// Vertex and face counts for `turns`, saturating instead of overflowing.
    fn expected_counts(&self, turns: u64) -> (u64, u64) {
        let hs = u64::from(self.helix_segments);
        let ws = u64::from(self.winding_segments);
        let pairs = turns.saturating_mul(hs);

        let mut vertices = pairs.saturating_add(1).saturating_mul(ws + 1);
        let mut faces = pairs.saturating_mul(ws);
        if self.inner_faces {
            faces = faces.saturating_add(pairs);
        }
        if self.join_windings {
            faces = faces.saturating_add(turns.saturating_sub(1).saturating_mul(hs));
        }
        if self.ngon_caps {
            faces = faces.saturating_add(2);
        }
        if self.tri_caps {
            vertices = vertices.saturating_add(2);
            faces = faces.saturating_add(2 * ws + if self.inner_faces { 2 } else { 0 });
        }
        (vertices, faces)
    }
}

/// Build the raw screw mesh: profile, sweep, stitching and caps.
///
/// No welding or shading is applied; every face is flat.
pub fn build_screw(options: &ScrewOptions) -> Result<PolyMesh, ScrewError> {
    let layout = options.validate()?;
    let mut metrics = GeomMetrics::default();
    Ok(build_screw_with_layout(options, layout, &mut metrics))
}

/// Full pipeline with a fresh [`GeomContext`] (default merge distance).
pub fn generate_screw(options: &ScrewOptions) -> Result<(PolyMesh, GeomMeshDiagnostics), ScrewError> {
    let mut ctx = GeomContext::new();
    generate_screw_with_context(options, &mut ctx)
}

/// Full pipeline: build the mesh, then weld / smooth it as requested.
pub fn generate_screw_with_context(
    options: &ScrewOptions,
    ctx: &mut GeomContext,
) -> Result<(PolyMesh, GeomMeshDiagnostics), ScrewError> {
    let layout = options.validate()?;

    ctx.metrics.begin();
    let mesh = build_screw_with_layout(options, layout, &mut ctx.metrics);
    let (mesh, mut diagnostics) = finalize_mesh(mesh, options.emit_options(), ctx);
    diagnostics.timing = ctx.metrics.end();

    log::debug!("screw mesh: {}", diagnostics.summary());
    Ok((mesh, diagnostics))
}

fn build_screw_with_layout(
    options: &ScrewOptions,
    layout: RingLayout,
    metrics: &mut GeomMetrics,
) -> PolyMesh {
    log::debug!(
        "building screw: {} turns, {} rings of {} vertices",
        layout.turns,
        layout.ring_count(),
        layout.ring_len()
    );

    let profile = metrics.time(TimingBucket::Profile, || {
        WindingProfile::sample(
            layout.winding_segments,
            options.winding_radius,
            options.winding_height,
            options.winding_profile,
        )
    });

    let taper = TaperRamp::new(
        options.end_taper,
        options.taper_turns,
        layout.helix_segments,
        layout.last_ring(),
    );
    if taper.ramps_overlap() && !Tolerance::DEFAULT.approx_eq_f64(options.end_taper, 1.0) {
        log::debug!(
            "taper ramps overlap ({} ramp segments over {}); start ramp takes precedence",
            taper.ramp_segments(),
            taper.last_segment()
        );
    }

    let shape = SweepShape {
        helix_radius: options.helix_radius,
        winding_radius: options.winding_radius,
        stretch: options.stretch,
    };
    let sweep = metrics.time(TimingBucket::Sweep, || {
        sweep_helix_vertices(layout, &profile, &taper, shape)
    });
    let mut positions = sweep.positions;

    let stitch = options.stitch_options();
    let caps = options.cap_options();
    let (_, cap_faces) = cap_element_count(layout, caps);
    let mut faces = Vec::with_capacity(stitch_face_count(layout, stitch) + cap_faces);

    metrics.time(TimingBucket::Stitch, || stitch_faces(layout, stitch, &mut faces));
    metrics.time(TimingBucket::Caps, || {
        build_caps(layout, caps, options.winding_radius, &mut positions, &mut faces);
    });

    PolyMesh::new(positions, faces)
}
