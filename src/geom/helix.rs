//! Helix sweep: one ring of winding-profile vertices per sweep point.

use std::f64::consts::TAU;

use super::profile::WindingProfile;
use super::taper::TaperRamp;

/// Index arithmetic for the ring-major vertex layout.
///
/// Ring `turn · helix_segments + step` holds `winding_segments + 1`
/// consecutive vertices. After the last full turn a single closing ring
/// (index `turns · helix_segments`) ends the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingLayout {
    pub turns: usize,
    pub helix_segments: usize,
    pub winding_segments: usize,
}

impl RingLayout {
    #[must_use]
    pub const fn new(turns: usize, helix_segments: usize, winding_segments: usize) -> Self {
        Self {
            turns,
            helix_segments,
            winding_segments,
        }
    }

    /// Vertices per ring.
    #[must_use]
    pub const fn ring_len(&self) -> usize {
        self.winding_segments + 1
    }

    /// Index of the closing ring; also the last global segment.
    #[must_use]
    pub const fn last_ring(&self) -> usize {
        self.turns * self.helix_segments
    }

    #[must_use]
    pub const fn ring_count(&self) -> usize {
        self.last_ring() + 1
    }

    /// Vertices emitted by the sweep (cap apexes excluded).
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.ring_count() * self.ring_len()
    }

    /// Global vertex index of profile sample `k` on `ring`.
    #[must_use]
    pub fn vertex(&self, ring: usize, k: usize) -> u32 {
        debug_assert!(ring < self.ring_count() && k <= self.winding_segments);
        (ring * self.ring_len() + k) as u32
    }
}

/// Helix dimensions used by the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepShape {
    pub helix_radius: f64,
    pub winding_radius: f64,
    pub stretch: f64,
}

/// Output of [`sweep_helix_vertices`].
#[derive(Debug, Clone, PartialEq)]
pub struct HelixSweep {
    /// Recentred vertex positions in ring-major order.
    pub positions: Vec<[f64; 3]>,
    /// z of the last vertex emitted, before recentring.
    pub last_z: f64,
    /// Offset subtracted from every z: `(last_z - winding_radius) / 2`.
    pub z_offset: f64,
}

/// Sweep the main helix and emit every ring, then recentre on z.
#[must_use]
pub fn sweep_helix_vertices(
    layout: RingLayout,
    profile: &WindingProfile,
    taper: &TaperRamp,
    shape: SweepShape,
) -> HelixSweep {
    debug_assert_eq!(profile.segments(), layout.winding_segments);

    let mut positions = Vec::with_capacity(layout.vertex_count());
    let mut last_z = 0.0;

    let segments = layout.helix_segments as f64;
    let step_angle = TAU / segments;
    let diameter = 2.0 * shape.winding_radius;

    'sweep: for turn in 0..=layout.turns {
        for step in 0..layout.helix_segments {
            let seg = turn * layout.helix_segments + step;
            let hub = shape.helix_radius * taper.factor(seg);
            let z_stretch = shape.stretch * seg as f64 / segments * 0.5;
            let (sin_a, cos_a) = (step as f64 * step_angle).sin_cos();
            let z_base = turn as f64 * diameter + step as f64 * diameter / segments + z_stretch;

            for (radial, axial) in profile.iter() {
                let radius = radial + hub;
                let z = z_base - axial;
                positions.push([cos_a * radius, sin_a * radius, z]);
                last_z = z;
            }

            if turn == layout.turns {
                break 'sweep;
            }
        }
    }

    let z_offset = (last_z - shape.winding_radius) / 2.0;
    for p in &mut positions {
        p[2] -= z_offset;
    }

    HelixSweep {
        positions,
        last_z,
        z_offset,
    }
}
