//! Winding cross-section sampling.
//!
//! The winding is a half-turn power-law profile: sample `k` sits at angle
//! `θ = k·π/segments`, pushed outwards by `r·sin(θ)^p·height` and along the
//! screw axis by `r·|cos(θ)|^p·sign(cos(θ))`, with `p = 2 / shape`.
//! A shape of 2 gives a semicircle, larger shapes square the profile off and
//! smaller ones pinch it.

use std::f64::consts::PI;

/// Precomputed winding profile, reused for every ring of the sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct WindingProfile {
    radial: Vec<f64>,
    axial: Vec<f64>,
}

impl WindingProfile {
    /// Sample `segments + 1` points of the half profile.
    ///
    /// `shape` is the winding profile value (`> 0`); the exponent applied to
    /// the sine and cosine is `2 / shape`.
    #[must_use]
    pub fn sample(segments: usize, radius: f64, height: f64, shape: f64) -> Self {
        let power = 2.0 / shape;
        let mut radial = Vec::with_capacity(segments + 1);
        let mut axial = Vec::with_capacity(segments + 1);

        for k in 0..=segments {
            // The upper half mirrors the lower half, so both seam samples
            // land exactly on the axis and sample k matches segments - k.
            let mirrored = k.min(segments - k);
            let angle = mirrored as f64 * PI / segments as f64;
            let (sin, cos) = angle.sin_cos();
            let cos = if mirrored == k { cos } else { -cos };
            radial.push(radius * sin.powf(power) * height);
            axial.push(radius * cos.abs().powf(power) * cos.signum());
        }

        Self { radial, axial }
    }

    /// Number of profile segments (one less than the sample count).
    #[must_use]
    pub fn segments(&self) -> usize {
        self.radial.len().saturating_sub(1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.radial.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.radial.is_empty()
    }

    /// Outward offset added to the helix radius at sample `k`.
    #[must_use]
    pub fn radial(&self, k: usize) -> f64 {
        self.radial[k]
    }

    /// Offset subtracted from the ring's axial position at sample `k`.
    #[must_use]
    pub fn axial(&self, k: usize) -> f64 {
        self.axial[k]
    }

    /// Iterate `(radial, axial)` pairs in sample order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.radial.iter().copied().zip(self.axial.iter().copied())
    }
}
