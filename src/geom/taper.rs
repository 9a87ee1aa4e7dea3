//! End tapering of the helix radius.

/// Linear radius ramp at both ends of the helix.
///
/// The factor starts at `end_taper` on segment 0, reaches `1.0` after
/// `taper_turns · helix_segments` segments, stays there, and ramps back down
/// to `end_taper` on the last segment.
///
/// The start ramp is tested before the end ramp. When the two ramps overlap
/// (short helices with long tapers) the start ramp decides the factor for
/// every segment it covers, including the last one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaperRamp {
    end_taper: f64,
    ramp_segments: f64,
    slope: f64,
    last_segment: usize,
}

impl TaperRamp {
    /// `taper_turns` must be `> 0`; `last_segment` is `turns · helix_segments`.
    #[must_use]
    pub fn new(end_taper: f64, taper_turns: f64, helix_segments: usize, last_segment: usize) -> Self {
        let ramp_segments = taper_turns * helix_segments as f64;
        Self {
            end_taper,
            ramp_segments,
            slope: (1.0 - end_taper) / ramp_segments,
            last_segment,
        }
    }

    #[must_use]
    pub fn ramp_segments(&self) -> f64 {
        self.ramp_segments
    }

    #[must_use]
    pub fn last_segment(&self) -> usize {
        self.last_segment
    }

    /// Returns true if the start and end ramps share segments.
    #[must_use]
    pub fn ramps_overlap(&self) -> bool {
        self.ramp_segments >= self.last_segment as f64 - self.ramp_segments
    }

    /// Radius scale factor at global segment `seg`.
    #[must_use]
    pub fn factor(&self, seg: usize) -> f64 {
        let s = seg as f64;
        let last = self.last_segment as f64;

        if s <= self.ramp_segments {
            if seg == 0 {
                self.end_taper
            } else {
                s * self.slope + self.end_taper
            }
        } else if last - self.ramp_segments <= s && seg <= self.last_segment {
            if seg == self.last_segment {
                self.end_taper
            } else {
                (last - s) * self.slope + self.end_taper
            }
        } else {
            1.0
        }
    }
}
