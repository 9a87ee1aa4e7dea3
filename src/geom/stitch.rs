//! Quad stitching between consecutive rings.

use super::helix::RingLayout;

/// Which optional quads the stitcher adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StitchOptions {
    /// Close the inner wall between the two seam ends of the profile.
    pub inner_faces: bool,
    /// Bridge each turn's `k = 0` seam to the previous turn's `k = ws` seam.
    pub join_windings: bool,
}

/// Number of faces [`stitch_faces`] emits for `layout`.
#[must_use]
pub fn stitch_face_count(layout: RingLayout, options: StitchOptions) -> usize {
    let pairs = layout.turns * layout.helix_segments;
    let mut count = pairs * layout.winding_segments;
    if options.inner_faces {
        count += pairs;
    }
    if options.join_windings {
        count += layout.turns.saturating_sub(1) * layout.helix_segments;
    }
    count
}

/// Append the ring-to-ring faces to `faces`.
///
/// Ring `c` is always paired with ring `c + 1`: the last ring of a turn joins
/// the first ring of the next turn, so the sweep is one continuous strip that
/// ends at the closing ring. Every quad lists the higher profile sample of
/// ring `c` first, which keeps the normals pointing out of the winding.
pub fn stitch_faces(layout: RingLayout, options: StitchOptions, faces: &mut Vec<Vec<u32>>) {
    let ws = layout.winding_segments;
    let hs = layout.helix_segments;
    faces.reserve(stitch_face_count(layout, options));

    for turn in 0..layout.turns {
        for step in 0..hs {
            let c = turn * hs + step;
            let n = c + 1;

            for k in 0..ws {
                faces.push(vec![
                    layout.vertex(c, k + 1),
                    layout.vertex(c, k),
                    layout.vertex(n, k),
                    layout.vertex(n, k + 1),
                ]);
            }

            if options.inner_faces {
                faces.push(vec![
                    layout.vertex(c, 0),
                    layout.vertex(c, ws),
                    layout.vertex(n, ws),
                    layout.vertex(n, 0),
                ]);
            }

            if options.join_windings && turn > 0 {
                let below = layout.vertex(c - hs, ws);
                // Same vertex as stepping back (hs - 1)·(ws + 1) + 1 from the seam base.
                debug_assert_eq!(
                    below as usize,
                    layout.vertex(c, 0) as usize - ((hs - 1) * (ws + 1) + 1)
                );
                faces.push(vec![
                    layout.vertex(c, 0),
                    below,
                    layout.vertex(n - hs, ws),
                    layout.vertex(n, 0),
                ]);
            }
        }
    }
}
