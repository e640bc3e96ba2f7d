//! Framebuffer comparison.

use tilepal_render::{Framebuffer, Rgba8};

/// Summary of the differences between two framebuffers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FramebufferDiff {
    /// Pixels whose largest channel difference exceeds the tolerance.
    pub mismatched: usize,
    /// Largest channel difference seen anywhere.
    pub max_channel_delta: u8,
    /// First mismatching pixel as `(x, y, expected, actual)`.
    pub first: Option<(u32, u32, Rgba8, Rgba8)>,
}

impl FramebufferDiff {
    pub fn is_match(&self) -> bool {
        self.mismatched == 0
    }
}

fn channel_delta(a: Rgba8, b: Rgba8) -> u8 {
    [
        a.r.abs_diff(b.r),
        a.g.abs_diff(b.g),
        a.b.abs_diff(b.b),
        a.a.abs_diff(b.a),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// Compare `actual` against `expected` pixel by pixel.
///
/// # Panics
///
/// Panics if the sizes differ.
pub fn compare_framebuffers(expected: &Framebuffer, actual: &Framebuffer, tolerance: u8) -> FramebufferDiff {
    assert_eq!(expected.size(), actual.size(), "framebuffer sizes differ");

    let width = expected.size().width;
    let mut diff = FramebufferDiff::default();
    for (i, (&e, &a)) in expected.pixels().iter().zip(actual.pixels()).enumerate() {
        let delta = channel_delta(e, a);
        diff.max_channel_delta = diff.max_channel_delta.max(delta);
        if delta > tolerance {
            diff.mismatched += 1;
            if diff.first.is_none() {
                let i = i as u32;
                diff.first = Some((i % width, i / width, e, a));
            }
        }
    }
    diff
}
