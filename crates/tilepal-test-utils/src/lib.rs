//! Test utilities for the tilepal crates.
//!
//! - [`fixtures`]: small, hand-checkable lookup tables, including the
//!   end-to-end chain scenario;
//! - [`RecordingResolver`]: a [`ColorResolver`](tilepal_render::ColorResolver)
//!   that remembers every fragment it shaded;
//! - [`compare`]: framebuffer comparison with a per-channel tolerance;
//! - [`gpu_context`]: a GPU context for `#[ignore]`d tests, or `None` when
//!   the machine has no adapter.

pub mod compare;
pub mod fixtures;
mod recording;

pub use compare::{FramebufferDiff, compare_framebuffers};
pub use recording::{RecordingResolver, ResolveCall};

use std::sync::Arc;

use tilepal_render::{GraphicsContext, GraphicsContextDescriptor};

/// Install a quiet log subscriber for tests.
pub fn init_test_logging() {
    tilepal_core::logging::init_with_filter("warn,tilepal_render=debug");
}

/// Create a GPU context, or `None` if no adapter is available.
pub fn gpu_context() -> Option<Arc<GraphicsContext>> {
    let descriptor = GraphicsContextDescriptor::new().label("tilepal test device");
    match GraphicsContext::new_owned_sync_with_descriptor(descriptor) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            tracing::warn!("GPU not available: {}", e);
            None
        }
    }
}
