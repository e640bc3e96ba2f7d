use tilepal_core::math::Vec2;
use parking_lot::Mutex;
use tilepal_render::{Color, ColorResolver, GlyphUv, UnitPos};

/// One call to [`RecordingResolver::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveCall {
    pub uv: Vec2,
    pub unit_pos: Vec2,
}

/// Wraps a resolver and records the coordinates of every fragment.
pub struct RecordingResolver<R> {
    inner: R,
    calls: Mutex<Vec<ResolveCall>>,
}

impl<R: ColorResolver> RecordingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ResolveCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: ColorResolver> ColorResolver for RecordingResolver<R> {
    fn resolve(&self, uv: GlyphUv, pos: UnitPos) -> Color {
        self.calls.lock().push(ResolveCall {
            uv: uv.0,
            unit_pos: pos.0,
        });
        self.inner.resolve(uv, pos)
    }
}
