use serde::{Deserialize, Serialize};

pub const EXPAND_STEP: usize = 10;

/// Half-open index range `[start, end)` into the flattened day sequence.
/// Both bounds are clamped on every mutation; expanding past an edge is a
/// no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Initial placement around the anchor: three days back, up to six
    /// ahead. Biased forward so upcoming classes dominate the first view.
    pub fn initial(anchor_index: Option<usize>, len: usize) -> Self {
        if len == 0 {
            return Self::empty();
        }
        let anchor = anchor_index.unwrap_or(0).min(len - 1);
        Self {
            start: anchor.saturating_sub(3),
            end: (anchor + 7).min(len),
        }
    }

    pub fn expand_earlier(&mut self, step: usize) {
        self.start = self.start.saturating_sub(step);
    }

    pub fn expand_later(&mut self, len: usize, step: usize) {
        self.end = self.end.saturating_add(step).min(len);
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}
