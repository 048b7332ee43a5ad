use crate::geom::Mat2D;
use crate::path::PathId;

/// Clip paths a single stack entry can accumulate.
pub const MAX_CLIP_PATHS: usize = 16;

/// A clip path captured with the transform that was current at
/// `clip_path()` time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipDescriptor {
    pub path: PathId,
    pub transform: Mat2D,
}

#[derive(Debug, Clone)]
struct StackEntry {
    transform: Mat2D,
    clips: Vec<ClipDescriptor>,
}

/// Save/restore stack of transforms and accumulated clip paths, plus the diff
/// state between what the scene wants clipped (`pending`) and what the
/// stencil currently holds (`applied`).
#[derive(Debug, Default)]
pub(crate) struct ClipState {
    stack: Vec<StackEntry>,
    pending: Vec<ClipDescriptor>,
    applied: Vec<ClipDescriptor>,
    dirty: bool,
    warned_capacity: bool,
}

impl ClipState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears everything for a fresh frame.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.pending.clear();
        self.applied.clear();
        self.dirty = false;
    }

    pub fn save(&mut self, transform: Mat2D) {
        self.stack.push(StackEntry { transform, clips: self.pending.clone() });
    }

    /// Pops a stack entry, restoring its clip set. Returns the transform to
    /// reinstate, or `None` on an unbalanced restore.
    pub fn restore(&mut self) -> Option<Mat2D> {
        let entry = self.stack.pop()?;
        if entry.clips != self.pending {
            self.pending = entry.clips;
            self.dirty = true;
        }
        Some(entry.transform)
    }

    pub fn push_clip(&mut self, path: PathId, transform: Mat2D) {
        if self.pending.len() >= MAX_CLIP_PATHS {
            if !self.warned_capacity {
                log::warn!("clip path limit ({MAX_CLIP_PATHS}) reached; extra clips ignored");
                self.warned_capacity = true;
            }
            return;
        }
        self.pending.push(ClipDescriptor { path, transform });
        self.dirty = true;
    }

    #[inline]
    pub fn pending(&self) -> &[ClipDescriptor] {
        &self.pending
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Set equality by handle identity + transform, in order.
    #[inline]
    pub fn pending_matches_applied(&self) -> bool {
        self.pending == self.applied
    }

    pub fn mark_applied(&mut self) {
        self.applied.clear();
        self.applied.extend_from_slice(&self.pending);
    }

    pub fn clear_applied(&mut self) {
        self.applied.clear();
    }

    #[inline]
    pub fn applied_count(&self) -> u8 {
        self.applied.len() as u8
    }
}
