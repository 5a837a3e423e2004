mod lru;
mod lru_k;

#[cfg(test)]
mod tests;

pub use lru::LruReplacer;
pub use lru_k::LruKReplacer;

use crate::config::config::DbConfig;
use crate::storage::buffer::buffer_pool_manager::FrameId;

/// Eviction policy over frame ids, selected once at pool construction.
/// An unknown policy name in the configuration is fatal.
#[derive(Debug)]
pub enum Replacer {
    Lru(LruReplacer),
    LruK(LruKReplacer),
}

impl Replacer {
    pub fn from_config(config: &DbConfig) -> Replacer {
        match config.replacer.as_str() {
            "LRUReplacer" => Replacer::Lru(LruReplacer::new()),
            "LRUKReplacer" => Replacer::LruK(LruKReplacer::new(config.lru_k)),
            other => panic!("Unknown replacer: {other}"),
        }
    }

    /// Selects and removes the frame to evict. `None` when no frame is
    /// evictable.
    pub fn victim(&mut self) -> Option<FrameId> {
        match self {
            Replacer::Lru(replacer) => replacer.victim(),
            Replacer::LruK(replacer) => replacer.victim(),
        }
    }

    /// Records a use of the frame and shields it from eviction.
    pub fn pin(&mut self, frame_id: FrameId) {
        match self {
            Replacer::Lru(replacer) => replacer.pin(frame_id),
            Replacer::LruK(replacer) => replacer.pin(frame_id),
        }
    }

    /// Marks the frame evictable. Unknown frames are a no-op.
    pub fn unpin(&mut self, frame_id: FrameId) {
        match self {
            Replacer::Lru(replacer) => replacer.unpin(frame_id),
            Replacer::LruK(replacer) => replacer.unpin(frame_id),
        }
    }

    /// Drops the frame from the policy's bookkeeping entirely, e.g. when
    /// its page is deleted and the frame returns to the free list.
    pub fn remove(&mut self, frame_id: FrameId) {
        match self {
            Replacer::Lru(replacer) => replacer.remove(frame_id),
            Replacer::LruK(replacer) => replacer.remove(frame_id),
        }
    }

    /// Number of currently evictable frames.
    pub fn size(&self) -> usize {
        match self {
            Replacer::Lru(replacer) => replacer.size(),
            Replacer::LruK(replacer) => replacer.size(),
        }
    }
}
