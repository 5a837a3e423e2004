use crate::storage::buffer::buffer_pool_manager::FrameId;
use std::collections::VecDeque;

/// Classical least-recently-used eviction. Frames sit in a
/// most-recently-pinned-first list; the victim is the entry closest to
/// the tail whose evictable flag is set.
#[derive(Debug, Default)]
pub struct LruReplacer {
    /// `(frame_id, evictable)` pairs, most recently pinned at the front.
    lru_list: VecDeque<(FrameId, bool)>,
    /// Number of evictable entries in `lru_list`.
    cur_size: usize,
}

impl LruReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn victim(&mut self) -> Option<FrameId> {
        let position = self
            .lru_list
            .iter()
            .rposition(|&(_, evictable)| evictable)?;
        let (frame_id, _) = self.lru_list.remove(position).unwrap();
        self.cur_size -= 1;
        Some(frame_id)
    }

    /// Moves the frame to the front of the list non-evictable, inserting
    /// it if this is its first pin.
    pub fn pin(&mut self, frame_id: FrameId) {
        if let Some(position) = self.lru_list.iter().position(|&(id, _)| id == frame_id) {
            let (_, evictable) = self.lru_list.remove(position).unwrap();
            if evictable {
                self.cur_size -= 1;
            }
        }
        self.lru_list.push_front((frame_id, false));
    }

    pub fn unpin(&mut self, frame_id: FrameId) {
        if let Some(entry) = self.lru_list.iter_mut().find(|(id, _)| *id == frame_id) {
            if !entry.1 {
                entry.1 = true;
                self.cur_size += 1;
            }
        }
    }

    pub fn remove(&mut self, frame_id: FrameId) {
        if let Some(position) = self.lru_list.iter().position(|&(id, _)| id == frame_id) {
            let (_, evictable) = self.lru_list.remove(position).unwrap();
            if evictable {
                self.cur_size -= 1;
            }
        }
    }

    pub fn size(&self) -> usize {
        self.cur_size
    }
}
