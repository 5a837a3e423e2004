use crate::common::constants::INF;
use crate::storage::buffer::buffer_pool_manager::FrameId;
use std::collections::{HashMap, VecDeque};

#[derive(Debug)]
pub(crate) struct LruKNode {
    /// Last seen `k` pin timestamps, least recent at the front.
    pub(crate) history: VecDeque<usize>,
    pub(crate) is_evictable: bool,
}

impl LruKNode {
    fn new() -> Self {
        Self {
            history: VecDeque::new(),
            is_evictable: false,
        }
    }

    /// Distance from `current_timestamp` back to the k'th most recent
    /// pin, or `INF` when fewer than `k` pins have been recorded.
    pub(crate) fn backward_k_distance(&self, current_timestamp: usize, k: usize) -> usize {
        if self.history.len() < k {
            return INF;
        }
        current_timestamp - self.history.front().unwrap()
    }

    /// Oldest timestamp still held in the node's history. Used to break
    /// ties among frames whose backward k-distance is infinite.
    pub(crate) fn earliest_timestamp(&self) -> usize {
        *self
            .history
            .front()
            .expect("Node does not have any timestamps in its history.")
    }
}

/// LRU-K eviction: the victim is the evictable frame with the largest
/// backward k-distance, falling back to classical LRU over first
/// timestamps among frames with fewer than `k` recorded pins. The
/// timestamp counter is logical and advances only on `pin`.
#[derive(Debug)]
pub struct LruKReplacer {
    node_store: HashMap<FrameId, LruKNode>,
    current_timestamp: usize,
    /// Number of evictable frames; not necessarily `node_store.len()`.
    cur_size: usize,
    k: usize,
}

impl LruKReplacer {
    pub fn new(k: usize) -> Self {
        assert!(k > 0, "LRU-K requires a positive k");
        Self {
            node_store: HashMap::new(),
            current_timestamp: 0,
            cur_size: 0,
            k,
        }
    }

    pub fn victim(&mut self) -> Option<FrameId> {
        let frame_id = self.select_victim()?;
        self.node_store.remove(&frame_id);
        self.cur_size -= 1;
        Some(frame_id)
    }

    /// Appends the current timestamp to the frame's history (creating the
    /// node on first pin), shields the frame from eviction, and advances
    /// the clock.
    pub fn pin(&mut self, frame_id: FrameId) {
        let k = self.k;
        let node = self.node_store.entry(frame_id).or_insert_with(LruKNode::new);
        if node.is_evictable {
            node.is_evictable = false;
            self.cur_size -= 1;
        }
        if node.history.len() == k {
            node.history.pop_front();
        }
        node.history.push_back(self.current_timestamp);
        self.current_timestamp += 1;
    }

    /// Marks an existing frame evictable. A frame the replacer has never
    /// seen is ignored; a node is never created without pin history.
    pub fn unpin(&mut self, frame_id: FrameId) {
        if let Some(node) = self.node_store.get_mut(&frame_id) {
            if !node.is_evictable {
                node.is_evictable = true;
                self.cur_size += 1;
            }
        }
    }

    /// Removes the frame and its history outright, whatever its
    /// k-distance. Unknown frames are ignored; removing a frame that is
    /// still shielded from eviction is a caller bug.
    pub fn remove(&mut self, frame_id: FrameId) {
        let Some(node) = self.node_store.get(&frame_id) else {
            return;
        };
        if !node.is_evictable {
            panic!("Attempted to remove unevictable node with frame id {frame_id}");
        }
        self.node_store.remove(&frame_id);
        self.cur_size -= 1;
    }

    pub fn size(&self) -> usize {
        self.cur_size
    }

    #[cfg(test)]
    pub(crate) fn node(&self, frame_id: &FrameId) -> Option<&LruKNode> {
        self.node_store.get(frame_id)
    }

    #[cfg(test)]
    pub(crate) fn current_timestamp(&self) -> usize {
        self.current_timestamp
    }

    fn select_victim(&self) -> Option<FrameId> {
        let mut victim: Option<FrameId> = None;
        let mut largest_distance = 0_usize;
        let mut earliest_timestamp = INF;

        for (frame_id, node) in &self.node_store {
            if !node.is_evictable {
                continue;
            }
            let distance = node.backward_k_distance(self.current_timestamp, self.k);
            let supersedes = match victim {
                None => true,
                // among the "cold" frames, fall back to LRU on first access
                Some(_) if distance == INF && largest_distance == INF => {
                    node.earliest_timestamp() < earliest_timestamp
                }
                Some(_) => distance > largest_distance,
            };
            if supersedes {
                victim = Some(*frame_id);
                largest_distance = distance;
                earliest_timestamp = node.earliest_timestamp();
            }
        }
        victim
    }
}
