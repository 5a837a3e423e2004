use crate::common::constants::{COULD_NOT_UNWRAP_DISK_MSG, COULD_NOT_UNWRAP_REPLACER_MSG};
use crate::common::{Error, Result};
use crate::storage::buffer::frame::Frame;
use crate::storage::buffer::replacer::Replacer;
use crate::storage::disk::{DiskManager, FileId, PageId};
use crate::storage::page::PageRef;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

#[cfg(test)]
mod tests;

/// Offset of a frame in the buffer pool's frame array.
pub type FrameId = usize;

/// Mediates between disk and memory. Owns a fixed array of frames, a
/// free list, a `(file_id, page_id) -> frame_id` index, and the eviction
/// policy. Callers serialize access through one outer lock
/// (`Arc<RwLock<BufferPoolManager>>`); the replacer keeps a second,
/// internal lock of its own.
#[derive(Debug)]
pub struct BufferPoolManager {
    /// Number of frames in the buffer pool.
    pub(crate) pool_size: usize,
    /// The frame array; frames are reused across many pages.
    pub(crate) frames: Vec<Frame>,
    /// Maps resident pages to the frames holding them.
    pub(crate) page_table: HashMap<(FileId, PageId), FrameId>,
    /// Frames that hold no page at all.
    pub(crate) free_list: VecDeque<FrameId>,
    /// Eviction policy over frames whose pin count has dropped to zero.
    pub(crate) replacer: Arc<RwLock<Replacer>>,
    /// Manages reads and writes of pages on disk.
    pub(crate) disk_manager: Arc<RwLock<DiskManager>>,
}

#[derive(Default)]
pub struct BufferPoolManagerBuilder {
    pool_size: Option<usize>,
    replacer: Option<Replacer>,
    disk_manager: Option<Arc<RwLock<DiskManager>>>,
}

impl BufferPoolManagerBuilder {
    pub fn pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = Some(pool_size);
        self
    }
    pub fn replacer(mut self, replacer: Replacer) -> Self {
        self.replacer = Some(replacer);
        self
    }
    pub fn disk_manager(mut self, disk_manager: Arc<RwLock<DiskManager>>) -> Self {
        self.disk_manager = Some(disk_manager);
        self
    }
    pub fn build(self) -> BufferPoolManager {
        let pool_size = self
            .pool_size
            .expect("`pool_size` not initialized before build.");
        let replacer = self
            .replacer
            .expect("`replacer` not initialized before build.");
        let disk_manager = self
            .disk_manager
            .expect("`disk_manager` not initialized before build.");

        BufferPoolManager::new(pool_size, replacer, disk_manager)
    }

    pub fn build_with_handle(self) -> Arc<RwLock<BufferPoolManager>> {
        Arc::new(RwLock::new(self.build()))
    }
}

impl BufferPoolManager {
    pub fn new(
        pool_size: usize,
        replacer: Replacer,
        disk_manager: Arc<RwLock<DiskManager>>,
    ) -> Self {
        BufferPoolManager {
            pool_size,
            frames: (0..pool_size).map(|_| Frame::new()).collect(),
            page_table: HashMap::new(),
            free_list: (0..pool_size).collect(),
            replacer: Arc::new(RwLock::new(replacer)),
            disk_manager,
        }
    }

    pub fn builder() -> BufferPoolManagerBuilder {
        BufferPoolManagerBuilder::default()
    }

    /// Returns the requested page, pinned on behalf of the caller. Every
    /// successful fetch must be matched by exactly one `unpin_page`.
    ///
    /// A resident page is pinned where it sits. Otherwise a frame is
    /// taken from the free list or, failing that, from the replacer; a
    /// dirty victim is written back before the frame is reassigned and
    /// the page is read from disk. When the pool holds no free frame and
    /// no evictable one, fetching fails with [`Error::NoFreeFrame`].
    pub fn fetch_page(&mut self, file_id: FileId, page_id: PageId) -> Result<PageRef> {
        if let Some(&frame_id) = self.page_table.get(&(file_id, page_id)) {
            self.frames[frame_id].pin();
            self.replacer
                .write()
                .expect(COULD_NOT_UNWRAP_REPLACER_MSG)
                .pin(frame_id);
            return Ok(self.frames[frame_id].page());
        }

        let frame_id = self.get_available_frame()?;
        if let Err(e) = self.update_frame(frame_id, file_id, page_id) {
            self.free_list.push_back(frame_id);
            return Err(e);
        }
        Ok(self.frames[frame_id].page())
    }

    /// Releases one pin on the page. Returns `false` when the page is not
    /// resident or its pin count is already zero. Once the pin count
    /// reaches zero the frame becomes evictable. `is_dirty` ORs into the
    /// frame's dirty bit; unpinning never clears it.
    pub fn unpin_page(&mut self, file_id: FileId, page_id: PageId, is_dirty: bool) -> bool {
        let Some(&frame_id) = self.page_table.get(&(file_id, page_id)) else {
            return false;
        };
        let frame = &mut self.frames[frame_id];
        if !frame.in_use() {
            return false;
        }

        frame.unpin();
        if !frame.in_use() {
            self.replacer
                .write()
                .expect(COULD_NOT_UNWRAP_REPLACER_MSG)
                .unpin(frame_id);
        }
        if is_dirty {
            self.frames[frame_id].set_dirty(true);
        }
        true
    }

    /// Writes the page back if it is dirty and clears the dirty bit.
    /// Returns `false` when the page is not resident.
    pub fn flush_page(&mut self, file_id: FileId, page_id: PageId) -> bool {
        let Some(&frame_id) = self.page_table.get(&(file_id, page_id)) else {
            return false;
        };
        if self.frames[frame_id].is_dirty() {
            if let Err(e) = self.write_frame_back(frame_id, file_id, page_id) {
                log::error!("failed to flush page {}:{}: {}", file_id, page_id, e);
                return false;
            }
        }
        true
    }

    /// Drops the page from the pool, flushing it first if dirty. Returns
    /// `true` when the page is absent, `false` when it is still pinned.
    pub fn delete_page(&mut self, file_id: FileId, page_id: PageId) -> bool {
        let Some(&frame_id) = self.page_table.get(&(file_id, page_id)) else {
            return true;
        };
        if self.frames[frame_id].in_use() {
            return false;
        }

        if self.frames[frame_id].is_dirty() {
            if let Err(e) = self.write_frame_back(frame_id, file_id, page_id) {
                log::error!("failed to flush page {}:{} for delete: {}", file_id, page_id, e);
                return false;
            }
        }
        self.frames[frame_id].reset();
        self.page_table.remove(&(file_id, page_id));
        self.free_list.push_back(frame_id);
        self.replacer
            .write()
            .expect(COULD_NOT_UNWRAP_REPLACER_MSG)
            .remove(frame_id);
        true
    }

    /// Flushes every resident page of the file; `true` only if all
    /// flushes succeeded.
    pub fn flush_all_pages(&mut self, file_id: FileId) -> bool {
        let mut ok = true;
        for page_id in self.resident_pages_of(file_id) {
            ok = self.flush_page(file_id, page_id) && ok;
        }
        ok
    }

    /// Deletes every resident page of the file; `true` only if all
    /// deletions succeeded.
    pub fn delete_all_pages(&mut self, file_id: FileId) -> bool {
        let mut ok = true;
        for page_id in self.resident_pages_of(file_id) {
            ok = self.delete_page(file_id, page_id) && ok;
        }
        ok
    }

    pub fn size(&self) -> usize {
        self.pool_size
    }

    /// Snapshots the lookup index so the per-page operations may mutate
    /// it while we iterate.
    fn resident_pages_of(&self, file_id: FileId) -> Vec<PageId> {
        self.page_table
            .keys()
            .filter(|(fid, _)| *fid == file_id)
            .map(|&(_, pid)| pid)
            .collect()
    }

    /// Prefers the free list; otherwise asks the replacer for a victim.
    fn get_available_frame(&mut self) -> Result<FrameId> {
        if let Some(frame_id) = self.free_list.pop_front() {
            return Ok(frame_id);
        }
        self.replacer
            .write()
            .expect(COULD_NOT_UNWRAP_REPLACER_MSG)
            .victim()
            .ok_or(Error::NoFreeFrame)
    }

    /// Points the frame at `(file_id, page_id)`: writes back the old page
    /// if dirty, drops the old mapping, resets the frame, reads the new
    /// page from disk, and pins it for the caller.
    fn update_frame(&mut self, frame_id: FrameId, file_id: FileId, page_id: PageId) -> Result<()> {
        let (old_file_id, old_page_id) = {
            let page_ref = self.frames[frame_id].page();
            let page = page_ref.read()?;
            (page.file_id(), page.page_id())
        };
        if self.frames[frame_id].is_dirty() {
            log::debug!(
                "evicting dirty page {}:{} from frame {}",
                old_file_id,
                old_page_id,
                frame_id
            );
            self.write_frame_back(frame_id, old_file_id, old_page_id)?;
        }
        self.page_table.remove(&(old_file_id, old_page_id));
        self.frames[frame_id].reset();

        let page_ref = self.frames[frame_id].page();
        {
            let mut page = page_ref.write()?;
            self.disk_manager
                .write()
                .expect(COULD_NOT_UNWRAP_DISK_MSG)
                .read_page(file_id, page_id, page.data_mut())?;
            page.set_file_page_id(file_id, page_id);
        }

        self.frames[frame_id].pin();
        self.replacer
            .write()
            .expect(COULD_NOT_UNWRAP_REPLACER_MSG)
            .pin(frame_id);
        self.page_table.insert((file_id, page_id), frame_id);
        Ok(())
    }

    fn write_frame_back(&mut self, frame_id: FrameId, file_id: FileId, page_id: PageId) -> Result<()> {
        {
            let page_ref = self.frames[frame_id].page();
            let page = page_ref.read()?;
            self.disk_manager
                .write()
                .expect(COULD_NOT_UNWRAP_DISK_MSG)
                .write_page(file_id, page_id, page.data())?;
        }
        self.frames[frame_id].set_dirty(false);
        Ok(())
    }

    pub(crate) fn get_pin_count(&self, file_id: FileId, page_id: PageId) -> Option<usize> {
        let &frame_id = self.page_table.get(&(file_id, page_id))?;
        Some(self.frames[frame_id].pin_count())
    }

    pub(crate) fn get_is_dirty(&self, file_id: FileId, page_id: PageId) -> Option<bool> {
        let &frame_id = self.page_table.get(&(file_id, page_id))?;
        Some(self.frames[frame_id].is_dirty())
    }

    pub(crate) fn page_in_buffer(&self, file_id: FileId, page_id: PageId) -> bool {
        self.page_table.contains_key(&(file_id, page_id))
    }
}

impl Drop for BufferPoolManager {
    /// Pool teardown writes every dirty frame back so no acknowledged
    /// mutation is lost.
    fn drop(&mut self) {
        let keys: Vec<(FileId, PageId)> = self.page_table.keys().copied().collect();
        for (file_id, page_id) in keys {
            if self.get_is_dirty(file_id, page_id) == Some(true) && !self.flush_page(file_id, page_id)
            {
                log::warn!("could not flush page {}:{} at teardown", file_id, page_id);
            }
        }
    }
}
