use crate::common::constants::{PIN_COUNT_UNDERFLOW_MSG, RESET_PINNED_FRAME_MSG};
use crate::storage::page::{Page, PageRef};

/// A buffer pool slot. Owns exactly one page buffer for the lifetime of
/// the pool and is reused across many `(file_id, page_id)` pairs.
#[derive(Debug)]
pub struct Frame {
    page: PageRef,
    pin_count: usize,
    dirty: bool,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub fn new() -> Frame {
        Frame {
            page: Page::new_with_handle(),
            pin_count: 0,
            dirty: false,
        }
    }

    /// A shared handle to the frame's page buffer.
    pub fn page(&self) -> PageRef {
        PageRef::clone(&self.page)
    }

    pub fn pin(&mut self) {
        self.pin_count += 1;
    }

    pub fn unpin(&mut self) {
        if self.pin_count == 0 {
            panic!("{}", PIN_COUNT_UNDERFLOW_MSG);
        }
        self.pin_count -= 1;
    }

    pub fn pin_count(&self) -> usize {
        self.pin_count
    }

    pub fn in_use(&self) -> bool {
        self.pin_count > 0
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Sticky once set; only cleared by the pool's write-back paths.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Zeroes the page's content and metadata immediately before the
    /// frame is reassigned to another page.
    pub fn reset(&mut self) {
        assert_eq!(0, self.pin_count, "{}", RESET_PINNED_FRAME_MSG);
        self.page.write().unwrap().reset();
        self.dirty = false;
    }
}
