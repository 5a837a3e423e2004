use crate::common::constants::INVALID_PAGE_ID;
use crate::config::config::{PAGE_HEADER_SIZE, PAXDB_PAGE_SIZE_BYTES};
use crate::storage::disk::{FileId, PageId};
use std::sync::{Arc, RwLock};

pub type PageRef = Arc<RwLock<Page>>;

// Header field offsets within the page buffer, u32 little-endian each.
const PAGE_ID_OFFSET: usize = 0;
const FILE_ID_OFFSET: usize = 4;
const RECORD_NUM_OFFSET: usize = 8;
const NEXT_FREE_PAGE_ID_OFFSET: usize = 12;

/// One fixed-size unit of disk/memory transfer. The first
/// `PAGE_HEADER_SIZE` bytes are the page header; the remainder is the
/// body interpreted by a page handle.
#[derive(Debug, Clone)]
pub struct Page {
    data: Vec<u8>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Page {
        let mut page = Page {
            data: vec![0; PAXDB_PAGE_SIZE_BYTES],
        };
        page.set_file_page_id(INVALID_PAGE_ID, INVALID_PAGE_ID);
        page.set_next_free_page_id(INVALID_PAGE_ID);
        page
    }

    pub fn new_with_handle() -> PageRef {
        Arc::new(RwLock::new(Page::new()))
    }

    pub fn page_id(&self) -> PageId {
        self.read_u32(PAGE_ID_OFFSET)
    }

    pub fn file_id(&self) -> FileId {
        self.read_u32(FILE_ID_OFFSET)
    }

    pub fn set_file_page_id(&mut self, file_id: FileId, page_id: PageId) {
        self.write_u32(FILE_ID_OFFSET, file_id);
        self.write_u32(PAGE_ID_OFFSET, page_id);
    }

    /// Number of occupied slots on the page.
    pub fn record_num(&self) -> usize {
        self.read_u32(RECORD_NUM_OFFSET) as usize
    }

    pub fn set_record_num(&mut self, record_num: usize) {
        self.write_u32(RECORD_NUM_OFFSET, record_num as u32);
    }

    /// Next page on the table's free-page chain, `INVALID_PAGE_ID` at the
    /// chain's end.
    pub fn next_free_page_id(&self) -> PageId {
        self.read_u32(NEXT_FREE_PAGE_ID_OFFSET)
    }

    pub fn set_next_free_page_id(&mut self, page_id: PageId) {
        self.write_u32(NEXT_FREE_PAGE_ID_OFFSET, page_id);
    }

    /// Zeroes the page's content and metadata ahead of frame reuse.
    pub fn reset(&mut self) {
        self.data.fill(0);
        self.set_file_page_id(INVALID_PAGE_ID, INVALID_PAGE_ID);
        self.set_next_free_page_id(INVALID_PAGE_ID);
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The page body past the header, as interpreted by page handles.
    pub fn body(&self) -> &[u8] {
        &self.data[PAGE_HEADER_SIZE..]
    }

    pub fn body_mut(&mut self) -> &mut [u8] {
        &mut self.data[PAGE_HEADER_SIZE..]
    }

    fn read_u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.data[offset..offset + 4].try_into().unwrap())
    }

    fn write_u32(&mut self, offset: usize, value: u32) {
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}
