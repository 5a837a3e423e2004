use crate::common::constants::INVALID_PAGE_ID;
use crate::common::{Error, Result};
use crate::config::config::{PAGE_HEADER_SIZE, PAXDB_PAGE_SIZE_BYTES};
use crate::storage::disk::PageId;
use crate::storage::page::Page;
use crate::storage::table::bitmap;
use crate::types::Schema;
use serde::{Deserialize, Serialize};

/// Persistent per-table metadata, stored in the table file's header page
/// and mutated by the table handle as records and pages come and go.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHeader {
    /// Payload bytes of one record.
    pub(crate) rec_size: u32,
    /// Bytes of the per-record null bitmap.
    pub(crate) nullmap_size: u32,
    /// Bytes of the per-page slot bitmap.
    pub(crate) bitmap_size: u32,
    /// Slots per data page.
    pub(crate) rec_per_page: u32,
    /// Records currently stored in the table.
    pub(crate) rec_num: u32,
    /// Pages in the table file, the header page included.
    pub(crate) page_num: u32,
    /// Head of the chain of pages with vacant slots.
    pub(crate) first_free_page: PageId,
}

impl TableHeader {
    /// Lays out a fresh table for `schema`, packing as many slots per
    /// page as the slot bitmap leaves room for.
    pub fn for_schema(schema: &Schema) -> TableHeader {
        let slot_size = schema.nullmap_size() + schema.rec_size();
        assert!(slot_size > 0, "schema has no columns");

        let usable = PAXDB_PAGE_SIZE_BYTES - PAGE_HEADER_SIZE;
        let mut rec_per_page = usable * 8 / (slot_size * 8 + 1);
        while rec_per_page > 0
            && bitmap::size_in_bytes(rec_per_page) + rec_per_page * slot_size > usable
        {
            rec_per_page -= 1;
        }
        assert!(rec_per_page > 0, "record does not fit in one page");

        TableHeader {
            rec_size: schema.rec_size() as u32,
            nullmap_size: schema.nullmap_size() as u32,
            bitmap_size: bitmap::size_in_bytes(rec_per_page) as u32,
            rec_per_page: rec_per_page as u32,
            rec_num: 0,
            page_num: 1,
            first_free_page: INVALID_PAGE_ID,
        }
    }

    pub fn rec_size(&self) -> usize {
        self.rec_size as usize
    }

    pub fn nullmap_size(&self) -> usize {
        self.nullmap_size as usize
    }

    pub fn bitmap_size(&self) -> usize {
        self.bitmap_size as usize
    }

    pub fn rec_per_page(&self) -> usize {
        self.rec_per_page as usize
    }

    pub fn rec_num(&self) -> usize {
        self.rec_num as usize
    }

    pub fn page_num(&self) -> u32 {
        self.page_num
    }

    pub fn first_free_page(&self) -> PageId {
        self.first_free_page
    }

    /// Serializes the header into the body of the table's header page.
    pub fn write_to(&self, page: &mut Page) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| Error::InvalidData(format!("Failed to serialize table header: {e}")))?;
        page.body_mut()[..bytes.len()].copy_from_slice(&bytes);
        Ok(())
    }

    pub fn read_from(page: &Page) -> Result<TableHeader> {
        bincode::deserialize(page.body())
            .map_err(|e| Error::InvalidData(format!("Failed to deserialize table header: {e}")))
    }
}
