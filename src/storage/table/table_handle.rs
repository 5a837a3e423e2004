use crate::common::constants::{
    COULD_NOT_UNWRAP_BPM_MSG, COULD_NOT_UNWRAP_DISK_MSG, FILE_HEADER_PAGE_ID, INVALID_PAGE_ID,
};
use crate::common::{Error, Result};
use crate::storage::buffer::buffer_pool_manager::BufferPoolManager;
use crate::storage::disk::{DiskManager, FileId, PageId};
use crate::storage::page::{PageRef, RecordId, SlotId};
use crate::storage::record::{Chunk, Record};
use crate::storage::table::header::TableHeader;
use crate::storage::table::page_handle::{NAryPageHandle, PageHandle, PaxPageHandle};
use crate::types::{Schema, StorageModel};
use std::sync::{Arc, RwLock};

/// A table's id is the id of its database file.
pub type TableId = FileId;

/// Owns a table's header and schema, fetches pages through the buffer
/// pool, wraps them in the layout-appropriate page handle, and exposes
/// record-level CRUD, column-chunk reads, and forward RID iteration.
///
/// Page handles live for exactly one operation and are dropped before
/// the page is unpinned; every fetch below is matched by one unpin on
/// all paths, error paths included.
#[derive(Debug)]
pub struct TableHandle {
    tab_hdr: TableHeader,
    table_id: TableId,
    disk_manager: Arc<RwLock<DiskManager>>,
    buffer_pool_manager: Arc<RwLock<BufferPoolManager>>,
    schema: Arc<Schema>,
    storage_model: StorageModel,
    /// PAX only: start byte of each column within the slot region,
    /// `rec_per_page * field_offset(j)` past the null-map region.
    field_offset: Vec<usize>,
}

impl TableHandle {
    /// Creates the table file and persists a fresh header to its header
    /// page.
    pub fn create(
        disk_manager: &Arc<RwLock<DiskManager>>,
        buffer_pool_manager: &Arc<RwLock<BufferPoolManager>>,
        name: &str,
        schema: Arc<Schema>,
        storage_model: StorageModel,
    ) -> Result<TableHandle> {
        let table_id = disk_manager
            .write()
            .expect(COULD_NOT_UNWRAP_DISK_MSG)
            .create_file(name)?;
        let tab_hdr = TableHeader::for_schema(&schema);

        let handle = Self::assemble(
            tab_hdr,
            table_id,
            disk_manager,
            buffer_pool_manager,
            schema,
            storage_model,
        );
        handle.write_header_page()?;
        log::debug!("created table '{}' as file {}", name, table_id);
        Ok(handle)
    }

    /// Opens an existing table file and loads its header page.
    pub fn open(
        disk_manager: &Arc<RwLock<DiskManager>>,
        buffer_pool_manager: &Arc<RwLock<BufferPoolManager>>,
        name: &str,
        schema: Arc<Schema>,
        storage_model: StorageModel,
    ) -> Result<TableHandle> {
        let table_id = disk_manager
            .write()
            .expect(COULD_NOT_UNWRAP_DISK_MSG)
            .open_file(name)?;

        let page = buffer_pool_manager
            .write()
            .expect(COULD_NOT_UNWRAP_BPM_MSG)
            .fetch_page(table_id, FILE_HEADER_PAGE_ID)?;
        let tab_hdr = page
            .read()
            .map_err(Error::from)
            .and_then(|page| TableHeader::read_from(&page));
        buffer_pool_manager
            .write()
            .expect(COULD_NOT_UNWRAP_BPM_MSG)
            .unpin_page(table_id, FILE_HEADER_PAGE_ID, false);

        Ok(Self::assemble(
            tab_hdr?,
            table_id,
            disk_manager,
            buffer_pool_manager,
            schema,
            storage_model,
        ))
    }

    fn assemble(
        tab_hdr: TableHeader,
        table_id: TableId,
        disk_manager: &Arc<RwLock<DiskManager>>,
        buffer_pool_manager: &Arc<RwLock<BufferPoolManager>>,
        schema: Arc<Schema>,
        storage_model: StorageModel,
    ) -> TableHandle {
        let field_offset = match storage_model {
            StorageModel::NAryModel => Vec::new(),
            StorageModel::PaxModel => (0..schema.field_count())
                .map(|j| tab_hdr.rec_per_page() * schema.field_offset(j))
                .collect(),
        };
        TableHandle {
            tab_hdr,
            table_id,
            disk_manager: Arc::clone(disk_manager),
            buffer_pool_manager: Arc::clone(buffer_pool_manager),
            schema,
            storage_model,
            field_offset,
        }
    }

    /// Persists the header and flushes the table's resident pages.
    pub fn close(&self) -> Result<()> {
        self.write_header_page()?;
        self.buffer_pool_manager
            .write()
            .expect(COULD_NOT_UNWRAP_BPM_MSG)
            .flush_all_pages(self.table_id);
        Ok(())
    }

    /// Reads the record stored under `rid`.
    pub fn get_record(&self, rid: &RecordId) -> Result<Record> {
        let page_handle = self.fetch_page_handle(rid.page_id())?;
        if !page_handle.slot_is_occupied(rid.slot_id()) {
            drop(page_handle);
            self.unpin(rid.page_id(), false);
            return Err(Error::RecordMiss(rid.to_string()));
        }

        let mut null_map = vec![0_u8; self.tab_hdr.nullmap_size()];
        let mut data = vec![0_u8; self.tab_hdr.rec_size()];
        page_handle.read_slot(rid.slot_id(), &mut null_map, &mut data);
        drop(page_handle);
        self.unpin(rid.page_id(), false);

        Ok(Record::from_parts(&self.schema, null_map, data, Some(*rid)))
    }

    /// Inserts the record into the first vacant slot of the free chain's
    /// head page, allocating a page when the chain is empty. Returns the
    /// slot's RID.
    pub fn insert_record(&mut self, record: &Record) -> Result<RecordId> {
        let (page_id, slot_id, record_num, next_free_page_id) = {
            let page_handle = self.create_page_handle()?;
            let slot_id = page_handle.find_first_slot(0, false) as SlotId;
            let (page_id, record_num, next_free_page_id) =
                Self::write_record_to_slot(&page_handle, slot_id, record)?;
            (page_id, slot_id, record_num, next_free_page_id)
        };

        self.finish_insert(page_id, record_num, next_free_page_id);
        Ok(RecordId::new(page_id, slot_id))
    }

    /// Inserts the record into the specific slot named by `rid`. Fails
    /// with `PageMiss` on the invalid-RID sentinel and `RecordExists`
    /// when the slot is occupied.
    pub fn insert_record_at(&mut self, rid: &RecordId, record: &Record) -> Result<()> {
        if rid.is_invalid() {
            return Err(Error::PageMiss(rid.to_string()));
        }

        let (record_num, next_free_page_id) = {
            let page_handle = self.fetch_page_handle(rid.page_id())?;
            if page_handle.slot_is_occupied(rid.slot_id()) {
                drop(page_handle);
                self.unpin(rid.page_id(), false);
                return Err(Error::RecordExists(rid.to_string()));
            }
            let (_, record_num, next_free_page_id) =
                Self::write_record_to_slot(&page_handle, rid.slot_id(), record)?;
            (record_num, next_free_page_id)
        };

        self.finish_insert(rid.page_id(), record_num, next_free_page_id);
        Ok(())
    }

    /// Clears the slot under `rid`. A page transitioning from full to
    /// not-full returns to the head of the free chain.
    pub fn delete_record(&mut self, rid: &RecordId) -> Result<()> {
        let (page_ref, record_num) = {
            let page_handle = self.fetch_page_handle(rid.page_id())?;
            if !page_handle.slot_is_occupied(rid.slot_id()) {
                drop(page_handle);
                self.unpin(rid.page_id(), false);
                return Err(Error::RecordMiss(rid.to_string()));
            }

            page_handle.set_slot_bit(rid.slot_id(), false);
            let page_ref = PageRef::clone(page_handle.page());
            let mut page = page_ref.write()?;
            let record_num = page.record_num() - 1;
            page.set_record_num(record_num);
            drop(page);
            (page_ref, record_num)
        };

        self.tab_hdr.rec_num -= 1;
        if record_num == self.tab_hdr.rec_per_page() - 1 {
            page_ref
                .write()?
                .set_next_free_page_id(self.tab_hdr.first_free_page);
            self.tab_hdr.first_free_page = rid.page_id();
        }
        self.unpin(rid.page_id(), true);
        Ok(())
    }

    /// Overwrites the record stored under `rid` in place.
    pub fn update_record(&self, rid: &RecordId, record: &Record) -> Result<()> {
        let page_handle = self.fetch_page_handle(rid.page_id())?;
        if !page_handle.slot_is_occupied(rid.slot_id()) {
            drop(page_handle);
            self.unpin(rid.page_id(), false);
            return Err(Error::RecordMiss(rid.to_string()));
        }

        page_handle.write_slot(rid.slot_id(), record.null_map(), record.data(), true);
        drop(page_handle);
        self.unpin(rid.page_id(), true);
        Ok(())
    }

    /// Reads the page's occupied slots as one column array per field of
    /// `chunk_schema`. PAX tables only.
    pub fn get_chunk(&self, page_id: PageId, chunk_schema: &Arc<Schema>) -> Result<Chunk> {
        let page_handle = self.fetch_page_handle(page_id)?;
        let chunk = page_handle.read_chunk(chunk_schema);
        drop(page_handle);
        self.unpin(page_id, false);
        chunk
    }

    /// RID of the first record in page order, `None` for an empty table.
    pub fn get_first_rid(&self) -> Result<Option<RecordId>> {
        let mut page_id = FILE_HEADER_PAGE_ID + 1;
        while page_id < self.tab_hdr.page_num() {
            let page_handle = self.fetch_page_handle(page_id)?;
            let slot_id = page_handle.find_first_slot(0, true);
            drop(page_handle);
            self.unpin(page_id, false);

            if slot_id != self.tab_hdr.rec_per_page() {
                return Ok(Some(RecordId::new(page_id, slot_id as SlotId)));
            }
            page_id += 1;
        }
        Ok(None)
    }

    /// RID of the first record past `rid` in page order, `None` past the
    /// table's end.
    pub fn get_next_rid(&self, rid: &RecordId) -> Result<Option<RecordId>> {
        let mut page_id = rid.page_id();
        let mut start_slot = rid.slot_id() as usize + 1;
        while page_id < self.tab_hdr.page_num() {
            let page_handle = self.fetch_page_handle(page_id)?;
            let slot_id = page_handle.find_first_slot(start_slot, true);
            drop(page_handle);
            self.unpin(page_id, false);

            if slot_id != self.tab_hdr.rec_per_page() {
                return Ok(Some(RecordId::new(page_id, slot_id as SlotId)));
            }
            page_id += 1;
            start_slot = 0;
        }
        Ok(None)
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn table_header(&self) -> &TableHeader {
        &self.tab_hdr
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn storage_model(&self) -> StorageModel {
        self.storage_model
    }

    pub fn table_name(&self) -> Result<String> {
        self.disk_manager
            .read()
            .expect(COULD_NOT_UNWRAP_DISK_MSG)
            .get_file_name(self.table_id)
    }

    /// Page-side effects of an insert: writes the slot, sets its bit,
    /// bumps the page's record count. Returns the page id, the new
    /// count, and the page's free-chain successor.
    fn write_record_to_slot(
        page_handle: &PageHandle,
        slot_id: SlotId,
        record: &Record,
    ) -> Result<(PageId, usize, PageId)> {
        page_handle.write_slot(slot_id, record.null_map(), record.data(), false);
        page_handle.set_slot_bit(slot_id, true);

        let page_ref = PageRef::clone(page_handle.page());
        let mut page = page_ref.write()?;
        let record_num = page.record_num() + 1;
        page.set_record_num(record_num);
        Ok((page.page_id(), record_num, page.next_free_page_id()))
    }

    /// Header-side effects of an insert, after the page handle is gone.
    /// A now-full page is spliced off the free chain. Unpins dirty.
    fn finish_insert(&mut self, page_id: PageId, record_num: usize, next_free_page_id: PageId) {
        self.tab_hdr.rec_num += 1;
        if record_num == self.tab_hdr.rec_per_page() {
            self.tab_hdr.first_free_page = next_free_page_id;
        }
        self.unpin(page_id, true);
    }

    fn fetch_page_handle(&self, page_id: PageId) -> Result<PageHandle> {
        let page = self
            .buffer_pool_manager
            .write()
            .expect(COULD_NOT_UNWRAP_BPM_MSG)
            .fetch_page(self.table_id, page_id)?;
        Ok(self.wrap_page_handle(page))
    }

    /// Page handle for the next insert target: the head of the free
    /// chain, or a freshly allocated page linked in at the head.
    fn create_page_handle(&mut self) -> Result<PageHandle> {
        if self.tab_hdr.first_free_page == INVALID_PAGE_ID {
            return self.create_new_page_handle();
        }
        self.fetch_page_handle(self.tab_hdr.first_free_page)
    }

    fn create_new_page_handle(&mut self) -> Result<PageHandle> {
        let page_id = self.tab_hdr.page_num();
        let old_first_free = self.tab_hdr.first_free_page;
        self.tab_hdr.page_num += 1;
        self.tab_hdr.first_free_page = page_id;

        let page = match self
            .buffer_pool_manager
            .write()
            .expect(COULD_NOT_UNWRAP_BPM_MSG)
            .fetch_page(self.table_id, page_id)
        {
            Ok(page) => page,
            Err(e) => {
                self.tab_hdr.page_num -= 1;
                self.tab_hdr.first_free_page = old_first_free;
                return Err(e);
            }
        };

        let page_handle = self.wrap_page_handle(page);
        page_handle
            .page()
            .write()?
            .set_next_free_page_id(old_first_free);
        Ok(page_handle)
    }

    fn wrap_page_handle(&self, page: PageRef) -> PageHandle {
        match self.storage_model {
            StorageModel::NAryModel => NAryPageHandle::new(&self.tab_hdr, page),
            StorageModel::PaxModel => {
                PaxPageHandle::new(&self.tab_hdr, page, &self.schema, &self.field_offset)
            }
        }
    }

    fn write_header_page(&self) -> Result<()> {
        let page = self
            .buffer_pool_manager
            .write()
            .expect(COULD_NOT_UNWRAP_BPM_MSG)
            .fetch_page(self.table_id, FILE_HEADER_PAGE_ID)?;
        let result = page
            .write()
            .map_err(Error::from)
            .and_then(|mut page| self.tab_hdr.write_to(&mut page));
        self.unpin(FILE_HEADER_PAGE_ID, result.is_ok());
        result
    }

    fn unpin(&self, page_id: PageId, is_dirty: bool) {
        self.buffer_pool_manager
            .write()
            .expect(COULD_NOT_UNWRAP_BPM_MSG)
            .unpin_page(self.table_id, page_id, is_dirty);
    }
}
