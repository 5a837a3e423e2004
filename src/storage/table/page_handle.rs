use crate::common::{Error, Result};
use crate::storage::page::{PageRef, SlotId};
use crate::storage::record::Chunk;
use crate::storage::table::bitmap;
use crate::storage::table::header::TableHeader;
use crate::types::{Field, Schema};
use std::sync::Arc;

/// A layout-aware view over one fetched page's bytes. Handles borrow the
/// table header (and, for PAX, the schema and precomputed column
/// offsets) for the duration of a single table operation and are
/// discarded before the page is unpinned.
///
/// Page body layout, both models:
///
/// ```text
/// | BITMAP (bitmap_size bytes) | SLOT REGION |
/// ```
pub enum PageHandle<'a> {
    NAry(NAryPageHandle<'a>),
    Pax(PaxPageHandle<'a>),
}

impl<'a> PageHandle<'a> {
    pub fn page(&self) -> &PageRef {
        match self {
            PageHandle::NAry(handle) => &handle.page,
            PageHandle::Pax(handle) => &handle.page,
        }
    }

    fn tab_hdr(&self) -> &TableHeader {
        match self {
            PageHandle::NAry(handle) => handle.tab_hdr,
            PageHandle::Pax(handle) => handle.tab_hdr,
        }
    }

    /// Copies the record's null map and payload into the slot. Inserts
    /// (`update == false`) require the slot bit clear; updates require it
    /// set.
    pub fn write_slot(&self, slot_id: SlotId, null_map: &[u8], data: &[u8], update: bool) {
        assert!(
            (slot_id as usize) < self.tab_hdr().rec_per_page(),
            "slot_id out of range"
        );
        assert_eq!(
            self.slot_is_occupied(slot_id),
            update,
            "slot occupancy does not match update: {update}"
        );
        match self {
            PageHandle::NAry(handle) => handle.write_slot(slot_id, null_map, data),
            PageHandle::Pax(handle) => handle.write_slot(slot_id, null_map, data),
        }
    }

    /// Copies the slot's null map and payload out. The slot must be
    /// occupied.
    pub fn read_slot(&self, slot_id: SlotId, null_map: &mut [u8], data: &mut [u8]) {
        assert!(
            (slot_id as usize) < self.tab_hdr().rec_per_page(),
            "slot_id out of range"
        );
        assert!(self.slot_is_occupied(slot_id), "slot is empty");
        match self {
            PageHandle::NAry(handle) => handle.read_slot(slot_id, null_map, data),
            PageHandle::Pax(handle) => handle.read_slot(slot_id, null_map, data),
        }
    }

    /// Materializes the page's occupied slots as one column array per
    /// field of `chunk_schema`. Column reads are a PAX capability; the
    /// row-oriented layout does not implement them.
    pub fn read_chunk(&self, chunk_schema: &Arc<Schema>) -> Result<Chunk> {
        match self {
            PageHandle::NAry(_) => Err(Error::Unimplemented(
                "N-ary pages do not support chunk reads".to_string(),
            )),
            PageHandle::Pax(handle) => handle.read_chunk(chunk_schema),
        }
    }

    pub fn slot_is_occupied(&self, slot_id: SlotId) -> bool {
        let page = self.page().read().unwrap();
        bitmap::get_bit(page.body(), slot_id as usize)
    }

    pub fn set_slot_bit(&self, slot_id: SlotId, value: bool) {
        let mut page = self.page().write().unwrap();
        bitmap::set_bit(page.body_mut(), slot_id as usize, value);
    }

    /// First slot at or after `start` whose bit equals `want_set`, or
    /// `rec_per_page` when none remains.
    pub fn find_first_slot(&self, start: usize, want_set: bool) -> usize {
        let rec_per_page = self.tab_hdr().rec_per_page();
        let page = self.page().read().unwrap();
        bitmap::find_first(page.body(), rec_per_page, start, want_set)
    }
}

/// Row-major layout: slot `s` stores its null map and payload
/// contiguously at `s * (nullmap_size + rec_size)` within the slot
/// region.
pub struct NAryPageHandle<'a> {
    tab_hdr: &'a TableHeader,
    page: PageRef,
}

impl<'a> NAryPageHandle<'a> {
    pub fn new(tab_hdr: &'a TableHeader, page: PageRef) -> PageHandle<'a> {
        debug_assert_eq!(
            bitmap::size_in_bytes(tab_hdr.rec_per_page()),
            tab_hdr.bitmap_size(),
            "bitmap size not match"
        );
        PageHandle::NAry(NAryPageHandle { tab_hdr, page })
    }

    fn slot_offset(&self, slot_id: SlotId) -> usize {
        let rec_full_size = self.tab_hdr.nullmap_size() + self.tab_hdr.rec_size();
        self.tab_hdr.bitmap_size() + slot_id as usize * rec_full_size
    }

    fn write_slot(&self, slot_id: SlotId, null_map: &[u8], data: &[u8]) {
        let nullmap_size = self.tab_hdr.nullmap_size();
        let rec_size = self.tab_hdr.rec_size();
        let offset = self.slot_offset(slot_id);

        let mut page = self.page.write().unwrap();
        let body = page.body_mut();
        body[offset..offset + nullmap_size].copy_from_slice(null_map);
        body[offset + nullmap_size..offset + nullmap_size + rec_size].copy_from_slice(data);
    }

    fn read_slot(&self, slot_id: SlotId, null_map: &mut [u8], data: &mut [u8]) {
        let nullmap_size = self.tab_hdr.nullmap_size();
        let rec_size = self.tab_hdr.rec_size();
        let offset = self.slot_offset(slot_id);

        let page = self.page.read().unwrap();
        let body = page.body();
        null_map.copy_from_slice(&body[offset..offset + nullmap_size]);
        data.copy_from_slice(&body[offset + nullmap_size..offset + nullmap_size + rec_size]);
    }
}

/// Columnar-within-page layout. The slot region packs every slot's null
/// map first, then one array per field:
///
/// ```text
/// | nullmap_0, nullmap_1, ... , nullmap_{N-1} |
/// | field_0[0], field_0[1], ... , field_0[N-1] |
/// | field_1[0], ... |
/// ```
///
/// `offsets[j] = rec_per_page * field_offset(j)` locates column `j`
/// relative to the end of the null-map region.
pub struct PaxPageHandle<'a> {
    tab_hdr: &'a TableHeader,
    page: PageRef,
    schema: &'a Arc<Schema>,
    offsets: &'a [usize],
}

impl<'a> PaxPageHandle<'a> {
    pub fn new(
        tab_hdr: &'a TableHeader,
        page: PageRef,
        schema: &'a Arc<Schema>,
        offsets: &'a [usize],
    ) -> PageHandle<'a> {
        debug_assert_eq!(
            bitmap::size_in_bytes(tab_hdr.rec_per_page()),
            tab_hdr.bitmap_size(),
            "bitmap size not match"
        );
        debug_assert_eq!(schema.field_count(), offsets.len());
        PageHandle::Pax(PaxPageHandle {
            tab_hdr,
            page,
            schema,
            offsets,
        })
    }

    /// Start of the column arrays, relative to the page body.
    fn columns_base(&self) -> usize {
        self.tab_hdr.bitmap_size() + self.tab_hdr.nullmap_size() * self.tab_hdr.rec_per_page()
    }

    fn write_slot(&self, slot_id: SlotId, null_map: &[u8], data: &[u8]) {
        let nullmap_size = self.tab_hdr.nullmap_size();
        let nullmap_offset = self.tab_hdr.bitmap_size() + slot_id as usize * nullmap_size;
        let columns_base = self.columns_base();

        let mut page = self.page.write().unwrap();
        let body = page.body_mut();
        body[nullmap_offset..nullmap_offset + nullmap_size].copy_from_slice(null_map);

        for field_idx in 0..self.schema.field_count() {
            let field_size = self.schema.field_size(field_idx);
            let src = self.schema.field_offset(field_idx);
            let dst = columns_base + self.offsets[field_idx] + slot_id as usize * field_size;
            body[dst..dst + field_size].copy_from_slice(&data[src..src + field_size]);
        }
    }

    fn read_slot(&self, slot_id: SlotId, null_map: &mut [u8], data: &mut [u8]) {
        let nullmap_size = self.tab_hdr.nullmap_size();
        let nullmap_offset = self.tab_hdr.bitmap_size() + slot_id as usize * nullmap_size;
        let columns_base = self.columns_base();

        let page = self.page.read().unwrap();
        let body = page.body();
        null_map.copy_from_slice(&body[nullmap_offset..nullmap_offset + nullmap_size]);

        for field_idx in 0..self.schema.field_count() {
            let field_size = self.schema.field_size(field_idx);
            let dst = self.schema.field_offset(field_idx);
            let src = columns_base + self.offsets[field_idx] + slot_id as usize * field_size;
            data[dst..dst + field_size].copy_from_slice(&body[src..src + field_size]);
        }
    }

    /// Reads one column array per field of `chunk_schema`, mapping each
    /// projected field back to its column in the table schema. Vacant
    /// slots are skipped via the bitmap, so each array holds exactly
    /// `record_num` values even after deletions have left holes.
    fn read_chunk(&self, chunk_schema: &Arc<Schema>) -> Result<Chunk> {
        let rec_per_page = self.tab_hdr.rec_per_page();
        let columns_base = self.columns_base();

        let page = self.page.read().unwrap();
        let body = page.body();
        let record_num = page.record_num();

        let mut col_arrs = Vec::with_capacity(chunk_schema.field_count());
        for column in chunk_schema.columns() {
            let field_idx = self.schema.field_index(column.name()).ok_or_else(|| {
                Error::InvalidInput(format!("no such column: {}", column.name()))
            })?;
            let field_size = self.schema.field_size(field_idx);
            let data_type = self.schema.column(field_idx).data_type();
            let column_base = columns_base + self.offsets[field_idx];

            let mut values = Vec::with_capacity(record_num);
            for slot_id in 0..rec_per_page {
                if values.len() == record_num {
                    break;
                }
                if !bitmap::get_bit(body, slot_id) {
                    continue;
                }
                let offset = column_base + slot_id * field_size;
                values.push(Field::deserialize(
                    &body[offset..offset + field_size],
                    data_type,
                ));
            }
            col_arrs.push(values);
        }
        Ok(Chunk::new(chunk_schema, col_arrs))
    }
}
