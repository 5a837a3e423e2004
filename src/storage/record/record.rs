use crate::common::{Error, Result};
use crate::storage::page::RecordId;
use crate::storage::table::bitmap;
use crate::types::{Field, Schema};
use itertools::Itertools;
use std::fmt;
use std::sync::Arc;

/// One row under a schema: a null bitmap (bit per column) plus a
/// fixed-width payload of `schema.rec_size()` bytes. Records read from a
/// table carry the RID they were stored under.
#[derive(Clone, Debug)]
pub struct Record {
    schema: Arc<Schema>,
    null_map: Vec<u8>,
    data: Vec<u8>,
    rid: Option<RecordId>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.null_map == other.null_map && self.data == other.data
    }
}

impl Record {
    /// Builds a record by serializing `values` under `schema`. Null
    /// fields set their bit in the null map and zero their payload bytes.
    pub fn from_fields(schema: &Arc<Schema>, values: &[Field]) -> Result<Record> {
        if values.len() != schema.field_count() {
            return Err(Error::InvalidInput(format!(
                "expected {} fields, got {}",
                schema.field_count(),
                values.len()
            )));
        }

        let mut null_map = vec![0_u8; schema.nullmap_size()];
        let mut data = vec![0_u8; schema.rec_size()];
        for (index, value) in values.iter().enumerate() {
            let column = schema.column(index);
            if value.is_null() {
                if !column.nullable() {
                    return Err(Error::InvalidInput(format!(
                        "column {} is not nullable",
                        column.name()
                    )));
                }
                bitmap::set_bit(&mut null_map, index, true);
                continue;
            }
            if value.get_type() != Some(column.data_type()) {
                return Err(Error::InvalidInput(format!(
                    "field {value} does not match column {column}"
                )));
            }

            let bytes = value.serialize();
            let width = schema.field_size(index);
            if bytes.len() > width {
                return Err(Error::InvalidInput(format!(
                    "value too wide for column {column}"
                )));
            }
            let offset = schema.field_offset(index);
            data[offset..offset + bytes.len()].copy_from_slice(&bytes);
        }

        Ok(Record {
            schema: Arc::clone(schema),
            null_map,
            data,
            rid: None,
        })
    }

    /// Wraps raw null-map and payload bytes read from a page slot.
    pub fn from_parts(
        schema: &Arc<Schema>,
        null_map: Vec<u8>,
        data: Vec<u8>,
        rid: Option<RecordId>,
    ) -> Record {
        debug_assert_eq!(null_map.len(), schema.nullmap_size());
        debug_assert_eq!(data.len(), schema.rec_size());
        Record {
            schema: Arc::clone(schema),
            null_map,
            data,
            rid,
        }
    }

    /// Rewrites `record` under `out_schema`, reordering or narrowing its
    /// fields by name. The projected record drops the source RID.
    pub fn project(out_schema: &Arc<Schema>, record: &Record) -> Result<Record> {
        let mut null_map = vec![0_u8; out_schema.nullmap_size()];
        let mut data = vec![0_u8; out_schema.rec_size()];

        for out_index in 0..out_schema.field_count() {
            let column = out_schema.column(out_index);
            let in_index = record.schema.field_index(column.name()).ok_or_else(|| {
                Error::InvalidInput(format!("no such column: {}", column.name()))
            })?;

            if bitmap::get_bit(&record.null_map, in_index) {
                bitmap::set_bit(&mut null_map, out_index, true);
                continue;
            }
            let src = record.schema.field_offset(in_index);
            let width = record.schema.field_size(in_index);
            let dst = out_schema.field_offset(out_index);
            data[dst..dst + width].copy_from_slice(&record.data[src..src + width]);
        }

        Ok(Record {
            schema: Arc::clone(out_schema),
            null_map,
            data,
            rid: None,
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn null_map(&self) -> &[u8] {
        &self.null_map
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn rid(&self) -> Option<RecordId> {
        self.rid
    }

    pub fn set_rid(&mut self, rid: RecordId) {
        self.rid = Some(rid);
    }

    /// Decodes the field at `index`, honoring the null bitmap.
    pub fn field(&self, index: usize) -> Result<Field> {
        if index >= self.schema.field_count() {
            return Err(Error::OutOfBounds);
        }
        if bitmap::get_bit(&self.null_map, index) {
            return Ok(Field::Null);
        }
        let offset = self.schema.field_offset(index);
        let width = self.schema.field_size(index);
        Ok(Field::deserialize(
            &self.data[offset..offset + width],
            self.schema.column(index).data_type(),
        ))
    }

    pub fn field_by_name(&self, name: &str) -> Result<Field> {
        let index = self
            .schema
            .field_index(name)
            .ok_or_else(|| Error::InvalidInput(format!("no such column: {name}")))?;
        self.field(index)
    }

    pub fn fields(&self) -> Result<Vec<Field>> {
        (0..self.schema.field_count())
            .map(|index| self.field(index))
            .collect()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fields() {
            Ok(fields) => write!(f, "{}", fields.iter().join(", ")),
            Err(_) => write!(f, "<corrupt record>"),
        }
    }
}
