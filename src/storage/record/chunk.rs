use crate::types::{Field, Schema};
use std::sync::Arc;

/// A column-oriented batch: one value array per field of the chunk's
/// schema, covering the occupied slots of a single PAX page.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    schema: Arc<Schema>,
    columns: Vec<Vec<Field>>,
}

impl Chunk {
    pub fn new(schema: &Arc<Schema>, columns: Vec<Vec<Field>>) -> Chunk {
        debug_assert_eq!(schema.field_count(), columns.len());
        Chunk {
            schema: Arc::clone(schema),
            columns,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn column(&self, index: usize) -> &[Field] {
        &self.columns[index]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&[Field]> {
        self.schema.field_index(name).map(|i| self.column(i))
    }

    /// Number of rows covered by the chunk.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
