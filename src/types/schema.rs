use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(PartialEq, Eq, Hash, Clone, Debug, Copy, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int,
    BigInt,
    Float,
    Text,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "bool"),
            DataType::Int => write!(f, "int"),
            DataType::BigInt => write!(f, "bigint"),
            DataType::Float => write!(f, "float"),
            DataType::Text => write!(f, "varchar"),
        }
    }
}

impl DataType {
    // not for use with strings
    pub fn length_bytes(&self) -> u16 {
        match self {
            DataType::Bool => 1,
            DataType::Int => 4,
            DataType::BigInt => 8,
            DataType::Float => 4,
            DataType::Text => 0,
        }
    }
}

/// Per-table choice of on-page layout.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Copy, Serialize, Deserialize)]
pub enum StorageModel {
    NAryModel,
    PaxModel,
}

#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize, Deserialize)]
pub struct Column {
    /// Column name. Can't be empty.
    name: String,
    data_type: DataType,
    /// Whether the column allows null values.
    nullable: bool,
    /// 0 unless varchar, whose full declared width is always stored.
    max_str_len: u16,
    /// Offset in bytes of the field from the start of the record payload.
    offset: u16,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn length_bytes(&self) -> u16 {
        self.data_type.length_bytes() + self.max_str_len
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn max_str_len(&self) -> u16 {
        self.max_str_len
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data_type {
            DataType::Text => write!(f, "{}:{}({})", self.name, self.data_type, self.max_str_len),
            _ => write!(f, "{}:{}", self.name, self.data_type),
        }
    }
}

/// A table's record schema. All columns are fixed width (varchars store
/// their full declared width), so every record occupies `rec_size` bytes
/// plus a `nullmap_size`-byte null bitmap.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
    rec_size: usize,
    nullmap_size: usize,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { columns: Vec::new() }
    }

    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    /// Byte offset of field `index` within the record payload.
    pub fn field_offset(&self, index: usize) -> usize {
        self.columns[index].offset as usize
    }

    pub fn field_size(&self, index: usize) -> usize {
        self.columns[index].length_bytes() as usize
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Total payload bytes of one record.
    pub fn rec_size(&self) -> usize {
        self.rec_size
    }

    /// Bytes of the per-record null bitmap, one bit per column.
    pub fn nullmap_size(&self) -> usize {
        self.nullmap_size
    }

    /// Derives the schema of a projection over the named columns, with
    /// offsets recomputed for the narrowed record.
    pub fn project(&self, names: &[&str]) -> Result<Schema> {
        let mut builder = Schema::builder();
        for name in names {
            let index = self
                .field_index(name)
                .ok_or_else(|| Error::InvalidInput(format!("no such column: {name}")))?;
            let column = &self.columns[index];
            builder = builder.column_spec(
                &column.name,
                column.data_type,
                column.nullable,
                Some(column.max_str_len),
            );
        }
        Ok(builder.build())
    }

    pub fn to_handle(self) -> Arc<Schema> {
        Arc::new(self)
    }
}

pub struct SchemaBuilder {
    columns: Vec<Column>,
}

impl SchemaBuilder {
    pub fn column(self, name: &str, data_type: DataType) -> Self {
        self.column_spec(name, data_type, false, None)
    }

    pub fn nullable_column(self, name: &str, data_type: DataType) -> Self {
        self.column_spec(name, data_type, true, None)
    }

    pub fn varchar_column(self, name: &str, max_str_len: u16) -> Self {
        self.column_spec(name, DataType::Text, false, Some(max_str_len))
    }

    pub fn column_spec(
        mut self,
        name: &str,
        data_type: DataType,
        nullable: bool,
        max_str_len: Option<u16>,
    ) -> Self {
        assert!(!name.is_empty(), "column name cannot be empty");
        self.columns.push(Column {
            name: name.to_string(),
            data_type,
            nullable,
            max_str_len: match data_type {
                DataType::Text => max_str_len.expect("varchar column requires a maximum length"),
                _ => 0,
            },
            offset: 0,
        });
        self
    }

    pub fn build(mut self) -> Schema {
        let mut offset = 0_u16;
        for column in self.columns.iter_mut() {
            column.offset = offset;
            offset += column.length_bytes();
        }
        let nullmap_size = self.columns.len().div_ceil(8);
        Schema {
            columns: self.columns,
            rec_size: offset as usize,
            nullmap_size,
        }
    }

    pub fn build_with_handle(self) -> Arc<Schema> {
        Arc::new(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_and_sizes() {
        let schema = Schema::builder()
            .column("a", DataType::Int)
            .column("b", DataType::BigInt)
            .varchar_column("c", 16)
            .build();

        assert_eq!(schema.field_count(), 3);
        assert_eq!(schema.field_offset(0), 0);
        assert_eq!(schema.field_offset(1), 4);
        assert_eq!(schema.field_offset(2), 12);
        assert_eq!(schema.rec_size(), 28);
        assert_eq!(schema.nullmap_size(), 1);
    }

    #[test]
    fn test_project() {
        let schema = Schema::builder()
            .column("a", DataType::Int)
            .column("b", DataType::BigInt)
            .build();

        let projected = schema.project(&["b"]).unwrap();
        assert_eq!(projected.field_count(), 1);
        assert_eq!(projected.field_offset(0), 0);
        assert_eq!(projected.rec_size(), 8);

        assert!(schema.project(&["missing"]).is_err());
    }

    #[test]
    fn test_nullmap_size_rounds_up() {
        let mut builder = Schema::builder();
        for i in 0..9 {
            builder = builder.column(&format!("c{i}"), DataType::Int);
        }
        assert_eq!(builder.build().nullmap_size(), 2);
    }
}
