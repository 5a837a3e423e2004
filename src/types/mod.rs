pub mod field;
pub mod schema;

pub use field::Field;
pub use schema::{Column, DataType, Schema, StorageModel};
