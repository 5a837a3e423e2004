use crate::common::Result;
use crate::storage::page::RecordId;
use crate::storage::record::Record;
use crate::storage::table::TableHandle;
use crate::types::{DataType, Field, Schema};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use std::sync::Arc;

/// A schema exercising every data type, including a nullable column.
pub fn create_table_definition_mixed_fields() -> Arc<Schema> {
    Schema::builder()
        .column("id", DataType::Int)
        .column("seq", DataType::BigInt)
        .nullable_column("score", DataType::Float)
        .varchar_column("name", 16)
        .column("flag", DataType::Bool)
        .build_with_handle()
}

/// Builds a record of random values for the schema; pass a seed for
/// reproducible contents.
pub fn create_random_record(schema: &Arc<Schema>, seed: Option<u64>) -> Record {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let values: Vec<Field> = schema
        .columns()
        .iter()
        .map(|column| {
            if column.nullable() && rng.gen_bool(0.1) {
                return Field::Null;
            }
            match column.data_type() {
                DataType::Bool => Field::Boolean(rng.gen_bool(0.5)),
                DataType::Int => Field::Integer(rng.gen_range(-1000..1000)),
                DataType::BigInt => Field::BigInt(rng.gen_range(-100_000..100_000)),
                DataType::Float => Field::Float(rng.gen()),
                DataType::Text => {
                    let len = rng.gen_range(1..=column.max_str_len() as usize);
                    let text: String =
                        (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
                    Field::String(text)
                }
            }
        })
        .collect();

    Record::from_fields(schema, &values).expect("random record must match its schema")
}

/// Inserts `n` seeded random records and returns them with their RIDs.
pub fn create_n_records(n: usize, table: &mut TableHandle) -> Result<Vec<(RecordId, Record)>> {
    let schema = Arc::clone(table.schema());
    (0..n)
        .map(|i| {
            let record = create_random_record(&schema, Some(i as u64));
            let rid = table.insert_record(&record)?;
            Ok((rid, record))
        })
        .collect()
}
