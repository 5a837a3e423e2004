use crate::common::constants::{COULD_NOT_UNWRAP_TABLE_MSG, INSERT_AT_END_MSG, INSERT_NO_INIT_MSG};
use crate::common::Result;
use crate::execution::executor::Executor;
use crate::storage::record::Record;
use crate::storage::table::TableHandle;
use crate::types::{DataType, Field, Schema};
use std::sync::{Arc, RwLock};

/// One-shot DML operator. The first `next` inserts every supplied
/// record into the table and leaves a single one-column record
/// `{inserted: count}` as its output; `init` and any further `next` are
/// caller bugs.
pub struct InsertExecutor {
    table: Arc<RwLock<TableHandle>>,
    inserts: Vec<Record>,
    out_schema: Arc<Schema>,
    record: Option<Record>,
    is_end: bool,
}

impl InsertExecutor {
    pub fn new(table: Arc<RwLock<TableHandle>>, inserts: Vec<Record>) -> InsertExecutor {
        let out_schema = Schema::builder()
            .column("inserted", DataType::Int)
            .build_with_handle();
        InsertExecutor {
            table,
            inserts,
            out_schema,
            record: None,
            is_end: false,
        }
    }
}

impl Executor for InsertExecutor {
    fn init(&mut self) -> Result<()> {
        panic!("{}", INSERT_NO_INIT_MSG);
    }

    fn next(&mut self) -> Result<()> {
        if self.is_end {
            panic!("{}", INSERT_AT_END_MSG);
        }

        let mut count = 0;
        {
            let mut table = self.table.write().expect(COULD_NOT_UNWRAP_TABLE_MSG);
            for record in &self.inserts {
                table.insert_record(record)?;
                count += 1;
            }
        }

        self.record = Some(Record::from_fields(
            &self.out_schema,
            &[Field::Integer(count)],
        )?);
        self.is_end = true;
        Ok(())
    }

    fn is_end(&self) -> bool {
        self.is_end
    }

    fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    fn out_schema(&self) -> &Arc<Schema> {
        &self.out_schema
    }
}
