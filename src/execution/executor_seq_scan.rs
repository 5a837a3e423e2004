use crate::common::constants::{COULD_NOT_UNWRAP_TABLE_MSG, SEQ_SCAN_AT_END_MSG};
use crate::common::Result;
use crate::execution::executor::Executor;
use crate::storage::page::RecordId;
use crate::storage::record::Record;
use crate::storage::table::TableHandle;
use crate::types::Schema;
use std::sync::{Arc, RwLock};

/// Leaf operator that walks a table's records in page order via the
/// table handle's RID iteration.
pub struct SeqScanExecutor {
    table: Arc<RwLock<TableHandle>>,
    out_schema: Arc<Schema>,
    current_rid: Option<RecordId>,
    record: Option<Record>,
}

impl SeqScanExecutor {
    pub fn new(table: Arc<RwLock<TableHandle>>) -> SeqScanExecutor {
        let out_schema = Arc::clone(
            table
                .read()
                .expect(COULD_NOT_UNWRAP_TABLE_MSG)
                .schema(),
        );
        SeqScanExecutor {
            table,
            out_schema,
            current_rid: None,
            record: None,
        }
    }

    fn load_record(&mut self) -> Result<()> {
        self.record = match self.current_rid {
            Some(rid) => {
                let table = self.table.read().expect(COULD_NOT_UNWRAP_TABLE_MSG);
                Some(table.get_record(&rid)?)
            }
            None => None,
        };
        Ok(())
    }
}

impl Executor for SeqScanExecutor {
    fn init(&mut self) -> Result<()> {
        self.current_rid = self
            .table
            .read()
            .expect(COULD_NOT_UNWRAP_TABLE_MSG)
            .get_first_rid()?;
        self.load_record()
    }

    fn next(&mut self) -> Result<()> {
        let Some(rid) = self.current_rid else {
            panic!("{}", SEQ_SCAN_AT_END_MSG);
        };
        self.current_rid = self
            .table
            .read()
            .expect(COULD_NOT_UNWRAP_TABLE_MSG)
            .get_next_rid(&rid)?;
        self.load_record()
    }

    fn is_end(&self) -> bool {
        self.current_rid.is_none()
    }

    fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    fn out_schema(&self) -> &Arc<Schema> {
        &self.out_schema
    }
}
