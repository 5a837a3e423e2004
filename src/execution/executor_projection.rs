use crate::common::constants::PROJECTION_AT_END_MSG;
use crate::common::Result;
use crate::execution::executor::{BoxedExecutor, Executor};
use crate::storage::record::Record;
use crate::types::Schema;
use std::sync::Arc;

/// Rewrites each child record under the projection schema, reordering
/// or narrowing its fields. Ends when the child ends.
pub struct ProjectionExecutor {
    child: BoxedExecutor,
    out_schema: Arc<Schema>,
    record: Option<Record>,
}

impl ProjectionExecutor {
    pub fn new(child: BoxedExecutor, proj_schema: Arc<Schema>) -> ProjectionExecutor {
        ProjectionExecutor {
            child,
            out_schema: proj_schema,
            record: None,
        }
    }

    fn project_current(&mut self) -> Result<()> {
        self.record = match self.child.record() {
            Some(record) => Some(Record::project(&self.out_schema, record)?),
            None => None,
        };
        Ok(())
    }
}

impl Executor for ProjectionExecutor {
    fn init(&mut self) -> Result<()> {
        self.child.init()?;
        self.project_current()
    }

    fn next(&mut self) -> Result<()> {
        if self.is_end() {
            panic!("{}", PROJECTION_AT_END_MSG);
        }
        self.child.next()?;
        self.project_current()
    }

    fn is_end(&self) -> bool {
        self.child.is_end()
    }

    fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    fn out_schema(&self) -> &Arc<Schema> {
        &self.out_schema
    }
}
