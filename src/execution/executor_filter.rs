use crate::common::constants::FILTER_AT_END_MSG;
use crate::common::Result;
use crate::execution::executor::{BoxedExecutor, Executor, Predicate};
use crate::storage::record::Record;
use crate::types::Schema;
use std::sync::Arc;

/// Emits the child's records that satisfy the predicate, skipping past
/// failing ones on init and after every advance.
pub struct FilterExecutor {
    child: BoxedExecutor,
    filter: Predicate,
    record: Option<Record>,
}

impl FilterExecutor {
    pub fn new(child: BoxedExecutor, filter: Predicate) -> FilterExecutor {
        FilterExecutor {
            child,
            filter,
            record: None,
        }
    }

    /// Advances the child until its record passes the predicate or it
    /// runs out.
    fn skip_unmatched(&mut self) -> Result<()> {
        while !self.child.is_end() {
            let passes = match self.child.record() {
                Some(record) => (self.filter)(record),
                None => break,
            };
            if passes {
                break;
            }
            self.child.next()?;
        }
        self.record = self.child.record().cloned();
        Ok(())
    }
}

impl Executor for FilterExecutor {
    fn init(&mut self) -> Result<()> {
        self.child.init()?;
        self.skip_unmatched()
    }

    fn next(&mut self) -> Result<()> {
        if self.is_end() {
            panic!("{}", FILTER_AT_END_MSG);
        }
        self.child.next()?;
        self.skip_unmatched()
    }

    fn is_end(&self) -> bool {
        self.child.is_end()
    }

    fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    fn out_schema(&self) -> &Arc<Schema> {
        self.child.out_schema()
    }
}
