use crate::common::Result;
use crate::storage::record::Record;
use crate::types::Schema;
use std::sync::Arc;

/// A row predicate, e.g. a compiled `WHERE` clause.
pub type Predicate = Box<dyn Fn(&Record) -> bool>;

/// A pull-based operator in an execution pipeline. Records stream from
/// the leaves to the root: `init` positions the operator on its first
/// record, `next` advances by one, and `record` exposes the current one
/// until `is_end` turns true. Advancing an exhausted operator is a
/// caller bug and panics.
pub trait Executor {
    fn init(&mut self) -> Result<()>;

    fn next(&mut self) -> Result<()>;

    fn is_end(&self) -> bool;

    /// The operator's current record; `None` once the operator is
    /// exhausted or before `init`.
    fn record(&self) -> Option<&Record>;

    fn out_schema(&self) -> &Arc<Schema>;
}

pub type BoxedExecutor = Box<dyn Executor>;
