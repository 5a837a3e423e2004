mod executor;
mod executor_filter;
mod executor_insert;
mod executor_projection;
mod executor_seq_scan;


pub use executor::{BoxedExecutor, Executor, Predicate};
pub use executor_filter::FilterExecutor;
pub use executor_insert::InsertExecutor;
pub use executor_projection::ProjectionExecutor;
pub use executor_seq_scan::SeqScanExecutor;
