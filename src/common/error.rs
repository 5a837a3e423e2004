use std::fmt;
use std::sync::PoisonError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the storage core. Record-level conditions
/// (`RecordMiss`, `RecordExists`, `PageMiss`) are returned to the caller;
/// contract violations (executor misuse, unknown replacer names) panic
/// instead of producing an `Error`.
#[derive(Debug)]
pub enum Error {
    InvalidInput(String),
    InvalidData(String),
    OutOfBounds,
    /// The buffer pool has no free frame and no evictable victim.
    NoFreeFrame,
    /// A read, delete, or update targeted a vacant slot.
    RecordMiss(String),
    /// A targeted insert found its slot already occupied.
    RecordExists(String),
    /// A targeted insert was given the invalid RID sentinel.
    PageMiss(String),
    /// A layout variant does not implement the invoked operation.
    Unimplemented(String),
    Io(String),
    LockPoisoned(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::OutOfBounds => write!(f, "index out of bounds"),
            Error::NoFreeFrame => write!(f, "buffer pool has no available frame to load page"),
            Error::RecordMiss(rid) => write!(f, "record does not exist: {rid}"),
            Error::RecordExists(rid) => write!(f, "record already exists: {rid}"),
            Error::PageMiss(rid) => write!(f, "record id does not name a valid page: {rid}"),
            Error::Unimplemented(msg) => write!(f, "operation not implemented: {msg}"),
            Error::Io(msg) => write!(f, "io error: {msg}"),
            Error::LockPoisoned(msg) => write!(f, "lock poisoned: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Error::LockPoisoned(err.to_string())
    }
}
