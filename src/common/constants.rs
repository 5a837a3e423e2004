// LRUKReplacer
pub const INF: usize = usize::MAX;

// DiskManager
pub const INVALID_PAGE_ID: u32 = u32::MAX;
pub const INVALID_FILE_ID: u32 = u32::MAX;

// TableHandle
pub const FILE_HEADER_PAGE_ID: u32 = 0;

// BufferPoolManager
pub const COULD_NOT_UNWRAP_BPM_MSG: &str =
    "Could not unwrap buffer pool manager from RwLock instance";
pub const COULD_NOT_UNWRAP_DISK_MSG: &str = "Could not unwrap disk manager from RwLock instance";
pub const COULD_NOT_UNWRAP_REPLACER_MSG: &str = "Could not unwrap replacer from RwLock instance";
pub const PIN_COUNT_UNDERFLOW_MSG: &str = "Pin count already at zero, cannot decrement.";
pub const RESET_PINNED_FRAME_MSG: &str = "Attempted to reset a frame that is still pinned.";

// TableHandle
pub const COULD_NOT_UNWRAP_TABLE_MSG: &str = "Could not unwrap table handle from RwLock instance";

// Executors
pub const FILTER_AT_END_MSG: &str = "FilterExecutor is at its end.";
pub const PROJECTION_AT_END_MSG: &str = "ProjectionExecutor is at its end.";
pub const SEQ_SCAN_AT_END_MSG: &str = "SeqScanExecutor is at its end.";
pub const INSERT_AT_END_MSG: &str = "InsertExecutor is at its end.";
pub const INSERT_NO_INIT_MSG: &str = "InsertExecutor does not support init.";
