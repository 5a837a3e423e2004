use crate::common::{Error, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

/// Bytes per page, fixed at build time.
pub const PAXDB_PAGE_SIZE_BYTES: usize = 4096;

/// Bytes reserved at the front of every page for its header:
/// `page_id`, `file_id`, `record_num`, `next_free_page_id`, u32 each.
pub const PAGE_HEADER_SIZE: usize = 16;

pub const PAXDB_DATA_DIR: &str = "data";

pub const DEFAULT_BUFFER_POOL_SIZE: usize = 500;
pub const DEFAULT_REPLACER: &str = "LRUKReplacer";
pub const DEFAULT_LRU_K: usize = 15;

/// Process-wide storage configuration. Loaded once from an optional
/// `paxdb.toml` in the working directory with `PAXDB_*` environment
/// overrides; falls back to the defaults above.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub buffer_pool_size: usize,
    /// One of `"LRUReplacer"`, `"LRUKReplacer"`. Any other value is fatal
    /// when the replacer is constructed.
    pub replacer: String,
    pub lru_k: usize,
    pub data_dir: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            buffer_pool_size: DEFAULT_BUFFER_POOL_SIZE,
            replacer: DEFAULT_REPLACER.to_string(),
            lru_k: DEFAULT_LRU_K,
            data_dir: PAXDB_DATA_DIR.to_string(),
        }
    }
}

impl DbConfig {
    pub fn load() -> Result<Self> {
        config::Config::builder()
            .set_default("buffer_pool_size", DEFAULT_BUFFER_POOL_SIZE as u64)
            .and_then(|b| b.set_default("replacer", DEFAULT_REPLACER))
            .and_then(|b| b.set_default("lru_k", DEFAULT_LRU_K as u64))
            .and_then(|b| b.set_default("data_dir", PAXDB_DATA_DIR))
            .map_err(|e| Error::InvalidData(e.to_string()))?
            .add_source(config::File::with_name("paxdb").required(false))
            .add_source(config::Environment::with_prefix("PAXDB"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::InvalidData(e.to_string()))
    }

    /// The lazily loaded process-wide configuration.
    pub fn global() -> &'static DbConfig {
        static GLOBAL: Lazy<DbConfig> = Lazy::new(|| DbConfig::load().unwrap_or_default());
        &GLOBAL
    }
}
