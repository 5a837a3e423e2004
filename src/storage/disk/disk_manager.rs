use crate::common::{Error, Result};
use crate::config::config::PAXDB_PAGE_SIZE_BYTES;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
#[cfg(test)]
use tempfile::TempDir;

/// Identifies one database file; a table's id is its file id.
pub type FileId = u32;
/// Offset of a page into its database file.
pub type PageId = u32;

#[derive(Debug)]
struct DbFile {
    name: String,
    file: File,
}

/// Manages page-granular reads and writes over a directory of database
/// files, keyed by `FileId`.
#[derive(Debug)]
pub struct DiskManager {
    data_dir: PathBuf,
    files: HashMap<FileId, DbFile>,
    next_file_id: FileId,
}

impl DiskManager {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(DiskManager {
            data_dir,
            files: HashMap::new(),
            next_file_id: 0,
        })
    }

    pub fn new_with_handle(data_dir: impl Into<PathBuf>) -> Result<Arc<RwLock<Self>>> {
        Ok(Arc::new(RwLock::new(Self::new(data_dir)?)))
    }

    /// Opens (creating if absent) the database file `name`, e.g.
    /// `users.tbl`, and returns its file id. Reopening a name returns the
    /// id it is already registered under.
    pub fn open_file(&mut self, name: &str) -> Result<FileId> {
        if let Some((&file_id, _)) = self.files.iter().find(|(_, f)| f.name == name) {
            return Ok(file_id);
        }

        let path = self.data_dir.join(name);
        let file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .open(&path)?;

        let file_id = self.next_file_id;
        self.next_file_id += 1;
        log::debug!("opened database file {:?} as file {}", path, file_id);

        self.files.insert(
            file_id,
            DbFile {
                name: name.to_string(),
                file,
            },
        );
        Ok(file_id)
    }

    /// Opens the database file `name` truncated to empty, so freshly
    /// allocated pages never read back bytes from an earlier incarnation
    /// of the file.
    pub fn create_file(&mut self, name: &str) -> Result<FileId> {
        let file_id = self.open_file(name)?;
        self.files
            .get_mut(&file_id)
            .expect("file registered by open_file")
            .file
            .set_len(0)?;
        Ok(file_id)
    }

    pub fn close_file(&mut self, file_id: FileId) -> Result<()> {
        let db_file = self
            .files
            .remove(&file_id)
            .ok_or_else(|| Error::InvalidInput(Self::no_such_file(file_id)))?;
        log::debug!("closed database file {} ({})", file_id, db_file.name);
        Ok(())
    }

    /// Reads the page at `page_id` into `buffer`. Bytes past the end of
    /// the file read as zero, so a freshly allocated page comes back
    /// zeroed without the file having been extended first.
    pub fn read_page(&mut self, file_id: FileId, page_id: PageId, buffer: &mut [u8]) -> Result<()> {
        debug_assert_eq!(buffer.len(), PAXDB_PAGE_SIZE_BYTES);
        let db_file = self
            .files
            .get_mut(&file_id)
            .ok_or_else(|| Error::InvalidInput(Self::no_such_file(file_id)))?;

        db_file.file.seek(SeekFrom::Start(Self::offset(page_id)))?;

        let mut filled = 0;
        while filled < buffer.len() {
            match db_file.file.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        buffer[filled..].fill(0);
        Ok(())
    }

    pub fn write_page(&mut self, file_id: FileId, page_id: PageId, buffer: &[u8]) -> Result<()> {
        debug_assert_eq!(buffer.len(), PAXDB_PAGE_SIZE_BYTES);
        let db_file = self
            .files
            .get_mut(&file_id)
            .ok_or_else(|| Error::InvalidInput(Self::no_such_file(file_id)))?;

        db_file.file.seek(SeekFrom::Start(Self::offset(page_id)))?;
        db_file.file.write_all(buffer)?;
        db_file.file.flush()?;
        Ok(())
    }

    pub fn get_file_name(&self, file_id: FileId) -> Result<String> {
        self.files
            .get(&file_id)
            .map(|f| f.name.clone())
            .ok_or_else(|| Error::InvalidInput(Self::no_such_file(file_id)))
    }

    fn offset(page_id: PageId) -> u64 {
        page_id as u64 * PAXDB_PAGE_SIZE_BYTES as u64
    }

    fn no_such_file(file_id: FileId) -> String {
        format!("no open file with id {file_id}")
    }

    #[cfg(test)]
    /// Disk manager constructor for testing, backed by a temporary
    /// directory. The returned guard keeps the directory alive.
    pub fn new_for_test() -> (Self, TempDir) {
        let temp_dir = tempfile::tempdir().expect("Unable to create temp dir");
        let disk_manager = Self::new(temp_dir.path()).expect("Unable to create disk manager");
        (disk_manager, temp_dir)
    }

    #[cfg(test)]
    pub fn new_with_handle_for_test() -> (Arc<RwLock<Self>>, TempDir) {
        let (disk_manager, temp_dir) = Self::new_for_test();
        (Arc::new(RwLock::new(disk_manager)), temp_dir)
    }
}
