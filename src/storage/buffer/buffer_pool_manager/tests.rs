use super::*;
use crate::config::config::PAXDB_PAGE_SIZE_BYTES;
use crate::storage::buffer::replacer::{LruKReplacer, LruReplacer};
use tempfile::TempDir;

fn lru_bpm(pool_size: usize) -> (BufferPoolManager, FileId, TempDir) {
    bpm_with_replacer(pool_size, Replacer::Lru(LruReplacer::new()))
}

fn lru_k_bpm(pool_size: usize, k: usize) -> (BufferPoolManager, FileId, TempDir) {
    bpm_with_replacer(pool_size, Replacer::LruK(LruKReplacer::new(k)))
}

fn bpm_with_replacer(pool_size: usize, replacer: Replacer) -> (BufferPoolManager, FileId, TempDir) {
    let (disk_manager, temp_dir) = DiskManager::new_with_handle_for_test();
    let file_id = disk_manager.write().unwrap().open_file("test.db").unwrap();
    let bpm = BufferPoolManager::builder()
        .pool_size(pool_size)
        .replacer(replacer)
        .disk_manager(disk_manager)
        .build();
    (bpm, file_id, temp_dir)
}

fn read_from_disk(bpm: &BufferPoolManager, file_id: FileId, page_id: PageId) -> Vec<u8> {
    let mut buffer = vec![0_u8; PAXDB_PAGE_SIZE_BYTES];
    bpm.disk_manager
        .write()
        .unwrap()
        .read_page(file_id, page_id, &mut buffer)
        .unwrap();
    buffer
}

#[test]
fn test_fetch_pins_page() {
    let (mut bpm, fid, _dir) = lru_k_bpm(5, 2);

    let page = bpm.fetch_page(fid, 1).unwrap();
    assert_eq!(1, page.read().unwrap().page_id());
    assert_eq!(fid, page.read().unwrap().file_id());
    assert!(bpm.page_in_buffer(fid, 1));
    assert_eq!(Some(1), bpm.get_pin_count(fid, 1));

    // a second fetch pins the same frame again.
    bpm.fetch_page(fid, 1).unwrap();
    assert_eq!(Some(2), bpm.get_pin_count(fid, 1));
    assert_eq!(1, bpm.page_table.len());
}

#[test]
fn test_fetch_fails_when_pool_exhausted() {
    let (mut bpm, fid, _dir) = lru_k_bpm(2, 2);

    bpm.fetch_page(fid, 1).unwrap();
    bpm.fetch_page(fid, 2).unwrap();

    // both frames pinned: no free frame and no victim.
    assert!(matches!(bpm.fetch_page(fid, 3), Err(Error::NoFreeFrame)));

    // releasing one pin opens a frame for the third page.
    assert!(bpm.unpin_page(fid, 1, false));
    assert!(bpm.fetch_page(fid, 3).is_ok());
    assert!(!bpm.page_in_buffer(fid, 1));
}

/// Pool of two frames under LRU: fetching a third page evicts the one
/// unpinned page and leaves the pinned page resident.
#[test]
fn test_lru_eviction_picks_unpinned_page() {
    let (mut bpm, fid, _dir) = lru_bpm(2);

    bpm.fetch_page(fid, 1).unwrap();
    bpm.fetch_page(fid, 2).unwrap();
    assert!(bpm.unpin_page(fid, 1, false));

    bpm.fetch_page(fid, 3).unwrap();
    assert!(!bpm.page_in_buffer(fid, 1));
    assert!(bpm.page_in_buffer(fid, 2));
    assert_eq!(Some(1), bpm.get_pin_count(fid, 2));
    assert!(bpm.page_in_buffer(fid, 3));
}

/// A dirty page evicted from a single-frame pool is written back, and a
/// later fetch reads the mutated bytes from disk.
#[test]
fn test_dirty_page_written_back_on_eviction() {
    let (mut bpm, fid, _dir) = lru_bpm(1);

    let page = bpm.fetch_page(fid, 1).unwrap();
    page.write().unwrap().body_mut()[0] = 0xAB;
    drop(page);
    assert!(bpm.unpin_page(fid, 1, true));

    bpm.fetch_page(fid, 2).unwrap();
    assert!(!bpm.page_in_buffer(fid, 1));
    assert_eq!(0xAB, read_from_disk(&bpm, fid, 1)[16]);

    assert!(bpm.unpin_page(fid, 2, false));
    let page = bpm.fetch_page(fid, 1).unwrap();
    assert_eq!(0xAB, page.read().unwrap().body()[0]);
}

#[test]
fn test_clean_page_not_written_back() {
    let (mut bpm, fid, _dir) = lru_bpm(1);

    let page = bpm.fetch_page(fid, 1).unwrap();
    page.write().unwrap().body_mut()[0] = 0xAB;
    drop(page);
    // unpinned clean: the mutation is allowed to be lost.
    assert!(bpm.unpin_page(fid, 1, false));

    bpm.fetch_page(fid, 2).unwrap();
    assert!(read_from_disk(&bpm, fid, 1).iter().all(|&b| b == 0));
}

#[test]
fn test_unpin_unknown_or_unpinned_page() {
    let (mut bpm, fid, _dir) = lru_k_bpm(5, 2);

    assert!(!bpm.unpin_page(fid, 9, false));

    bpm.fetch_page(fid, 1).unwrap();
    assert!(bpm.unpin_page(fid, 1, false));
    // pin count is already zero.
    assert!(!bpm.unpin_page(fid, 1, false));
}

#[test]
fn test_unpin_dirty_flag_is_sticky() {
    let (mut bpm, fid, _dir) = lru_k_bpm(5, 2);

    bpm.fetch_page(fid, 1).unwrap();
    bpm.fetch_page(fid, 1).unwrap();
    assert_eq!(Some(false), bpm.get_is_dirty(fid, 1));

    assert!(bpm.unpin_page(fid, 1, true));
    // a later clean unpin must not clear the dirty bit.
    assert!(bpm.unpin_page(fid, 1, false));
    assert_eq!(Some(true), bpm.get_is_dirty(fid, 1));
}

#[test]
fn test_flush_page_clears_dirty_bit_once() {
    let (mut bpm, fid, _dir) = lru_k_bpm(5, 2);

    assert!(!bpm.flush_page(fid, 1));

    let page = bpm.fetch_page(fid, 1).unwrap();
    page.write().unwrap().body_mut()[7] = 0x11;
    drop(page);
    bpm.unpin_page(fid, 1, true);

    assert!(bpm.flush_page(fid, 1));
    assert_eq!(Some(false), bpm.get_is_dirty(fid, 1));
    assert_eq!(0x11, read_from_disk(&bpm, fid, 1)[16 + 7]);

    // second flush is a no-op on a clean page.
    assert!(bpm.flush_page(fid, 1));
    assert_eq!(Some(false), bpm.get_is_dirty(fid, 1));
}

#[test]
fn test_flush_all_pages() {
    let (mut bpm, fid, _dir) = lru_k_bpm(5, 2);

    for page_id in 1..=3 {
        let page = bpm.fetch_page(fid, page_id).unwrap();
        page.write().unwrap().body_mut()[0] = page_id as u8;
        drop(page);
        bpm.unpin_page(fid, page_id, true);
    }

    assert!(bpm.flush_all_pages(fid));
    for page_id in 1..=3 {
        assert_eq!(Some(false), bpm.get_is_dirty(fid, page_id));
        assert_eq!(page_id as u8, read_from_disk(&bpm, fid, page_id)[16]);
    }
}

#[test]
fn test_delete_page() {
    let (mut bpm, fid, _dir) = lru_k_bpm(5, 2);

    // absent pages delete trivially.
    assert!(bpm.delete_page(fid, 9));

    bpm.fetch_page(fid, 1).unwrap();
    assert!(!bpm.delete_page(fid, 1));

    bpm.unpin_page(fid, 1, false);
    let free_before = bpm.free_list.len();
    assert!(bpm.delete_page(fid, 1));
    assert!(!bpm.page_in_buffer(fid, 1));
    assert_eq!(free_before + 1, bpm.free_list.len());
}

#[test]
fn test_delete_page_flushes_dirty_page() {
    let (mut bpm, fid, _dir) = lru_k_bpm(5, 2);

    let page = bpm.fetch_page(fid, 1).unwrap();
    page.write().unwrap().body_mut()[0] = 0x5A;
    drop(page);
    bpm.unpin_page(fid, 1, true);

    assert!(bpm.delete_page(fid, 1));
    assert_eq!(0x5A, read_from_disk(&bpm, fid, 1)[16]);
}

#[test]
fn test_delete_all_pages_reports_pinned_page() {
    let (mut bpm, fid, _dir) = lru_k_bpm(5, 2);

    bpm.fetch_page(fid, 1).unwrap();
    bpm.fetch_page(fid, 2).unwrap();
    bpm.unpin_page(fid, 2, false);

    // page 1 is still pinned, so the conjunction fails...
    assert!(!bpm.delete_all_pages(fid));
    // ...but page 2 was deleted.
    assert!(!bpm.page_in_buffer(fid, 2));
    assert!(bpm.page_in_buffer(fid, 1));
}

#[test]
fn test_teardown_flushes_dirty_frames() {
    let (disk_manager, _dir) = DiskManager::new_with_handle_for_test();
    let fid = disk_manager.write().unwrap().open_file("drop.db").unwrap();
    {
        let mut bpm = BufferPoolManager::builder()
            .pool_size(2)
            .replacer(Replacer::Lru(LruReplacer::new()))
            .disk_manager(Arc::clone(&disk_manager))
            .build();
        let page = bpm.fetch_page(fid, 1).unwrap();
        page.write().unwrap().body_mut()[0] = 0x77;
        drop(page);
        bpm.unpin_page(fid, 1, true);
    }

    let mut buffer = vec![0_u8; PAXDB_PAGE_SIZE_BYTES];
    disk_manager
        .write()
        .unwrap()
        .read_page(fid, 1, &mut buffer)
        .unwrap();
    assert_eq!(0x77, buffer[16]);
}

#[test]
fn test_pages_keep_distinct_files_apart() {
    let (mut bpm, fid, _dir) = lru_k_bpm(5, 2);
    let disk_manager = Arc::clone(&bpm.disk_manager);
    let other_fid = disk_manager.write().unwrap().open_file("other.db").unwrap();

    let page = bpm.fetch_page(fid, 1).unwrap();
    page.write().unwrap().body_mut()[0] = 1;
    drop(page);
    bpm.unpin_page(fid, 1, true);
    bpm.flush_page(fid, 1);

    let other = bpm.fetch_page(other_fid, 1).unwrap();
    assert!(other.read().unwrap().body().iter().all(|&b| b == 0));
    bpm.unpin_page(other_fid, 1, false);
}

#[test]
fn test_concurrent_fetch_and_unpin() {
    let (bpm, fid, _dir) = lru_k_bpm(8, 2);
    let bpm = Arc::new(RwLock::new(bpm));

    crossbeam::thread::scope(|scope| {
        for thread_no in 0..4_u32 {
            let bpm = Arc::clone(&bpm);
            scope.spawn(move |_| {
                for round in 0..25 {
                    let page_id = thread_no * 100 + round % 5 + 1;
                    let page = bpm.write().unwrap().fetch_page(fid, page_id).unwrap();
                    page.write().unwrap().body_mut()[thread_no as usize] = round as u8;
                    drop(page);
                    assert!(bpm.write().unwrap().unpin_page(fid, page_id, true));
                }
            });
        }
    })
    .unwrap();

    let bpm = bpm.read().unwrap();
    for (&(_, page_id), _) in bpm.page_table.iter() {
        assert_eq!(Some(0), bpm.get_pin_count(fid, page_id));
    }
}
