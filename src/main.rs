use itertools::Itertools;
use paxdb::common::Result;
use paxdb::config::config::DbConfig;
use paxdb::execution::{
    Executor, FilterExecutor, InsertExecutor, Predicate, ProjectionExecutor, SeqScanExecutor,
};
use paxdb::storage::buffer::buffer_pool_manager::BufferPoolManager;
use paxdb::storage::buffer::replacer::Replacer;
use paxdb::storage::disk::DiskManager;
use paxdb::storage::record::Record;
use paxdb::storage::table::TableHandle;
use paxdb::types::{DataType, Field, Schema, StorageModel};
use std::sync::{Arc, RwLock};

const TABLE_NAME: &str = "demo.tbl";

/// Builds a small PAX table and drives an insert plus a
/// filter-and-project pipeline over it.
fn main() -> Result<()> {
    let config = DbConfig::global();
    let disk_manager = DiskManager::new_with_handle(&config.data_dir)?;
    let buffer_pool_manager = BufferPoolManager::builder()
        .pool_size(config.buffer_pool_size)
        .replacer(Replacer::from_config(config))
        .disk_manager(Arc::clone(&disk_manager))
        .build_with_handle();

    let schema = Schema::builder()
        .column("a", DataType::Int)
        .column("b", DataType::BigInt)
        .build_with_handle();
    let table = Arc::new(RwLock::new(TableHandle::create(
        &disk_manager,
        &buffer_pool_manager,
        TABLE_NAME,
        Arc::clone(&schema),
        StorageModel::PaxModel,
    )?));

    let inserts: Vec<Record> = [(1, 10), (2, 20), (3, 30)]
        .iter()
        .map(|&(a, b)| Record::from_fields(&schema, &[Field::Integer(a), Field::BigInt(b)]))
        .collect::<Result<_>>()?;
    let mut insert = InsertExecutor::new(Arc::clone(&table), inserts);
    insert.next()?;
    if let Some(record) = insert.record() {
        println!("[console] Inserted {} records.", record);
    }

    let chunk = table
        .read()
        .unwrap()
        .get_chunk(1, &schema.project(&["a"])?.to_handle())?;
    println!(
        "[console] Column 'a' of page 1: [{}]",
        chunk.column(0).iter().join(", ")
    );

    let scan = Box::new(SeqScanExecutor::new(Arc::clone(&table)));
    let predicate: Predicate = Box::new(|record| {
        record
            .field_by_name("a")
            .map(|a| a > Field::Integer(1))
            .unwrap_or(false)
    });
    let filter = Box::new(FilterExecutor::new(scan, predicate));
    let mut projection = ProjectionExecutor::new(filter, schema.project(&["b"])?.to_handle());

    println!("[console] b where a > 1:");
    projection.init()?;
    while !projection.is_end() {
        if let Some(record) = projection.record() {
            println!("[console]   {}", record);
        }
        projection.next()?;
    }

    let result = table.read().unwrap().close();
    result
}
