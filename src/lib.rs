#![crate_type = "lib"]
#![crate_name = "paxdb"]

pub mod common;
pub mod config;
pub mod execution;
pub mod storage;
pub mod types;
