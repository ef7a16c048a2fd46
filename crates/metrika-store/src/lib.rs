//! Health store backends
//!
//! `FileHealthStore` is the production backend: a single JSON file per data
//! directory. `MemoryHealthStore` backs tests and hosts without persistent
//! storage, and can simulate missing, denied or failing stores.

pub mod file_store;
pub mod memory;

pub use file_store::FileHealthStore;
pub use memory::MemoryHealthStore;
