//! Durable Storage Module
//!
//! Key-value adapters backing the durable tier of the patient cache.

mod backend;
mod error;
mod file;
mod memory;

pub use backend::DurableStore;
pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
