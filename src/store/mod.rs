//! Persistence module split across logical submodules.

mod blob;
mod journal;

pub use blob::{data_dir, BlobStore, FileStore, StoreError};
pub use journal::EntryStore;

#[cfg(test)]
pub(crate) use blob::MemoryStore;
