//! Fragdoc Storage
//!
//! Key-value persistence of encoded document tokens under a logical slot
//! name.
//!
//! # Core Concepts
//!
//! - [`BlobStore`]: async slot store (save / load / exists / clear)
//! - [`MemoryStore`]: concurrent in-process store
//! - [`FileStore`]: one file per slot, atomic replace on save
//!
//! A save either replaces the whole slot or fails; nothing is versioned.
//! Secondary side effects such as [`FileStore::with_export_dir`] are
//! best-effort and never turn a successful primary write into a failure.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod file;
mod memory;
mod store;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{validate_slot_name, BlobStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
