//! quizbuilder-store — persistence backends and the typed store facade.
//!
//! Implements the `StorageBackend` port from `quizbuilder-core` for memory
//! and on-disk JSON storage, and wraps either in a `Store` facade that knows
//! the well-known keys and tolerates corrupted values.

pub mod file;
pub mod memory;
pub mod store;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use store::{keys, Store};
