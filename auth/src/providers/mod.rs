//! Session storage providers.
//!
//! The session store never touches the filesystem directly. It holds a
//! [`SessionStorage`] handed over at construction time:
//!
//! - **Production**: [`FileStorage`], a JSON key/value file
//! - **Testing**: `MemoryStorage` from the `mocks` module

pub mod file;
pub mod storage;

pub use file::FileStorage;
pub use storage::SessionStorage;
