//! Mock provider implementations for testing.
//!
//! In-memory implementations of the provider traits for use in unit and
//! integration tests.

pub mod storage;

pub use storage::MemoryStorage;
