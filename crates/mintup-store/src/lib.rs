//! # mintup-store
//!
//! In-memory document store implementing the repository traits defined in
//! `mintup-core`. This is the reference adapter: it stands in for the hosted
//! document database in tests and local development, and documents the
//! atomicity the real store must provide (each repository call completes
//! under one table lock, so concurrent handshake mutations serialize).

pub mod memory;

// Re-export commonly used types
pub use memory::{
    MemoryConnectionRepository, MemoryEventRepository, MemoryMemberRepository,
    MemoryRegistrationRepository, MemoryStore,
};
