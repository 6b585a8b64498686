//! Process-local check history store.

mod in_memory;

pub use in_memory::InMemoryCheckHistory;
