//! Persisted definitions, instances and mappings, plus import/export

pub mod demo;
pub mod state;
pub mod transfer;

pub use state::ResourceStore;
