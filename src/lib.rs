//! Gigboard Booking Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod budget_store;
pub mod config;
pub mod engine;
pub mod normalizer;
pub mod roster;
pub mod server;

// Re-export commonly used types for convenience
pub use budget_store::{BudgetStore, InMemoryBudgetStore, SqliteBudgetStore};
pub use engine::{AffordabilityEngine, ArtistMetrics, BudgetTable, PlacementResult, Tier};
pub use normalizer::{normalize, FieldMapping, RawRow, SkippedRow};
pub use server::{run_server, RequestsLoggingLevel};
