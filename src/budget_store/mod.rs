//! Persisted per-tier budget configuration.
//!
//! The budget table is operator-edited state with a load-edit-save cycle; it
//! lives here, never inside the engine. The engine receives a plain
//! [`BudgetTable`] value per evaluation.

mod sqlite_budget_store;

pub use sqlite_budget_store::SqliteBudgetStore;

use crate::engine::{BudgetTable, Tier};
use anyhow::Result;
use std::sync::Mutex;

pub trait BudgetStore: Send + Sync {
    /// Load the full budget table.
    fn load(&self) -> Result<BudgetTable>;

    /// Set the ceiling for one tier. Ceilings are non-negative.
    fn set_budget(&self, tier: Tier, ceiling: f64) -> Result<()>;
}

/// In-memory store for tests and budget-less tooling runs.
#[derive(Default)]
pub struct InMemoryBudgetStore {
    table: Mutex<BudgetTable>,
}

impl InMemoryBudgetStore {
    pub fn with_table(table: BudgetTable) -> Self {
        Self {
            table: Mutex::new(table),
        }
    }
}

impl BudgetStore for InMemoryBudgetStore {
    fn load(&self) -> Result<BudgetTable> {
        Ok(self.table.lock().unwrap().clone())
    }

    fn set_budget(&self, tier: Tier, ceiling: f64) -> Result<()> {
        anyhow::ensure!(ceiling >= 0.0, "Budget ceiling must be non-negative");
        self.table.lock().unwrap().set(tier, ceiling);
        Ok(())
    }
}
