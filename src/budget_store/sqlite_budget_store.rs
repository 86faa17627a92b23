use super::BudgetStore;
use crate::engine::{BudgetTable, Tier};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

const SCHEMA_VERSION: i64 = 1;

const CREATE_SCHEMA: &str = "
CREATE TABLE budgets (
    tier TEXT PRIMARY KEY,
    ceiling REAL NOT NULL CHECK (ceiling >= 0),
    updated_at TEXT NOT NULL
);
";

pub struct SqliteBudgetStore {
    conn: Mutex<Connection>,
}

impl SqliteBudgetStore {
    /// Open or create the budget database. A fresh database is seeded with
    /// `defaults` so a new deployment starts from the configured ceilings.
    pub fn new<P: AsRef<Path>>(db_path: P, defaults: &BudgetTable) -> Result<Self> {
        let path = db_path.as_ref();
        let is_new_db = !path.exists();

        let conn = Connection::open(path).context("Failed to open budget database")?;
        conn.execute("PRAGMA foreign_keys = ON;", [])?;

        if is_new_db {
            info!("Creating new budget database at {:?}", path);
            conn.execute_batch(CREATE_SCHEMA)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

            let now = Utc::now().to_rfc3339();
            for (tier, ceiling) in defaults.iter() {
                conn.execute(
                    "INSERT INTO budgets (tier, ceiling, updated_at) VALUES (?1, ?2, ?3)",
                    params![tier.name(), ceiling, now],
                )?;
            }
        } else {
            let db_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
            if db_version != SCHEMA_VERSION {
                anyhow::bail!(
                    "Budget database version {} is unsupported (expected {})",
                    db_version,
                    SCHEMA_VERSION
                );
            }
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl BudgetStore for SqliteBudgetStore {
    fn load(&self) -> Result<BudgetTable> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT tier, ceiling FROM budgets")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut table = BudgetTable::new();
        for row in rows {
            let (tier_name, ceiling) = row?;
            match tier_name.parse::<Tier>() {
                Ok(tier) => table.set(tier, ceiling),
                // Rows from a hand-edited database may not parse; keep going.
                Err(_) => warn!("Ignoring unknown tier in budget database: {}", tier_name),
            }
        }
        Ok(table)
    }

    fn set_budget(&self, tier: Tier, ceiling: f64) -> Result<()> {
        anyhow::ensure!(ceiling >= 0.0, "Budget ceiling must be non-negative");
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO budgets (tier, ceiling, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(tier) DO UPDATE SET ceiling = ?2, updated_at = ?3",
            params![tier.name(), ceiling, Utc::now().to_rfc3339()],
        )
        .with_context(|| format!("Failed to store budget for tier {}", tier))?;
        Ok(())
    }
}
