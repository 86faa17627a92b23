mod file_config;

pub use file_config::{FileConfig, ThresholdsConfig};

use crate::engine::{AffordabilityEngine, BudgetTable, Tier};
use crate::normalizer::FieldMapping;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,

    // Scoring configuration (with canonical defaults)
    pub engine: AffordabilityEngine,
    pub field_mapping: FieldMapping,

    /// Seed ceilings for a fresh budget database.
    pub default_budgets: BudgetTable,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let mut engine = AffordabilityEngine::default();
        if let Some(thresholds) = file.thresholds {
            if let Some(marketing) = thresholds.marketing {
                engine.marketing = marketing;
            }
            if let Some(donation) = thresholds.donation {
                engine.donation = donation;
            }
        }

        let field_mapping = file.field_mapping.unwrap_or_default();

        let default_budgets = match file.budgets {
            None => default_budget_table(),
            Some(entries) => {
                let mut table = BudgetTable::new();
                for (tier_name, ceiling) in entries {
                    let tier: Tier = match tier_name.parse() {
                        Ok(tier) => tier,
                        Err(_) => bail!("Unknown tier in [budgets] config: {}", tier_name),
                    };
                    if ceiling < 0.0 {
                        bail!("Budget for tier {} must be non-negative", tier);
                    }
                    table.set(tier, ceiling);
                }
                table
            }
        };

        Ok(Self {
            db_dir,
            port,
            logging_level,
            frontend_dir_path,
            engine,
            field_mapping,
            default_budgets,
        })
    }

    pub fn budget_db_path(&self) -> PathBuf {
        self.db_dir.join("budgets.db")
    }
}

/// The original dashboard's budget defaults.
pub fn default_budget_table() -> BudgetTable {
    [
        (Tier::Headliner, 600.0),
        (Tier::DirectSupport, 200.0),
        (Tier::IndirectSupport, 100.0),
        (Tier::Opener, 0.0),
    ]
    .into_iter()
    .collect()
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
