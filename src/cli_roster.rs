//! Roster Scoring Tool
//!
//! This binary scores a whole roster file offline: every act is normalized,
//! evaluated against the configured budgets, and printed with its placement.

use anyhow::Result;
use clap::Parser;
use gigboard_booking_server::budget_store::{BudgetStore, SqliteBudgetStore};
use gigboard_booking_server::config::{default_budget_table, FileConfig};
use gigboard_booking_server::engine::{AffordabilityEngine, BudgetTable, CostEfficiency};
use gigboard_booking_server::normalizer::FieldMapping;
use gigboard_booking_server::roster::load_roster;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cli-roster")]
#[command(about = "Score a roster file against the configured budgets")]
struct Args {
    /// Path to the roster file (.json or .csv)
    #[arg(value_name = "ROSTER_PATH")]
    roster_path: PathBuf,

    /// Path to a TOML config file (budgets, thresholds, field mapping)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to an existing budget database; overrides configured budgets
    #[arg(long)]
    budget_db: Option<PathBuf>,

    /// Address roster cells by position instead of header names
    #[arg(long, default_value_t = false)]
    positional: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Roster Scoring Tool");
    info!("===================");
    info!("Roster: {}", args.roster_path.display());

    let file_config = match &args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let mut engine = AffordabilityEngine::default();
    let mut mapping: Option<FieldMapping> = None;
    let mut config_budgets: Option<BudgetTable> = None;

    if let Some(file) = file_config {
        if let Some(thresholds) = file.thresholds {
            if let Some(marketing) = thresholds.marketing {
                engine.marketing = marketing;
            }
            if let Some(donation) = thresholds.donation {
                engine.donation = donation;
            }
        }
        mapping = file.field_mapping;
        if let Some(entries) = file.budgets {
            let mut table = BudgetTable::new();
            for (tier_name, ceiling) in entries {
                match tier_name.parse() {
                    Ok(tier) => table.set(tier, ceiling),
                    Err(_) => warn!("Ignoring unknown tier in [budgets] config: {}", tier_name),
                }
            }
            config_budgets = Some(table);
        }
    }

    let mapping = mapping.unwrap_or_else(|| {
        if args.positional {
            FieldMapping::positional_default()
        } else {
            FieldMapping::sheet_default()
        }
    });

    let budgets = match &args.budget_db {
        Some(db_path) => {
            info!("Loading budgets from {}", db_path.display());
            let seed = config_budgets.clone().unwrap_or_else(default_budget_table);
            SqliteBudgetStore::new(db_path, &seed)?.load()?
        }
        None => config_budgets.unwrap_or_else(default_budget_table),
    };

    let roster = load_roster(&args.roster_path, &mapping)?;

    let mut affordable = 0usize;
    let mut over_budget = 0usize;

    for metrics in &roster.artists {
        let placement = engine.evaluate(metrics, &budgets);
        if placement.is_affordable {
            affordable += 1;
        } else {
            over_budget += 1;
        }

        let efficiency = match placement.reach_per_dollar {
            CostEfficiency::Finite(ratio) => format!("{:.1} reach/$", ratio),
            CostEfficiency::Unbounded => "unbounded reach/$".to_owned(),
        };
        info!(
            "{}: strength {}+{}={}, {}, {} (margin ${:.0}, {})",
            metrics.name,
            placement.marketing_strength,
            placement.donation_strength,
            placement.total_strength,
            placement.tier,
            if placement.is_affordable {
                "affordable"
            } else {
                "over budget"
            },
            placement.margin,
            efficiency,
        );
    }

    info!("");
    info!("Roster Summary");
    info!("==============");
    info!("Acts scored: {}", roster.artists.len());
    info!("Affordable: {}", affordable);
    info!("Over budget: {}", over_budget);
    if roster.skipped_count() > 0 {
        warn!("Rows skipped: {}", roster.skipped_count());
    }
    if roster.malformed_value_count() > 0 {
        warn!("Malformed values defaulted to 0: {}", roster.malformed_value_count());
    }

    Ok(())
}
