use axum::extract::FromRef;

use crate::budget_store::BudgetStore;
use crate::engine::AffordabilityEngine;
use crate::normalizer::FieldMapping;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedBudgetStore = Arc<dyn BudgetStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub engine: AffordabilityEngine,
    pub field_mapping: FieldMapping,
    pub budget_store: GuardedBudgetStore,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedBudgetStore {
    fn from_ref(input: &ServerState) -> Self {
        input.budget_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for AffordabilityEngine {
    fn from_ref(input: &ServerState) -> Self {
        input.engine.clone()
    }
}
