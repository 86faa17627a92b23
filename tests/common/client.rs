//! HTTP client for end-to-end tests
//!
//! A thin wrapper around reqwest with one method per server endpoint.
//! When API routes or request formats change, update only this file.

use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 5;

pub struct TestClient {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn stats(&self) -> Response {
        self.client
            .get(&self.base_url)
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn evaluate(&self, metrics: Value) -> Response {
        self.client
            .post(format!("{}/v1/placement/evaluate", self.base_url))
            .json(&metrics)
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn evaluate_batch(&self, rows: Value) -> Response {
        self.client
            .post(format!("{}/v1/placement/batch", self.base_url))
            .json(&json!({ "rows": rows }))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn get_budgets(&self) -> Response {
        self.client
            .get(format!("{}/v1/budgets", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn put_budget(&self, tier: &str, ceiling: f64) -> Response {
        self.client
            .put(format!("{}/v1/budgets/{}", self.base_url, tier))
            .json(&json!({ "ceiling": ceiling }))
            .send()
            .await
            .expect("Request failed")
    }
}
