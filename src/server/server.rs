use anyhow::Result;
use std::time::{Duration, Instant};

use tower_http::services::ServeDir;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};
use crate::engine::{AffordabilityEngine, ArtistMetrics, PlacementResult, Tier};
use crate::normalizer::FieldMapping;
use crate::normalizer::RawRow;
use crate::roster::{normalize_rows, RosterProblem};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct BatchEvaluateBody {
    pub rows: Vec<RawRow>,
    /// Overrides the server's configured mapping for this batch only.
    pub field_mapping: Option<FieldMapping>,
}

#[derive(Serialize)]
struct BatchPlacement {
    pub metrics: ArtistMetrics,
    pub placement: PlacementResult,
}

#[derive(Serialize)]
struct BatchEvaluateResponse {
    pub results: Vec<BatchPlacement>,
    pub skipped_rows: Vec<String>,
    pub malformed_values: usize,
}

#[derive(Deserialize, Debug)]
struct PutBudgetBody {
    pub ceiling: f64,
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn evaluate(
    State(state): State<ServerState>,
    Json(metrics): Json<ArtistMetrics>,
) -> Response {
    // The batch path clamps bad costs during normalization; this path takes
    // metrics verbatim, so the same bound is enforced here.
    if !metrics.cost.is_finite() || metrics.cost < 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            "Act cost must be a non-negative number".to_owned(),
        )
            .into_response();
    }

    match state.budget_store.load() {
        Ok(budgets) => Json(state.engine.evaluate(&metrics, &budgets)).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err)).into_response(),
    }
}

async fn evaluate_batch(
    State(state): State<ServerState>,
    Json(body): Json<BatchEvaluateBody>,
) -> Response {
    let budgets = match state.budget_store.load() {
        Ok(budgets) => budgets,
        Err(err) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err)).into_response()
        }
    };

    let mapping = body.field_mapping.unwrap_or_else(|| state.field_mapping.clone());
    let loaded = normalize_rows(&body.rows, &mapping);

    let malformed_values = loaded.malformed_value_count();
    let skipped_rows = loaded
        .problems
        .iter()
        .filter_map(|p| match p {
            RosterProblem::Skipped { row, reason } => Some(format!("row {}: {}", row, reason)),
            _ => None,
        })
        .collect();

    let results = loaded
        .artists
        .into_iter()
        .map(|metrics| {
            let placement = state.engine.evaluate(&metrics, &budgets);
            BatchPlacement { metrics, placement }
        })
        .collect();

    Json(BatchEvaluateResponse {
        results,
        skipped_rows,
        malformed_values,
    })
    .into_response()
}

async fn get_budgets(State(budget_store): State<GuardedBudgetStore>) -> Response {
    match budget_store.load() {
        Ok(budgets) => Json(budgets).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err)).into_response(),
    }
}

async fn put_budget(
    State(budget_store): State<GuardedBudgetStore>,
    Path(tier): Path<String>,
    Json(body): Json<PutBudgetBody>,
) -> Response {
    let tier: Tier = match tier.parse() {
        Ok(tier) => tier,
        Err(_) => {
            return (StatusCode::NOT_FOUND, format!("Unknown tier: {}", tier)).into_response();
        }
    };

    // NaN fails this check too.
    if !(body.ceiling >= 0.0) {
        return (
            StatusCode::BAD_REQUEST,
            "Budget ceiling must be a non-negative number".to_owned(),
        )
            .into_response();
    }

    match budget_store.set_budget(tier, body.ceiling) {
        Ok(()) => match budget_store.load() {
            Ok(budgets) => Json(budgets).into_response(),
            Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err)).into_response(),
        },
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err)).into_response(),
    }
}

pub fn make_app(
    config: ServerConfig,
    engine: AffordabilityEngine,
    field_mapping: FieldMapping,
    budget_store: GuardedBudgetStore,
) -> Result<Router> {
    let state = ServerState {
        config: config.clone(),
        start_time: Instant::now(),
        engine,
        field_mapping,
        budget_store,
        hash: env!("GIT_HASH").to_owned(),
    };

    let placement_routes: Router = Router::new()
        .route("/evaluate", post(evaluate))
        .route("/batch", post(evaluate_batch))
        .with_state(state.clone());

    let budget_routes: Router = Router::new()
        .route("/", get(get_budgets))
        .route("/{tier}", put(put_budget))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let mut app: Router = home_router
        .nest("/v1/placement", placement_routes)
        .nest("/v1/budgets", budget_routes);

    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    engine: AffordabilityEngine,
    field_mapping: FieldMapping,
    budget_store: GuardedBudgetStore,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
    frontend_dir_path: Option<String>,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
        frontend_dir_path,
    };
    let app = make_app(config, engine, field_mapping, budget_store)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget_store::InMemoryBudgetStore;
    use crate::config::default_budget_table;
    use axum::{body::Body, http::Request};
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn test_app() -> Router {
        let budget_store = Arc::new(InMemoryBudgetStore::with_table(default_budget_table()));
        make_app(
            ServerConfig::default(),
            AffordabilityEngine::default(),
            FieldMapping::sheet_default(),
            budget_store,
        )
        .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn home_reports_uptime() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["uptime"].is_string());
    }

    #[tokio::test]
    async fn evaluates_one_act() {
        let body = serde_json::json!({
            "name": "Big Act",
            "cost": 650.0,
            "primary_followers": 60200,
            "associated_followers": 0,
            "streaming_listeners": 208800
        });
        let response = test_app()
            .oneshot(json_request("POST", "/v1/placement/evaluate", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["tier"], "Headliner");
        assert_eq!(json["total_strength"], 10);
        assert_eq!(json["is_affordable"], false);
        assert_eq!(json["margin"], -50.0);
    }

    #[tokio::test]
    async fn evaluates_a_batch_of_raw_rows() {
        let body = serde_json::json!({
            "rows": [
                {
                    "Band Name": "Local Act",
                    "Average Cost": "$93",
                    "IG Followers": "9,800",
                    "Associated IG Followers": 0,
                    "Spotify Monthlies": 1300
                },
                { "Band Name": "" }
            ]
        });
        let response = test_app()
            .oneshot(json_request("POST", "/v1/placement/batch", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["results"].as_array().unwrap().len(), 1);
        assert_eq!(json["results"][0]["placement"]["tier"], "Indirect Support");
        assert_eq!(json["skipped_rows"].as_array().unwrap().len(), 1);
        assert_eq!(json["malformed_values"], 0);
    }

    #[tokio::test]
    async fn batch_accepts_a_mapping_override() {
        let body = serde_json::json!({
            "rows": [["Riverside Duo", "$250", 4100, 0, null, null, null, "6,200"]],
            "field_mapping": {
                "name": 0,
                "cost": 1,
                "primary_followers": 2,
                "associated_followers": 3,
                "streaming_listeners": 7
            }
        });
        let response = test_app()
            .oneshot(json_request("POST", "/v1/placement/batch", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["results"][0]["metrics"]["name"], "Riverside Duo");
    }

    #[tokio::test]
    async fn budgets_round_trip() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/v1/budgets")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["Headliner"], 600.0);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/v1/budgets/Headliner",
                serde_json::json!({ "ceiling": 750.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["Headliner"], 750.0);
    }

    #[tokio::test]
    async fn unknown_tier_is_not_found() {
        let response = test_app()
            .oneshot(json_request(
                "PUT",
                "/v1/budgets/Stagehand",
                serde_json::json!({ "ceiling": 10.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn negative_cost_is_bad_request() {
        let body = serde_json::json!({
            "name": "Big Act",
            "cost": -650.0,
            "primary_followers": 60200,
            "associated_followers": 0,
            "streaming_listeners": 208800
        });
        let response = test_app()
            .oneshot(json_request("POST", "/v1/placement/evaluate", body))
            .await
            .unwrap();

        // A negative fee would otherwise inflate the margin and read as
        // affordable (600 - (-650) = 1250).
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_ceiling_is_bad_request() {
        let response = test_app()
            .oneshot(json_request(
                "PUT",
                "/v1/budgets/Opener",
                serde_json::json!({ "ceiling": -1.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
