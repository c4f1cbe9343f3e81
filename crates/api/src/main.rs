mod config;
mod metrics;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use config::ApiConfig;
use metrics::{Metrics, TimedOperation};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use transform::Transformer;

struct AppState {
    transformer: Transformer,
    metrics: Arc<Metrics>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ApiConfig::from_env();
    let state = Arc::new(AppState {
        transformer: Transformer::new(config.transform.clone()),
        metrics: Metrics::new(),
    });

    let app = Router::new()
        .route("/transform", post(transform_bundle))
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(addr = %config.bind_addr, "Transformer API listening");

    axum::serve(listener, app).await.expect("Server error");
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<metrics::MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

/// One transformation run: authored bundle JSON in, STIX XML out. The caller
/// only ever sees a document or an aborted run; per-observable skips come
/// back as a count header.
async fn transform_bundle(State(state): State<Arc<AppState>>, body: String) -> Response {
    let timer = TimedOperation::start();

    let bundle = match payload::parse_bundle(&body) {
        Ok(bundle) => bundle,
        Err(e) => {
            state.metrics.record_run(false, 0);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state.transformer.transform(&bundle) {
        Ok(output) => {
            state.metrics.record_run(true, output.skipped.len());
            state.metrics.record_transform_time(timer.elapsed());
            (
                StatusCode::OK,
                [
                    ("content-type", "application/xml".to_string()),
                    (
                        "x-skipped-observables",
                        output.skipped.len().to_string(),
                    ),
                ],
                output.xml,
            )
                .into_response()
        }
        Err(e) => {
            state.metrics.record_run(false, 0);
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
        }
    }
}
