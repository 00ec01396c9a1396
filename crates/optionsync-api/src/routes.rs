use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use optionsync_core::{ApiResponse, OptionEntry};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::verify_root_token;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::registry::{is_credential_key, OptionRegistry};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    registry: Arc<OptionRegistry>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        Self {
            registry: Arc::new(OptionRegistry::new(&config.seed)),
            config,
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    let option_routes = Router::new()
        .route("/option", get(get_options).put(update_option))
        .route("/option/", get(get_options).put(update_option))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_root));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", option_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
    })
}

async fn require_root(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    verify_root_token(request.headers(), &state.config.root_token)?;
    Ok(next.run(request).await)
}

async fn get_options(State(state): State<AppState>) -> Json<ApiResponse<Vec<OptionEntry>>> {
    let options = state.registry.visible_options().await;
    tracing::debug!(count = options.len(), "Served option list");
    Json(ApiResponse::ok(options))
}

async fn update_option(
    State(state): State<AppState>,
    payload: Result<Json<OptionEntry>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Json(option) =
        payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    if option.key.trim().is_empty() {
        return Err(AppError::bad_request("Option key must not be empty"));
    }

    state
        .registry
        .update(&option.key, &option.value)
        .await
        .map_err(AppError::rejected)?;

    if is_credential_key(&option.key) {
        tracing::info!(key = %option.key, "Updated credential option");
    } else {
        tracing::info!(key = %option.key, value = %option.value, "Updated option");
    }
    Ok(Json(ApiResponse::done()))
}
