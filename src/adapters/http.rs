//! HTTP boundary: decodes listing requests and turns pipeline outcomes into
//! status codes and JSON bodies.
//!
//! | Outcome                   | Status |
//! |---------------------------|--------|
//! | Success                   | 200    |
//! | MalformedInput            | 422    |
//! | VehicleNotIdentifiable    | 422    |
//! | UnknownVehicleFailure     | 404    |
//! | MalformedModelOutput      | 500    |
//! | TransportFailure          | 500    |

use crate::domain::model::{CarListingRequest, ExtractionFailureReason, PipelineOutcome};
use crate::domain::ports::ListingPricer;
use crate::utils::error::{AppError, FieldViolation, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const NOT_IDENTIFIABLE_MESSAGE: &str =
    "Could not extract a valid make and model from the provided text. Please provide a more descriptive listing.";
pub const MODEL_OUTPUT_MESSAGE: &str =
    "The server had trouble understanding the response from the AI model. Please try again.";
pub const INTERNAL_MESSAGE: &str = "An internal server error occurred. Please try again later.";

#[derive(Clone)]
pub struct AppState {
    pricer: Arc<dyn ListingPricer>,
}

impl AppState {
    pub fn new(pricer: Arc<dyn ListingPricer>) -> Self {
        Self { pricer }
    }
}

/// 對外回應的錯誤，5xx 一律只給通用訊息
#[derive(Debug)]
pub enum ApiError {
    MalformedInput(Vec<FieldViolation>),
    UndecodableBody(String),
    VehicleNotIdentifiable,
    UnknownVehicle { make: String, model: String },
    ModelOutput,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::MalformedInput(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "malformed_input", "detail": violations }),
            ),
            Self::UndecodableBody(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "malformed_input", "detail": detail }),
            ),
            Self::VehicleNotIdentifiable => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "vehicle_not_identifiable", "detail": NOT_IDENTIFIABLE_MESSAGE }),
            ),
            Self::UnknownVehicle { make, model } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "unknown_vehicle",
                    "detail": format!(
                        "Pricing for make '{}' and model '{}' is not available.",
                        make, model
                    ),
                    "make": make,
                    "model": model,
                }),
            ),
            Self::ModelOutput => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "model_output_error", "detail": MODEL_OUTPUT_MESSAGE }),
            ),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "internal_error", "detail": INTERNAL_MESSAGE }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        Self::UndecodableBody(rejection.body_text())
    }
}

pub fn outcome_to_response(outcome: PipelineOutcome) -> Response {
    let error = match outcome {
        PipelineOutcome::Success(estimate) => return (StatusCode::OK, Json(estimate)).into_response(),
        PipelineOutcome::MalformedInput(violations) => ApiError::MalformedInput(violations),
        PipelineOutcome::ExtractionFailure(ExtractionFailureReason::VehicleNotIdentifiable) => {
            ApiError::VehicleNotIdentifiable
        }
        PipelineOutcome::ExtractionFailure(ExtractionFailureReason::MalformedModelOutput) => {
            ApiError::ModelOutput
        }
        PipelineOutcome::UnknownVehicleFailure { make, model } => {
            ApiError::UnknownVehicle { make, model }
        }
        // 細節已由 pipeline 記錄，這裡不回傳
        PipelineOutcome::TransportFailure { .. } => ApiError::Internal,
    };
    error.into_response()
}

async fn price_car(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CarListingRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };

    let outcome = state.pricer.price_car_listing(request).await;
    outcome_to_response(outcome)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub fn router(pricer: Arc<dyn ListingPricer>) -> Router {
    Router::new()
        .route("/price-car", post(price_car))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(pricer))
}

pub async fn serve(pricer: Arc<dyn ListingPricer>, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("🚀 Listening on http://{}", bind);

    axum::serve(listener, router(pricer))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::ServerError {
            message: e.to_string(),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("🛑 Shutdown signal received");
}
