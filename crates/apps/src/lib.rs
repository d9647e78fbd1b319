//! Form endpoint over the combined single-artifact model.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use eta_core::PipelineError;
use eta_predictors::CombinedPipeline;
use eta_runtime::MetricsRegistry;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<CombinedPipeline>,
    metrics: MetricsRegistry,
}

impl AppState {
    pub fn new(pipeline: CombinedPipeline, metrics: MetricsRegistry) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            metrics,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FormResponse {
    pub features: Vec<String>,
    pub prediction: Option<f64>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page).post(predict))
        .route("/health", get(health))
        .with_state(state)
}

async fn form_page(State(state): State<AppState>) -> Json<FormResponse> {
    Json(FormResponse {
        features: state.pipeline.features().to_vec(),
        prediction: None,
    })
}

async fn predict(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<FormResponse>, ApiError> {
    debug!(fields = form.len(), "form prediction");
    match state.pipeline.predict_form(&form) {
        Ok(prediction) => {
            state.metrics.inc_predictions_served(1);
            Ok(Json(FormResponse {
                features: state.pipeline.features().to_vec(),
                prediction: Some(prediction),
            }))
        }
        Err(err) => {
            state.metrics.inc_prediction_failures(1);
            warn!(error = %err, "form prediction failed");
            Err(ApiError(err))
        }
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

pub struct ApiError(PipelineError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            PipelineError::Encoding { .. } | PipelineError::Schema { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
