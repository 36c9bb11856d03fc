//! HTTP API over the prediction service

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use iris_binding::core::unified_error::errors;
use iris_binding::{
    input_form, DatasetSummary, FeatureBounds, FeatureVector, IrisError, ModelCard, Prediction,
    PredictionService, SpeciesInfo, SpeciesLabel,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

/// API server state
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<PredictionService>,
}

/// Prediction request: either named measurements or a raw ordered array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PredictRequest {
    Named(FeatureVector),
    Raw { features: Vec<f64> },
}

impl PredictRequest {
    fn into_vector(self) -> Result<FeatureVector, IrisError> {
        match self {
            PredictRequest::Named(vector) => {
                vector.validate()?;
                Ok(vector)
            }
            PredictRequest::Raw { features } => FeatureVector::from_slice(&features),
        }
    }
}

/// Error response carrying the library error kind
pub struct ApiError(IrisError);

impl From<IrisError> for ApiError {
    fn from(err: IrisError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(errors::invalid_input(
            "body",
            "four named measurements or a features array",
            &rejection.body_text(),
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            IrisError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            IrisError::UnknownSpecies { .. } => StatusCode::NOT_FOUND,
            IrisError::ModelsUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            IrisError::Inference { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("{}", self.0);
        } else {
            warn!("{}", self.0);
        }
        (
            status,
            Json(json!({ "error": self.0.kind(), "message": self.0.to_string() })),
        )
            .into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/form", get(form))
        .route("/api/predict", post(predict))
        .route("/api/species", get(list_species))
        .route("/api/species/:name", get(describe_species))
        .route("/api/model", get(model_card))
        .route("/api/dataset", get(dataset_summary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let paths = state.service.store().paths();
    Json(json!({
        "status": "ok",
        "models_loaded": true,
        "classifier": paths.classifier.display().to_string(),
        "scaler": paths.scaler.display().to_string(),
    }))
}

async fn form() -> Json<Vec<FeatureBounds>> {
    Json(input_form())
}

async fn predict(
    State(state): State<ApiState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(request) = payload?;
    debug!("Received prediction request: {:?}", request);
    let vector = request.into_vector()?;
    let out_of_bounds = vector.out_of_bounds();
    if !out_of_bounds.is_empty() {
        debug!("Input outside form bounds for {:?}", out_of_bounds);
    }
    Ok(Json(state.service.predict_detailed(&vector)?))
}

async fn list_species(State(state): State<ApiState>) -> Json<Vec<SpeciesInfo>> {
    Json(state.service.catalog().all().into_iter().cloned().collect())
}

async fn describe_species(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<SpeciesInfo>, ApiError> {
    let label = SpeciesLabel::parse(&name)?;
    Ok(Json(state.service.describe(label)?.clone()))
}

async fn model_card(State(state): State<ApiState>) -> Json<ModelCard> {
    Json(state.service.model_card())
}

async fn dataset_summary(State(state): State<ApiState>) -> Json<DatasetSummary> {
    Json(state.service.dataset_summary())
}
