use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::orbit::{GroundFix, SourceFix};
use crate::retrieve::PredictionData;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::auth::{require_permission, AppState, AuthenticatedUser};
use crate::web::config::Permission;

const REQUIRED_FIELDS: [&str; 4] = ["timestamp", "latitude", "longitude", "document_id"];

/// One ground fix from the ingestion pipeline, triggering a batch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub document_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub status: String,
    pub document_id: String,
    pub prediction_count: usize,
}

#[utoipa::path(
    post,
    path = "/api/predictions/generate",
    tag = "predictions",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Batch generated and stored", body = GenerateResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn generate(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<impl IntoResponse> {
    require_permission(&user, Permission::GeneratePredictions)?;

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| body.get(field).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let request: GenerateRequest =
        serde_json::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))?;

    let source = SourceFix {
        fix: GroundFix {
            timestamp: request.timestamp,
            latitude: request.latitude,
            longitude: request.longitude,
        },
        document_id: request.document_id,
        location: request.location,
        country_code: request.country_code,
    };

    let summary = state.generator.generate(source).await?;

    Ok((
        StatusCode::OK,
        Json(GenerateResponse {
            status: "success".to_string(),
            document_id: summary.document_id,
            prediction_count: summary.prediction_count,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/predictions",
    tag = "predictions",
    responses(
        (status = 200, description = "Current and historical predictions", body = PredictionData),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<PredictionData>> {
    require_permission(&user, Permission::ListPredictions)?;
    Ok(Json(state.retriever.all(Utc::now()).await))
}
