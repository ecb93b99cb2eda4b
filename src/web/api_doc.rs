use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use super::api::error::ErrorResponse;
use super::api::predictions::{GenerateRequest, GenerateResponse};
use crate::orbit::{PredictionMethod, PredictionPoint};
use crate::retrieve::{
    CurrentPoint, CurrentPredictions, HistoricalPoint, HistoricalPredictions, PredictionData,
    RetrievalStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::predictions::generate,
        super::api::predictions::list,
    ),
    components(
        schemas(
            GenerateRequest,
            GenerateResponse,
            ErrorResponse,
            PredictionData,
            RetrievalStatus,
            CurrentPredictions,
            CurrentPoint,
            HistoricalPredictions,
            HistoricalPoint,
            PredictionPoint,
            PredictionMethod,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Orbitcast Prediction API",
        description = "Position prediction generation and retrieval",
        version = "0.1.0"
    ),
    tags(
        (name = "predictions", description = "Prediction batches and views")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
