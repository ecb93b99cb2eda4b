use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::orbit::{ElementsProvider, Generator};
use crate::retrieve::Retriever;
use crate::store::{DocumentStore, FileStore, FixHistory, PredictionStore};

use super::api::predictions as prediction_handlers;
use super::api_doc::ApiDoc;
use super::auth::AppState;
use super::config::Config;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let bind_addr = config.web.bind.clone();

    let store: Arc<dyn DocumentStore> =
        Arc::new(FileStore::new(config.store.base_folder.clone()));

    let elements = ElementsProvider::new(
        config.elements.source_url.clone(),
        config.elements.fetch_timeout,
    )?;
    let generator = Generator::new(
        elements,
        FixHistory::new(store.clone()),
        PredictionStore::new(store.clone()),
    );
    let retriever = Retriever::new(
        PredictionStore::new(store),
        config.retrieval.current_timeout,
        config.retrieval.historical_timeout,
    );

    let state = AppState {
        config: Arc::new(config),
        generator: Arc::new(generator),
        retriever: Arc::new(retriever),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/predictions", get(prediction_handlers::list))
        .route(
            "/api/predictions/generate",
            post(prediction_handlers::generate),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
