//! HTTP API Layer
//!
//! This crate exposes FNOL triage over HTTP using Axum and hosts the two
//! binaries: the `fnol-api` server and the one-shot `fnol` CLI.
//!
//! # Architecture
//!
//! - **Handlers**: claim submission (text or document) and health checks
//! - **Middleware**: tracing and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Config**: layered settings converted into a `PipelineConfig`
//! - **Telemetry**: tracing subscriber setup for the binaries
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{config::FnolSettings, create_router, AppState};
//!
//! let settings = FnolSettings::load(None)?;
//! let app = create_router(AppState::from_settings(settings)?);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod telemetry;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_claims::{ClaimPipeline, DocumentTextSource, InferenceService};
use infra_llm::{build_inference, FileTextSource};

use crate::config::{ConfigError, FnolSettings};
use crate::handlers::{claims, health};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: ClaimPipeline,
    pub text_source: Arc<dyn DocumentTextSource>,
    pub inference: Arc<dyn InferenceService>,
    pub settings: Arc<FnolSettings>,
}

impl AppState {
    /// Wires the pipeline from explicit collaborators
    pub fn new(
        settings: FnolSettings,
        inference: Arc<dyn InferenceService>,
        text_source: Arc<dyn DocumentTextSource>,
    ) -> Result<Self, ConfigError> {
        let pipeline = ClaimPipeline::new(Arc::new(settings.pipeline_config()?), inference.clone());
        Ok(Self {
            pipeline,
            text_source,
            inference,
            settings: Arc::new(settings),
        })
    }

    /// Wires the configured inference backend and the file text source
    pub fn from_settings(settings: FnolSettings) -> Result<Self, ConfigError> {
        let inference = build_inference(settings.inference.backend, settings.http_client_config())?;
        let text_source = Arc::new(FileTextSource::new().max_bytes(settings.server.max_upload_bytes));
        Self::new(settings, inference, text_source)
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.settings.server.max_upload_bytes;

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claims routes
    let claims_routes = Router::new()
        .route("/fnol", post(claims::submit_fnol))
        .route(
            "/fnol/document",
            post(claims::submit_document).layer(DefaultBodyLimit::max(upload_limit)),
        );

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
