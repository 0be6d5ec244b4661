//! Productos API: product catalogue REST backend.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod settings;
pub mod state;
pub mod store;
pub mod validation;

pub use error::{AppError, ConfigError, StoreError, StoreResult};
pub use models::{NewProduct, Product, ProductChanges};
pub use routes::{common_routes_with_ready, product_routes};
pub use settings::Settings;
pub use state::AppState;
pub use store::{InMemoryProductStore, PgProductStore, ProductStore};

use axum::{middleware::map_response, Router};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Path prefix of the product routes.
pub const API_PREFIX: &str = "/api/productos";

/// Full application: product routes, service routes and `/docs`.
pub fn app(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .nest(API_PREFIX, product_routes(state.clone()))
        .merge(common_routes_with_ready(state))
        .merge(SwaggerUi::new("/docs").url(docs::OPENAPI_JSON_PATH, docs::ApiDoc::openapi()))
        .layer(RequestBodyLimitLayer::new(settings.body_limit_bytes))
        .layer(map_response(error::payload_too_large_as_json))
        .layer(TraceLayer::new_for_http())
}
