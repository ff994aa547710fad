pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod token;
pub mod validation;

use axum::{
    Json, Router,
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: config::Config,
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::health),
    components(schemas(
        handlers::HealthStatus,
        handlers::DbPoolStats,
        handlers::tokens::IssueRequest,
        handlers::tokens::IssueResponse,
        handlers::tokens::RedeemResponse,
    ))
)]
pub struct ApiDoc;

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// CORS for the storefront and admin pages. `*` unless specific origins
/// are configured; preflight OPTIONS requests are answered by the layer.
fn cors_layer(config: &config::Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match &config.cors_allowed_origins {
        Some(raw) => {
            let origins: Vec<HeaderValue> = raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .filter_map(|o| o.parse().ok())
                .collect();
            layer.allow_origin(AllowOrigin::list(origins))
        }
        None => layer.allow_origin(Any),
    }
}

pub fn create_app(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/transactions",
            get(handlers::admin::list)
                .post(handlers::admin::mutate)
                .fallback(handlers::method_not_allowed),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::admin_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(openapi_spec))
        .route(
            "/tokens",
            post(handlers::tokens::issue).fallback(handlers::method_not_allowed),
        )
        .route(
            "/redeem",
            get(handlers::tokens::redeem).fallback(handlers::method_not_allowed),
        )
        .nest("/admin", admin_routes)
        .layer(axum_middleware::from_fn(
            middleware::request_logger::request_logger_middleware,
        ))
        .layer(cors_layer(&state.config))
        .with_state(state)
}
