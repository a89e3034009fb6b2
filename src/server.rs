use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::cart::CartService;
use crate::config::Config;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<dyn SessionStore>,
    pub cart: CartService,
}

impl AppState {
    pub fn new(config: Config, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            config: Arc::new(config),
            cart: CartService::new(sessions.clone()),
            sessions,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cart_routes = Router::new()
        .route(
            "/api/cart",
            get(crate::cart::get_cart_contents)
                .post(crate::cart::add_to_cart)
                .delete(crate::cart::empty_cart),
        )
        .route("/api/cart/:movie_id", delete(crate::cart::remove_from_cart))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::session_layer,
        ));

    let mut router = Router::new()
        .route("/api/health", get(health_handler))
        .merge(cart_routes)
        .fallback(fallback_handler);

    if let Some(ref appdir) = state.config.appdir {
        router = router.fallback_service(ServeDir::new(appdir));
    }

    router
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    // CORS preflight for paths without a route
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
