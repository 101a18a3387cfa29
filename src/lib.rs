use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod validation;

/// Build the full application router.
///
/// Three tiers share the /users and /cards paths: public routes, routes
/// behind authentication, and the admin-only user listing. The merged
/// method routers keep each tier's middleware scoped to its own methods.
pub fn app() -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/users", post(handlers::users::register))
        .route("/users/login", post(handlers::users::login))
        .route("/users/logout", delete(handlers::users::logout))
        .route("/cards", get(handlers::cards::list))
        .route("/cards/:id", get(handlers::cards::get_one));

    let authenticated = Router::new()
        .route(
            "/users/:id",
            get(handlers::users::get_one)
                .put(handlers::users::update)
                .patch(handlers::users::update_status)
                .delete(handlers::users::remove),
        )
        .route("/cards", post(handlers::cards::create))
        .route("/cards/my-cards", get(handlers::cards::my_cards))
        .route(
            "/cards/:id",
            put(handlers::cards::update)
                .patch(handlers::cards::like)
                .delete(handlers::cards::remove),
        )
        .route_layer(axum::middleware::from_fn(middleware::auth::require_auth));

    // require_auth is applied last so it wraps the role gate and runs first
    let admin = Router::new()
        .route("/users", get(handlers::users::list))
        .route_layer(axum::middleware::from_fn(middleware::role::require_admin))
        .route_layer(axum::middleware::from_fn(middleware::auth::require_auth));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        .fallback(not_found)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// CORS for the browser frontend: a single configured origin, with
/// credentials allowed so the session cookie travels cross-site
fn cors_layer() -> CorsLayer {
    let origin = config::config()
        .security
        .cors_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000"));

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    let database_ok = match database::pool().await {
        Ok(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
        Err(_) => false,
    };

    if database_ok {
        (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "timestamp": now })),
        )
    }
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "msg": "Route does not exist" })),
    )
}
