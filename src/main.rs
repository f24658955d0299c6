mod auth;
mod books;
mod config;
mod db;
mod error;
mod extract;
mod pagination;
mod people;
mod validation;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::HeaderValue,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use auth::{
    bootstrap::ensure_bootstrap_admin, me_handler, refresh_handler, require_auth, signin_handler,
    AuthService, TokenService, UserRepository,
};
use books::{BookRepository, BookService};
use config::AppConfig;
use people::{PersonRepository, PersonService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub people: PersonService,
    pub books: BookService,
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Handler for GET /health
async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates and configures the application router
///
/// Sign-in, refresh and health are public. Every other route sits behind
/// `require_auth`, which validates the access token and applies the route policy.
fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let public = Router::new()
        .route("/health", get(health_handler))
        .route("/auth/signin", post(signin_handler))
        .route("/auth/refresh/:username", put(refresh_handler));

    let protected = Router::new()
        .route("/auth/me", get(me_handler))
        .route(
            "/api/person/v1",
            get(people::list_people_handler)
                .post(people::create_person_handler)
                .put(people::update_person_handler),
        )
        .route(
            "/api/person/v1/findPersonByName/:first_name",
            get(people::find_people_by_name_handler),
        )
        .route(
            "/api/person/v1/:id",
            get(people::get_person_handler)
                .patch(people::disable_person_handler)
                .delete(people::delete_person_handler),
        )
        .route(
            "/api/books/v1",
            get(books::list_books_handler)
                .post(books::create_book_handler)
                .put(books::update_book_handler),
        )
        .route(
            "/api/books/v1/:id",
            get(books::get_book_handler).delete(books::delete_book_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("People & Books API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let users = UserRepository::new(db_pool.clone());
    if let Some(admin) = &config.bootstrap_admin {
        ensure_bootstrap_admin(&users, admin)
            .await
            .expect("Failed to provision bootstrap admin");
    }

    let tokens = Arc::new(TokenService::new(&config.jwt));
    tracing::info!(
        "Token lifetimes: access={}s, refresh={}s",
        tokens.access_token_ttl_secs(),
        tokens.refresh_token_ttl_secs()
    );
    let state = AppState {
        auth: Arc::new(AuthService::new(Arc::new(users), tokens.clone())),
        tokens,
        people: PersonService::new(Arc::new(PersonRepository::new(db_pool.clone()))),
        books: BookService::new(Arc::new(BookRepository::new(db_pool))),
    };

    let app = create_router(state, &config.cors_allowed_origins);

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("People & Books API is running on http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod tests;
