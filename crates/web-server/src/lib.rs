use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use calculator::InterestCalculator;
use configuration::Config;
use database::DbRepository;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};
// Note: Tracing is initialized by the binaries, not by this library.

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub calculator: InterestCalculator,
}

impl AppState {
    pub fn new(db_repo: DbRepository) -> Self {
        Self {
            db_repo,
            calculator: InterestCalculator::new(),
        }
    }
}

/// Builds the router with every route and middleware attached.
pub fn app(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    // Any origin may call the API.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    Router::new()
        .route("/", get(handlers::root))
        .route("/products", get(handlers::get_products).post(handlers::add_product))
        .route("/alerts", post(handlers::create_alert))
        .route(
            "/educational",
            get(handlers::get_educational_content).post(handlers::add_educational_content),
        )
        .route("/calculator", post(handlers::calculate))
        .route("/chat", post(handlers::chat))
        .with_state(state)
        .layer(cors)
        // Logs information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// Opens the configured store and serves the API until the process exits.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let store = database::connect(&config.store).await?;
    let app_state = Arc::new(AppState::new(DbRepository::new(store)));
    let router = app(app_state, config.server.body_limit_bytes);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}
