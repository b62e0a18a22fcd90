//! txgraph Web Server
//!
//! Axum-based REST API and WebSocket push channel.

pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

async fn index() -> &'static str {
    "Hello from txgraph!"
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Businesses
        .route("/businesses", get(routes::businesses::list_businesses))
        .route("/businesses", post(routes::businesses::create_business))
        .route("/businesses/transactions", get(routes::businesses::enriched_transactions))
        .route("/businesses/{id}", get(routes::businesses::get_business))
        .route(
            "/businesses/{id}/transaction-count",
            get(routes::businesses::transaction_count),
        )
        // Transactions
        .route("/transactions", get(routes::transactions::list_transactions))
        .route("/transactions", post(routes::transactions::create_transaction))
        .route("/transactions/nodes", get(routes::transactions::list_nodes))
        .route("/transactions/edges", get(routes::transactions::list_edges))
        .route("/transactions/filter", get(routes::transactions::filter_transactions))
        .with_state(state.clone());

    Router::new()
        .route("/", get(index))
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve `state` on `addr` (`host:port`) until the process is stopped.
pub async fn run_server(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
