//! HTTP surface of the letter desk.
//!
//! | Route                     | Methods            |
//! |---------------------------|--------------------|
//! | `/workers`                | GET, POST          |
//! | `/workers/{id}`           | PUT, DELETE        |
//! | `/clients`                | GET, POST          |
//! | `/clients/{id}`           | PUT, DELETE        |
//! | `/requests`               | GET, POST          |
//! | `/requests/{id}`          | PUT, DELETE        |
//! | `/reports/workers/{id}`   | GET                |
//! | `/health`                 | GET                |

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, StatusCode, header};
use axum::middleware::map_response;
use axum::response::Response;
use axum::routing::{get, put};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::manager::Storage;

mod error;
mod extract;
pub mod handlers;

/// Build the router over an injected storage handle.
pub fn router<S: Storage + 'static>(storage: Arc<S>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/workers",
            get(handlers::list_workers::<S>).post(handlers::create_worker::<S>),
        )
        .route(
            "/workers/{id}",
            put(handlers::update_worker::<S>).delete(handlers::delete_worker::<S>),
        )
        .route(
            "/clients",
            get(handlers::list_clients::<S>).post(handlers::create_client::<S>),
        )
        .route(
            "/clients/{id}",
            put(handlers::update_client::<S>).delete(handlers::delete_client::<S>),
        )
        .route(
            "/requests",
            get(handlers::list_requests::<S>).post(handlers::create_request::<S>),
        )
        .route(
            "/requests/{id}",
            put(handlers::update_request::<S>)
                .delete(handlers::delete_request::<S>),
        )
        .route("/reports/workers/{id}", get(handlers::worker_report::<S>))
        .with_state(storage)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(map_response(preflight_no_content))
}

/// Any origin; the methods and headers the desk's browser front-end uses.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Answered preflights carry no body, so report them as 204.
async fn preflight_no_content(method: Method, mut response: Response) -> Response {
    if method == Method::OPTIONS
        && response.status() == StatusCode::OK
        && response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// Serve `router` on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Letter desk listening");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Letter desk shut down");
    Ok(())
}
