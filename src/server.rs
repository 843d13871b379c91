use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::charts::{self, Figure};
use crate::models::Dataset;
use crate::pages::{self, Page};

/// Read-only table shared by every handler.
pub type AppState = Arc<Dataset>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/graph", get(graph))
        .fallback(page)
        .with_state(state)
}

async fn page(State(dataset): State<AppState>, uri: Uri) -> Response {
    let page = Page::from_path(uri.path());
    debug!(path = uri.path(), ?page, "render page");
    match pages::render(page, &dataset) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(?page, %err, "failed to render page");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Any query shape is accepted; a missing `column` selects nothing.
async fn graph(
    State(dataset): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Figure> {
    let column = params.get("column").map(String::as_str).unwrap_or_default();
    debug!(column, "update graph");
    Json(charts::selection_figure(&dataset, column))
}

pub async fn serve(addr: SocketAddr, dataset: Dataset) -> anyhow::Result<()> {
    let app = router(Arc::new(dataset));
    let listener = TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for ctrl-c");
    }
}
