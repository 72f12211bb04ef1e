use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::content::PortfolioContent;
use super::render::render_page;
use crate::error::Result;

/// Page and JSON are rendered once at startup; the content never changes
pub struct SiteState {
    html: String,
    content_json: String,
}

impl SiteState {
    pub fn new(content: &PortfolioContent) -> Result<Self> {
        Ok(Self {
            html: render_page(content),
            content_json: serde_json::to_string_pretty(content)?,
        })
    }
}

async fn index(State(state): State<Arc<SiteState>>) -> Html<String> {
    Html(state.html.clone())
}

async fn content_json(State(state): State<Arc<SiteState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        state.content_json.clone(),
    )
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: SiteState, assets_dir: impl Into<PathBuf>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/content.json", get(content_json))
        .route("/health", get(health))
        .nest_service("/assets", ServeDir::new(assets_dir.into()))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve on an already bound listener until the process is stopped
pub async fn serve_on(listener: TcpListener, app: Router) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Serving portfolio on http://{}", addr);
    }
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn serve(
    content: &PortfolioContent,
    assets_dir: impl Into<PathBuf>,
    host: &str,
    port: u16,
) -> Result<()> {
    let app = router(SiteState::new(content)?, assets_dir);
    let listener = TcpListener::bind((host, port)).await?;
    serve_on(listener, app).await
}
