use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum::extract::State;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::feed;
use crate::fetcher::Fetcher;
use crate::render::{HtmlTemplate, IndexTemplate};
use crate::xml::{self, Document};

pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml";
pub const CACHE_CONTROL_VALUE: &str = "private, max-age=300";

pub struct AppState {
    pub fetcher: Arc<Fetcher>,
}

// Custom error type
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {}", self.0),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

/// Fetch, parse, and rewrite the source feed for the given request path.
async fn load_feed(state: &AppState, path: &str) -> Result<Document, AppError> {
    let body = state.fetcher.fetch_feed().await?;
    let mut doc = xml::parse(&body)?;
    feed::rewrite_feed(&mut doc, path);
    Ok(doc)
}

// Route handlers
pub async fn index(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<impl IntoResponse, AppError> {
    let doc = load_feed(&state, uri.path()).await?;
    let items = feed::extract_items(&doc);
    Ok(HtmlTemplate(IndexTemplate::new(uri.path(), false, items)))
}

pub async fn tech(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<impl IntoResponse, AppError> {
    let doc = load_feed(&state, uri.path()).await?;
    let filtered = feed::filter_tech(&doc);
    let items = feed::extract_items(&filtered);
    Ok(HtmlTemplate(IndexTemplate::new(uri.path(), true, items)))
}

pub async fn feed_xml(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<impl IntoResponse, AppError> {
    let doc = load_feed(&state, uri.path()).await?;
    let body = xml::serialize(&doc)?;
    Ok(([(header::CONTENT_TYPE, ATOM_CONTENT_TYPE)], body))
}

pub async fn tech_feed_xml(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<impl IntoResponse, AppError> {
    let doc = load_feed(&state, uri.path()).await?;
    let filtered = feed::filter_tech(&doc);
    let body = xml::serialize(&filtered)?;
    Ok(([(header::CONTENT_TYPE, ATOM_CONTENT_TYPE)], body))
}

/// Assemble the full router: the four feed routes, the static-file fallback,
/// and a cache-control header on every response (the fallback included).
pub fn build_router(state: Arc<AppState>, public_dir: &str) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/tech", get(tech))
        .route("/feed.xml", get(feed_xml))
        .route("/tech-feed.xml", get(tech_feed_xml))
        .fallback_service(ServeDir::new(public_dir))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_VALUE),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
