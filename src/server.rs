//! HTTP front end.
//!
//! Exposes a single endpoint:
//!
//! - `GET /?urls=<url>,<url>,...` - analyze the listed articles and return a
//!   JSON array of results in request order
//!
//! Client input errors are answered with `400 Bad Request` and a
//! `{"error": "<reason>"}` body.

use crate::analyzer::AnalysisContext;
use crate::batch::process_batch;
use crate::models::ProcessedArticle;
use crate::utils::split_urls;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

/// Client-side request errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("urls parameter is required")]
    MissingUrls,

    #[error("too many urls in request, should be {limit} or less")]
    TooManyUrls { limit: usize },
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub ctx: Arc<AnalysisContext>,
    pub max_urls: usize,
}

#[derive(Debug, Deserialize)]
pub struct RatingQuery {
    pub urls: Option<String>,
}

/// Validate the raw `urls` parameter and split it into individual URLs.
pub fn parse_urls(raw: Option<&str>, max_urls: usize) -> Result<Vec<String>, ApiError> {
    let urls = raw.map(split_urls).unwrap_or_default();
    if urls.is_empty() {
        return Err(ApiError::MissingUrls);
    }
    if urls.len() > max_urls {
        return Err(ApiError::TooManyUrls { limit: max_urls });
    }
    Ok(urls)
}

#[instrument(level = "info", skip_all)]
async fn rate_articles(
    State(state): State<AppState>,
    Query(query): Query<RatingQuery>,
) -> Result<Json<Vec<ProcessedArticle>>, ApiError> {
    let urls = parse_urls(query.urls.as_deref(), state.max_urls).inspect_err(|e| {
        warn!(error = %e, "Rejected request");
    })?;
    let articles = process_batch(&state.ctx, &urls).await;
    Ok(Json(articles))
}

/// Build the router serving the rating endpoint.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(rate_articles))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve requests until the process is stopped.
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<(), Box<dyn Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, max_urls = state.max_urls, "HTTP server listening");

    axum::serve(listener, create_router(state)).await?;

    info!("HTTP server stopped");
    Ok(())
}
