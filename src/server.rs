// Product Catalog - HTTP API and pages (axum)
//
// The catalog is built once and shared behind an `Arc`; handlers only read it.

use crate::catalog::Catalog;
use crate::error::QueryError;
use crate::product::Product;
use crate::query::ProductQuery;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub web_dir: PathBuf,
}

impl AppState {
    pub fn new(catalog: Catalog, web_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            web_dir: web_dir.into(),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    InvalidQuery(QueryError),
    MalformedQuery(QueryRejection),
    ProductNotFound(String),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::InvalidQuery(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedQuery(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidQuery(err) => {
                tracing::warn!(error = %err, "rejected product query");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::MalformedQuery(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "malformed query string");
                (StatusCode::BAD_REQUEST, rejection.body_text())
            }
            ApiError::ProductNotFound(id) => (StatusCode::NOT_FOUND, format!("product {} not found", id)),
        };

        (status, Json(ApiResponse::err(message))).into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/products - Filter the catalog by the optional query criteria
async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(query) = query?;
    tracing::debug!(?query, "evaluating product query");

    let matches: Vec<Product> = state.catalog.evaluate(&query)?.into_iter().cloned().collect();

    tracing::info!(
        criteria = %query.to_query_string(),
        matched = matches.len(),
        "product query evaluated"
    );

    Ok(Json(matches))
}

/// GET /api/products/:id - Single product
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::ProductNotFound(id))
}

/// GET /api/categories - Category labels in catalog order
async fn get_categories(State(state): State<AppState>) -> impl IntoResponse {
    let categories: Vec<String> = state.catalog.categories().into_iter().map(String::from).collect();
    Json(ApiResponse::ok(categories))
}

// ============================================================================
// Pages
// ============================================================================

/// GET / - Listing with category tabs
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

/// GET /product/:id - Product detail page (data fetched client-side)
async fn serve_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.catalog.get(&id).is_none() {
        tracing::info!(%id, "detail page requested for unknown product");
        return (StatusCode::NOT_FOUND, Html(include_str!("../web/product.html"))).into_response();
    }
    Html(include_str!("../web/product.html")).into_response()
}

/// GET /contact - Contact page
async fn serve_contact() -> impl IntoResponse {
    Html(include_str!("../web/contact.html"))
}

// ============================================================================
// Router
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .route("/categories", get(get_categories));

    Router::new()
        .route("/", get(serve_index))
        .route("/product/:id", get(serve_product))
        .route("/contact", get(serve_contact))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(&state.web_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Shutdown
// ============================================================================

/// Resolves when `signal` fires. A signal that cannot be installed keeps the
/// server running instead of stopping it.
pub async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(err) = signal.await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Ctrl+C
pub async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::new(Catalog::sample(), "web"))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn ids(value: &Value) -> Vec<String> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_products_without_criteria() {
        let (status, body) = get_json("/api/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
    }

    #[tokio::test]
    async fn test_products_category_and_risk() {
        let (status, body) = get_json("/api/products?category=Tarjetas&riskLevel=Bajo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["5"]);
        assert_eq!(body[0]["interestRate"], 19.5);
        assert_eq!(body[0]["type"], "Tarjeta");
        assert_eq!(body[0]["benefits"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_products_rate_min() {
        let (_, body) = get_json("/api/products?interestRateMin=20").await;
        assert_eq!(ids(&body), vec!["2", "8"]);
    }

    #[tokio::test]
    async fn test_products_no_match_is_empty_array() {
        let (status, body) = get_json("/api/products?id=999").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_products_malformed_rate_is_bad_request() {
        let (status, body) = get_json("/api/products?interestRateMax=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("interestRateMax"));
    }

    #[tokio::test]
    async fn test_repeated_parameter_is_json_bad_request() {
        let (status, body) = get_json("/api/products?id=1&id=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("duplicate field"));
    }

    #[tokio::test]
    async fn test_product_by_id() {
        let (status, body) = get_json("/api/products/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Fondo de Inversión Global");

        let (status, body) = get_json("/api/products/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_categories() {
        let (_, body) = get_json("/api/categories").await;
        assert_eq!(body["data"], serde_json::json!(["Cuentas", "Tarjetas", "Fondos"]));
    }

    #[tokio::test]
    async fn test_detail_page_status() {
        let found = app()
            .oneshot(Request::builder().uri("/product/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(found.status(), StatusCode::OK);

        let missing = app()
            .oneshot(Request::builder().uri("/product/404").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shutdown_waits_when_signal_cannot_be_installed() {
        let failed = async { Err(io::Error::new(io::ErrorKind::Other, "no signal handler")) };
        let waited = tokio::time::timeout(std::time::Duration::from_millis(50), wait_for_shutdown(failed)).await;
        assert!(waited.is_err());

        let fired = tokio::time::timeout(std::time::Duration::from_millis(50), wait_for_shutdown(async { Ok(()) })).await;
        assert!(fired.is_ok());
    }
}
