//! REST API over the stored hotels.

use crate::config::ApiConfig;
use crate::metrics_defs::REQUEST_DURATION;
use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use ingest::hotel::Hotel;
use ingest::repository::{HotelRepository, StoreError};
use serde::Deserialize;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use shared::histogram;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Instant;
use tower_http::cors::{Any, CorsLayer};

#[derive(thiserror::Error, Debug)]
pub enum CatalogApiError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Response envelope shared by every endpoint.
#[derive(Debug, PartialEq)]
pub enum ApiResponse<T> {
    Success { data: T, count: Option<usize> },
    Error { error: String },
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ApiResponse::Success { data, count } => {
                let len = if count.is_some() { 3 } else { 2 };
                let mut state = serializer.serialize_struct("ApiResponse", len)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                if let Some(count) = count {
                    state.serialize_field("count", count)?;
                }
                state.end()
            }
            ApiResponse::Error { error } => {
                let mut state = serializer.serialize_struct("ApiResponse", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = match self {
            ApiResponse::Success { .. } => StatusCode::OK,
            ApiResponse::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

impl ApiResponse<Vec<Hotel>> {
    fn hotels(hotels: Vec<Hotel>) -> Self {
        let count = hotels.len();
        ApiResponse::Success {
            data: hotels,
            count: Some(count),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Hotel not found: {0}")]
    HotelNotFound(String),

    #[error("Invalid destination ID")]
    InvalidDestinationId,

    #[error("Hotel IDs parameter is required")]
    MissingHotelIds,

    #[error("No valid hotel IDs provided")]
    NoValidHotelIds,

    #[error("Maximum {0} hotel IDs allowed per request")]
    TooManyHotelIds(usize),

    #[error("Failed to get hotels")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::HotelNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidDestinationId
            | ApiError::MissingHotelIds
            | ApiError::NoValidHotelIds
            | ApiError::TooManyHotelIds(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(ref e) => {
                tracing::error!(error = %e, "Hotel store lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ApiResponse::<()>::Error {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[derive(Clone)]
pub struct ApiState {
    repository: Arc<dyn HotelRepository>,
    max_batch_ids: usize,
}

impl ApiState {
    pub fn new(repository: Arc<dyn HotelRepository>, max_batch_ids: usize) -> Self {
        Self {
            repository,
            max_batch_ids,
        }
    }
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health))
        .route("/hotels/range", get(get_hotels_by_ids))
        .route("/hotels/destination/{id}", get(get_hotels_by_destination))
        .route("/hotels/{id}", get(get_hotel));

    Router::new()
        .nest("/api/v1", api)
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}

pub async fn serve<F>(
    config: &ApiConfig,
    repository: Arc<dyn HotelRepository>,
    shutdown: F,
) -> Result<(), CatalogApiError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(ApiState::new(repository, config.max_batch_ids));
    let addr = format!("{}:{}", config.listener.host, config.listener.port);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Serving hotel API");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn log_request(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status();
    histogram!(
        REQUEST_DURATION,
        "method" => method.to_string(),
        "status" => status.as_u16().to_string()
    )
    .record(elapsed.as_secs_f64());
    tracing::info!(%method, %uri, status = status.as_u16(), ?elapsed, "Handled request");

    response
}

async fn health() -> ApiResponse<&'static str> {
    ApiResponse::Success {
        data: "Hotel service is running",
        count: None,
    }
}

async fn get_hotel(
    State(state): State<ApiState>,
    Path(hotel_id): Path<String>,
) -> Result<ApiResponse<Hotel>, ApiError> {
    let hotel_id = hotel_id.trim();

    match state.repository.get_hotel(hotel_id).await? {
        Some(hotel) => Ok(ApiResponse::Success {
            data: hotel,
            count: Some(1),
        }),
        None => Err(ApiError::HotelNotFound(hotel_id.to_string())),
    }
}

async fn get_hotels_by_destination(
    State(state): State<ApiState>,
    Path(destination_id): Path<String>,
) -> Result<ApiResponse<Vec<Hotel>>, ApiError> {
    let destination_id: i64 = destination_id
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidDestinationId)?;

    let hotels = state.repository.get_destination(destination_id).await?;
    Ok(ApiResponse::hotels(hotels))
}

#[derive(Deserialize, Debug)]
struct RangeParams {
    ids: Option<String>,
}

/// Splits a comma separated id list, dropping blank entries.
fn parse_hotel_ids(ids: Option<&str>, max_ids: usize) -> Result<Vec<String>, ApiError> {
    let ids = match ids {
        Some(ids) if !ids.is_empty() => ids,
        _ => return Err(ApiError::MissingHotelIds),
    };

    let hotel_ids: Vec<String> = ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();

    if hotel_ids.is_empty() {
        return Err(ApiError::NoValidHotelIds);
    }
    if hotel_ids.len() > max_ids {
        return Err(ApiError::TooManyHotelIds(max_ids));
    }

    Ok(hotel_ids)
}

async fn get_hotels_by_ids(
    State(state): State<ApiState>,
    Query(params): Query<RangeParams>,
) -> Result<ApiResponse<Vec<Hotel>>, ApiError> {
    let hotel_ids = parse_hotel_ids(params.ids.as_deref(), state.max_batch_ids)?;
    let hotels = state.repository.get_hotels(&hotel_ids).await?;
    Ok(ApiResponse::hotels(hotels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::time::Duration;
    use tower::ServiceExt;

    fn hotel(hotel_id: &str, destination_id: i64) -> Hotel {
        Hotel {
            hotel_id: hotel_id.into(),
            destination_id,
            ..Default::default()
        }
    }

    async fn test_router() -> Router {
        let store = MemoryStore::new(Duration::from_secs(60));
        store.put_hotel("iJhz", &hotel("iJhz", 5432)).await.unwrap();
        store.put_hotel("SjyX", &hotel("SjyX", 5432)).await.unwrap();
        store
            .put_destination(5432, &[hotel("iJhz", 5432), hotel("SjyX", 5432)])
            .await
            .unwrap();

        router(ApiState::new(Arc::new(store), 3))
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(test_router().await, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "data": "Hotel service is running"}));
    }

    #[tokio::test]
    async fn test_get_hotel() {
        let (status, body) = get(test_router().await, "/api/v1/hotels/iJhz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"]["hotel_id"], "iJhz");
        assert_eq!(body["data"]["destination_id"], 5432);
    }

    #[tokio::test]
    async fn test_get_hotel_not_found() {
        let (status, body) = get(test_router().await, "/api/v1/hotels/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "Hotel not found: nope"}));
    }

    #[tokio::test]
    async fn test_get_destination() {
        let (status, body) = get(test_router().await, "/api/v1/hotels/destination/5432").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][1]["hotel_id"], "SjyX");

        let (status, body) = get(test_router().await, "/api/v1/hotels/destination/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["count"], 0);

        let (status, body) = get(test_router().await, "/api/v1/hotels/destination/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid destination ID");
    }

    #[tokio::test]
    async fn test_get_range() {
        let (status, body) =
            get(test_router().await, "/api/v1/hotels/range?ids=SjyX,%20nope%20,,iJhz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["hotel_id"], "SjyX");
        assert_eq!(body["data"][1]["hotel_id"], "iJhz");
    }

    #[tokio::test]
    async fn test_get_range_errors() {
        let (status, body) = get(test_router().await, "/api/v1/hotels/range").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Hotel IDs parameter is required");

        let (status, body) = get(test_router().await, "/api/v1/hotels/range?ids=,%20,").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No valid hotel IDs provided");

        let (status, body) = get(test_router().await, "/api/v1/hotels/range?ids=a,b,c,d").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Maximum 3 hotel IDs allowed per request");
    }

    #[test]
    fn test_parse_hotel_ids() {
        assert_eq!(
            parse_hotel_ids(Some(" a , b,,c "), 50).unwrap(),
            vec!["a", "b", "c"]
        );
        assert!(matches!(
            parse_hotel_ids(None, 50),
            Err(ApiError::MissingHotelIds)
        ));

        let fifty: Vec<String> = (0..50).map(|i| format!("h{i}")).collect();
        assert_eq!(parse_hotel_ids(Some(&fifty.join(",")), 50).unwrap().len(), 50);

        let fifty_one: Vec<String> = (0..51).map(|i| format!("h{i}")).collect();
        assert!(matches!(
            parse_hotel_ids(Some(&fifty_one.join(",")), 50),
            Err(ApiError::TooManyHotelIds(50))
        ));
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let response = test_router()
            .await
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("origin", "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
