use crate::domain::app::App;
use crate::domain::list::{CardListRequest, CardListResponse, ListError};
use crate::domain::scan::{ScanError, ScanResponse};
use crate::ports::outbound::card_store::CardStore;
use crate::ports::outbound::scanner::CardScanner;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

pub const MAX_SCAN_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<ListError> for ApiError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::InvalidParameter(message) => ApiError::BadRequest(message),
            ListError::Store(why) => ApiError::Internal(why.to_string()),
        }
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => {
                log::warn!("request failed - {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn router<CS, SC>(app: Arc<App<CS, SC>>) -> Router
where
    CS: CardStore + Send + Sync + 'static,
    SC: CardScanner + Send + Sync + 'static,
{
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/api/cards", get(list_cards::<CS, SC>))
        .route(
            "/api/cards/scan",
            post(scan_card::<CS, SC>).layer(DefaultBodyLimit::max(MAX_SCAN_UPLOAD_BYTES)),
        )
        .with_state(app)
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_cards<CS, SC>(
    State(app): State<Arc<App<CS, SC>>>,
    Query(request): Query<CardListRequest>,
) -> Result<Json<CardListResponse>, ApiError>
where
    CS: CardStore + Send + Sync + 'static,
    SC: CardScanner + Send + Sync + 'static,
{
    Ok(Json(app.list_cards(&request).await?))
}

async fn scan_card<CS, SC>(
    State(app): State<Arc<App<CS, SC>>>,
    mut multipart: Multipart,
) -> Result<Json<ScanResponse>, ApiError>
where
    CS: CardStore + Send + Sync + 'static,
    SC: CardScanner + Send + Sync + 'static,
{
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|why| ApiError::BadRequest(format!("invalid multipart body: {why}")))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|why| ApiError::BadRequest(format!("could not read file field: {why}")))?;
            image = Some(data.to_vec());
            break;
        }
    }

    let image = image.ok_or_else(|| ApiError::BadRequest(String::from("missing file field")))?;
    let items = app.scan_card(image).await?;

    Ok(Json(ScanResponse { items }))
}
