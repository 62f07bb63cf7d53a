// Review routes: unrestricted insert and full-collection reads

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stayhub_storage::{Database, ReviewDoc};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::common::{self, InsertResponse};

/// App state for review routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Create review routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/reviews", get(list_reviews))
        .route("/userReview", post(create_user_review).get(list_user_reviews))
        .with_state(state)
}

/// An opaque review document as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

fn doc_to_review(row: ReviewDoc) -> Review {
    Review {
        id: row.id.map(|id| id.to_hex()).unwrap_or_default(),
        extra: common::document_to_json(row.extra),
    }
}

/// GET /reviews - List all reviews
#[utoipa::path(
    get,
    path = "/reviews",
    responses(
        (status = 200, description = "All reviews", body = Vec<Review>),
        (status = 500, description = "Internal server error")
    ),
    tag = "reviews"
)]
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, StatusCode> {
    let rows = state.db.list_reviews().await.map_err(|e| {
        tracing::error!("Failed to list reviews: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(rows.into_iter().map(doc_to_review).collect()))
}

/// POST /userReview - Create a user review
#[utoipa::path(
    post,
    path = "/userReview",
    request_body = Object,
    responses(
        (status = 200, description = "Review created", body = InsertResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "reviews"
)]
pub async fn create_user_review(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<InsertResponse>, StatusCode> {
    let review = ReviewDoc {
        id: None,
        extra: common::json_to_document(body)?,
    };

    let result = state.db.insert_user_review(review).await.map_err(|e| {
        tracing::error!("Failed to create user review: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(result.into()))
}

/// GET /userReview - List all user reviews
#[utoipa::path(
    get,
    path = "/userReview",
    responses(
        (status = 200, description = "All user reviews", body = Vec<Review>),
        (status = 500, description = "Internal server error")
    ),
    tag = "reviews"
)]
pub async fn list_user_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<Review>>, StatusCode> {
    let rows = state.db.list_user_reviews().await.map_err(|e| {
        tracing::error!("Failed to list user reviews: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(rows.into_iter().map(doc_to_review).collect()))
}
