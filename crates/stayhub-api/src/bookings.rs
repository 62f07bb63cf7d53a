// Booking CRUD routes. The list-by-owner query is the one protected route
// in the system and carries its one authorization decision.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stayhub_storage::{BookingDoc, Database};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::auth::{AuthError, AuthState, FromRef, SessionUser};
use crate::common::{self, DeleteResponse, InsertResponse, UpdateResponse};

/// App state for booking routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth: AuthState,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Create booking routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/:id", get(get_booking).delete(delete_booking))
        .route("/bookings/s/:id", patch(update_booking_date))
        .with_state(state)
}

/// A booking as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub email: Option<String>,
    pub date: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingDateRequest {
    pub date: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBookingsQuery {
    /// Owner email; must equal the authenticated session's email
    pub email: String,
}

fn doc_to_booking(row: BookingDoc) -> Booking {
    Booking {
        id: row.id.map(|id| id.to_hex()).unwrap_or_default(),
        email: row.email,
        date: row.date,
        extra: common::document_to_json(row.extra),
    }
}

/// The one authorization decision beyond authentication: an owner-filtered
/// booking query is only served to the session holding that email. A session
/// without an email claim can never pass.
fn authorize_owner(user: &SessionUser, email: &str) -> Result<(), AuthError> {
    if user.email.as_deref() == Some(email) {
        Ok(())
    } else {
        Err(AuthError::forbidden("forbidden access"))
    }
}

/// POST /bookings - Create a booking
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created", body = InsertResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<InsertResponse>, StatusCode> {
    let booking = BookingDoc {
        id: None,
        email: req.email,
        date: req.date,
        extra: common::json_to_document(req.extra)?,
    };

    let result = state.db.insert_booking(booking).await.map_err(|e| {
        tracing::error!("Failed to create booking: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(result.into()))
}

/// GET /bookings?email= - List bookings owned by the authenticated caller.
/// The ownership check runs before any store access.
#[utoipa::path(
    get,
    path = "/bookings",
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "Bookings owned by the caller", body = Vec<Booking>),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Session does not own the requested email"),
        (status = 500, description = "Internal server error")
    ),
    tag = "bookings"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<Booking>>, Response> {
    authorize_owner(&user, &query.email).map_err(IntoResponse::into_response)?;

    let rows = state
        .db
        .list_bookings_by_email(&query.email)
        .await
        .map_err(store_error)?;

    Ok(Json(rows.into_iter().map(doc_to_booking).collect()))
}

/// Store failures surface as a bare 500, like every other handler. Only the
/// auth decisions on this route carry a structured message body.
fn store_error(e: anyhow::Error) -> Response {
    tracing::error!("Failed to list bookings: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

/// GET /bookings/:id - Fetch one booking.
/// A missing document is a 200 with a null body, not a 404.
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking, or null when absent", body = Booking),
        (status = 500, description = "Internal server error")
    ),
    tag = "bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Booking>>, StatusCode> {
    let id = common::parse_object_id(&id)?;
    let row = state.db.get_booking(id).await.map_err(|e| {
        tracing::error!("Failed to get booking: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(row.map(doc_to_booking)))
}

/// DELETE /bookings/:id - Delete one booking
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Delete acknowledged", body = DeleteResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "bookings"
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, StatusCode> {
    let id = common::parse_object_id(&id)?;
    let result = state.db.delete_booking(id).await.map_err(|e| {
        tracing::error!("Failed to delete booking: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(result.into()))
}

/// PATCH /bookings/s/:id - Merge-or-create update of the booking date
#[utoipa::path(
    patch,
    path = "/bookings/s/{id}",
    params(("id" = String, Path, description = "Booking id")),
    request_body = UpdateBookingDateRequest,
    responses(
        (status = 200, description = "Update acknowledged", body = UpdateResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "bookings"
)]
pub async fn update_booking_date(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookingDateRequest>,
) -> Result<Json<UpdateResponse>, StatusCode> {
    let id = common::parse_object_id(&id)?;
    let result = state
        .db
        .upsert_booking_date(id, &req.date)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update booking date: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(result.into()))
}
