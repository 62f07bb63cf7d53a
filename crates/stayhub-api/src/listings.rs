// Listing CRUD routes backed by the `services` collection

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stayhub_storage::{Database, ListingDoc, ListingPage, UpdateListing};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::common::{self, InsertResponse, PageResponse, UpdateResponse};

/// App state for listing routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Create listing routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/services", post(create_listing).get(list_listings))
        .route("/services/:id", get(get_listing))
        .route(
            "/services/s/:id",
            get(get_listing_for_update).patch(update_listing),
        )
        .with_state(state)
}

/// A listing as returned by the API. Known fields are typed; anything else
/// the client stored rides along untouched.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_rooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "customerName", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(rename = "roomId", skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListingRequest {
    pub available_rooms: Option<i64>,
    pub email: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// Merge-or-create update of the listing's known fields. Absent fields are
/// not touched on the stored document.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateListingRequest {
    pub available_rooms: Option<i64>,
    pub email: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListListingsQuery {
    /// Field to sort by, applied verbatim (only with sortOrder)
    #[serde(rename = "sortField")]
    pub sort_field: Option<String>,
    /// `desc`/`descending`/`-1` sorts descending, anything else ascending
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
    /// 1-based page number (only with limit)
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<i64>,
}

fn doc_to_listing(row: ListingDoc) -> Listing {
    Listing {
        id: row.id.map(|id| id.to_hex()).unwrap_or_default(),
        available_rooms: row.available_rooms,
        email: row.email,
        date: row.date,
        customer_name: row.customer_name,
        room_id: row.room_id,
        extra: common::document_to_json(row.extra),
    }
}

/// Skip/limit for the page slice. Pagination only applies when both
/// parameters are present; otherwise the full collection is returned.
/// Page 0 is treated as page 1.
fn page_options(page: Option<u64>, limit: Option<i64>) -> (Option<u64>, Option<i64>) {
    match (page, limit) {
        (Some(page), Some(limit)) => {
            let skip = (page.max(1) - 1).saturating_mul(limit.max(0) as u64);
            (Some(skip), Some(limit))
        }
        _ => (None, None),
    }
}

/// Single-field sort document, built only when both parameters are present.
fn sort_document(field: Option<String>, order: Option<String>) -> Option<Document> {
    let (field, order) = field.zip(order)?;
    let direction: i32 = match order.as_str() {
        "desc" | "descending" | "-1" => -1,
        _ => 1,
    };
    let mut sort = Document::new();
    sort.insert(field, direction);
    Some(sort)
}

/// POST /services - Create a listing
#[utoipa::path(
    post,
    path = "/services",
    request_body = CreateListingRequest,
    responses(
        (status = 200, description = "Listing created", body = InsertResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "listings"
)]
pub async fn create_listing(
    State(state): State<AppState>,
    Json(req): Json<CreateListingRequest>,
) -> Result<Json<InsertResponse>, StatusCode> {
    let listing = ListingDoc {
        id: None,
        available_rooms: req.available_rooms,
        email: req.email,
        date: req.date,
        customer_name: req.customer_name,
        room_id: req.room_id,
        extra: common::json_to_document(req.extra)?,
    };

    let result = state.db.insert_listing(listing).await.map_err(|e| {
        tracing::error!("Failed to create listing: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(result.into()))
}

/// GET /services - Paginated, sorted listing query
#[utoipa::path(
    get,
    path = "/services",
    params(ListListingsQuery),
    responses(
        (status = 200, description = "Page of listings", body = PageResponse<Listing>),
        (status = 500, description = "Internal server error")
    ),
    tag = "listings"
)]
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListListingsQuery>,
) -> Result<Json<PageResponse<Listing>>, StatusCode> {
    let (skip, limit) = page_options(query.page, query.limit);
    let page = ListingPage {
        skip,
        limit,
        sort: sort_document(query.sort_field, query.sort_order),
    };

    let (total, rows) = state.db.list_listings(page).await.map_err(|e| {
        tracing::error!("Failed to list listings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(PageResponse {
        total,
        result: rows.into_iter().map(doc_to_listing).collect(),
    }))
}

async fn fetch_listing(state: &AppState, id: &str) -> Result<Option<Listing>, StatusCode> {
    let id = common::parse_object_id(id)?;
    let row = state.db.get_listing(id).await.map_err(|e| {
        tracing::error!("Failed to get listing: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(row.map(doc_to_listing))
}

/// GET /services/:id - Fetch one listing for the details page.
/// A missing document is a 200 with a null body, not a 404.
#[utoipa::path(
    get,
    path = "/services/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing, or null when absent", body = Listing),
        (status = 500, description = "Internal server error")
    ),
    tag = "listings"
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Listing>>, StatusCode> {
    Ok(Json(fetch_listing(&state, &id).await?))
}

/// GET /services/s/:id - Fetch one listing for the update form
#[utoipa::path(
    get,
    path = "/services/s/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing, or null when absent", body = Listing),
        (status = 500, description = "Internal server error")
    ),
    tag = "listings"
)]
pub async fn get_listing_for_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Listing>>, StatusCode> {
    Ok(Json(fetch_listing(&state, &id).await?))
}

/// PATCH /services/s/:id - Merge-or-create update of the known fields
#[utoipa::path(
    patch,
    path = "/services/s/{id}",
    params(("id" = String, Path, description = "Listing id")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Update acknowledged", body = UpdateResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "listings"
)]
pub async fn update_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateListingRequest>,
) -> Result<Json<UpdateResponse>, StatusCode> {
    let id = common::parse_object_id(&id)?;
    let update = UpdateListing {
        available_rooms: req.available_rooms,
        email: req.email,
        date: req.date,
        customer_name: req.customer_name,
        room_id: req.room_id,
    };

    let result = state.db.upsert_listing(id, update).await.map_err(|e| {
        tracing::error!("Failed to update listing: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(result.into()))
}
