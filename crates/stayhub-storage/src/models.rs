// Document models for the hotelDB collections
// Decision: keep only the fields this system reads back as typed members;
// everything else the client stored rides along in a flattened bson bag

use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// A room listing in the `services` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_rooms: Option<i64>,
    /// Owner email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "customerName", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(rename = "roomId", skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    /// Fields this system does not interpret
    #[serde(flatten)]
    pub extra: Document,
}

/// Partial update applied to a listing via `$set` with upsert semantics.
/// Absent fields are left untouched on the stored document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateListing {
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
}

/// A booking in the `bookings` collection. `email` is the ownership
/// discriminator checked by the protected list query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: Document,
}

/// An opaque review document (`reviews` and `userReview` collections are
/// insert/read-only and carry no fields this system interprets).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub extra: Document,
}

/// Skip/limit/sort options for the listing collection query.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub skip: Option<u64>,
    pub limit: Option<i64>,
    pub sort: Option<Document>,
}
