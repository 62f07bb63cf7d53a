// Shared DTOs and bson conversion helpers for the public API

use axum::http::StatusCode;
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Response wrapper for the paginated listing query.
/// `total` is always the full unfiltered collection count.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageResponse<T> {
    pub total: u64,
    pub result: Vec<T>,
}

/// Acknowledgement of an insert
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsertResponse {
    pub inserted_id: String,
}

impl From<InsertOneResult> for InsertResponse {
    fn from(result: InsertOneResult) -> Self {
        Self {
            inserted_id: bson_id_to_string(&result.inserted_id),
        }
    }
}

/// Acknowledgement of a merge-or-create update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateResponse {
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<String>,
}

impl From<UpdateResult> for UpdateResponse {
    fn from(result: UpdateResult) -> Self {
        Self {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.as_ref().map(bson_id_to_string),
        }
    }
}

/// Acknowledgement of a point delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteResponse {
    fn from(result: DeleteResult) -> Self {
        Self {
            deleted_count: result.deleted_count,
        }
    }
}

fn bson_id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}

/// Convert a path identifier into the store's id format. Malformed values
/// surface as a bare 500; there is no structured error shape for them.
pub fn parse_object_id(id: &str) -> Result<ObjectId, StatusCode> {
    ObjectId::parse_str(id).map_err(|e| {
        tracing::error!("Invalid document id {:?}: {}", id, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Flatten an opaque bson bag into plain JSON for responses.
pub fn document_to_json(extra: Document) -> Map<String, Value> {
    match Bson::Document(extra).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Convert an opaque JSON object into a bson document for inserts.
pub fn json_to_document(map: Map<String, Value>) -> Result<Document, StatusCode> {
    bson::to_document(&Value::Object(map)).map_err(|e| {
        tracing::error!("Failed to convert request body to bson: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bson_id_to_string_prefers_hex() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(
            bson_id_to_string(&Bson::ObjectId(oid)),
            "507f1f77bcf86cd799439011"
        );
        assert_eq!(bson_id_to_string(&Bson::Int64(7)), "7");
    }

    #[test]
    fn test_parse_object_id_rejects_malformed() {
        assert!(parse_object_id("507f1f77bcf86cd799439011").is_ok());
        assert!(parse_object_id("not-an-id").is_err());
    }

    #[test]
    fn test_json_document_round_trip() {
        let map = json!({ "rating": 5, "comment": "great stay" })
            .as_object()
            .unwrap()
            .clone();
        let doc = json_to_document(map.clone()).unwrap();
        assert_eq!(document_to_json(doc), map);
    }
}
