// Integration tests for the Stayhub API
// Run with: cargo test --test integration_test -- --ignored
// Requires a running server (default port 5000) and a reachable database.

use serde_json::{json, Value};

const API_BASE_URL: &str = "http://localhost:5000";

/// Unique 24-hex-char identifier for upsert round-trips.
fn fresh_object_id() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{nanos:024x}")
}

#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_session_and_booking_ownership() {
    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client");

    // Step 1: liveness
    let response = client
        .get(API_BASE_URL)
        .send()
        .await
        .expect("server not reachable");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "hotel server is running");

    // Step 2: the protected route without a session is unauthorized
    let response = client
        .get(format!("{API_BASE_URL}/bookings?email=a@x.com"))
        .send()
        .await
        .expect("Failed to list bookings");
    assert_eq!(response.status(), 401);

    // Step 3: issue a session for a@x.com
    let response = client
        .post(format!("{API_BASE_URL}/jwt"))
        .json(&json!({ "email": "a@x.com" }))
        .send()
        .await
        .expect("Failed to issue session");
    assert_eq!(response.status(), 200);

    // Step 4: create a booking owned by a@x.com
    let response = client
        .post(format!("{API_BASE_URL}/bookings"))
        .json(&json!({
            "email": "a@x.com",
            "date": "2026-01-01",
            "room": "alpine suite"
        }))
        .send()
        .await
        .expect("Failed to create booking");
    assert_eq!(response.status(), 200);
    let created: Value = response.json().await.expect("Failed to parse insert ack");
    let booking_id = created["inserted_id"]
        .as_str()
        .expect("inserted_id")
        .to_string();

    // Step 5: the owner email matching the session is served, filtered
    let response = client
        .get(format!("{API_BASE_URL}/bookings?email=a@x.com"))
        .send()
        .await
        .expect("Failed to list bookings");
    assert_eq!(response.status(), 200);
    let bookings: Vec<Value> = response.json().await.expect("Failed to parse bookings");
    assert!(bookings.iter().all(|b| b["email"] == "a@x.com"));
    assert!(bookings.iter().any(|b| b["_id"] == booking_id.as_str()));

    // Step 6: the same session asking for another owner is forbidden
    let response = client
        .get(format!("{API_BASE_URL}/bookings?email=b@x.com"))
        .send()
        .await
        .expect("Failed to list bookings");
    assert_eq!(response.status(), 403);

    // Step 7: unprotected point lookup
    let response = client
        .get(format!("{API_BASE_URL}/bookings/{booking_id}"))
        .send()
        .await
        .expect("Failed to get booking");
    assert_eq!(response.status(), 200);
    let booking: Value = response.json().await.expect("Failed to parse booking");
    assert_eq!(booking["email"], "a@x.com");
    assert_eq!(booking["room"], "alpine suite");

    // Step 8: merge-update the date
    let response = client
        .patch(format!("{API_BASE_URL}/bookings/s/{booking_id}"))
        .json(&json!({ "date": "2026-02-01" }))
        .send()
        .await
        .expect("Failed to update booking date");
    assert_eq!(response.status(), 200);
    let update: Value = response.json().await.expect("Failed to parse update ack");
    assert_eq!(update["modified_count"], 1);

    // Step 9: delete the booking
    let response = client
        .delete(format!("{API_BASE_URL}/bookings/{booking_id}"))
        .send()
        .await
        .expect("Failed to delete booking");
    assert_eq!(response.status(), 200);
    let deleted: Value = response.json().await.expect("Failed to parse delete ack");
    assert_eq!(deleted["deleted_count"], 1);

    // Step 10: logout, then the protected route behaves as if never logged in
    let response = client
        .post(format!("{API_BASE_URL}/logout"))
        .send()
        .await
        .expect("Failed to logout");
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{API_BASE_URL}/bookings?email=a@x.com"))
        .send()
        .await
        .expect("Failed to list bookings");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_listing_pagination_and_upsert() {
    let client = reqwest::Client::new();

    // Seed a few listings
    for n in 0..3 {
        let response = client
            .post(format!("{API_BASE_URL}/services"))
            .json(&json!({
                "available_rooms": 2 + n,
                "roomId": format!("room-{n}"),
                "date": "2026-01-01"
            }))
            .send()
            .await
            .expect("Failed to create listing");
        assert_eq!(response.status(), 200);
    }

    // Paginated query: at most `limit` rows, `total` is the unfiltered count
    let response = client
        .get(format!(
            "{API_BASE_URL}/services?page=1&limit=2&sortField=available_rooms&sortOrder=desc"
        ))
        .send()
        .await
        .expect("Failed to list listings");
    assert_eq!(response.status(), 200);
    let page: Value = response.json().await.expect("Failed to parse page");
    let result = page["result"].as_array().expect("result array");
    assert!(result.len() <= 2);
    assert!(page["total"].as_u64().expect("total") >= 3);

    // Without page/limit the whole collection comes back
    let response = client
        .get(format!("{API_BASE_URL}/services"))
        .send()
        .await
        .expect("Failed to list listings");
    let all: Value = response.json().await.expect("Failed to parse page");
    assert_eq!(
        all["total"].as_u64().expect("total") as usize,
        all["result"].as_array().expect("result array").len()
    );

    // Upsert on a fresh identifier creates the document...
    let id = fresh_object_id();
    let response = client
        .patch(format!("{API_BASE_URL}/services/s/{id}"))
        .json(&json!({
            "available_rooms": 1,
            "email": "owner@x.com",
            "date": "2026-03-01",
            "customerName": "Ada",
            "roomId": "room-9"
        }))
        .send()
        .await
        .expect("Failed to upsert listing");
    assert_eq!(response.status(), 200);
    let update: Value = response.json().await.expect("Failed to parse update ack");
    assert_eq!(update["upserted_id"], id.as_str());

    // ...and the round-trip fetch returns the merged fields
    let response = client
        .get(format!("{API_BASE_URL}/services/s/{id}"))
        .send()
        .await
        .expect("Failed to get listing");
    assert_eq!(response.status(), 200);
    let listing: Value = response.json().await.expect("Failed to parse listing");
    assert_eq!(listing["customerName"], "Ada");
    assert_eq!(listing["available_rooms"], 1);
    assert_eq!(listing["email"], "owner@x.com");

    // A point lookup on a missing identifier is an empty 200, not a 404
    let response = client
        .get(format!("{API_BASE_URL}/services/ffffffffffffffffffffffff"))
        .send()
        .await
        .expect("Failed to get listing");
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), Value::Null);
}

#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_user_review_round_trip() {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{API_BASE_URL}/userReview"))
        .json(&json!({ "rating": 5, "comment": "great stay" }))
        .send()
        .await
        .expect("Failed to create user review");
    assert_eq!(response.status(), 200);
    let created: Value = response.json().await.expect("Failed to parse insert ack");
    let review_id = created["inserted_id"].as_str().expect("inserted_id");

    let response = client
        .get(format!("{API_BASE_URL}/userReview"))
        .send()
        .await
        .expect("Failed to list user reviews");
    assert_eq!(response.status(), 200);
    let reviews: Vec<Value> = response.json().await.expect("Failed to parse reviews");
    assert!(reviews.iter().any(|r| r["_id"] == review_id));
}
