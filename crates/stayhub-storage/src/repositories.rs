// Repository layer for MongoDB operations
//
// One shared client handle acquired at process start; every method is a
// single driver call, mirroring the one-operation-per-route API surface.

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_document, Document};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use mongodb::{Client, Collection};

use crate::models::{BookingDoc, ListingDoc, ListingPage, ReviewDoc, UpdateListing};

const DB_NAME: &str = "hotelDB";

/// Update document for the listing upsert. The server rejects empty update
/// operators, and a patch with every field absent is valid input, so that
/// case falls back to a `$setOnInsert` that still creates the document.
fn listing_update_document(id: ObjectId, update: &UpdateListing) -> Result<Document> {
    let set = to_document(update)?;
    Ok(if set.is_empty() {
        doc! { "$setOnInsert": { "_id": id } }
    } else {
        doc! { "$set": set }
    })
}

#[derive(Clone)]
pub struct Database {
    client: Client,
    listings: Collection<ListingDoc>,
    bookings: Collection<BookingDoc>,
    reviews: Collection<ReviewDoc>,
    user_reviews: Collection<ReviewDoc>,
}

impl Database {
    /// Connect to the store and verify the deployment answers a ping.
    pub async fn connect(uri: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(DB_NAME);
        let database = Self {
            listings: db.collection("services"),
            bookings: db.collection("bookings"),
            reviews: db.collection("reviews"),
            user_reviews: db.collection("userReview"),
            client,
        };
        database
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        tracing::info!("Pinged MongoDB deployment");
        Ok(database)
    }

    /// Release the shared client handle. Called once, on process shutdown.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }

    // ============================================
    // Listings (`services` collection)
    // ============================================

    pub async fn insert_listing(&self, listing: ListingDoc) -> Result<InsertOneResult> {
        Ok(self.listings.insert_one(listing).await?)
    }

    /// Page through the listing collection. `total` is always the full
    /// unfiltered count, regardless of the slice requested.
    pub async fn list_listings(&self, page: ListingPage) -> Result<(u64, Vec<ListingDoc>)> {
        let mut find = self.listings.find(doc! {});
        if let Some(skip) = page.skip {
            find = find.skip(skip);
        }
        if let Some(limit) = page.limit {
            find = find.limit(limit);
        }
        if let Some(sort) = page.sort {
            find = find.sort(sort);
        }
        let result: Vec<ListingDoc> = find.await?.try_collect().await?;
        let total = self.listings.count_documents(doc! {}).await?;
        Ok((total, result))
    }

    pub async fn get_listing(&self, id: ObjectId) -> Result<Option<ListingDoc>> {
        Ok(self.listings.find_one(doc! { "_id": id }).await?)
    }

    /// Merge the provided fields into the listing, creating it when no
    /// document matches the identifier.
    pub async fn upsert_listing(&self, id: ObjectId, update: UpdateListing) -> Result<UpdateResult> {
        let update = listing_update_document(id, &update)?;
        Ok(self
            .listings
            .update_one(doc! { "_id": id }, update)
            .upsert(true)
            .await?)
    }

    // ============================================
    // Bookings
    // ============================================

    pub async fn insert_booking(&self, booking: BookingDoc) -> Result<InsertOneResult> {
        Ok(self.bookings.insert_one(booking).await?)
    }

    pub async fn list_bookings_by_email(&self, email: &str) -> Result<Vec<BookingDoc>> {
        Ok(self
            .bookings
            .find(doc! { "email": email })
            .await?
            .try_collect()
            .await?)
    }

    pub async fn get_booking(&self, id: ObjectId) -> Result<Option<BookingDoc>> {
        Ok(self.bookings.find_one(doc! { "_id": id }).await?)
    }

    pub async fn delete_booking(&self, id: ObjectId) -> Result<DeleteResult> {
        Ok(self.bookings.delete_one(doc! { "_id": id }).await?)
    }

    /// Merge-or-create update of the single `date` field.
    pub async fn upsert_booking_date(&self, id: ObjectId, date: &str) -> Result<UpdateResult> {
        Ok(self
            .bookings
            .update_one(doc! { "_id": id }, doc! { "$set": { "date": date } })
            .upsert(true)
            .await?)
    }

    // ============================================
    // Reviews
    // ============================================

    pub async fn list_reviews(&self) -> Result<Vec<ReviewDoc>> {
        Ok(self.reviews.find(doc! {}).await?.try_collect().await?)
    }

    pub async fn insert_user_review(&self, review: ReviewDoc) -> Result<InsertOneResult> {
        Ok(self.user_reviews.insert_one(review).await?)
    }

    pub async fn list_user_reviews(&self) -> Result<Vec<ReviewDoc>> {
        Ok(self.user_reviews.find(doc! {}).await?.try_collect().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_update_sets_present_fields_only() {
        let id = ObjectId::new();
        let update = UpdateListing {
            available_rooms: Some(4),
            email: None,
            date: Some("2026-09-01".into()),
            customer_name: None,
            room_id: None,
        };
        let doc = listing_update_document(id, &update).unwrap();
        assert_eq!(
            doc,
            doc! { "$set": { "available_rooms": 4_i64, "date": "2026-09-01" } }
        );
    }

    #[test]
    fn test_listing_update_with_no_fields_still_upserts() {
        let id = ObjectId::new();
        let update = UpdateListing {
            available_rooms: None,
            email: None,
            date: None,
            customer_name: None,
            room_id: None,
        };
        // an empty $set would be rejected by the server
        let doc = listing_update_document(id, &update).unwrap();
        assert_eq!(doc, doc! { "$setOnInsert": { "_id": id } });
    }
}
