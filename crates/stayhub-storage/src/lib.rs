// MongoDB storage layer for the hotel backend
//
// This crate wraps the process-wide `mongodb::Client` handle:
// - `Database`: typed collection handles plus one method per query the API issues

pub mod models;
pub mod repositories;

pub use models::*;
pub use repositories::Database;
