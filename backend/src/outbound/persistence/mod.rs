//! Persistence adapters for the domain's driven store ports.
//!
//! The Diesel adapters target PostgreSQL through `diesel-async` with `bb8`
//! pooling; `MemoryStore` offers the same port contracts in memory for tests
//! and local development. Adapters only translate between rows and domain
//! types, business rules stay in the domain layer.

mod diesel_relationship_store;
mod diesel_review_store;
mod diesel_trip_store;
mod diesel_trust_profile_store;
mod memory;
mod models;
mod pool;
mod schema;

pub use diesel_relationship_store::DieselRelationshipStore;
pub use diesel_review_store::DieselReviewStore;
pub use diesel_trip_store::DieselTripStore;
pub use diesel_trust_profile_store::DieselTrustProfileStore;
pub use memory::MemoryStore;
pub use pool::{DbPool, PoolConfig, PoolError};
