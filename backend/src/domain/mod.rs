//! Domain types and services for rendezvous coordination and trust scoring.
//!
//! Purpose: keep the meet-confirmation state machine, the review rules, and
//! the scoring maths as plain types and pure functions, with the services in
//! this module orchestrating them over the driven ports. Nothing in here
//! touches HTTP or the database directly; adapters live under `inbound` and
//! `outbound`.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: the API error response payload.
//! - `Trip`, `Review`, `Relationship`, `TrustProfile`: the persisted
//!   entities.
//! - `RendezvousService`, `ReviewService`, `TrustService`, and
//!   `RelationshipAggregator`: port implementations wired by the server.

pub mod error;
pub mod ports;
pub mod relationship;
pub mod rendezvous;
pub mod review;
pub mod scoring;
pub mod trip;

mod relationship_aggregator;
mod rendezvous_service;
mod review_service;
mod trust_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::relationship_aggregator::RelationshipAggregator;
pub use self::rendezvous_service::RendezvousService;
pub use self::review_service::ReviewService;
pub use self::trust_service::TrustService;
