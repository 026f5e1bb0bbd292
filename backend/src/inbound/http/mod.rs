//! HTTP inbound adapter exposing REST endpoints.

pub mod caller;
pub mod error;
pub mod health;
pub mod meet;
pub mod reviews;
pub mod state;
pub mod trust;

pub use error::ApiResult;
