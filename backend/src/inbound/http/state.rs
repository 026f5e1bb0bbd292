//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    RendezvousCommand, RendezvousQuery, ReviewCommand, TrustCommand, TrustQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub rendezvous: Arc<dyn RendezvousCommand>,
    pub rendezvous_query: Arc<dyn RendezvousQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub trust: Arc<dyn TrustCommand>,
    pub trust_query: Arc<dyn TrustQuery>,
}
