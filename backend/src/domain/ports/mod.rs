//! Domain ports: driven-side store traits and driving-side operation traits.
//!
//! Driven ports (`*Store`) abstract the persistence adapters in
//! `crate::outbound::persistence`. Driving ports are the operation surface
//! the inbound adapters call. Mock implementations are generated with
//! `mockall` for unit tests.

mod refresh;
mod relationship_store;
mod rendezvous;
mod review_store;
mod reviews;
mod trip_store;
mod trust;
mod trust_profile_store;

pub use self::refresh::{ProfileRefresh, RelationshipRefresh};
pub use self::relationship_store::{RelationshipStore, RelationshipStoreError};
pub use self::rendezvous::{
    CancelTripRequest, MeetStatusRequest, PressMeetRequest, PressOutcome, RendezvousCommand,
    RendezvousQuery,
};
pub use self::review_store::{ReviewStore, ReviewStoreError};
pub use self::reviews::{ReviewCommand, SubmitReviewRequest};
pub use self::trip_store::{TransitionOutcome, TripStore, TripStoreError, TripTransition};
pub use self::trust::{ApplyWarningRequest, TrustCommand, TrustQuery};
pub use self::trust_profile_store::{TrustProfileStore, TrustProfileStoreError};

#[cfg(test)]
pub use self::refresh::{MockProfileRefresh, MockRelationshipRefresh};
#[cfg(test)]
pub use self::relationship_store::MockRelationshipStore;
#[cfg(test)]
pub use self::rendezvous::{MockRendezvousCommand, MockRendezvousQuery};
#[cfg(test)]
pub use self::review_store::MockReviewStore;
#[cfg(test)]
pub use self::reviews::MockReviewCommand;
#[cfg(test)]
pub use self::trip_store::MockTripStore;
#[cfg(test)]
pub use self::trust::{MockTrustCommand, MockTrustQuery};
#[cfg(test)]
pub use self::trust_profile_store::MockTrustProfileStore;
