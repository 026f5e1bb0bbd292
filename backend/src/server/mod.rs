//! Server construction and dependency wiring.

mod config;

pub use config::ServerSettings;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::rendezvous::RendezvousPolicy;
use crate::domain::scoring::ScoringPolicy;
use crate::domain::{
    RelationshipAggregator, RendezvousService, ReviewService, TrustService,
    ports::{RelationshipStore, ReviewStore, TripStore, TrustProfileStore},
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::meet::{cancel_trip, meet_status, press_meet};
use crate::inbound::http::reviews::submit_review;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::trust::{apply_warning, get_trust_profile};
use crate::middleware::Trace;
use crate::outbound::persistence::{
    DbPool, DieselRelationshipStore, DieselReviewStore, DieselTripStore, DieselTrustProfileStore,
    MemoryStore, PoolConfig, PoolError,
};

/// Wire the domain services over the given stores and expose them as HTTP
/// adapter state.
///
/// The trust service backs both queries and the profile refresh triggered by
/// meet confirmations and reviews, so derived scores always come from one
/// scoring policy.
fn wire_state<T, R, L, P>(
    trips: Arc<T>,
    reviews: Arc<R>,
    relationships: Arc<L>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
    policy: RendezvousPolicy,
) -> HttpState
where
    T: TripStore + 'static,
    R: ReviewStore + 'static,
    L: RelationshipStore + 'static,
    P: TrustProfileStore + 'static,
{
    let aggregator = Arc::new(RelationshipAggregator::new(
        Arc::clone(&trips),
        Arc::clone(&reviews),
        Arc::clone(&relationships),
    ));
    let trust = Arc::new(TrustService::new(
        Arc::clone(&reviews),
        Arc::clone(&relationships),
        Arc::clone(&profiles),
        ScoringPolicy::default(),
    ));
    let rendezvous = Arc::new(RendezvousService::new(
        Arc::clone(&trips),
        Arc::clone(&aggregator),
        Arc::clone(&trust),
        Arc::clone(&clock),
        policy,
    ));
    let review_service = Arc::new(ReviewService::new(
        trips,
        reviews,
        aggregator,
        Arc::clone(&trust),
        clock,
    ));

    HttpState {
        rendezvous: rendezvous.clone(),
        rendezvous_query: rendezvous,
        reviews: review_service,
        trust: trust.clone(),
        trust_query: trust,
    }
}

/// Build adapter state backed by in-memory stores.
///
/// Used for local development and tests where no database is configured.
pub fn memory_state(policy: RendezvousPolicy, clock: Arc<dyn Clock>) -> HttpState {
    let store = Arc::new(MemoryStore::new());
    wire_state(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        store,
        clock,
        policy,
    )
}

/// Build adapter state backed by the PostgreSQL stores.
pub fn diesel_state(pool: DbPool, policy: RendezvousPolicy, clock: Arc<dyn Clock>) -> HttpState {
    wire_state(
        Arc::new(DieselTripStore::new(pool.clone())),
        Arc::new(DieselReviewStore::new(pool.clone())),
        Arc::new(DieselRelationshipStore::new(pool.clone())),
        Arc::new(DieselTrustProfileStore::new(pool)),
        clock,
        policy,
    )
}

/// Build adapter state from server settings, connecting to PostgreSQL when a
/// database URL is configured and falling back to in-memory stores otherwise.
///
/// # Errors
///
/// Returns [`PoolError`] when the connection pool cannot be constructed.
pub async fn build_state(settings: &ServerSettings) -> Result<HttpState, PoolError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let policy = settings.rendezvous_policy();

    match &settings.database_url {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            Ok(diesel_state(pool, policy, clock))
        }
        None => Ok(memory_state(policy, clock)),
    }
}

/// Assemble the application with all routes and middleware.
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(press_meet)
        .service(meet_status)
        .service(cancel_trip)
        .service(submit_review)
        .service(get_trust_profile)
        .service(apply_warning);

    let app = App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided state and settings.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    settings: &ServerSettings,
) -> std::io::Result<Server> {
    let bind_addr = settings.bind_addr()?;
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(http_state.clone(), server_health_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
