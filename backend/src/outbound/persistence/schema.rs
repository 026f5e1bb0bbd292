//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation. Regenerate with
//! `diesel print-schema` whenever a migration changes the shape of a table.

diesel::table! {
    /// Trips between two users, including the rendezvous countdown fields.
    ///
    /// `countdown_started_by` and `countdown_expires_at` are set and cleared
    /// together; both are null unless the trip is `ready` with a recorded
    /// press.
    trips (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// First participant (storage order, not significance).
        user_a -> Uuid,
        /// Second participant.
        user_b -> Uuid,
        /// Planned start date.
        start_date -> Date,
        /// Planned end date.
        end_date -> Date,
        /// Lifecycle status: pending, ready, met, or cancelled.
        status -> Varchar,
        /// Participant who pressed first, while a countdown is recorded.
        countdown_started_by -> Nullable<Uuid>,
        /// Instant the recorded countdown lapses.
        countdown_expires_at -> Nullable<Timestamptz>,
        /// Instant the meeting was confirmed, for met trips.
        met_at -> Nullable<Timestamptz>,
        /// How the meeting was confirmed: none or button.
        meet_method -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews filed after confirmed meetings.
    ///
    /// A unique index on `(reviewer_id, target_id, trip_id)` backs the
    /// overwrite-on-resubmit upsert.
    reviews (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// User who filed the review.
        reviewer_id -> Uuid,
        /// User the review is about.
        target_id -> Uuid,
        /// Trip the review refers to.
        trip_id -> Uuid,
        /// Sentiment: positive, neutral, or negative.
        emotion -> Varchar,
        /// Up to three short descriptive tags.
        tags -> Array<Text>,
        /// Optional free-text comment.
        comment -> Nullable<Text>,
        /// When the review was (last) submitted.
        submitted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed per-pair relationship summaries, one row per direction.
    relationships (user_id, partner_id) {
        /// User the summary belongs to.
        user_id -> Uuid,
        /// The other party.
        partner_id -> Uuid,
        /// Number of met trips between the pair.
        trips_count -> Int4,
        /// End date of the most recent met trip, if any.
        last_trip_date -> Nullable<Date>,
        /// Share of positive reviews by the partner about the user.
        pos_ratio -> Float8,
        /// Derived closeness in [0, 1].
        relation_strength -> Float8,
        /// Last recompute timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cached per-user trust profiles.
    trust_profiles (user_id) {
        /// User the profile belongs to.
        user_id -> Uuid,
        /// Aura tone: warm, neutral, or cold.
        aura_tone -> Varchar,
        /// Aura display intensity in [0.25, 1].
        aura_intensity -> Float8,
        /// Aura score in [5, 95].
        aura_score -> Float8,
        /// Constellation score in [0, 100].
        constellation_score -> Float8,
        /// Last recompute or penalty timestamp.
        updated_at -> Timestamptz,
    }
}
