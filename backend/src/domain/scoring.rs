//! Trust scoring: pure functions deriving a user's headline reputation from
//! their review history and relationship set.
//!
//! Two signals are produced. **Aura** reads the reviews a user has received
//! through a Bayesian-smoothed positive rate, so newcomers start at a mildly
//! positive default rather than an undefined score. **Constellation** reads
//! the breadth and depth of the user's confirmed travel network, with each
//! term saturating independently.
//!
//! All arithmetic here is local and deterministic; atomicity of the
//! surrounding read-recompute-write cycle is the store adapters' concern.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::relationship::Relationship;

/// Directional reading of a user's aura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuraTone {
    Warm,
    Cool,
    Neutral,
}

/// Error returned when parsing an aura tone from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseAuraToneError;

impl fmt::Display for AuraTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warm => f.write_str("warm"),
            Self::Cool => f.write_str("cool"),
            Self::Neutral => f.write_str("neutral"),
        }
    }
}

impl fmt::Display for ParseAuraToneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid aura tone")
    }
}

impl std::error::Error for ParseAuraToneError {}

impl FromStr for AuraTone {
    type Err = ParseAuraToneError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "warm" => Ok(Self::Warm),
            "cool" => Ok(Self::Cool),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ParseAuraToneError),
        }
    }
}

/// Counts of reviews a user has received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewTally {
    pub total: u64,
    pub positive: u64,
}

/// Per-user reputation cache, fully recomputed on every trigger except the
/// warning penalty.
#[derive(Debug, Clone, PartialEq)]
pub struct TrustProfile {
    pub user_id: Uuid,
    pub aura_tone: AuraTone,
    /// How strongly to emphasise the tone, in `[0.25, 1]`.
    pub aura_intensity: f64,
    /// Scalar reputation in `[5, 95]` (a warning penalty may push it lower).
    pub aura_score: f64,
    /// Network-shape reputation in `[0, 100]`.
    pub constellation_score: f64,
}

/// Policy constants for the scoring functions. These are product knobs, not
/// protocol invariants, so they are grouped here rather than scattered as
/// magic numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPolicy {
    /// Prior strength for the Bayesian-smoothed positive rate.
    pub prior_strength: f64,
    /// Prior mean: the benefit-of-the-doubt rate for unreviewed users.
    pub prior_mean: f64,
    /// Weighted sentiment above which the tone reads warm.
    pub warm_threshold: f64,
    /// Weighted sentiment below which the tone reads cool.
    pub cool_threshold: f64,
    /// Aura never presented below this.
    pub aura_floor: f64,
    /// Aura never presented above this.
    pub aura_ceiling: f64,
    /// Constellation points available from distinct partners.
    pub partner_weight: f64,
    /// Partner count at which the partner term is ~63% saturated.
    pub partner_scale: f64,
    /// Constellation points available from total confirmed trips.
    pub trip_weight: f64,
    /// Trip count at which the trip term is ~63% saturated.
    pub trip_scale: f64,
    /// Constellation points available from average review positivity.
    pub positivity_weight: f64,
    /// Flat aura deduction applied per moderation warning.
    pub warning_aura_penalty: f64,
    /// Cap on the constellation deduction a single warning can apply.
    pub warning_constellation_cap: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            prior_strength: 4.0,
            prior_mean: 0.65,
            warm_threshold: 0.35,
            cool_threshold: -0.25,
            aura_floor: 5.0,
            aura_ceiling: 95.0,
            partner_weight: 50.0,
            partner_scale: 6.0,
            trip_weight: 35.0,
            trip_scale: 10.0,
            positivity_weight: 15.0,
            warning_aura_penalty: 8.0,
            warning_constellation_cap: 15.0,
        }
    }
}

/// Tone, intensity, and score derived from received reviews.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuraReading {
    pub tone: AuraTone,
    pub intensity: f64,
    pub score: f64,
}

/// Derive the aura reading from a review tally.
///
/// The positive rate is smoothed towards the prior mean, mapped onto
/// `[-1, 1]`, and rescaled onto the clamped score range so a score is always
/// informative of direction but never presented as absolute certainty.
pub fn aura_reading(policy: &ScoringPolicy, tally: ReviewTally) -> AuraReading {
    let total = tally.total as f64;
    let positive = tally.positive as f64;
    let smoothed =
        (positive + policy.prior_strength * policy.prior_mean) / (total + policy.prior_strength);
    let weighted = 2.0 * smoothed - 1.0;

    let tone = if weighted > policy.warm_threshold {
        AuraTone::Warm
    } else if weighted < policy.cool_threshold {
        AuraTone::Cool
    } else {
        AuraTone::Neutral
    };

    let score = (((weighted + 1.0) / 2.0) * 100.0).clamp(policy.aura_floor, policy.aura_ceiling);
    let intensity = (weighted.abs() * 0.6 + 0.3).clamp(0.25, 1.0);

    AuraReading {
        tone,
        intensity,
        score,
    }
}

/// Derive the constellation score from a user's relationship set.
///
/// Unique partners contribute up to `partner_weight` points, total confirmed
/// trips up to `trip_weight`, and average positivity up to
/// `positivity_weight` as a finishing bonus. Relationships without any review
/// signal yet are excluded from the positivity average rather than read as
/// "bad".
pub fn constellation_score(policy: &ScoringPolicy, relationships: &[Relationship]) -> f64 {
    let active: Vec<&Relationship> = relationships
        .iter()
        .filter(|rel| rel.trips_count > 0)
        .collect();

    let partners = active.len() as f64;
    let trips: f64 = active.iter().map(|rel| f64::from(rel.trips_count)).sum();

    let rated: Vec<f64> = active
        .iter()
        .filter(|rel| rel.pos_ratio > 0.0)
        .map(|rel| rel.pos_ratio)
        .collect();
    let positivity = if rated.is_empty() {
        0.0
    } else {
        rated.iter().sum::<f64>() / rated.len() as f64
    };

    let score = policy.partner_weight * (1.0 - (-partners / policy.partner_scale).exp())
        + policy.trip_weight * (1.0 - (-trips / policy.trip_scale).exp())
        + policy.positivity_weight * positivity;

    score.min(100.0)
}

/// Recompute a user's whole trust profile from current history.
pub fn recompute_profile(
    policy: &ScoringPolicy,
    user_id: Uuid,
    tally: ReviewTally,
    relationships: &[Relationship],
) -> TrustProfile {
    let aura = aura_reading(policy, tally);
    TrustProfile {
        user_id,
        aura_tone: aura.tone,
        aura_intensity: aura.intensity,
        aura_score: aura.score,
        constellation_score: constellation_score(policy, relationships),
    }
}

/// The direct, bounded deduction a moderation warning applies to a stored
/// profile ahead of the next full recompute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarningPenalty {
    pub aura: f64,
    pub constellation: f64,
}

/// Work out the penalty a warning of the given severity applies.
pub fn warning_penalty(policy: &ScoringPolicy, severity: u32) -> WarningPenalty {
    WarningPenalty {
        aura: policy.warning_aura_penalty,
        constellation: f64::from(severity).min(policy.warning_constellation_cap),
    }
}
