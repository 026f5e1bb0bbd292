//! Review entity: a one-directional rating filed after a confirmed meeting.
//!
//! At most one review exists per `(reviewer, target, trip)` triple; repeat
//! submissions overwrite in place at the store layer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of tags per review.
pub const MAX_TAGS: usize = 3;
/// Maximum length of a single tag, in characters.
pub const MAX_TAG_CHARS: usize = 24;
/// Maximum comment length, in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Overall sentiment of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Positive,
    Neutral,
    Negative,
}

/// Error returned when parsing an emotion from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseEmotionError;

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => f.write_str("positive"),
            Self::Neutral => f.write_str("neutral"),
            Self::Negative => f.write_str("negative"),
        }
    }
}

impl fmt::Display for ParseEmotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid emotion")
    }
}

impl std::error::Error for ParseEmotionError {}

impl FromStr for Emotion {
    type Err = ParseEmotionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            _ => Err(ParseEmotionError),
        }
    }
}

/// Input payload for [`Review::new`].
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub reviewer_id: Uuid,
    pub target_id: Uuid,
    pub trip_id: Uuid,
    pub emotion: Emotion,
    pub tags: Vec<String>,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Validation errors emitted by the [`Review`] constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("reviewer and target must be distinct users")]
    SelfReview,
    #[error("a review carries at most {MAX_TAGS} tags (got {count})")]
    TooManyTags { count: usize },
    #[error("tags must not be empty")]
    EmptyTag,
    #[error("tags are capped at {MAX_TAG_CHARS} characters (got {chars})")]
    TagTooLong { chars: usize },
    #[error("comments are capped at {MAX_COMMENT_CHARS} characters (got {chars})")]
    CommentTooLong { chars: usize },
}

/// A validated review. Tags are stored trimmed; a blank comment is treated as
/// absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    reviewer_id: Uuid,
    target_id: Uuid,
    trip_id: Uuid,
    emotion: Emotion,
    tags: Vec<String>,
    comment: Option<String>,
    submitted_at: DateTime<Utc>,
}

impl Review {
    /// Creates a validated review.
    pub fn new(draft: ReviewDraft) -> Result<Self, ReviewValidationError> {
        Self::try_from(draft)
    }

    /// Returns the user who filed the review.
    pub fn reviewer_id(&self) -> Uuid {
        self.reviewer_id
    }

    /// Returns the user the review is about.
    pub fn target_id(&self) -> Uuid {
        self.target_id
    }

    /// Returns the trip the review refers to.
    pub fn trip_id(&self) -> Uuid {
        self.trip_id
    }

    /// Returns the review sentiment.
    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    /// Returns the normalised tag list.
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    /// Returns the optional free-text comment.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns when the review was (last) submitted.
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

impl TryFrom<ReviewDraft> for Review {
    type Error = ReviewValidationError;

    fn try_from(draft: ReviewDraft) -> Result<Self, Self::Error> {
        let ReviewDraft {
            reviewer_id,
            target_id,
            trip_id,
            emotion,
            tags,
            comment,
            submitted_at,
        } = draft;

        if reviewer_id == target_id {
            return Err(ReviewValidationError::SelfReview);
        }
        if tags.len() > MAX_TAGS {
            return Err(ReviewValidationError::TooManyTags { count: tags.len() });
        }

        let mut normalised_tags = Vec::with_capacity(tags.len());
        for tag in &tags {
            let trimmed = tag.trim();
            if trimmed.is_empty() {
                return Err(ReviewValidationError::EmptyTag);
            }
            let chars = trimmed.chars().count();
            if chars > MAX_TAG_CHARS {
                return Err(ReviewValidationError::TagTooLong { chars });
            }
            normalised_tags.push(trimmed.to_owned());
        }

        let comment = comment.filter(|text| !text.trim().is_empty());
        if let Some(text) = &comment {
            let chars = text.chars().count();
            if chars > MAX_COMMENT_CHARS {
                return Err(ReviewValidationError::CommentTooLong { chars });
            }
        }

        Ok(Self {
            reviewer_id,
            target_id,
            trip_id,
            emotion,
            tags: normalised_tags,
            comment,
            submitted_at,
        })
    }
}
