use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ThoughtsError;

/// Identifier of a stored thought. Always a UUID v4 when generated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThoughtId(Uuid);

impl ThoughtId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ThoughtId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ThoughtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ThoughtId {
    type Err = ThoughtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ThoughtsError::InvalidId(s.to_string()))
    }
}

/// A single short post with its like counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    #[serde(rename = "_id")]
    pub id: ThoughtId,
    pub message: String,
    pub hearts: u64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Thought {
    /// Create a new thought with a generated id, no hearts and the current time.
    ///
    /// `created_at` is kept at microsecond precision so it maps one-to-one
    /// onto the recency score.
    pub fn new(message: String) -> Self {
        Self {
            id: ThoughtId::new(),
            message,
            hearts: 0,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Sorted-set score used for recency ordering, in epoch microseconds.
    /// Exact in an f64 for any realistic date.
    pub fn created_score(&self) -> f64 {
        self.created_at.timestamp_micros() as f64
    }

    /// Field/value pairs for the Redis hash holding this thought.
    pub fn to_hash_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("message", self.message.clone()),
            ("hearts", self.hearts.to_string()),
            (
                "createdAt",
                self.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
        ]
    }

    /// Rebuild a thought from a Redis hash. `key` is only used for error context.
    pub fn from_hash(key: &str, fields: &HashMap<String, String>) -> Result<Self, ThoughtsError> {
        let field = |name: &str| {
            fields.get(name).ok_or_else(|| ThoughtsError::CorruptRecord {
                key: key.to_string(),
                reason: format!("missing field {}", name),
            })
        };
        let corrupt = |reason: String| ThoughtsError::CorruptRecord {
            key: key.to_string(),
            reason,
        };

        let id = field("id")?
            .parse::<ThoughtId>()
            .map_err(|_| corrupt("id is not a UUID".to_string()))?;
        let hearts = field("hearts")?
            .parse::<u64>()
            .map_err(|e| corrupt(format!("hearts: {}", e)))?;
        let created_at = DateTime::parse_from_rfc3339(field("createdAt")?)
            .map_err(|e| corrupt(format!("createdAt: {}", e)))?
            .with_timezone(&Utc);

        Ok(Self {
            id,
            message: field("message")?.clone(),
            hearts,
            created_at,
        })
    }
}

/// Body of `POST /thoughts`. Every field other than `message` is ignored.
///
/// `message` stays untyped so a non-string value is reported by the validator
/// rather than rejected by the JSON extractor.
#[derive(Debug, Default, Deserialize)]
pub struct CreateThoughtParams {
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

/// Uniform `{success, response, message}` wrapper for non-list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub response: T,
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn success(response: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            response,
            message: message.into(),
        }
    }

    pub fn failure(response: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            response,
            message: message.into(),
        }
    }
}

/// One entry of the route listing on `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub method: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
