use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{ReviewId, Sentiment};

/// Backend paths, relative to the API base URL.
pub const ANALYZE_REVIEW_PATH: &str = "analyze-review";
pub const REVIEWS_PATH: &str = "reviews";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeReviewRequest {
    pub review_text: String,
}

/// Success body of `POST /analyze-review`. Only `sentiment` is guaranteed;
/// the remaining fields are echoed back by the backend when it persists the review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReviewId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
    pub sentiment: String,
    #[serde(default, deserialize_with = "deserialize_key_points")]
    pub key_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl AnalysisResult {
    pub fn sentiment_kind(&self) -> Sentiment {
        Sentiment::from_raw(Some(&self.sentiment))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub review_text: String,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key_points")]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Review {
    pub fn sentiment_kind(&self) -> Sentiment {
        Sentiment::from_raw(self.sentiment.as_deref())
    }

    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(parse_created_date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewListResponse {
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Parses the backend's `created_at`, which is RFC 3339 when the database
/// stores a zone and a bare ISO-8601 datetime when it does not.
pub fn parse_created_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyPointsRepr {
    List(Vec<String>),
    Encoded(String),
}

// The list endpoint hands back the stored column, a JSON-encoded array in a string.
fn deserialize_key_points<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<KeyPointsRepr>::deserialize(deserializer)?;
    Ok(match repr {
        None => Vec::new(),
        Some(KeyPointsRepr::List(points)) => points,
        Some(KeyPointsRepr::Encoded(raw)) => decode_encoded_key_points(&raw),
    })
}

fn decode_encoded_key_points(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Option<Vec<String>>>(raw) {
        Ok(points) => points.unwrap_or_default(),
        Err(_) => vec![raw.to_string()],
    }
}
