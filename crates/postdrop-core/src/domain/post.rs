use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::submission::ValidSubmission;

/// Post entity - the metadata record stored next to an uploaded media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    pub country: String,
    pub city: String,
    pub server: String,
    pub media_files: Vec<String>,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Build the metadata record for a validated submission.
    pub fn new(id: String, submission: &ValidSubmission, media_file: String) -> Self {
        Self {
            id,
            title: submission.title.clone(),
            description: submission.description.clone(),
            country: submission.country.clone(),
            city: submission.city.clone(),
            server: submission.server.clone(),
            media_files: vec![media_file],
            created_at: Utc::now(),
        }
    }
}

/// Name given to a media file uploaded without an original filename.
pub fn fallback_media_name(post_id: &str) -> String {
    format!("{post_id}-media")
}

/// `2026-10-16T08:30:00.123Z` - millisecond precision, always UTC.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
