use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// The logged-in user as persisted in the session store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Session {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Session {
    pub fn new(email: impl Into<String>) -> Self {
        Session {
            email: email.into(),
            name: None,
            bio: None,
            website: None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Anonymous User",
        }
    }

    /// Avatar letter: first letter of the name, falling back to the email.
    pub fn initial(&self) -> Option<char> {
        self.name
            .as_deref()
            .and_then(|n| n.chars().next())
            .or_else(|| self.email.chars().next())
            .map(|c| c.to_ascii_uppercase())
    }
}

/// A video as returned by the backend, normalised at deserialization.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_url: String,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default, alias = "userEmail", deserialize_with = "null_as_default")]
    pub uploaded_by: String,
    #[serde(default, deserialize_with = "timestamp")]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub views: Option<u64>,
}

impl Video {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, email: &str) -> bool {
        self.likes.iter().any(|l| l == email)
    }

    pub fn view_count(&self) -> u64 {
        self.views.unwrap_or(0)
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Body of a metadata-only update. Never carries file content.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Fields of a multipart upload. `tags` is sent as typed, the backend
/// splits it on commas.
#[derive(Clone, Debug, PartialEq)]
pub struct NewVideo {
    pub file: PathBuf,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub uploaded_by: String,
}

pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_timestamp))
}

/// Accepts ISO-8601 strings (zone-less values are UTC), Jackson's
/// `[y, m, d, h, min, s, nanos]` arrays, and epoch milliseconds.
pub fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    use serde_json::Value;

    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Array(parts) => {
            let field = |i: usize| {
                parts
                    .get(i)
                    .and_then(Value::as_u64)
                    .and_then(|n| u32::try_from(n).ok())
            };
            let optional = |i: usize| match parts.get(i) {
                None => Some(0),
                Some(_) => field(i),
            };
            let year = parts.first().and_then(Value::as_i64)?;
            let year = i32::try_from(year).ok()?;
            let date = NaiveDate::from_ymd_opt(year, field(1)?, field(2)?)?;
            date.and_hms_nano_opt(optional(3)?, optional(4)?, optional(5)?, optional(6)?)
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}
