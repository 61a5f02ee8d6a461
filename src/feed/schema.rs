//! Typed shape of the highlights feed payload.
//!
//! The payload is either `{"response": [..]}` or a bare array of records.
//! Validation is eager: one malformed record rejects the whole payload.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use super::FeedError;

/// One match entry in the feed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    pub title: String,
    #[serde(default)]
    pub competition: Option<String>,
    #[serde(default)]
    pub matchview_url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub side1: Option<FeedSide>,
    #[serde(default)]
    pub side2: Option<FeedSide>,
    /// External identifier; numeric ids are kept in their decimal form
    #[serde(default, deserialize_with = "deserialize_external_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub videos: Vec<FeedVideo>,
}

impl FeedRecord {
    /// Natural key of the match: the feed id, else the match-view URL.
    pub fn external_id(&self) -> String {
        self.id
            .as_deref()
            .or(self.matchview_url.as_deref())
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    pub fn home_team(&self) -> Option<&str> {
        side_name(self.side1.as_ref())
    }

    pub fn away_team(&self) -> Option<&str> {
        side_name(self.side2.as_ref())
    }

    pub fn competition_name(&self) -> Option<&str> {
        self.competition
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn side_name(side: Option<&FeedSide>) -> Option<&str> {
    side.map(|side| side.name.trim()).filter(|name| !name.is_empty())
}

/// A team as referenced by a record
#[derive(Debug, Clone, Deserialize)]
pub struct FeedSide {
    pub name: String,
}

/// An embeddable clip attached to a record.
///
/// The raw JSON object is retained so the clip's identity can be derived
/// from exactly what the provider sent.
#[derive(Debug, Clone)]
pub struct FeedVideo {
    pub id: Option<String>,
    pub title: String,
    pub embed: String,
    pub raw: Value,
}

#[derive(Deserialize)]
struct FeedVideoFields {
    #[serde(default, deserialize_with = "deserialize_external_id")]
    id: Option<String>,
    title: String,
    embed: String,
}

impl<'de> Deserialize<'de> for FeedVideo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let fields = FeedVideoFields::deserialize(&raw).map_err(de::Error::custom)?;
        Ok(Self {
            id: fields.id,
            title: fields.title,
            embed: fields.embed,
            raw,
        })
    }
}

/// Decode a feed body into records.
pub fn parse_payload(body: &[u8]) -> Result<Vec<FeedRecord>, FeedError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| FeedError::SchemaValidation(format!("body is not JSON: {err}")))?;

    let records = match value {
        Value::Object(mut object) => match object.remove("response") {
            Some(records @ Value::Array(_)) => records,
            Some(_) => {
                return Err(FeedError::SchemaValidation(
                    "`response` must be an array".to_string(),
                ));
            }
            None => {
                return Err(FeedError::SchemaValidation(
                    "expected a `response` array".to_string(),
                ));
            }
        },
        records @ Value::Array(_) => records,
        _ => {
            return Err(FeedError::SchemaValidation(
                "payload must be an object or an array".to_string(),
            ));
        }
    };

    serde_json::from_value(records).map_err(|err| FeedError::SchemaValidation(err.to_string()))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    DateTime::parse_from_rfc3339(&raw)
        .or_else(|_| DateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%z"))
        .map(Some)
        .map_err(|err| de::Error::custom(format!("invalid date '{raw}': {err}")))
}

fn deserialize_external_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}
