//! Canonical song metadata and normalization of raw model output.
//!
//! Language models are asked for a flat JSON object, but they do not always
//! comply: the object may be wrapped in prose or a markdown fence, `artists`
//! may come back as a list, and `year` may be a number, a string or something
//! like "circa 1990". [`normalize`] accepts all of that and always produces a
//! [`CanonicalMetadata`], falling back to a title-only record when nothing
//! usable can be parsed.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Error marker stored on records whose model output could not be parsed.
pub const PARSE_FAILURE: &str = "parse failure";

/// Separator used when the model returns artists as a list.
pub const ARTIST_SEPARATOR: &str = ", ";

/// The single cross-format metadata record handed to the tag writers.
///
/// Every field is optional. A record with `error` set is degraded: it still
/// carries the best-known `title` so the file can be tagged partially.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artists: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CanonicalMetadata {
    /// Build a degraded record that only knows the song title.
    pub fn degraded(title: &str, error: impl Into<String>) -> Self {
        Self {
            title: Some(title.to_string()),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// Why the record is degraded, if it is.
    pub fn degradation(&self) -> Option<Degradation> {
        self.error.as_deref().map(|error| {
            if error == PARSE_FAILURE {
                Degradation::Unparsable
            } else {
                Degradation::Provider(error.to_string())
            }
        })
    }
}

/// Cause of a degraded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// The model answered, but nothing usable could be parsed.
    Unparsable,
    /// The provider could not be reached or returned an error.
    Provider(String),
}

/// True if `value` is a non-empty run of ASCII digits.
pub fn is_digit_year(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// A field value as the model may send it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    List(Vec<FieldValue>),
    // Nested objects and nulls carry nothing we can store in a flat tag
    Other(IgnoredAny),
}

impl FieldValue {
    fn into_text(self) -> Option<String> {
        let text = match self {
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::List(items) => items
                .into_iter()
                .filter_map(FieldValue::into_text)
                .collect::<Vec<_>>()
                .join(ARTIST_SEPARATOR),
            FieldValue::Flag(_) | FieldValue::Other(_) => return None,
        };
        if text.is_empty() { None } else { Some(text) }
    }

    fn into_year(self) -> Option<String> {
        let year = match self {
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::Number(n) => n.to_string(),
            _ => return None,
        };
        is_digit_year(&year).then_some(year)
    }
}

/// Schema the model is asked to produce. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    title: Option<FieldValue>,
    #[serde(default, alias = "artist")]
    artists: Option<FieldValue>,
    #[serde(default)]
    album: Option<FieldValue>,
    #[serde(default)]
    year: Option<FieldValue>,
    #[serde(default)]
    composer: Option<FieldValue>,
    #[serde(default)]
    genre: Option<FieldValue>,
    #[serde(default)]
    language: Option<FieldValue>,
}

impl From<RawMetadata> for CanonicalMetadata {
    fn from(raw: RawMetadata) -> Self {
        Self {
            title: raw.title.and_then(FieldValue::into_text),
            artists: raw.artists.and_then(FieldValue::into_text),
            album: raw.album.and_then(FieldValue::into_text),
            year: raw.year.and_then(FieldValue::into_year),
            composer: raw.composer.and_then(FieldValue::into_text),
            genre: raw.genre.and_then(FieldValue::into_text),
            language: raw.language.and_then(FieldValue::into_text),
            error: None,
        }
    }
}

/// Strictly parse `text` as a JSON object in the requested schema.
///
/// Parsing goes through a map first so that arrays are rejected instead of
/// being read positionally into the struct.
fn parse_object(text: &str) -> Option<RawMetadata> {
    let object = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(text).ok()?;
    serde_json::from_value(serde_json::Value::Object(object)).ok()
}

/// Slice from the first `{` to the last `}`, if both exist in that order.
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Turn raw model text into a canonical record.
///
/// Tries a strict parse first, then a strict parse of the outermost `{...}`
/// span. If both fail the result is a degraded record titled
/// `fallback_title`. This function never fails.
pub fn normalize(raw_text: &str, fallback_title: &str) -> CanonicalMetadata {
    let trimmed = raw_text.trim();

    if let Some(raw) = parse_object(trimmed) {
        return raw.into();
    }

    if let Some(candidate) = outermost_object(trimmed)
        && let Some(raw) = parse_object(candidate)
    {
        log::debug!("Recovered JSON object from wrapped model output");
        return raw.into();
    }

    log::warn!("Could not parse model output for '{fallback_title}': {trimmed}");
    CanonicalMetadata::degraded(fallback_title, PARSE_FAILURE)
}
