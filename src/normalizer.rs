//! Turns raw text from the generation call into a [`SourceLinks`] record.
//!
//! Models sometimes wrap the JSON object in prose or markdown fences, so when the
//! text does not parse as-is we fall back to the span between the first `{` and
//! the last `}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Number of characters of the raw text kept in a [`NormalizeError::Malformed`].
pub const EXCERPT_CHARS: usize = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("generation returned an empty response")]
    Empty,

    #[error("generation did not return JSON. Raw: {excerpt}")]
    Malformed { excerpt: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceLinks {
    pub reddit_url: String,
    pub youtube_url: String,
    pub instagram_url: String,
    pub linkedin_url: String,
}

impl SourceLinks {
    fn from_object(object: &Map<String, Value>) -> SourceLinks {
        let field = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        SourceLinks {
            reddit_url: field("redditUrl"),
            youtube_url: field("youtubeUrl"),
            instagram_url: field("instagramUrl"),
            linkedin_url: field("linkedinUrl"),
        }
    }
}

pub fn normalize(raw: &str) -> Result<SourceLinks, NormalizeError> {
    if raw.trim().is_empty() {
        return Err(NormalizeError::Empty);
    }

    let object = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => object,
        _ => extract_object(raw)?,
    };

    Ok(SourceLinks::from_object(&object))
}

fn extract_object(raw: &str) -> Result<Map<String, Value>, NormalizeError> {
    let malformed = || NormalizeError::Malformed {
        excerpt: raw.chars().take(EXCERPT_CHARS).collect(),
    };

    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(malformed());
    };
    if end <= start {
        return Err(malformed());
    }

    // `{` and `}` are single-byte, so both indices sit on char boundaries.
    match serde_json::from_str::<Value>(&raw[start..=end]) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(malformed()),
    }
}
