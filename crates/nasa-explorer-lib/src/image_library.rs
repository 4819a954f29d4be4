//! NASA Image and Video Library types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Media kinds the library search accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    Audio,
}

impl MediaType {
    pub const NAMES: &'static [&'static str] = &["image", "video", "audio"];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            "audio" => Ok(MediaType::Audio),
            _ => Err(Error::InvalidValue {
                field: "media_type",
                value: s.to_string(),
                expected: MediaType::NAMES,
            }),
        }
    }
}

/// Items of a search body (`collection.items`), empty when absent.
pub fn collection_items(body: &Value) -> &[Value] {
    body.pointer("/collection/items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// `collection.metadata.total_hits`, zero when absent.
pub fn total_hits(body: &Value) -> u64 {
    body.pointer("/collection/metadata/total_hits")
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn media_type_parse() {
        assert_eq!("video".parse::<MediaType>().unwrap(), MediaType::Video);
        let err = "gif".parse::<MediaType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid media_type. Valid options: image, video, audio"
        );
    }

    #[test]
    fn collection_accessors() {
        let body = json!({
            "collection": {
                "items": [{"href": "a"}, {"href": "b"}],
                "metadata": {"total_hits": 1234}
            }
        });
        assert_eq!(collection_items(&body).len(), 2);
        assert_eq!(total_hits(&body), 1234);
        assert!(collection_items(&json!({})).is_empty());
        assert_eq!(total_hits(&json!({"collection": {}})), 0);
    }
}
