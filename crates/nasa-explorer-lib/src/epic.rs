//! EPIC (Earth Polychromatic Imaging Camera) helpers.
//!
//! Pure functions over upstream EPIC bodies: image URL construction, picking
//! the latest available date, and per-day metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// EPIC image collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpicVariant {
    #[default]
    Natural,
    Enhanced,
}

impl EpicVariant {
    pub const NAMES: &'static [&'static str] = &["natural", "enhanced"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EpicVariant::Natural => "natural",
            EpicVariant::Enhanced => "enhanced",
        }
    }
}

impl fmt::Display for EpicVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EpicVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "natural" => Ok(EpicVariant::Natural),
            "enhanced" => Ok(EpicVariant::Enhanced),
            _ => Err(Error::InvalidValue {
                field: "type",
                value: s.to_string(),
                expected: EpicVariant::NAMES,
            }),
        }
    }
}

/// Build the archive URL of one EPIC PNG.
///
/// `date` may be a plain `YYYY-MM-DD` or the capture timestamp the API puts
/// on each image (`YYYY-MM-DD HH:MM:SS`); only the calendar day is used and
/// its components become the `YYYY/MM/DD` path segment.
pub fn image_url(
    base_url: &str,
    api_key: &str,
    variant: EpicVariant,
    date: &str,
    image: &str,
) -> String {
    let day = date
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(date)
        .replace('-', "/");
    format!(
        "{}/EPIC/archive/{}/{}/png/{}.png?api_key={}",
        base_url.trim_end_matches('/'),
        variant,
        day,
        image,
        api_key
    )
}

/// The chronologically last date in an `available` listing.
///
/// Entries may be bare date strings or objects with a `date` field.
pub fn latest_available_date(listing: &Value) -> Option<String> {
    listing
        .as_array()?
        .iter()
        .filter_map(|entry| match entry {
            Value::String(date) => Some(date.as_str()),
            Value::Object(obj) => obj.get("date").and_then(Value::as_str),
            _ => None,
        })
        .max()
        .map(str::to_string)
}

/// Add an `image_url` to every image object that has `image` and `date`.
///
/// Non-array bodies and entries without those fields pass through as-is.
pub fn with_image_urls<F>(mut body: Value, url_for: F) -> Value
where
    F: Fn(&str, &str) -> String,
{
    if let Some(entries) = body.as_array_mut() {
        for entry in entries.iter_mut() {
            let Some(obj) = entry.as_object_mut() else {
                continue;
            };
            let url = match (
                obj.get("date").and_then(Value::as_str),
                obj.get("image").and_then(Value::as_str),
            ) {
                (Some(date), Some(image)) => url_for(date, image),
                _ => continue,
            };
            obj.insert("image_url".to_string(), Value::String(url));
        }
    }
    body
}

/// Position data for one image of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpicCoordinates {
    pub image: Option<String>,
    pub centroid_coordinates: Option<Value>,
    pub dscovr_j2000_position: Option<Value>,
}

/// Derived metadata for one day of EPIC images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpicDayMetadata {
    pub date: String,
    #[serde(rename = "type")]
    pub variant: EpicVariant,
    pub image_count: usize,
    pub first_image_time: Option<String>,
    pub last_image_time: Option<String>,
    pub coordinates: Vec<EpicCoordinates>,
}

/// Summarize a day's image list. Returns `None` when there are no images.
pub fn day_metadata(date: &str, variant: EpicVariant, images: &Value) -> Option<EpicDayMetadata> {
    let images = images.as_array().filter(|list| !list.is_empty())?;

    let times = images
        .iter()
        .filter_map(|img| img.get("date").and_then(Value::as_str));
    let first = times.clone().min().map(str::to_string);
    let last = times.max().map(str::to_string);

    let coordinates = images
        .iter()
        .map(|img| EpicCoordinates {
            image: img.get("image").and_then(Value::as_str).map(str::to_string),
            centroid_coordinates: img.get("centroid_coordinates").cloned(),
            dscovr_j2000_position: img.get("dscovr_j2000_position").cloned(),
        })
        .collect();

    Some(EpicDayMetadata {
        date: date.to_string(),
        variant,
        image_count: images.len(),
        first_image_time: first,
        last_image_time: last,
        coordinates,
    })
}
