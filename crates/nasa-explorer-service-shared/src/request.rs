//! Query parameter types and validation for HTTP endpoints.
//!
//! Every field arrives as an optional string so malformed numbers and dates
//! are reported with our own messages rather than a generic extractor
//! rejection. [`Validate`] turns each raw struct into typed arguments for
//! [`NasaService`](nasa_explorer_lib::NasaService).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use nasa_explorer_lib::{ApodQuery, EpicVariant, MediaType, PhotoSelector};

use crate::ApiError;

/// Longest span, in days, the NEO feed accepts.
pub const MAX_NEO_FEED_DAYS: i64 = 7;

const DEFAULT_APOD_RANDOM: u32 = 5;
const MAX_APOD_RANDOM: u32 = 10;
const MAX_APOD_COUNT: u32 = 100;
const DEFAULT_IMAGE_RANDOM: u32 = 10;
const MAX_IMAGE_RANDOM: u32 = 20;
const DEFAULT_NEO_PAGE_SIZE: u32 = 20;
const MAX_NEO_PAGE_SIZE: u32 = 100;

const DATES_FORMAT: &str = "Dates must be in YYYY-MM-DD format";
/// Message for a single malformed date (query or path).
pub const DATE_FORMAT: &str = "Date must be in YYYY-MM-DD format";
const BOTH_DATES_REQUIRED: &str = "start_date and end_date are required";

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid date regex"));

/// Validation trait for raw query parameter structs.
pub trait Validate {
    /// Typed arguments produced on success.
    type Output;

    /// Validate every field, returning a 400 [`ApiError`] naming the first
    /// problem found.
    fn validate(&self) -> Result<Self::Output, ApiError>;
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// The shape is checked first; dates of the right shape that do not exist
/// (`2023-02-30`) are rejected with the same message.
pub fn parse_date(value: &str, message: &str) -> Result<NaiveDate, ApiError> {
    let value = value.trim();
    if !DATE_RE.is_match(value) {
        return Err(ApiError::bad_request(message));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ApiError::bad_request(message))
}

/// Parse an optional unsigned integer within `min..=max`, using `default`
/// when absent or blank.
fn parse_u32(
    raw: Option<&str>,
    default: u32,
    min: u32,
    max: u32,
    message: &str,
) -> Result<u32, ApiError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(v) => v
            .parse::<u32>()
            .ok()
            .filter(|n| (min..=max).contains(n))
            .ok_or_else(|| ApiError::bad_request(message)),
    }
}

/// A positive count, clamped to `max` rather than rejected above it.
fn parse_clamped_count(raw: Option<&str>, default: u32, max: u32) -> Result<u32, ApiError> {
    parse_u32(raw, default, 1, u32::MAX, "Count must be a positive integer").map(|n| n.min(max))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Asteroid ids are opaque but always alphanumeric; anything else never
/// reaches the upstream path.
pub fn parse_asteroid_id(raw: &str) -> Result<&str, ApiError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ApiError::bad_request("Asteroid ID is required"));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::bad_request("Asteroid ID must be alphanumeric"));
    }
    Ok(id)
}

/// `GET /api/apod`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApodParams {
    pub date: Option<String>,
    pub count: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Validate for ApodParams {
    type Output = ApodQuery;

    /// Exactly one mode: nothing, `date`, `count`, or `start_date` with an
    /// optional `end_date`. Mixing modes is rejected.
    fn validate(&self) -> Result<ApodQuery, ApiError> {
        let date = present(&self.date);
        let count = present(&self.count);
        let start = present(&self.start_date);
        let end = present(&self.end_date);

        let modes = [date.is_some(), count.is_some(), start.is_some() || end.is_some()]
            .iter()
            .filter(|m| **m)
            .count();
        if modes > 1 {
            return Err(ApiError::bad_request(
                "Use only one of date, count, or start_date/end_date",
            ));
        }

        if let Some(date) = date {
            return Ok(ApodQuery::Date(parse_date(date, DATE_FORMAT)?));
        }
        if count.is_some() {
            let count = parse_u32(
                count,
                1,
                1,
                MAX_APOD_COUNT,
                "Count must be an integer between 1 and 100",
            )?;
            return Ok(ApodQuery::Count(count));
        }
        match (start, end) {
            (Some(start), end) => Ok(ApodQuery::Range {
                start: parse_date(start, DATES_FORMAT)?,
                end: end.map(|e| parse_date(e, DATES_FORMAT)).transpose()?,
            }),
            (None, Some(_)) => Err(ApiError::bad_request("end_date requires start_date")),
            (None, None) => Ok(ApodQuery::Today),
        }
    }
}

/// `GET /api/apod/random`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApodRandomParams {
    pub count: Option<String>,
}

impl Validate for ApodRandomParams {
    type Output = ApodQuery;

    fn validate(&self) -> Result<ApodQuery, ApiError> {
        parse_clamped_count(self.count.as_deref(), DEFAULT_APOD_RANDOM, MAX_APOD_RANDOM)
            .map(ApodQuery::Count)
    }
}

/// `GET /api/apod/range`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApodRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Validate for ApodRangeParams {
    type Output = ApodQuery;

    fn validate(&self) -> Result<ApodQuery, ApiError> {
        let (Some(start), Some(end)) = (present(&self.start_date), present(&self.end_date)) else {
            return Err(ApiError::bad_request(BOTH_DATES_REQUIRED));
        };
        Ok(ApodQuery::Range {
            start: parse_date(start, DATES_FORMAT)?,
            end: Some(parse_date(end, DATES_FORMAT)?),
        })
    }
}

/// `GET /api/mars-rover/{rover}/photos` query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoverPhotoParams {
    pub sol: Option<String>,
    pub earth_date: Option<String>,
    pub camera: Option<String>,
    pub page: Option<String>,
}

/// Validated rover photo arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoverPhotos {
    pub selector: PhotoSelector,
    pub camera: Option<String>,
    pub page: u32,
}

impl Validate for RoverPhotoParams {
    type Output = RoverPhotos;

    fn validate(&self) -> Result<RoverPhotos, ApiError> {
        let selector = match (present(&self.sol), present(&self.earth_date)) {
            (None, None) => {
                return Err(ApiError::bad_request(
                    "Either sol or earth_date parameter is required",
                ))
            }
            (Some(_), Some(_)) => {
                return Err(ApiError::bad_request(
                    "Use either sol or earth_date, not both",
                ))
            }
            (Some(sol), None) => sol
                .parse::<u32>()
                .map(PhotoSelector::Sol)
                .map_err(|_| ApiError::bad_request("Sol must be a non-negative integer"))?,
            (None, Some(date)) => PhotoSelector::EarthDate(parse_date(date, DATE_FORMAT)?),
        };

        let page = parse_u32(
            self.page.as_deref(),
            1,
            1,
            u32::MAX,
            "Page must be a positive integer",
        )?;

        Ok(RoverPhotos {
            selector,
            camera: present(&self.camera).map(str::to_ascii_lowercase),
            page,
        })
    }
}

/// `GET /api/neo/feed`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeoFeedParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Validate for NeoFeedParams {
    type Output = (NaiveDate, NaiveDate);

    /// The span is the calendar-day difference `end - start`; only spans
    /// longer than [`MAX_NEO_FEED_DAYS`] are rejected.
    fn validate(&self) -> Result<(NaiveDate, NaiveDate), ApiError> {
        let (Some(start), Some(end)) = (present(&self.start_date), present(&self.end_date)) else {
            return Err(ApiError::bad_request(BOTH_DATES_REQUIRED));
        };
        let start = parse_date(start, DATES_FORMAT)?;
        let end = parse_date(end, DATES_FORMAT)?;

        if (end - start).num_days() > MAX_NEO_FEED_DAYS {
            return Err(ApiError::bad_request("Date range cannot exceed 7 days"));
        }
        Ok((start, end))
    }
}

/// `GET /api/neo`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeoBrowseParams {
    pub page: Option<String>,
    pub size: Option<String>,
}

impl Validate for NeoBrowseParams {
    /// `(page, size)`
    type Output = (u32, u32);

    fn validate(&self) -> Result<(u32, u32), ApiError> {
        let page = parse_u32(
            self.page.as_deref(),
            0,
            0,
            u32::MAX,
            "Page must be a non-negative integer",
        )?;
        let size = parse_u32(
            self.size.as_deref(),
            DEFAULT_NEO_PAGE_SIZE,
            1,
            MAX_NEO_PAGE_SIZE,
            "Size must be between 1 and 100",
        )?;
        Ok((page, size))
    }
}

/// `GET /api/image-library/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageSearchParams {
    pub q: Option<String>,
    pub media_type: Option<String>,
    pub page: Option<String>,
}

/// Validated image search arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSearch {
    pub query: String,
    pub media_type: MediaType,
    pub page: u32,
}

impl Validate for ImageSearchParams {
    type Output = ImageSearch;

    fn validate(&self) -> Result<ImageSearch, ApiError> {
        let query = present(&self.q)
            .ok_or_else(|| ApiError::bad_request("Query parameter \"q\" is required"))?;
        let media_type = match present(&self.media_type) {
            Some(raw) => raw.parse::<MediaType>()?,
            None => MediaType::default(),
        };
        let page = parse_u32(
            self.page.as_deref(),
            1,
            1,
            u32::MAX,
            "Page must be a positive integer",
        )?;
        Ok(ImageSearch {
            query: query.to_string(),
            media_type,
            page,
        })
    }
}

/// `GET /api/image-library/random`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageRandomParams {
    pub count: Option<String>,
}

impl Validate for ImageRandomParams {
    type Output = u32;

    fn validate(&self) -> Result<u32, ApiError> {
        parse_clamped_count(self.count.as_deref(), DEFAULT_IMAGE_RANDOM, MAX_IMAGE_RANDOM)
    }
}

/// `GET /api/epic`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpicParams {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub variant: Option<String>,
}

impl Validate for EpicParams {
    type Output = (Option<NaiveDate>, EpicVariant);

    fn validate(&self) -> Result<(Option<NaiveDate>, EpicVariant), ApiError> {
        let variant = parse_variant(&self.variant)?;
        let date = present(&self.date)
            .map(|d| parse_date(d, DATE_FORMAT))
            .transpose()?;
        Ok((date, variant))
    }
}

/// `type` only: `/api/epic/available`, `/latest`, `/metadata/{date}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpicTypeParams {
    #[serde(rename = "type")]
    pub variant: Option<String>,
}

impl Validate for EpicTypeParams {
    type Output = EpicVariant;

    fn validate(&self) -> Result<EpicVariant, ApiError> {
        parse_variant(&self.variant)
    }
}

fn parse_variant(raw: &Option<String>) -> Result<EpicVariant, ApiError> {
    match present(raw) {
        Some(raw) => Ok(raw.parse::<EpicVariant>()?),
        None => Ok(EpicVariant::default()),
    }
}
