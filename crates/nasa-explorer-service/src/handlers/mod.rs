//! One module per NASA data category, each exposing `routes()`.

use nasa_explorer_service_shared::{ApiError, Envelope};

pub mod apod;
pub mod epic;
pub mod image_library;
pub mod mars_rover;
pub mod neo;
pub mod root;

/// Handler result: success envelope or failure envelope with a status.
pub type ApiResult<T> = Result<Envelope<T>, ApiError>;
