use thiserror::Error;

/// Convenient result alias for the NASA explorer library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The upstream could not be reached (DNS, connect, reset) before a
    /// response was received.
    #[error("NASA API is currently unavailable. Please try again later.")]
    UpstreamUnavailable { endpoint: String, reason: String },

    /// The upstream call exceeded the configured deadline.
    #[error("NASA API did not respond within {timeout_secs}s for {endpoint}")]
    UpstreamTimeout { endpoint: String, timeout_secs: u64 },

    /// The upstream answered with a non-2xx status.
    #[error("NASA API Error: {status} - {message}")]
    Upstream { status: u16, message: String },

    /// The upstream body was not the JSON shape the operation expects.
    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// A caller-supplied value is not one of the accepted options.
    #[error("Invalid {field}. Valid options: {}", .expected.join(", "))]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static [&'static str],
    },

    /// A configuration value could not be used.
    #[error("invalid configuration for {name}: {message}")]
    InvalidConfig { name: &'static str, message: String },

    /// Wrapper for HTTP client construction errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UpstreamUnavailable { .. } => "unavailable",
            Error::UpstreamTimeout { .. } => "timeout",
            Error::Upstream { .. } => "upstream_status",
            Error::Decode { .. } => "decode",
            Error::InvalidValue { .. } => "invalid_value",
            Error::InvalidConfig { .. } => "config",
            Error::Http(_) => "http_client",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_lists_every_option() {
        let err = Error::InvalidValue {
            field: "rover",
            value: "sojourner".to_string(),
            expected: &["curiosity", "spirit"],
        };
        assert_eq!(err.to_string(), "Invalid rover. Valid options: curiosity, spirit");
    }

    #[test]
    fn upstream_error_carries_status_and_message() {
        let err = Error::Upstream {
            status: 429,
            message: "OVER_RATE_LIMIT".to_string(),
        };
        assert_eq!(err.to_string(), "NASA API Error: 429 - OVER_RATE_LIMIT");
        assert_eq!(err.kind(), "upstream_status");
    }

    #[test]
    fn unreachable_variants() {
        let timeout = Error::UpstreamTimeout {
            endpoint: "/planetary/apod".to_string(),
            timeout_secs: 10,
        };
        let unavailable = Error::UpstreamUnavailable {
            endpoint: "/planetary/apod".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(timeout.kind(), "timeout");
        assert!(unavailable.to_string().contains("currently unavailable"));
    }
}
