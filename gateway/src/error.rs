use content_hub_shared::Collection;
use reqwest::StatusCode;

/// Result alias used across the gateway.
pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

/// Failures surfaced by the gateway and the auth relay.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request could not be sent or its body could not be read.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        /// CMS endpoint path, e.g. `/news`.
        endpoint: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// The CMS answered with a non-2xx status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        /// CMS endpoint path.
        endpoint: String,
        /// Response status.
        status: StatusCode,
        /// Response body, truncated; the CMS puts validation messages here.
        body: String,
    },
    /// The body was not the expected JSON shape.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        /// CMS endpoint path.
        endpoint: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A slug lookup matched nothing.
    #[error("no {collection} entry with slug `{slug}`")]
    NotFound {
        /// Collection that was searched.
        collection: Collection,
        /// Requested slug.
        slug: String,
    },
    /// The gateway could not be configured.
    #[error("invalid gateway configuration: {0}")]
    Config(String),
}

/// Coarse error taxonomy for callers deciding how to degrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or non-2xx status.
    Transport,
    /// Malformed response body.
    Decode,
    /// Slug lookup without a match.
    NotFound,
    /// Invalid configuration.
    Config,
}

impl GatewayError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Transport {
                ..
            }
            | GatewayError::Status {
                ..
            } => ErrorKind::Transport,
            GatewayError::Decode {
                ..
            } => ErrorKind::Decode,
            GatewayError::NotFound {
                ..
            } => ErrorKind::NotFound,
            GatewayError::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status of a rejected response, if the CMS answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Status {
                status, ..
            } => Some(*status),
            GatewayError::Transport {
                source, ..
            } => source.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_classify_as_transport() {
        let err = GatewayError::Status {
            endpoint: "/news".to_string(),
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(err.to_string(), "/news returned HTTP 502 Bad Gateway");
    }

    #[test]
    fn not_found_names_collection_and_slug() {
        let err = GatewayError::NotFound {
            collection: Collection::Articles,
            slug: "missing".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "no articles entry with slug `missing`");
        assert!(err.status().is_none());
    }
}
