//! Typed error taxonomy for Webflow API failures.
//!
//! Every failure the client can surface is one variant of [`WebflowError`].
//! Classification from HTTP responses and transport errors happens through
//! the factory functions on the type, so a given status code always maps to
//! the same variant:
//!
//! - [`WebflowError::Auth`]: credentials rejected or expired (401)
//! - [`WebflowError::RateLimit`]: quota exceeded (429), carries the quota snapshot
//! - [`WebflowError::Validation`]: request defects (400, 403, 404, other 4xx)
//! - [`WebflowError::Server`]: remote-side failures (5xx)
//! - [`WebflowError::Network`]: transport failures (timeout, connection refused)
//! - [`WebflowError::Config`]: local misconfiguration, fails fast and is never retried
//!
//! # Example
//!
//! ```rust,ignore
//! match client.get::<Site>("/sites/123", None).await {
//!     Ok(site) => println!("{}", site.display_name),
//!     Err(err @ WebflowError::RateLimit { .. }) => {
//!         println!("rate limited, resets at {:?}", err.rate_limit_info());
//!     }
//!     Err(err) => println!("request failed ({}): {err}", err.kind()),
//! }
//! ```

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clients::rate_limit::RateLimitInfo;

/// The error shape Webflow puts on the wire.
///
/// Error response bodies deserialize into this, and every [`WebflowError`]
/// can serialize back to it via [`WebflowError::to_wire`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    /// Numeric error code, usually the HTTP status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Field-level details for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Map<String, serde_json::Value>>,
}

/// A classified Webflow API failure.
///
/// Errors are terminal values created once at the failure site and never
/// mutated afterwards. Each variant carries only the fields it needs; the
/// numeric code and human classification are derived via [`code`](Self::code)
/// and [`kind`](Self::kind).
#[derive(Debug, Error)]
pub enum WebflowError {
    /// Credential invalid or expired. Never retried by the client.
    #[error("authentication failed: {message}")]
    Auth {
        /// What the server (or the expiry check) reported.
        message: String,
    },

    /// Request quota exceeded.
    #[error("rate limit exceeded: {message}")]
    RateLimit {
        /// What the server reported.
        message: String,
        /// Quota snapshot from the offending response's headers.
        info: RateLimitInfo,
    },

    /// A client-side request defect the server refused (4xx).
    #[error("{message}")]
    Validation {
        /// The HTTP status code of the refusal.
        code: u16,
        /// What the server reported.
        message: String,
        /// Field-level details from the response body, when present.
        details: Option<serde_json::Map<String, serde_json::Value>>,
    },

    /// A remote-side failure (5xx or unrecognized status).
    #[error("server error {code}: {message}")]
    Server {
        /// The HTTP status code of the failure.
        code: u16,
        /// What the server reported.
        message: String,
    },

    /// A transport-level failure: timeout, connection refused, or a
    /// response body that failed to decode.
    #[error("network error: {message}")]
    Network {
        /// Classification of the transport failure.
        message: String,
        /// The originating error, preserved as a chained cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Local misconfiguration (missing or invalid token). Fails fast at
    /// construction or update time.
    #[error("configuration error: {message}")]
    Config {
        /// What is misconfigured.
        message: String,
    },
}

impl WebflowError {
    /// Classifies an HTTP response into exactly one error.
    ///
    /// The mapping is deterministic: the same status, headers and body
    /// always produce an equivalent error. Unrecognized statuses default
    /// to [`WebflowError::Server`] so this never fails.
    #[must_use]
    pub fn from_response(
        status: StatusCode,
        headers: &HeaderMap,
        body: Option<&ApiErrorBody>,
    ) -> Self {
        let message = |fallback: &str| {
            body.and_then(|b| b.msg.clone().or_else(|| b.err.clone()))
                .unwrap_or_else(|| fallback.to_string())
        };

        match status.as_u16() {
            401 => Self::Auth {
                message: message("invalid or expired access token"),
            },
            403 => Self::Validation {
                code: 403,
                message: message("forbidden"),
                details: None,
            },
            404 => Self::Validation {
                code: 404,
                message: message("not found"),
                details: None,
            },
            429 => Self::RateLimit {
                message: message("too many requests"),
                info: RateLimitInfo::from_headers(headers),
            },
            400 => Self::Validation {
                code: 400,
                message: message("bad request"),
                details: body.and_then(|b| b.details.clone()),
            },
            code @ 400..=499 => Self::Validation {
                code,
                message: message("request failed"),
                details: None,
            },
            code => Self::Server {
                code,
                message: message("internal server error"),
            },
        }
    }

    /// Classifies a transport-level failure from the HTTP stack.
    ///
    /// Timeouts and connection failures get stable messages; anything else
    /// keeps its own message. The original error is preserved as the
    /// chained cause.
    #[must_use]
    pub fn from_network_error(error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            "connection failed".to_string()
        } else {
            error.to_string()
        };
        Self::Network {
            message,
            source: Some(Box::new(error)),
        }
    }

    /// Classifies an arbitrary boxed error.
    ///
    /// Idempotent: an already-typed [`WebflowError`] passes through
    /// unchanged. Transport errors route through
    /// [`from_network_error`](Self::from_network_error); anything else
    /// becomes a [`WebflowError::Server`] with code 500.
    #[must_use]
    pub fn from_unknown(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        let error = match error.downcast::<Self>() {
            Ok(typed) => return *typed,
            Err(other) => other,
        };
        match error.downcast::<reqwest::Error>() {
            Ok(transport) => Self::from_network_error(*transport),
            Err(other) => Self::Server {
                code: 500,
                message: other.to_string(),
            },
        }
    }

    /// Returns the numeric code for this error.
    ///
    /// HTTP-mapped variants report their status code; [`Network`](Self::Network)
    /// and [`Config`](Self::Config) report 0.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::Auth { .. } => 401,
            Self::RateLimit { .. } => 429,
            Self::Validation { code, .. } | Self::Server { code, .. } => *code,
            Self::Network { .. } | Self::Config { .. } => 0,
        }
    }

    /// Returns the human classification of this error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "auth",
            Self::RateLimit { .. } => "rate_limit",
            Self::Validation { .. } => "validation",
            Self::Server { .. } => "server",
            Self::Network { .. } => "network",
            Self::Config { .. } => "config",
        }
    }

    /// Returns the quota snapshot if this is a rate limit error.
    #[must_use]
    pub const fn rate_limit_info(&self) -> Option<&RateLimitInfo> {
        match self {
            Self::RateLimit { info, .. } => Some(info),
            _ => None,
        }
    }

    /// Serializes to the wire error shape `{ err, code, msg }`.
    #[must_use]
    pub fn to_wire(&self) -> ApiErrorBody {
        ApiErrorBody {
            err: Some(self.kind().to_string()),
            code: Some(self.code()),
            msg: Some(self.to_string()),
            details: match self {
                Self::Validation { details, .. } => details.clone(),
                _ => None,
            },
        }
    }

    /// True when a transport error's message indicates token expiry, which
    /// the retry loop must never retry.
    pub(crate) fn signals_token_expiry(&self) -> bool {
        match self {
            Self::Network { message, .. } => {
                let message = message.to_ascii_lowercase();
                message.contains("token") && message.contains("expired")
            }
            _ => false,
        }
    }

    // Named constructors for well-known situations. These produce errors
    // indistinguishable in shape from the generic classification paths.

    /// The stored access token is past its expiry.
    #[must_use]
    pub fn token_expired() -> Self {
        Self::Auth {
            message: "access token expired".to_string(),
        }
    }

    /// A token with an empty access token was supplied.
    #[must_use]
    pub fn invalid_token() -> Self {
        Self::Config {
            message: "access token must not be empty".to_string(),
        }
    }

    /// The request was cancelled by the timeout guard.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Network {
            message: "request timed out".to_string(),
            source: None,
        }
    }

    /// The connection could not be established.
    #[must_use]
    pub fn connection_failed() -> Self {
        Self::Network {
            message: "connection failed".to_string(),
            source: None,
        }
    }

    /// The server refused the request as forbidden.
    #[must_use]
    pub fn forbidden() -> Self {
        Self::Validation {
            code: 403,
            message: "forbidden".to_string(),
            details: None,
        }
    }

    /// The requested resource does not exist.
    #[must_use]
    pub fn not_found() -> Self {
        Self::Validation {
            code: 404,
            message: "not found".to_string(),
            details: None,
        }
    }

    /// The server rejected the request body.
    #[must_use]
    pub fn bad_request(
        message: impl Into<String>,
        details: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Self {
        Self::Validation {
            code: 400,
            message: message.into(),
            details,
        }
    }
}
