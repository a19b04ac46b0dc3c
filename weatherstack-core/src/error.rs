use std::error::Error as StdError;
use thiserror::Error;

/// The single error kind returned by the request executor.
///
/// Every failure of an upstream call is classified into exactly one variant at
/// the point it is detected. `url` is always the endpoint URL without query
/// parameters.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A response arrived but its status is a client or server error.
    #[error("API error {status} at {url}: {body}")]
    Status { status: u16, url: String, body: String },

    /// The request could not be completed at the network layer.
    #[error("Network error during request to {url}: {detail}")]
    Transport {
        url: String,
        detail: String,
        #[source]
        source: reqwest::Error,
    },

    /// Anything else, including an undecodable body.
    #[error("Unexpected error during request to {url}: {message}")]
    Unexpected { url: String, message: String },
}

impl ApiError {
    pub(crate) fn status(status: u16, url: &str, body: String) -> Self {
        ApiError::Status { status, url: url.to_owned(), body }
    }

    /// The request URL (with the access key in its query) is stripped from
    /// `err` before it is stored.
    pub fn transport(url: &str, err: reqwest::Error) -> Self {
        let source = err.without_url();
        let detail = describe_chain(&source);
        ApiError::Transport { url: url.to_owned(), detail, source }
    }

    pub(crate) fn unexpected(url: &str, message: impl std::fmt::Display) -> Self {
        ApiError::Unexpected { url: url.to_owned(), message: message.to_string() }
    }

    pub fn url(&self) -> &str {
        match self {
            ApiError::Status { url, .. }
            | ApiError::Transport { url, .. }
            | ApiError::Unexpected { url, .. } => url,
        }
    }

    /// HTTP status code, present only for [`ApiError::Status`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Status { .. } => "http_status",
            ApiError::Transport { .. } => "transport",
            ApiError::Unexpected { .. } => "unexpected",
        }
    }
}

fn describe_chain(err: &reqwest::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        current = cause.source();
    }
    parts.join(": ")
}
