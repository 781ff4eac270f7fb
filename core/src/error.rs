//! Error types for the storefront API client.
//!
//! # Design
//! Everything that happens at the wire boundary is a `TransportError`
//! (non-2xx response, no response, request never built). Failures on our
//! side of the boundary (payload encoding, envelope decoding) get their own
//! `ApiError` variants. `FetchFailure` is the seam the fetch hook uses to turn
//! any of these into a user-facing message.

use std::fmt;

use crate::http::TransportError;

/// Errors returned by `StorefrontClient` parse methods and `StorefrontApi`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be deserialized into the expected type.
    #[error("failed to parse server response: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of a non-2xx response, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(TransportError::Response { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// A failure the fetch hook knows how to describe.
///
/// `transport` exposes the structured transport error, when there is one;
/// otherwise the `Display` output is shown verbatim.
pub trait FetchFailure: fmt::Display {
    fn transport(&self) -> Option<&TransportError> {
        None
    }
}

impl FetchFailure for ApiError {
    fn transport(&self) -> Option<&TransportError> {
        match self {
            ApiError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl FetchFailure for TransportError {
    fn transport(&self) -> Option<&TransportError> {
        Some(self)
    }
}

impl FetchFailure for String {}

impl FetchFailure for &'static str {}
