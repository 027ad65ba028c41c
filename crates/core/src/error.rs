use thiserror::Error;

/// Failure of a request against the remote API, as seen by the client core.
///
/// Transport and decode problems are collapsed to strings here so the core
/// stays independent of the HTTP crate producing them.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a usable response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("server returned {status}: {detail}")]
    Status { status: u16, detail: String },
    /// The response body did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Field-level validation failure raised before a draft leaves the client.
/// These never reach the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDraft {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title is {0} characters, the maximum is 255")]
    TitleTooLong(usize),
    #[error("description is {0} characters, the maximum is 255")]
    DescriptionTooLong(usize),
}
