use thiserror::Error;

/// A pipeline executable rejected the request; the Handler switches to
/// the scenario's Ignore action rather than aborting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineReject {
    /// `Limit`'s counter exceeded the configured ceiling.
    #[error("limit of {limit} exceeded")]
    LimitExceeded { limit: u64 },

    /// `Rate`'s sliding window counter exceeded its configured rate.
    #[error("rate of {rate} exceeded")]
    RateExceeded { rate: u64 },

    /// The request arrived outside the scenario's `start`/`end` window.
    #[error("request received outside the scenario's validity window")]
    OutsideWindow,
}

/// Failure while rendering an Action into an HTTP response.
///
/// Always local to one request: the Handler converts this into a `500`
/// with the common error envelope rather than propagating it further.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The static `content` value could not be serialized to JSON.
    #[error("failed to marshal static content: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A `file` Action's path could not be read from disk.
    #[error("failed to read result file: {0}")]
    Io(#[from] std::io::Error),

    /// The outbound request for a `redirect` Action failed.
    #[error("redirect request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}
