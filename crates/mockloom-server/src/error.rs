use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur while standing up or running the mockloom
/// server process.
///
/// Transport-level failures (panic, method not allowed, not found) and
/// listener shutdown failures both flow through this type; engine-level
/// failures (`PipelineReject`, `RenderError`) never reach it because the
/// Method Handler renders them into a response itself.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The scenario document failed to load or validate at startup.
    #[error("failed to load scenario document: {0}")]
    Load(#[from] mockloom_core::LoadError),

    /// Binding or accepting on a listener failed.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// No declared Service matched the `--execute` selection.
    #[error("there are no servers to run")]
    NoServers,

    /// A route handler panicked while serving a request.
    #[error("handler panicked: {0}")]
    Panic(String),

    /// No route matched the request path.
    #[error("no route matched this path")]
    NotFound,

    /// A route matched the path but not the declared method.
    #[error("method not allowed on this path")]
    MethodNotAllowed,

    /// A listener failed to shut down cleanly. Logged, not fatal: the
    /// remaining listeners still get their chance to shut down.
    #[error("listener for {service} failed to shut down: {source}")]
    Shutdown {
        service: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, cause) = match &self {
            Self::Panic(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = serde_json::json!({
            "cause": cause,
            "message": "the mockloom server could not complete this request",
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_is_preserved_in_cause() {
        let err = ServerError::Panic("boom".to_string());
        assert_eq!(err.to_string(), "handler panicked: boom");
    }
}
