use bytes::Bytes;
use mockloom_core::ResultSpec;

use crate::error::RenderError;
use crate::resolver::ResolvedAction;

/// Everything the Action Evaluator needs to know about the incoming
/// request. Framework-agnostic on purpose: the server crate adapts this
/// to and from its axum types.
pub struct RequestContext {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// A fully rendered response, ready for the server crate to write out.
#[derive(Debug)]
pub struct RenderedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl RenderedResponse {
    fn json(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        }
    }

    /// The "pipeline didn't provide a concrete action" fallthrough: `204`,
    /// empty JSON body.
    fn fallthrough() -> Self {
        Self::json(204, Bytes::new())
    }

    /// The common JSON error envelope: `{ "cause", "message" }` at the
    /// given status. Used whenever a handler-side failure has to be
    /// rendered as a response rather than propagated.
    pub fn error_envelope(status: u16, cause: &str, message: &str) -> Self {
        let body = serde_json::json!({ "cause": cause, "message": message });
        Self::json(status, Bytes::from(serde_json::to_vec(&body).unwrap_or_default()))
    }
}

/// Render a resolved Action into a response.
pub async fn evaluate(
    action: &ResolvedAction,
    ctx: &RequestContext,
    http: &reqwest::Client,
) -> Result<RenderedResponse, RenderError> {
    match &action.result {
        ResultSpec::Static(content) => {
            let body = serde_json::to_vec(content)?;
            Ok(RenderedResponse::json(action.status, Bytes::from(body)))
        }
        ResultSpec::File(file) => {
            if file.file_type == "json" {
                let body = tokio::fs::read(&file.path).await?;
                Ok(RenderedResponse::json(action.status, Bytes::from(body)))
            } else {
                Ok(RenderedResponse::fallthrough())
            }
        }
        ResultSpec::Redirect(redirect) => evaluate_redirect(&redirect.host, ctx, http).await,
        ResultSpec::Unknown => Ok(RenderedResponse::fallthrough()),
    }
}

async fn evaluate_redirect(
    host: &str,
    ctx: &RequestContext,
    http: &reqwest::Client,
) -> Result<RenderedResponse, RenderError> {
    let url = format!("{host}{}", ctx.path);
    let method = reqwest::Method::from_bytes(ctx.method.as_bytes())
        .unwrap_or(reqwest::Method::GET);

    let mut request = http.request(method, url);
    for (name, value) in &ctx.headers {
        request = request.header(name, value);
    }
    request = request.body(ctx.body.clone());

    let response = request.send().await?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response.bytes().await?;

    Ok(RenderedResponse {
        status,
        headers,
        body,
    })
}
