use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use bytes::Bytes;
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodFilter, Router};
use mockloom_engine::{MethodHandler, RenderedResponse, RequestContext, ResolvedDocument, ResolvedService};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::error::ServerError;

/// Build the axum [`Router`] for one Service: one route per
/// declared path, a method-mismatch handler, a catch-all 404, and a
/// panic boundary, all funneling into the common JSON error envelope.
pub fn build_router(doc: Arc<ResolvedDocument>, service: &ResolvedService, http_client: reqwest::Client) -> Router {
    let mut router = Router::new();

    for route in &service.routes {
        let method = axum::http::Method::from_bytes(route.method.as_bytes()).unwrap_or(axum::http::Method::GET);
        let filter = MethodFilter::try_from(method).unwrap_or(MethodFilter::GET);
        let handler = Arc::new(MethodHandler::new(
            route.scenario.clone(),
            format!("{} {}", route.method, route.path),
        ));
        let doc = doc.clone();
        let http_client = http_client.clone();

        let method_router = on(filter, move |req: Request| {
            let doc = doc.clone();
            let handler = handler.clone();
            let http_client = http_client.clone();
            async move { dispatch(doc, handler, http_client, req).await }
        })
        .fallback(method_not_allowed);

        router = router.route(&route.path, method_router);
    }

    router
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(
    doc: Arc<ResolvedDocument>,
    handler: Arc<MethodHandler>,
    http_client: reqwest::Client,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_else(|_| Bytes::new());

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let ctx = RequestContext {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        headers,
        body,
    };

    into_response(handler.handle(&doc, ctx, &http_client).await)
}

fn into_response(rendered: RenderedResponse) -> Response {
    let mut builder = axum::http::Response::builder().status(rendered.status);
    for (name, value) in &rendered.headers {
        builder = builder.header(name, value);
    }
    builder
        .body(Body::from(rendered.body))
        .map(IntoResponse::into_response)
        .unwrap_or_else(|_| ServerError::Panic("malformed response headers".into()).into_response())
}

async fn method_not_allowed() -> Response {
    ServerError::MethodNotAllowed.into_response()
}

async fn not_found() -> Response {
    ServerError::NotFound.into_response()
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    ServerError::Panic(message).into_response()
}
