use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use mockloom_core::ScenarioName;
use tracing::{error, info, warn};

use crate::evaluator::{evaluate, RenderedResponse, RequestContext};
use crate::resolver::{ResolvedAction, ResolvedDocument};

/// One Handler per Route. Owns the per-route call counter; holds
/// no reference to the document itself so it can be built once at
/// resolve time and reused for every request the route ever sees.
pub struct MethodHandler {
    scenario: ScenarioName,
    route_label: String,
    call_count: AtomicU64,
}

impl MethodHandler {
    pub fn new(scenario: ScenarioName, route_label: impl Into<String>) -> Self {
        Self {
            scenario,
            route_label: route_label.into(),
            call_count: AtomicU64::new(0),
        }
    }

    /// Drive one request through the pipeline and render a response.
    ///
    /// The chosen Action is tracked as a local value for the duration of
    /// this call, never written back into the shared `ResolvedScenario` —
    /// a `direct` redirect only ever affects the request that triggered
    /// it, so two concurrent requests can never observe each other's redirect.
    pub async fn handle(
        &self,
        doc: &ResolvedDocument,
        ctx: RequestContext,
        http: &reqwest::Client,
    ) -> RenderedResponse {
        let started = Instant::now();
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(scenario) = doc.scenarios.get(&self.scenario) else {
            error!(route = %self.route_label, call, "route bound to an unresolved scenario");
            return RenderedResponse::error_envelope(
                500,
                "unresolved_scenario",
                "route is bound to a scenario that no longer exists",
            );
        };

        let mut dones = Vec::new();
        let mut chosen: &ResolvedAction = &scenario.accept;
        for executable in &scenario.pipeline {
            match executable.execute().await {
                Ok(Some(done)) => dones.push(done),
                Ok(None) => {}
                Err(reject) => {
                    warn!(
                        route = %self.route_label,
                        call,
                        scenario = %scenario.label,
                        error = %reject,
                        "pipeline rejected request"
                    );
                    chosen = &scenario.ignore;
                    break;
                }
            }
        }

        // Single-hop `direct` substitution: the target's Accept action,
        // never its own `direct` link.
        let effective: &ResolvedAction = match &chosen.direct {
            Some(target) => doc
                .scenarios
                .get(target)
                .map(|s| &s.accept)
                .unwrap_or(chosen),
            None => chosen,
        };

        let rendered = match evaluate(effective, &ctx, http).await {
            Ok(response) => response,
            Err(err) => {
                error!(route = %self.route_label, call, error = %err, "failed to render response");
                RenderedResponse::error_envelope(500, "render_error", &err.to_string())
            }
        };

        for done in dones {
            let _ = done.await;
        }

        info!(
            route = %self.route_label,
            call,
            status = rendered.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "handled request"
        );

        rendered
    }
}
