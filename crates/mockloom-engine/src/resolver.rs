use std::collections::HashMap;
use std::sync::Arc;

use mockloom_core::{Document, LoadError, ScenarioName, ServiceName};
use tracing::warn;

use crate::executables::Duration as DurationExecutable;
use crate::executables::{self, Executable, Latency, Limit, Rate, Span};

/// A Route bound to its resolved target scenario, ready for a Service
/// Runtime to mount.
pub struct ResolvedRoute {
    pub path: String,
    pub method: String,
    pub scenario: ScenarioName,
}

/// A Service with its routes resolved against the Scenario table.
pub struct ResolvedService {
    pub port: u16,
    pub routes: Vec<ResolvedRoute>,
}

/// An Action with its `direct` link checked against the Scenario table.
/// An unresolvable name is silently dropped rather than carried as a
/// dangling reference.
pub struct ResolvedAction {
    pub direct: Option<ScenarioName>,
    pub status: u16,
    pub result: mockloom_core::ResultSpec,
}

/// A Scenario with its pipeline built and its Action links resolved.
/// Immutable after resolution except for the `Mutex`-guarded counters
/// owned by individual executables.
pub struct ResolvedScenario {
    pub label: String,
    pub accept: ResolvedAction,
    pub ignore: ResolvedAction,
    pub pipeline: Vec<Arc<dyn Executable>>,
}

/// The fully linked document the Method Handler and Service Runtime
/// operate on.
pub struct ResolvedDocument {
    pub services: HashMap<ServiceName, ResolvedService>,
    pub scenarios: HashMap<ScenarioName, Arc<ResolvedScenario>>,
}

impl std::fmt::Debug for ResolvedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedDocument")
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .field("scenarios", &self.scenarios.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Walk a loaded [`Document`], validate its route references, and build
/// each Scenario's executable pipeline and Action links.
///
/// This is the only component that turns a raw document into something
/// the engine can actually run.
pub fn resolve(doc: &Document) -> Result<ResolvedDocument, LoadError> {
    let mut scenarios = HashMap::with_capacity(doc.scenario.len());
    for (name, scenario) in &doc.scenario {
        scenarios.insert(name.clone(), Arc::new(resolve_scenario(scenario, &doc.scenario)));
    }

    let mut services = HashMap::with_capacity(doc.service.len());
    for (service_name, service) in &doc.service {
        let mut routes = Vec::with_capacity(service.path.len());
        for (path, route) in &service.path {
            if !doc.scenario.contains_key(route.scenario.as_str()) {
                return Err(LoadError::UndeclaredScenario {
                    service: service_name.to_string(),
                    path: path.clone(),
                    scenario: route.scenario.to_string(),
                });
            }
            routes.push(ResolvedRoute {
                path: path.clone(),
                method: route.method.clone(),
                scenario: route.scenario.clone(),
            });
        }
        services.insert(
            service_name.clone(),
            ResolvedService {
                port: service.port,
                routes,
            },
        );
    }

    Ok(ResolvedDocument { services, scenarios })
}

fn resolve_scenario(
    scenario: &mockloom_core::Scenario,
    table: &HashMap<ScenarioName, mockloom_core::Scenario>,
) -> ResolvedScenario {
    let mut pipeline: Vec<Arc<dyn Executable>> = Vec::new();

    let start = scenario.start.as_deref().and_then(Span::parse_bound);
    let end = scenario.end.as_deref().and_then(Span::parse_bound);
    if scenario.start.is_some() || scenario.end.is_some() {
        pipeline.push(Arc::new(Span::new(start, end)));
    }

    if let Some(raw) = &scenario.duration {
        match executables::parse_duration(raw) {
            Ok(d) => pipeline.push(Arc::new(DurationExecutable::new(d))),
            Err(_) => warn!(scenario = %scenario.name, value = %raw, "unparseable duration, skipping"),
        }
    }

    if let Some(raw) = &scenario.latency {
        match executables::parse_duration(raw) {
            Ok(d) => pipeline.push(Arc::new(Latency::new(d))),
            Err(_) => warn!(scenario = %scenario.name, value = %raw, "unparseable latency, skipping"),
        }
    }

    if scenario.limit > 0 {
        pipeline.push(Arc::new(Limit::new(scenario.limit)));
    }

    if scenario.rate > 0 {
        pipeline.push(Arc::new(Rate::new(scenario.rate)));
    }

    ResolvedScenario {
        label: scenario.name.clone(),
        accept: resolve_action(&scenario.accept, table),
        ignore: resolve_action(&scenario.ignore, table),
        pipeline,
    }
}

/// Resolve an Action's `direct` link, dropping it silently if it does not
/// name a declared Scenario.
fn resolve_action(
    action: &mockloom_core::Action,
    table: &HashMap<ScenarioName, mockloom_core::Scenario>,
) -> ResolvedAction {
    let direct = action
        .direct
        .clone()
        .filter(|name| table.contains_key(name.as_str()));
    ResolvedAction {
        direct,
        status: action.status,
        result: action.result.clone(),
    }
}
