use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;
use crate::types::{ScenarioName, ServiceName};

/// A complete scenario document: the set of virtual services and the
/// named scenarios their routes point at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Declared virtual services, keyed by name.
    #[serde(default)]
    pub service: HashMap<ServiceName, Service>,
    /// Declared scenarios, keyed by name.
    #[serde(default)]
    pub scenario: HashMap<ScenarioName, Scenario>,
}

/// A virtual HTTP service hosted on one port with many routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// TCP port this service listens on.
    pub port: u16,
    /// URL path template -> Route.
    #[serde(default)]
    pub path: HashMap<String, Route>,
}

/// A single (method, path) entry inside a [`Service`], pointing at the
/// Scenario that drives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// HTTP method, matched case-sensitively against the request verb.
    pub method: String,
    /// Name of the Scenario this route is bound to.
    pub scenario: ScenarioName,
}
