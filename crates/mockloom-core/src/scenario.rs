use serde::{Deserialize, Serialize};

use crate::types::ScenarioName;

/// A named behavior bundle: timing, limits, a validity window, and the
/// Accept/Ignore actions a route falls into once its pipeline has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Human label used in logs.
    #[serde(default)]
    pub name: String,
    /// One-shot timer duration (e.g. `"2s"`), parsed by the engine.
    #[serde(default)]
    pub duration: Option<String>,
    /// Per-request sleep duration (e.g. `"250ms"`), parsed by the engine.
    #[serde(default)]
    pub latency: Option<String>,
    /// Default status associated with the scenario. Carried through from
    /// the document for parity with the original model; the status
    /// actually written to the response always comes from the chosen
    /// Action, not this field.
    #[serde(default)]
    pub status: i32,
    /// Sliding saw-tooth counter: `rate` accepts followed by one reject.
    /// Zero means the Rate executable is not attached.
    #[serde(default)]
    pub rate: u64,
    /// Absolute request ceiling. Zero means the Limit executable is not
    /// attached.
    #[serde(default)]
    pub limit: u64,
    /// RFC-3339 micro-precision validity window start (inclusive).
    #[serde(default)]
    pub start: Option<String>,
    /// RFC-3339 micro-precision validity window end (inclusive).
    #[serde(default)]
    pub end: Option<String>,
    /// Action taken when the pipeline accepts the request.
    pub accept: Action,
    /// Action taken when the pipeline rejects the request.
    #[serde(default)]
    pub ignore: Action,
}

/// A response specification, optionally redirecting to another Scenario
/// before it is rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Action {
    /// Name of another Scenario to redirect to. A single hop: if present
    /// and resolvable, the *target's* Accept action is executed instead
    /// of this one, with no further redirection.
    #[serde(default)]
    pub direct: Option<ScenarioName>,
    /// HTTP status code written to the response.
    #[serde(default)]
    pub status: u16,
    /// The response body specification.
    #[serde(default)]
    pub result: ResultSpec,
}

/// The tagged response-body specification carried by an [`Action`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ResultSpec {
    /// Serialize `content` as the JSON response body.
    Static(serde_json::Value),
    /// Read a file from disk and use its bytes (or a subset of subtypes)
    /// as the response body.
    File(FileResult),
    /// Proxy the incoming request to another host.
    Redirect(RedirectResult),
    /// A type this implementation does not recognize. Falls through to
    /// the "no concrete action" response (204, empty body).
    #[serde(other)]
    Unknown,
}

impl Default for ResultSpec {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Content of a `"file"`-typed [`ResultSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    /// Filesystem path to read, relative to the process's working
    /// directory unless absolute.
    pub path: String,
    /// File subtype. Only `"json"` is rendered; any other subtype falls
    /// through to the "no concrete action" response.
    #[serde(rename = "type")]
    pub file_type: String,
}

/// Content of a `"redirect"`-typed [`ResultSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectResult {
    /// Scheme + host (and optional port) to proxy the request to, e.g.
    /// `"http://127.0.0.1:9980"`.
    pub host: String,
}
