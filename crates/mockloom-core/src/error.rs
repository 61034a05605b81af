use thiserror::Error;

/// Errors raised while reading and parsing a scenario document, or while
/// validating the document's cross-references (route -> scenario).
///
/// Fatal at startup: the process is expected to log this and exit
/// non-zero rather than attempt to serve with a half-loaded document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The scenario file could not be read from disk.
    #[error("unable to read scenario file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The scenario file's contents did not parse as a valid document.
    #[error("unable to parse scenario file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A Route named a Scenario that is not declared anywhere in the
    /// document.
    #[error(
        "service {service:?} route {path:?} references undeclared scenario {scenario:?}"
    )]
    UndeclaredScenario {
        service: String,
        path: String,
        scenario: String,
    },
}
