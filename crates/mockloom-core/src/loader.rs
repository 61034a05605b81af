use std::path::Path;

use crate::document::Document;
use crate::error::LoadError;

/// Read a scenario document from `path` and parse it.
///
/// This does not validate cross-references (a Route's `scenario` name
/// resolving, an Action's `direct` name resolving) — that is the
/// Resolver's job in `mockloom-engine`.
pub fn load(path: impl AsRef<Path>) -> Result<Document, LoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}
