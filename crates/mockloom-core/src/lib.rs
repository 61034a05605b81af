//! Scenario document model shared by the mockloom engine and server.
//!
//! This crate only holds data: the typed shape of a scenario document
//! and the error kind raised while loading one. It has
//! no behavior of its own — resolving references, running pipelines, and
//! serving requests live in `mockloom-engine` and `mockloom-server`.

pub mod document;
pub mod error;
pub mod loader;
pub mod scenario;
pub mod types;

pub use document::{Document, Route, Service};
pub use error::LoadError;
pub use loader::load;
pub use scenario::{Action, FileResult, RedirectResult, ResultSpec, Scenario};
pub use types::{ScenarioName, ServiceName};
