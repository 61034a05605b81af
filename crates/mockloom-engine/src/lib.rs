//! The Scenario Engine: resolves a loaded document into runnable
//! pipelines, drives each request through them, and renders the chosen
//! Action into a response.
//!
//! This crate is deliberately framework-agnostic — [`RequestContext`] and
//! [`RenderedResponse`] are plain data, not axum types — so `mockloom-server`
//! is the only place that knows it is speaking HTTP.

pub mod error;
pub mod evaluator;
pub mod executables;
pub mod handler;
pub mod resolver;

pub use error::{PipelineReject, RenderError};
pub use evaluator::{evaluate, RenderedResponse, RequestContext};
pub use executables::{Done, Executable};
pub use handler::MethodHandler;
pub use resolver::{resolve, ResolvedAction, ResolvedDocument, ResolvedRoute, ResolvedScenario, ResolvedService};
