//! HTTP mock/chaos server runtime: turns a resolved scenario document
//! into real listeners, one per declared Service.
//!
//! The CLI entry point lives in `main.rs`; everything that can be
//! exercised without a process (router construction, the orchestrator's
//! lifecycle) lives here so it is covered by ordinary `cargo test`.

pub mod error;
pub mod orchestrator;
pub mod service_runtime;

pub use error::ServerError;
pub use orchestrator::run;
