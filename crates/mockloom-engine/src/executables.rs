use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use crate::error::PipelineReject;

/// Completion signal a stateful executable may hand back to the Handler.
/// The Handler awaits it after writing the response; dropping it without
/// awaiting is harmless, it just means nobody cared when the timer fired.
pub type Done = oneshot::Receiver<()>;

/// One check in a Scenario's pipeline.
///
/// Implementations are shared across every concurrent request for the
/// Scenario that owns them (see the concurrency note in `resolver.rs`),
/// so any mutable state must serialize its own mutations.
#[async_trait]
pub trait Executable: Send + Sync {
    async fn execute(&self) -> Result<Option<Done>, PipelineReject>;
}

/// Absolute request ceiling. The counter starts at 0 and never resets
/// for the process's lifetime: once tripped, the scenario stays tripped.
pub struct Limit {
    limit: u64,
    n: Mutex<u64>,
}

impl Limit {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            n: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Executable for Limit {
    async fn execute(&self) -> Result<Option<Done>, PipelineReject> {
        let mut n = self.n.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *n += 1;
        if *n > self.limit {
            return Err(PipelineReject::LimitExceeded { limit: self.limit });
        }
        Ok(None)
    }
}

/// Sliding saw-tooth counter: `rate` accepts followed by one reject, then
/// the counter resets and the pattern repeats.
pub struct Rate {
    rate: u64,
    n: Mutex<u64>,
}

impl Rate {
    pub fn new(rate: u64) -> Self {
        Self {
            rate,
            n: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Executable for Rate {
    async fn execute(&self) -> Result<Option<Done>, PipelineReject> {
        let mut n = self.n.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *n += 1;
        if *n > self.rate {
            *n = 0;
            return Err(PipelineReject::RateExceeded { rate: self.rate });
        }
        Ok(None)
    }
}

/// Per-request sleep injected before the request continues.
pub struct Latency {
    delay: StdDuration,
}

impl Latency {
    pub fn new(delay: StdDuration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Executable for Latency {
    async fn execute(&self) -> Result<Option<Done>, PipelineReject> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }
}

/// One-shot timer, re-armed on every call: each call gets its own timer
/// and its own `Done`, so concurrent requests never wait on each other's
/// timer.
pub struct Duration {
    span: StdDuration,
}

impl Duration {
    pub fn new(span: StdDuration) -> Self {
        Self { span }
    }
}

#[async_trait]
impl Executable for Duration {
    async fn execute(&self) -> Result<Option<Done>, PipelineReject> {
        let (tx, rx) = oneshot::channel();
        let span = self.span;
        tokio::spawn(async move {
            tokio::time::sleep(span).await;
            let _ = tx.send(());
        });
        Ok(Some(rx))
    }
}

/// Validity window. A missing bound disables that side of the check; an
/// unparseable timestamp disables it too, rather than failing the load.
pub struct Span {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl Span {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Parse an RFC-3339 micro-precision timestamp as used in `start`/`end`.
    /// Returns `None` on anything unparseable rather than an error, per
    /// the "unparseable timestamps disable that bound" rule.
    pub fn parse_bound(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[async_trait]
impl Executable for Span {
    async fn execute(&self) -> Result<Option<Done>, PipelineReject> {
        let now = Utc::now();
        if let Some(start) = self.start {
            if now < start {
                return Err(PipelineReject::OutsideWindow);
            }
        }
        if let Some(end) = self.end {
            if now > end {
                return Err(PipelineReject::OutsideWindow);
            }
        }
        Ok(None)
    }
}

/// Parse a human duration string (`"250ms"`, `"2s"`, `"1m30s"`) as used by
/// the `duration` and `latency` fields.
pub fn parse_duration(raw: &str) -> Result<StdDuration, humantime::DurationError> {
    humantime::parse_duration(raw)
}
