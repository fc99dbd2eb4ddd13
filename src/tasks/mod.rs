//! The periodic CRM maintenance tasks.
//!
//! Each task is independent, idempotent, and runs as a single linear
//! sequence: build request, send, branch on outcome, format, append one
//! record to its own log. Tasks never invoke each other and carry no shared
//! state beyond the injected [`GraphqlClient`](crate::graphql::GraphqlClient)
//! and [`TaskLogSink`](crate::sink::TaskLogSink).
//!
//! # Error contract
//!
//! Heartbeat, restock, and report catch every remote failure at the task
//! boundary and convert it into a log record; their `run()` only returns
//! `Err` when the log sink itself is broken. Order reminders is the one
//! deliberate exception: a GraphQL failure there is returned to the caller,
//! so the invoking scheduler observes it. The asymmetry is intentional and
//! expressed through the typed `Result` instead of divergent panic behavior.

pub mod heartbeat;
pub mod order_reminders;
pub mod report;
pub mod restock;

pub use heartbeat::{HeartbeatStatus, HeartbeatTask};
pub use order_reminders::OrderRemindersTask;
pub use report::ReportTask;
pub use restock::RestockTask;

use crate::errors::TaskError;
use async_trait::async_trait;

/// Common interface for the periodic tasks.
///
/// The binary dispatches on task name and drives one invocation to
/// completion; the external scheduler supplies the cadence.
#[async_trait]
pub trait PeriodicTask: Send + Sync {
    /// Short task name used for dispatch and tracing fields.
    fn name(&self) -> &'static str;

    /// Run one invocation of the task.
    async fn run(&self) -> Result<(), TaskError>;
}
