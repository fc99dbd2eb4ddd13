//! Heartbeat task: probes the GraphQL `hello` field and logs liveness.
//!
//! Every invocation appends exactly one line to the heartbeat log, whatever
//! the remote endpoint does:
//!
//! ```text
//! 29/08/2026-14:05:00 CRM is alive (GraphQL OK)
//! 29/08/2026-14:10:00 CRM is alive (GraphQL HTTP 500)
//! 29/08/2026-14:15:00 CRM is alive (GraphQL Error: ...)
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::errors::{GraphqlError, TaskError};
use crate::graphql::GraphqlClient;
use crate::sink::TaskLogSink;
use crate::tasks::PeriodicTask;

const HELLO_QUERY: &str = "{ hello }";

/// Response shape for the hello probe. The field is whatever the server's
/// schema declares; truthiness is evaluated on the decoded value.
#[derive(Debug, Deserialize)]
struct HelloProbe {
    #[serde(default)]
    hello: Value,
}

impl HelloProbe {
    /// A hello value counts as alive when it is a non-empty string, `true`,
    /// or a non-zero number. Missing and null fields are not alive.
    fn is_truthy(&self) -> bool {
        match &self.hello {
            Value::String(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::Null => false,
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

/// Classification of one heartbeat probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeartbeatStatus {
    /// HTTP 200 with a truthy `hello` field.
    Ok,
    /// HTTP 200 but the payload is missing a usable `hello` field.
    InvalidResponse,
    /// Non-200 HTTP status.
    Http(u16),
    /// Transport, timeout, or decode failure.
    Error(String),
}

impl fmt::Display for HeartbeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::InvalidResponse => write!(f, "Invalid Response"),
            Self::Http(code) => write!(f, "HTTP {code}"),
            Self::Error(description) => write!(f, "Error: {description}"),
        }
    }
}

/// The heartbeat task.
pub struct HeartbeatTask {
    client: GraphqlClient,
    sink: Arc<dyn TaskLogSink>,
    timeout: Duration,
}

impl HeartbeatTask {
    pub fn new(client: GraphqlClient, sink: Arc<dyn TaskLogSink>, timeout: Duration) -> Self {
        Self {
            client,
            sink,
            timeout,
        }
    }

    /// Probe the endpoint and classify the outcome. Never fails: every error
    /// path collapses into a [`HeartbeatStatus`].
    async fn probe(&self) -> HeartbeatStatus {
        match self
            .client
            .execute::<HelloProbe>(HELLO_QUERY, None, self.timeout)
            .await
        {
            Ok(probe) if probe.is_truthy() => HeartbeatStatus::Ok,
            Ok(_) => HeartbeatStatus::InvalidResponse,
            Err(GraphqlError::HttpStatus { status }) => HeartbeatStatus::Http(status),
            Err(GraphqlError::MissingData) => HeartbeatStatus::InvalidResponse,
            Err(e) => HeartbeatStatus::Error(e.to_string()),
        }
    }
}

#[async_trait]
impl PeriodicTask for HeartbeatTask {
    fn name(&self) -> &'static str {
        "heartbeat"
    }

    #[instrument(skip(self))]
    async fn run(&self) -> Result<(), TaskError> {
        let status = self.probe().await;
        let timestamp = chrono::Local::now().format("%d/%m/%Y-%H:%M:%S");
        let entry = format!("{timestamp} CRM is alive (GraphQL {status})");

        info!(heartbeat.status = %status, "Heartbeat probe completed");

        self.sink.record(&entry).await?;
        Ok(())
    }
}
