//! GraphQL-over-HTTP client shared by all tasks.
//!
//! Every task issues at most one call: a POST of `{"query": <document>,
//! "variables": <map>}` to the configured endpoint, with the whole send
//! bounded by a per-call deadline. The response is expected to carry a
//! top-level `data` object which is decoded into the caller's response type.
//! Absent-field defaults live on those response structs (`#[serde(default)]`),
//! not at call sites.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::GraphqlEndpoint;
use crate::errors::GraphqlError;

/// Envelope for GraphQL HTTP responses: `{"data": ...}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
}

/// Thin GraphQL client over a shared [`reqwest::Client`].
#[derive(Clone)]
pub struct GraphqlClient {
    http_client: reqwest::Client,
    endpoint: GraphqlEndpoint,
}

impl GraphqlClient {
    pub fn new(http_client: reqwest::Client, endpoint: GraphqlEndpoint) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Execute a GraphQL document and decode the `data` object into `T`.
    ///
    /// The deadline covers connection, send, and body read. Outcomes map onto
    /// the error taxonomy the tasks classify against:
    ///
    /// - deadline elapsed -> [`GraphqlError::Timeout`]
    /// - connection/transport failure -> [`GraphqlError::Transport`]
    /// - non-200 status -> [`GraphqlError::HttpStatus`]
    /// - unparseable body -> [`GraphqlError::Decode`]
    /// - missing or null `data` -> [`GraphqlError::MissingData`]
    pub async fn execute<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: Option<Value>,
        deadline: Duration,
    ) -> Result<T, GraphqlError> {
        let mut body = serde_json::json!({ "query": document });
        if let Some(variables) = variables {
            body["variables"] = variables;
        }

        let request_future = self
            .http_client
            .post(self.endpoint.as_str())
            .json(&body)
            .send();

        let response = match tokio::time::timeout(deadline, request_future).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(GraphqlError::Transport(e)),
            Err(_) => {
                return Err(GraphqlError::Timeout {
                    timeout_ms: deadline.as_millis() as u64,
                });
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(GraphqlError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let text = match tokio::time::timeout(deadline, response.text()).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(GraphqlError::Transport(e)),
            Err(_) => {
                return Err(GraphqlError::Timeout {
                    timeout_ms: deadline.as_millis() as u64,
                });
            }
        };

        debug!(
            endpoint = %self.endpoint.as_str(),
            response.bytes = text.len(),
            "GraphQL response received"
        );

        let envelope: Envelope =
            serde_json::from_str(&text).map_err(|source| GraphqlError::Decode { source })?;

        let data = match envelope.data {
            Some(Value::Null) | None => return Err(GraphqlError::MissingData),
            Some(data) => data,
        };

        serde_json::from_value(data).map_err(|source| GraphqlError::Decode { source })
    }
}
