//! Low-stock restock task.
//!
//! Issues the `updateLowStockProducts` mutation; the server decides which
//! products are below threshold and by how much to restock them. On success
//! the log gets one multi-line record: the server's summary message followed
//! by one indented line per updated product.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::errors::{GraphqlError, TaskError};
use crate::graphql::GraphqlClient;
use crate::sink::TaskLogSink;
use crate::tasks::PeriodicTask;

const RESTOCK_MUTATION: &str = "\
mutation {
    updateLowStockProducts {
        message
        updatedProducts {
            name
            stock
        }
    }
}";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestockData {
    #[serde(default)]
    update_low_stock_products: RestockResult,
}

/// Payload of the `updateLowStockProducts` mutation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestockResult {
    #[serde(default)]
    message: String,
    #[serde(default)]
    updated_products: Vec<UpdatedProduct>,
}

#[derive(Debug, Deserialize)]
struct UpdatedProduct {
    #[serde(default)]
    name: String,
    #[serde(default)]
    stock: i64,
}

/// The low-stock restock task.
pub struct RestockTask {
    client: GraphqlClient,
    sink: Arc<dyn TaskLogSink>,
    timeout: Duration,
}

impl RestockTask {
    pub fn new(client: GraphqlClient, sink: Arc<dyn TaskLogSink>, timeout: Duration) -> Self {
        Self {
            client,
            sink,
            timeout,
        }
    }

    fn success_record(timestamp: &str, result: &RestockResult) -> String {
        let mut record = format!("{timestamp} {}", result.message);
        for product in &result.updated_products {
            record.push_str(&format!("\n  - {}: stock now {}", product.name, product.stock));
        }
        record
    }
}

#[async_trait]
impl PeriodicTask for RestockTask {
    fn name(&self) -> &'static str {
        "restock"
    }

    #[instrument(skip(self))]
    async fn run(&self) -> Result<(), TaskError> {
        let timestamp = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let entry = match self
            .client
            .execute::<RestockData>(RESTOCK_MUTATION, None, self.timeout)
            .await
        {
            Ok(data) => {
                let result = data.update_low_stock_products;
                info!(
                    restock.updated = result.updated_products.len(),
                    restock.message = %result.message,
                    "Restock mutation completed"
                );
                Self::success_record(&timestamp, &result)
            }
            Err(GraphqlError::HttpStatus { status }) => {
                warn!(restock.status = status, "Restock mutation rejected");
                format!("{timestamp} Restock failed: HTTP {status}")
            }
            Err(e) => {
                warn!(restock.error = %e, "Restock mutation failed");
                format!("{timestamp} Restock failed: {e}")
            }
        };

        self.sink.record(&entry).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphqlEndpoint;
    use crate::sink::MemoryTaskLogSink;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn task_for(uri: &str, sink: Arc<MemoryTaskLogSink>) -> RestockTask {
        let endpoint = GraphqlEndpoint::try_from(format!("{uri}/graphql")).unwrap();
        let client = GraphqlClient::new(reqwest::Client::new(), endpoint);
        RestockTask::new(client, sink, Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_restock_logs_summary_and_products() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "updateLowStockProducts": {
                        "message": "2 products restocked!",
                        "updatedProducts": [
                            {"name": "Widget", "stock": 15},
                            {"name": "Gadget", "stock": 12}
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for(&server.uri(), sink.clone());
        task.run().await.unwrap();

        let entries = sink.entries().await;
        assert_eq!(entries.len(), 1);

        let record = &entries[0];
        let mut lines = record.lines();
        assert!(lines.next().unwrap().ends_with("2 products restocked!"));
        assert_eq!(lines.next().unwrap(), "  - Widget: stock now 15");
        assert_eq!(lines.next().unwrap(), "  - Gadget: stock now 12");
        assert!(lines.next().is_none());
    }

    #[tokio::test]
    async fn test_restock_with_no_updated_products() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "updateLowStockProducts": {
                        "message": "0 products restocked!",
                        "updatedProducts": []
                    }
                }
            })))
            .mount(&server)
            .await;

        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for(&server.uri(), sink.clone());
        task.run().await.unwrap();

        let entries = sink.entries().await;
        assert_eq!(entries[0].lines().count(), 1);
        assert!(entries[0].contains("0 products restocked!"));
    }

    #[tokio::test]
    async fn test_restock_http_error_logged_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for(&server.uri(), sink.clone());
        task.run().await.unwrap();

        let entries = sink.entries().await;
        assert!(entries[0].contains("Restock failed: HTTP 503"));
    }

    #[tokio::test]
    async fn test_restock_connection_error_logged_not_raised() {
        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for("http://127.0.0.1:9", sink.clone());
        task.run().await.unwrap();

        let entries = sink.entries().await;
        assert!(entries[0].contains("Restock failed:"));
    }

    #[tokio::test]
    async fn test_restock_defaults_for_partial_payload() {
        // Server omits updatedProducts entirely; defaults apply at the
        // schema boundary instead of failing the task.
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"updateLowStockProducts": {"message": "done"}}
            })))
            .mount(&server)
            .await;

        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for(&server.uri(), sink.clone());
        task.run().await.unwrap();

        let entries = sink.entries().await;
        assert!(entries[0].ends_with("done"));
    }
}
