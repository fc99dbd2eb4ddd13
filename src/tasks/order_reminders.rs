//! Order reminder task.
//!
//! Computes a 7-day lookback window, queries orders placed on or after that
//! date, and appends one block to the reminder log: a run header followed by
//! either `No recent pending orders.` or one line per order.
//!
//! This is the one task whose remote failure is surfaced to the caller. The
//! other three convert every failure into a log record; here a GraphQL
//! failure returns `Err`, nothing is logged for the failed run, and the
//! binary exits non-zero so the invoking scheduler notices. Deliberate,
//! not an oversight.

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::errors::TaskError;
use crate::graphql::GraphqlClient;
use crate::sink::TaskLogSink;
use crate::tasks::PeriodicTask;

const RECENT_ORDERS_QUERY: &str = "\
query GetRecentOrders($startDate: Date!) {
    orders(filter: { orderDate_Gte: $startDate }) {
        id
        orderDate
        customer {
            email
        }
    }
}";

#[derive(Debug, Default, Deserialize)]
struct RecentOrders {
    #[serde(default)]
    orders: Vec<OrderReminder>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderReminder {
    #[serde(default)]
    id: String,
    #[serde(default)]
    #[allow(dead_code)]
    order_date: String,
    #[serde(default)]
    customer: OrderCustomer,
}

#[derive(Debug, Default, Deserialize)]
struct OrderCustomer {
    #[serde(default)]
    email: String,
}

/// The order reminder task.
pub struct OrderRemindersTask {
    client: GraphqlClient,
    sink: Arc<dyn TaskLogSink>,
    timeout: Duration,
    /// Lookback window in days.
    lookback_days: u64,
}

impl OrderRemindersTask {
    pub fn new(client: GraphqlClient, sink: Arc<dyn TaskLogSink>, timeout: Duration) -> Self {
        Self {
            client,
            sink,
            timeout,
            lookback_days: 7,
        }
    }

    fn start_date(&self) -> NaiveDate {
        Local::now()
            .date_naive()
            .checked_sub_days(Days::new(self.lookback_days))
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn build_record(timestamp: &str, orders: &[OrderReminder]) -> String {
        // Leading blank line separates runs, matching the historical log
        // layout consumers of this file already parse.
        let mut record = format!("\n[{timestamp}] Order Reminder Run");
        if orders.is_empty() {
            record.push_str("\nNo recent pending orders.");
        } else {
            for order in orders {
                record.push_str(&format!(
                    "\nOrder ID: {} | Customer: {}",
                    order.id, order.customer.email
                ));
            }
        }
        record
    }
}

#[async_trait]
impl PeriodicTask for OrderRemindersTask {
    fn name(&self) -> &'static str {
        "order-reminders"
    }

    #[instrument(skip(self))]
    async fn run(&self) -> Result<(), TaskError> {
        let start_date = self.start_date();
        let variables = serde_json::json!({ "startDate": start_date.to_string() });

        // No catch-and-log here: a GraphQL failure propagates to the caller.
        let data: RecentOrders = self
            .client
            .execute(RECENT_ORDERS_QUERY, Some(variables), self.timeout)
            .await?;

        info!(
            reminders.start_date = %start_date,
            reminders.orders = data.orders.len(),
            "Order reminders processed"
        );

        let timestamp = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        let record = Self::build_record(&timestamp, &data.orders);

        self.sink.record(&record).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphqlEndpoint;
    use crate::sink::MemoryTaskLogSink;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn task_for(uri: &str, sink: Arc<MemoryTaskLogSink>) -> OrderRemindersTask {
        let endpoint = GraphqlEndpoint::try_from(format!("{uri}/graphql")).unwrap();
        let client = GraphqlClient::new(reqwest::Client::new(), endpoint);
        OrderRemindersTask::new(client, sink, Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_reminders_empty_orders() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"orders": []}})),
            )
            .mount(&server)
            .await;

        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for(&server.uri(), sink.clone());
        task.run().await.unwrap();

        let entries = sink.entries().await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("Order Reminder Run"));
        assert!(entries[0].contains("No recent pending orders."));
    }

    #[tokio::test]
    async fn test_reminders_one_line_per_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"orders": [
                    {"id": "1", "orderDate": "2026-08-25", "customer": {"email": "a@b.com"}},
                    {"id": "2", "orderDate": "2026-08-27", "customer": {"email": "c@d.com"}}
                ]}
            })))
            .mount(&server)
            .await;

        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for(&server.uri(), sink.clone());
        task.run().await.unwrap();

        let entries = sink.entries().await;
        assert!(entries[0].contains("Order ID: 1 | Customer: a@b.com"));
        assert!(entries[0].contains("Order ID: 2 | Customer: c@d.com"));
    }

    #[tokio::test]
    async fn test_reminders_sends_seven_day_lookback_variable() {
        let expected = Local::now()
            .date_naive()
            .checked_sub_days(Days::new(7))
            .unwrap()
            .to_string();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains(expected))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"orders": []}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for(&server.uri(), sink.clone());
        task.run().await.unwrap();

        server.verify().await;
    }

    #[tokio::test]
    async fn test_reminders_propagate_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for(&server.uri(), sink.clone());

        let err = task.run().await.unwrap_err();
        assert!(matches!(err, TaskError::Graphql(_)));
        // The failed run leaves no record behind.
        assert!(sink.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_reminders_propagate_connection_failure() {
        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for("http://127.0.0.1:9", sink.clone());

        assert!(task.run().await.is_err());
        assert!(sink.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_reminders_two_runs_two_records() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"orders": []}})),
            )
            .mount(&server)
            .await;

        let sink = Arc::new(MemoryTaskLogSink::new());
        let task = task_for(&server.uri(), sink.clone());
        task.run().await.unwrap();
        task.run().await.unwrap();

        assert_eq!(sink.entries().await.len(), 2);
    }
}
