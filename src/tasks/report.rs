//! Weekly CRM report task.
//!
//! Queries the three scalar aggregates and appends a single summary line:
//!
//! ```text
//! 2026-08-29 06:00:00 - Report: 42 customers, 7 orders, 1999.5 revenue
//! ```
//!
//! Failures become a one-line error record instead; the task itself never
//! reports a remote failure to its caller.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::errors::{GraphqlError, TaskError};
use crate::graphql::GraphqlClient;
use crate::sink::TaskLogSink;
use crate::tasks::PeriodicTask;

const REPORT_QUERY: &str = "\
query {
    totalCustomers
    totalOrders
    totalRevenue
}";

/// The three aggregates, defaulting to zero when a field is absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrmTotals {
    #[serde(default)]
    total_customers: u64,
    #[serde(default)]
    total_orders: u64,
    #[serde(default)]
    total_revenue: f64,
}

/// The weekly report task.
pub struct ReportTask {
    client: GraphqlClient,
    sink: Arc<dyn TaskLogSink>,
    timeout: Duration,
}

impl ReportTask {
    pub fn new(client: GraphqlClient, sink: Arc<dyn TaskLogSink>, timeout: Duration) -> Self {
        Self {
            client,
            sink,
            timeout,
        }
    }
}

#[async_trait]
impl PeriodicTask for ReportTask {
    fn name(&self) -> &'static str {
        "report"
    }

    #[instrument(skip(self))]
    async fn run(&self) -> Result<(), TaskError> {
        let timestamp = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let entry = match self
            .client
            .execute::<CrmTotals>(REPORT_QUERY, None, self.timeout)
            .await
        {
            Ok(totals) => {
                info!(
                    report.customers = totals.total_customers,
                    report.orders = totals.total_orders,
                    report.revenue = totals.total_revenue,
                    "CRM report generated"
                );
                format!(
                    "{timestamp} - Report: {} customers, {} orders, {} revenue",
                    totals.total_customers, totals.total_orders, totals.total_revenue
                )
            }
            Err(GraphqlError::HttpStatus { status }) => {
                warn!(report.status = status, "CRM report query rejected");
                format!("{timestamp} - GraphQL error: {status}")
            }
            Err(e) => {
                warn!(report.error = %e, "CRM report query failed");
                format!("{timestamp} - Exception: {e}")
            }
        };

        self.sink.record(&entry).await?;
        Ok(())
    }
}
