//! Entry point for running one CRM maintenance task.
//!
//! The external scheduler (cron or equivalent) invokes this binary with a
//! task name; each invocation runs that task once and exits. Cadences used by
//! the original deployment:
//!
//! - `crm-tasks heartbeat` — every 5 minutes
//! - `crm-tasks restock` — every 12 hours
//! - `crm-tasks report` — weekly, Monday 06:00
//! - `crm-tasks order-reminders` — daily, 08:00
//!
//! Exit status is non-zero when configuration fails, when the log sink cannot
//! be written, or when the order-reminder task's query fails (the only task
//! that surfaces remote failures).

use anyhow::Result;
use crm_tasks::{
    config::{
        self, Config, HEARTBEAT_LOG_FILE, ORDER_REMINDERS_LOG_FILE, REPORT_LOG_FILE,
        RESTOCK_LOG_FILE,
    },
    graphql::GraphqlClient,
    sink::FileTaskLogSink,
    tasks::{HeartbeatTask, OrderRemindersTask, PeriodicTask, ReportTask, RestockTask},
};
use std::env;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

fn usage() -> ! {
    eprintln!("usage: crm-tasks <heartbeat|restock|report|order-reminders>");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    let version = config::version()?;

    env::args().for_each(|arg| {
        if arg == "--version" {
            println!("{version}");
            std::process::exit(0);
        }
    });

    let task_name = match env::args().nth(1) {
        Some(name) => name,
        None => usage(),
    };

    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "crm_tasks=info".into()),
    );

    let fmt_layer = if std::env::var("JSON_LOGS").is_ok() {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let config = Config::new()?;

    tracing::info!(version = %version, task = %task_name, "Starting crm-tasks");

    let http_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(config.user_agent.clone())
        .build()?;

    let client = GraphqlClient::new(http_client, config.graphql_endpoint.clone());

    let task: Box<dyn PeriodicTask> = match task_name.as_str() {
        "heartbeat" => Box::new(HeartbeatTask::new(
            client,
            Arc::new(FileTaskLogSink::new(config.log_dir.file(HEARTBEAT_LOG_FILE))),
            *config.heartbeat_timeout.as_ref(),
        )),
        "restock" => Box::new(RestockTask::new(
            client,
            Arc::new(FileTaskLogSink::new(config.log_dir.file(RESTOCK_LOG_FILE))),
            *config.query_timeout.as_ref(),
        )),
        "report" => Box::new(ReportTask::new(
            client,
            Arc::new(FileTaskLogSink::new(config.log_dir.file(REPORT_LOG_FILE))),
            *config.query_timeout.as_ref(),
        )),
        "order-reminders" => Box::new(OrderRemindersTask::new(
            client,
            Arc::new(FileTaskLogSink::new(
                config.log_dir.file(ORDER_REMINDERS_LOG_FILE),
            )),
            *config.query_timeout.as_ref(),
        )),
        _ => usage(),
    };

    match task.run().await {
        Ok(()) => {
            tracing::info!(task = task.name(), "Task completed");
            Ok(())
        }
        Err(e) => {
            tracing::error!(task = task.name(), error = %e, "Task failed");
            Err(e.into())
        }
    }
}
