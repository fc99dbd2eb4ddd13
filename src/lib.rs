//! # crm-tasks
//!
//! crm-tasks is a small collection of periodic maintenance tasks for a CRM web
//! application. Each task makes at most one GraphQL call against the CRM's
//! HTTP endpoint and appends one human-readable record to its own append-only
//! text log. There is no scheduler in this crate: an external cron invokes the
//! `crm-tasks` binary with a task name on whatever cadence the deployment
//! wants.
//!
//! ## Architecture Overview
//!
//! ### Tasks
//! - **Heartbeat**: probes the GraphQL `hello` field and logs a liveness line
//! - **Restock**: runs the `updateLowStockProducts` mutation and logs each
//!   restocked product
//! - **Report**: queries customer/order/revenue totals and logs a summary
//! - **Order reminders**: queries orders from the last 7 days and logs one
//!   reminder line per order
//!
//! ### Shared infrastructure
//! - [`graphql::GraphqlClient`] sends GraphQL documents over HTTP with a
//!   per-call deadline and decodes the `data` envelope into typed structs
//! - [`sink::TaskLogSink`] abstracts the per-task log so tasks can write to a
//!   file in production and an in-memory buffer in tests
//! - [`config::Config`] loads the endpoint URL, timeouts, and log directory
//!   from environment variables
//!
//! ### Error contract
//! Heartbeat, restock, and report convert every remote failure (timeout,
//! non-200 status, malformed payload) into a log record and return `Ok`. The
//! order-reminder task is the one deliberate exception: a GraphQL failure is
//! returned to the caller as `Err`, so the invoking scheduler sees it.

/// Environment-driven service configuration.
///
/// Loads the GraphQL endpoint, per-task timeouts, and log directory from
/// environment variables with validated newtype wrappers.
pub mod config;

/// Error types used across the crate.
///
/// One enum per domain, each with stable error-code message prefixes.
pub mod errors;

/// GraphQL-over-HTTP client shared by all tasks.
///
/// POSTs `{"query", "variables"}` JSON documents and decodes the `data`
/// envelope into caller-supplied response types.
pub mod graphql;

/// Log sink abstraction for task records.
///
/// Provides the `TaskLogSink` trait with file-backed, in-memory, and
/// tracing-backed implementations.
pub mod sink;

/// The periodic task implementations.
///
/// Each task is a single linear sequence: build request, send, branch on
/// outcome, format, append to its log.
pub mod tasks;
