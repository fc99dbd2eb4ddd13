use crate::errors::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;

type Result<T> = std::result::Result<T, ConfigError>;

/// GraphQL endpoint URL configuration.
///
/// Wraps the URL of the CRM's GraphQL endpoint. Values are validated to be
/// http or https URLs during construction.
#[derive(Clone, Debug)]
pub struct GraphqlEndpoint(String);

impl GraphqlEndpoint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GraphqlEndpoint {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidEndpoint { url: value })
        }
    }
}

/// HTTP request timeout configuration.
///
/// Parses a positive number of seconds into a [`Duration`]. Each task carries
/// its own timeout: the heartbeat probe uses a short one, the query and
/// mutation tasks a longer one.
#[derive(Clone, Debug)]
pub struct HttpTimeout(Duration);

impl TryFrom<String> for HttpTimeout {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self> {
        let seconds = value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout {
                value: value.clone(),
            })?;

        if seconds == 0 {
            return Err(ConfigError::InvalidTimeout { value });
        }

        Ok(Self(Duration::from_secs(seconds)))
    }
}

impl AsRef<Duration> for HttpTimeout {
    fn as_ref(&self) -> &Duration {
        &self.0
    }
}

/// Log directory configuration.
///
/// The directory that receives the per-task log files. Files are created on
/// first append; the directory itself must already exist at runtime.
#[derive(Clone, Debug)]
pub struct LogDirectory(PathBuf);

impl LogDirectory {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Resolve the log file path for a task-specific file name.
    pub fn file(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl TryFrom<String> for LogDirectory {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self> {
        if value.is_empty() {
            return Err(ConfigError::InvalidLogDirectory {
                details: "log directory must not be empty".to_string(),
            });
        }
        Ok(Self(PathBuf::from(value)))
    }
}

/// Log file name for the heartbeat task.
pub const HEARTBEAT_LOG_FILE: &str = "crm_heartbeat_log.txt";
/// Log file name for the low-stock restock task.
pub const RESTOCK_LOG_FILE: &str = "low_stock_updates_log.txt";
/// Log file name for the weekly report task.
pub const REPORT_LOG_FILE: &str = "crm_report_log.txt";
/// Log file name for the order reminder task.
pub const ORDER_REMINDERS_LOG_FILE: &str = "order_reminders_log.txt";

/// Service configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// CRM GraphQL endpoint URL.
    pub graphql_endpoint: GraphqlEndpoint,
    /// Directory holding the per-task log files.
    pub log_dir: LogDirectory,
    /// Timeout for the heartbeat probe.
    pub heartbeat_timeout: HttpTimeout,
    /// Timeout for the restock, report, and order-reminder calls.
    pub query_timeout: HttpTimeout,
    /// User agent sent with outbound HTTP requests.
    pub user_agent: String,
    /// Service version string.
    pub version: String,
}

impl Config {
    /// Creates a new configuration instance by loading values from
    /// environment variables.
    ///
    /// Every variable has a default, so a bare environment produces the same
    /// behavior as the original deployment: endpoint
    /// `http://localhost:8000/graphql`, logs under `/tmp`, 5 second heartbeat
    /// timeout, 10 second query timeout.
    ///
    /// # Environment Variables
    ///
    /// - `CRM_GRAPHQL_ENDPOINT`: GraphQL endpoint URL
    /// - `CRM_LOG_DIR`: directory for the per-task log files
    /// - `CRM_HEARTBEAT_TIMEOUT`: heartbeat timeout in seconds
    /// - `CRM_QUERY_TIMEOUT`: query/mutation timeout in seconds
    /// - `USER_AGENT`: outbound HTTP user agent
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a provided value is invalid (non-URL
    /// endpoint, zero or non-numeric timeout, empty log directory).
    pub fn new() -> Result<Self> {
        let graphql_endpoint: GraphqlEndpoint =
            default_env("CRM_GRAPHQL_ENDPOINT", "http://localhost:8000/graphql").try_into()?;
        let log_dir: LogDirectory = default_env("CRM_LOG_DIR", "/tmp").try_into()?;
        let heartbeat_timeout: HttpTimeout = default_env("CRM_HEARTBEAT_TIMEOUT", "5").try_into()?;
        let query_timeout: HttpTimeout = default_env("CRM_QUERY_TIMEOUT", "10").try_into()?;

        let version = version()?;
        let default_user_agent = format!("crm-tasks/{version}");
        let user_agent = default_env("USER_AGENT", &default_user_agent);

        Ok(Self {
            graphql_endpoint,
            log_dir,
            heartbeat_timeout,
            query_timeout,
            user_agent,
            version,
        })
    }
}

/// Retrieves an environment variable with a default value if not set.
fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or(default_value.to_string())
}

/// Retrieves the service version from compile-time environment variables.
///
/// Attempts `GIT_HASH` first (set by build.rs when available), falling back
/// to `CARGO_PKG_VERSION`.
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotAvailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_endpoint_accepts_http_and_https() {
        assert!(GraphqlEndpoint::try_from("http://localhost:8000/graphql".to_string()).is_ok());
        assert!(GraphqlEndpoint::try_from("https://crm.example.com/graphql".to_string()).is_ok());
    }

    #[test]
    fn test_graphql_endpoint_rejects_other_schemes() {
        let err = GraphqlEndpoint::try_from("ftp://example.com".to_string());
        assert!(err.is_err());

        let err = GraphqlEndpoint::try_from("localhost:8000/graphql".to_string());
        assert!(err.is_err());
    }

    #[test]
    fn test_http_timeout_parses_seconds() {
        let timeout = HttpTimeout::try_from("5".to_string()).unwrap();
        assert_eq!(*timeout.as_ref(), Duration::from_secs(5));
    }

    #[test]
    fn test_http_timeout_rejects_zero_and_garbage() {
        assert!(HttpTimeout::try_from("0".to_string()).is_err());
        assert!(HttpTimeout::try_from("ten".to_string()).is_err());
        assert!(HttpTimeout::try_from("".to_string()).is_err());
    }

    #[test]
    fn test_log_directory_joins_file_names() {
        let dir = LogDirectory::try_from("/tmp".to_string()).unwrap();
        assert_eq!(
            dir.file(HEARTBEAT_LOG_FILE),
            PathBuf::from("/tmp/crm_heartbeat_log.txt")
        );
    }

    #[test]
    fn test_log_directory_rejects_empty() {
        assert!(LogDirectory::try_from(String::new()).is_err());
    }

    #[test]
    fn test_version_available() {
        // CARGO_PKG_VERSION is always set under cargo.
        assert!(version().is_ok());
    }
}
