use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("error-crmtasks-config-1 Required environment variable not set: {var_name}")]
    EnvVarRequired { var_name: String },

    #[error("error-crmtasks-config-2 Version not available")]
    VersionNotAvailable,

    #[error("error-crmtasks-config-3 Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("error-crmtasks-config-4 Invalid timeout value: {value}")]
    InvalidTimeout { value: String },

    #[error("error-crmtasks-config-5 Invalid log directory: {details}")]
    InvalidLogDirectory { details: String },
}

#[derive(Error, Debug)]
pub enum GraphqlError {
    #[error("error-crmtasks-graphql-1 HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("error-crmtasks-graphql-2 Request timeout: exceeded {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("error-crmtasks-graphql-3 Unexpected HTTP status: {status}")]
    HttpStatus { status: u16 },

    #[error("error-crmtasks-graphql-4 Response decoding failed: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("error-crmtasks-graphql-5 Response missing data object")]
    MissingData,
}

impl GraphqlError {
    /// The HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("error-crmtasks-sink-1 Log append failed: {path}: {source}")]
    AppendFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("error-crmtasks-task-1 GraphQL operation failed: {0}")]
    Graphql(#[from] GraphqlError),

    #[error("error-crmtasks-task-2 Log sink operation failed: {0}")]
    Sink(#[from] SinkError),
}
