//! Error types returned by the client and the query engine.

use crate::keys::{ListKey, OsType};
use crate::record::DeviceId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CloudError>;

/// Machine-readable classification of a [`CloudError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedResponse,
    NotJsonObject,
    NoDeviceFound,
    AmbiguousQuery,
    WrongPlatform,
    Transport,
    InvalidArgument,
}

/// Failures raised while talking to the server, before any payload is parsed.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(
        "Cannot reach {url}. Verify the network connection and the SeeTest Cloud server URL: {message}"
    )]
    Unreachable { url: String, message: String },
    #[error("Authentication rejected. Verify the SeeTest Cloud access key or login credentials. Response: {body}")]
    Unauthorized { body: String },
    #[error("This API is not available for the current user role. Response: {body}")]
    Forbidden { body: String },
    #[error("{}", describe_status(.status, .message))]
    Status {
        status: u16,
        message: Option<String>,
        body: String,
    },
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

fn describe_status(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("Request failed with status {status}: {message}"),
        None => format!("Request failed with status {status}"),
    }
}

impl TransportError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Unauthorized { .. } => Some(401),
            TransportError::Forbidden { .. } => Some(403),
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Unreachable { .. } | TransportError::Client(_) => None,
        }
    }
}

/// Errors that can occur when querying or mutating devices.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Malformed response: entry {index} of the device list is not a JSON object")]
    NotJsonObject { index: usize },
    #[error("No device found in the SeeTest Cloud for {query}")]
    NoDeviceFound { query: String },
    #[error(
        "{count} devices found in the SeeTest Cloud for {query}. Add more attributes to select a single device"
    )]
    AmbiguousQuery { count: usize, query: String },
    #[error("{key} is only available on {platform} devices, but device {device} runs {actual}")]
    WrongPlatform {
        key: ListKey,
        platform: OsType,
        device: DeviceId,
        actual: String,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CloudError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CloudError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            CloudError::NotJsonObject { .. } => ErrorKind::NotJsonObject,
            CloudError::NoDeviceFound { .. } => ErrorKind::NoDeviceFound,
            CloudError::AmbiguousQuery { .. } => ErrorKind::AmbiguousQuery,
            CloudError::WrongPlatform { .. } => ErrorKind::WrongPlatform,
            CloudError::Transport(_) => ErrorKind::Transport,
            CloudError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        CloudError::MalformedResponse(message.into())
    }
}

impl From<serde_json::Error> for CloudError {
    fn from(e: serde_json::Error) -> Self {
        CloudError::MalformedResponse(format!("invalid JSON: {e}"))
    }
}
