//! Client configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// How requests authenticate against the cloud.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Credentials {
    /// Access key sent as a bearer token (SeeTest Cloud: user menu, "Get Access Key")
    Token { token: String },
    /// Username and password sent with HTTP basic authentication
    Basic { username: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token { .. } => f.debug_struct("Token").field("token", &"***").finish(),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Connection settings for one cloud server.
///
/// ```yaml
/// server_url: https://cloud.example.com
/// credentials:
///   token: eyJ...
/// timeout_secs: 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    pub server_url: String,
    pub credentials: Credentials,
    /// Request timeout; absent means requests never time out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn with_token(server_url: &str, token: impl Into<String>) -> Self {
        Self {
            server_url: normalize_url(server_url),
            credentials: Credentials::Token {
                token: token.into(),
            },
            timeout_secs: None,
        }
    }

    pub fn with_basic_auth(
        server_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_url: normalize_url(server_url),
            credentials: Credentials::Basic {
                username: username.into(),
                password: password.into(),
            },
            timeout_secs: None,
        }
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: ClientConfig = serde_yaml::from_str(&contents)?;
        config.server_url = normalize_url(&config.server_url);
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let url = self.server_url.trim();
        if url.is_empty() {
            anyhow::bail!("server_url must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!(
                "Unsupported server_url '{}'. The SeeTest Cloud address must start with http:// or https://",
                url
            );
        }

        match &self.credentials {
            Credentials::Token { token } if token.trim().is_empty() => {
                anyhow::bail!("Access token must not be empty")
            }
            Credentials::Basic { username, .. } if username.trim().is_empty() => {
                anyhow::bail!("Username must not be empty")
            }
            _ => {}
        }

        if self.timeout_secs == Some(0) {
            anyhow::bail!("timeout_secs must be positive; omit it to disable the timeout");
        }

        Ok(())
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
