//! Cluster target configuration
//!
//! Sourced entirely from the process environment. An absent or empty host
//! means "no live test requested", never an error.

use tracing::warn;

pub const ENV_HOST: &str = "TARGET_HOST";
pub const ENV_PORT: &str = "TARGET_PORT";
pub const ENV_NAMESPACE: &str = "TARGET_NAMESPACE";
pub const ENV_SET: &str = "TARGET_SET";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_NAMESPACE: &str = "test";
pub const DEFAULT_SET: &str = "default-smoke-set";

/// Where the optional live test points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTarget {
    /// Seed host; `None` disables the live stages
    pub host: Option<String>,
    pub port: u16,
    pub namespace: String,
    pub set_name: String,
}

impl ClusterTarget {
    /// Read the target from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the target through a lookup function; lets tests avoid touching
    /// the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup(ENV_HOST).filter(|h| !h.is_empty());

        let port = match lookup(ENV_PORT) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    warn!("unparseable {ENV_PORT}={raw:?}, using default {DEFAULT_PORT}");
                    DEFAULT_PORT
                }
            },
            None => DEFAULT_PORT,
        };

        let namespace = lookup(ENV_NAMESPACE)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let set_name = lookup(ENV_SET)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SET.to_string());

        Self {
            host,
            port,
            namespace,
            set_name,
        }
    }

    /// Whether a live cluster test was requested
    pub fn live_test_requested(&self) -> bool {
        self.host.is_some()
    }
}
