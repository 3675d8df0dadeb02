use serde::{Deserialize, Serialize};

use crate::error::EmbedError;

/// Configuration for embedding generation.
///
/// `mode` selects the implementation: `"api"` posts to a deployed
/// embedding endpoint, `"stub"` generates deterministic vectors locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Model identifier, forwarded to the endpoint and recorded for
    /// observability.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Endpoint URL; required in api mode.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Value for the `Authorization` header, if the endpoint needs one.
    #[serde(default)]
    pub api_auth_header: Option<String>,

    /// Per-request timeout. A timeout aborts the whole matching run.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Vector dimension produced by the stub. In api mode the dimension is
    /// whatever the deployed model returns.
    #[serde(default = "default_dim")]
    pub dim: usize,

    /// L2-normalize vectors before returning them.
    #[serde(default = "default_true")]
    pub normalize: bool,
}

impl EmbedConfig {
    pub fn validate(&self) -> Result<(), EmbedError> {
        match self.mode.as_str() {
            "stub" => {}
            "api" => {
                if self.api_url.as_deref().map_or(true, str::is_empty) {
                    return Err(EmbedError::InvalidConfig(
                        "api_url is required for api mode".into(),
                    ));
                }
            }
            other => {
                return Err(EmbedError::InvalidConfig(format!(
                    "mode must be \"stub\" or \"api\", got {other:?}"
                )));
            }
        }
        if self.dim == 0 {
            return Err(EmbedError::InvalidConfig("dim must be >= 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(EmbedError::InvalidConfig("timeout_secs must be >= 1".into()));
        }
        Ok(())
    }
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            model_name: default_model_name(),
            api_url: None,
            api_auth_header: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            dim: default_dim(),
            normalize: default_true(),
        }
    }
}

fn default_mode() -> String {
    "stub".to_string()
}

fn default_model_name() -> String {
    "text-embedding-004".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_dim() -> usize {
    768
}

fn default_true() -> bool {
    true
}
