use crate::agent::DEFAULT_MAX_TOOL_STEPS;
use crate::llm::LLMConfig;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

const ENV_FILES: [&str; 2] = [".env.local", ".env"];

fn default_token_ttl_seconds() -> u64 {
    3600
}

/// Credentials for the LiveKit Cloud project the voice front end joins.
#[derive(Args, Clone, Default, Serialize, Deserialize)]
pub struct LiveKitConfig {
    /// LiveKit server URL, e.g. `wss://<project>.livekit.cloud`.
    #[arg(long = "livekit-url", global = true, env = "LIVEKIT_URL", default_value_t)]
    pub url: String,

    #[arg(id = "livekit_api_key", long = "livekit-api-key", global = true, env = "LIVEKIT_API_KEY", default_value_t)]
    pub api_key: String,

    #[arg(
        long = "livekit-api-secret",
        global = true,
        env = "LIVEKIT_API_SECRET",
        hide_env_values = true,
        default_value_t
    )]
    #[serde(skip_serializing)]
    pub api_secret: String,

    /// Lifetime of minted join tokens in seconds.
    #[arg(
        long = "livekit-token-ttl",
        global = true,
        env = "LIVEKIT_TOKEN_TTL_SECONDS",
        default_value_t = default_token_ttl_seconds()
    )]
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl LiveKitConfig {
    pub fn is_enabled(&self) -> bool {
        !self.url.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// Everything the agent binary needs, from flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct AgentConfig {
    #[command(flatten)]
    pub livekit: LiveKitConfig,

    #[command(flatten)]
    pub llm: LLMConfig,

    /// Tool-call rounds allowed per turn before the model must answer.
    #[arg(long, global = true, env = "DRIVE_THRU_MAX_TOOL_STEPS", default_value_t = DEFAULT_MAX_TOOL_STEPS)]
    pub max_tool_steps: usize,

    /// Where the receipt JSON is written.
    #[arg(long = "receipt", global = true, env = "DRIVE_THRU_RECEIPT_PATH", default_value = "receipt.json")]
    pub receipt_path: PathBuf,

    /// Directory `download-files` saves into.
    #[arg(long, global = true, env = "DRIVE_THRU_ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,

    /// Asset URLs for `download-files`, comma separated.
    #[arg(long = "asset-url", global = true, env = "DRIVE_THRU_ASSET_URLS", value_delimiter = ',')]
    pub asset_urls: Vec<String>,

    /// Address the HTTP server listens on.
    #[arg(long, global = true, env = "DRIVE_THRU_BIND", default_value = "0.0.0.0:3000")]
    pub bind: String,
}

/// Loads `.env.local` then `.env` into the process environment; earlier files
/// win. Returns the files that were found. Call before parsing the command line.
pub fn load_env_files() -> Vec<&'static str> {
    ENV_FILES
        .into_iter()
        .filter(|file| dotenv::from_filename(file).is_ok())
        .collect()
}
