//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::analytics::{split_list, FetchSettings, OAuthSettings};
use crate::config::{api, defaults, env};

/// Universal Analytics report exporter
#[derive(Parser, Debug)]
#[command(name = "uaexport")]
#[command(version)]
#[command(
    about = "Export a paginated Universal Analytics report to TSV and JSON",
    long_about = None
)]
pub struct Cli {
    /// First day of the report (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: String,

    /// Last day of the report, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: String,

    /// Report (view) identifier
    #[arg(long, default_value = defaults::IDS)]
    pub ids: String,

    /// Comma-separated dimension names
    #[arg(long, default_value = defaults::DIMENSIONS)]
    pub dimensions: String,

    /// Comma-separated metric names
    #[arg(long, default_value = defaults::METRICS)]
    pub metrics: String,

    /// Reporting API endpoint
    #[arg(long, default_value = api::BASE_URL)]
    pub base_url: String,

    /// Current access token
    #[arg(short = 't', long, env = env::CURRENT_TOKEN, hide_env_values = true)]
    pub token: Option<String>,

    /// OAuth client id used for token refresh
    #[arg(long, env = env::CLIENT_ID, hide_env_values = true)]
    pub client_id: Option<String>,

    /// OAuth client secret used for token refresh
    #[arg(long, env = env::CLIENT_SECRET, hide_env_values = true)]
    pub client_secret: Option<String>,

    /// OAuth refresh token
    #[arg(long, env = env::REFRESH_TOKEN, hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// OAuth grant type
    #[arg(long, env = env::GRANT_TYPE, default_value = defaults::GRANT_TYPE)]
    pub grant_type: String,

    /// OAuth token endpoint
    #[arg(long, default_value = api::TOKEN_URL)]
    pub token_url: String,

    /// Env file that receives refreshed tokens
    #[arg(long, default_value = defaults::ENV_FILE)]
    pub env_file: PathBuf,

    /// Directory for exported files
    #[arg(long, default_value = defaults::EXPORT_DIR)]
    pub export_dir: PathBuf,

    /// Base name of exported files
    #[arg(long, default_value = defaults::NAME)]
    pub name: String,

    /// Append-only activity log
    #[arg(long, default_value = defaults::LOG_FILE)]
    pub log_file: PathBuf,

    /// Re-attempts allowed per page request
    #[arg(long, default_value_t = defaults::MAX_RETRIES)]
    pub max_retries: u32,

    /// Pause before each continuation request, in milliseconds
    #[arg(long, default_value_t = defaults::PAGE_DELAY.as_millis() as u64)]
    pub page_delay_ms: u64,

    /// Pause after a token refresh, in milliseconds
    #[arg(long, default_value_t = defaults::REFRESH_COOLDOWN.as_millis() as u64)]
    pub refresh_cooldown_ms: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// Hide the progress bar
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl Cli {
    pub fn dimension_list(&self) -> Vec<String> {
        split_list(&self.dimensions)
    }

    pub fn metric_list(&self) -> Vec<String> {
        split_list(&self.metrics)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            max_retries: self.max_retries,
            page_delay: Duration::from_millis(self.page_delay_ms),
            refresh_cooldown: Duration::from_millis(self.refresh_cooldown_ms),
        }
    }

    /// OAuth settings with missing values left empty; the token endpoint
    /// rejects them at refresh time.
    pub fn oauth_settings(&self) -> OAuthSettings {
        OAuthSettings {
            token_url: self.token_url.clone(),
            client_id: self.client_id.clone().unwrap_or_default(),
            client_secret: self.client_secret.clone().unwrap_or_default(),
            refresh_token: self.refresh_token.clone().unwrap_or_default(),
            grant_type: self.grant_type.clone(),
        }
    }
}
