use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, Map};
use serde::Deserialize;

use crate::analyzer::highlights::{LevelFilter, HIGHLIGHT_LEVELS};
use crate::analyzer::DEFAULT_LOOKBACK_DAYS;

const CONFIG_FILE: &str = "club_digest";
const ENV_PREFIX: &str = "DIGEST";

pub const DEFAULT_BASE_URL: &str = "https://www.athle.fr/bases/liste.aspx";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Compatible; ClubDigest/0.1; +https://github.com/club-digest)";
/// Dashboard "high level" counter; broader than the highlight prefixes.
pub const DASHBOARD_LEVELS: &[&str] = &["N", "I"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub lookback_days: u32,
    pub highlight_levels: Vec<String>,
    pub dashboard_levels: Vec<String>,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub resend_api_key: Option<String>,
    pub resend_to: Option<String>,
    pub mail_from: String,
}

impl Settings {
    /// Defaults, then `club_digest.toml` if present, then `DIGEST_*` env vars.
    pub fn load() -> Result<Self> {
        let config = defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(env_source(None))
            .build()
            .context("Failed to build configuration")?;
        let mut settings = Self::from_config(config)?;

        // Conventional names for the mail provider secrets.
        if settings.resend_api_key.is_none() {
            settings.resend_api_key = std::env::var("RESEND_API_KEY").ok();
        }
        if settings.resend_to.is_none() {
            settings.resend_to = std::env::var("RESEND_TO_EMAIL").ok();
        }
        Ok(settings)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        config.try_deserialize().context("Invalid configuration")
    }

    pub fn highlight_filter(&self) -> LevelFilter {
        LevelFilter::new(&self.highlight_levels)
    }

    pub fn dashboard_filter(&self) -> LevelFilter {
        LevelFilter::new(&self.dashboard_levels)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("lookback_days", i64::from(DEFAULT_LOOKBACK_DAYS))?
        .set_default("highlight_levels", to_strings(HIGHLIGHT_LEVELS))?
        .set_default("dashboard_levels", to_strings(DASHBOARD_LEVELS))?
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("user_agent", DEFAULT_USER_AGENT)?
        .set_default("timeout_secs", 40)?
        .set_default("concurrency", 4)?
        .set_default("mail_from", "Club Digest <noreply@club-digest.fr>")?)
}

/// `DIGEST_*` variables; level lists are comma-separated. `vars` replaces the process env.
fn env_source(vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("highlight_levels")
        .with_list_parse_key("dashboard_levels")
        .source(vars)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
