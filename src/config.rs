use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub admin_keys: Vec<AdminKeyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

/// Supabase project access (PostgREST)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`
    pub url: String,
    /// Service-role key; bypasses row-level security
    pub service_role_key: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Postgres LISTEN/NOTIFY change feed
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RealtimeConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Direct Postgres connection string (session pooler or direct host)
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Install the notify triggers on startup
    #[serde(default)]
    pub run_migrations: bool,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            database_url: None,
            channel: default_channel(),
            run_migrations: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default = "default_recent_projects_limit")]
    pub recent_projects_limit: usize,
    /// `clients.status` value counted as an active client
    #[serde(default = "default_active_client_status")]
    pub active_client_status: String,
    /// `contact_submissions.status` value excluded from unread messages
    #[serde(default = "default_archived_message_status")]
    pub archived_message_status: String,
    /// SSE keep-alive interval
    #[serde(default = "default_heartbeat_seconds")]
    pub heartbeat_seconds: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_projects_limit: default_recent_projects_limit(),
            active_client_status: default_active_client_status(),
            archived_message_status: default_archived_message_status(),
            heartbeat_seconds: default_heartbeat_seconds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminKeyConfig {
    pub key: String,
    pub name: String,
    pub enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Channel the bundled trigger migration notifies on
pub const MIGRATION_CHANNEL: &str = "miraidev_changes";

fn default_channel() -> String {
    MIGRATION_CHANNEL.to_string()
}

fn default_recent_projects_limit() -> usize {
    5
}

fn default_active_client_status() -> String {
    "aktif".to_string()
}

fn default_archived_message_status() -> String {
    "diarsipkan".to_string()
}

fn default_heartbeat_seconds() -> u64 {
    15
}

/// Load configuration from `path`, overridden by `MIRAIDEV__*` environment variables
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("MIRAIDEV").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        anyhow::bail!("Server port must be non-zero");
    }

    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("Invalid log format '{}': expected 'text' or 'json'", other),
    }

    let url = url::Url::parse(&cfg.supabase.url)
        .map_err(|e| anyhow::anyhow!("Invalid Supabase URL '{}': {}", cfg.supabase.url, e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("Supabase URL must use http or https, got '{}'", url.scheme());
    }

    if cfg.supabase.service_role_key.trim().is_empty() {
        anyhow::bail!("Supabase service_role_key cannot be empty");
    }

    if cfg.supabase.timeout_seconds == 0 {
        anyhow::bail!("Supabase timeout_seconds must be >= 1");
    }

    if cfg.realtime.enabled {
        match &cfg.realtime.database_url {
            Some(db_url) if !db_url.trim().is_empty() => {}
            _ => anyhow::bail!("realtime.enabled requires realtime.database_url"),
        }
        if cfg.realtime.channel.is_empty() {
            anyhow::bail!("realtime.channel cannot be empty");
        }
        if cfg.realtime.run_migrations && cfg.realtime.channel != MIGRATION_CHANNEL {
            anyhow::bail!(
                "realtime.channel '{}' does not match the migration channel '{}'",
                cfg.realtime.channel,
                MIGRATION_CHANNEL
            );
        }
    }

    if cfg.dashboard.recent_projects_limit == 0 {
        anyhow::bail!("dashboard.recent_projects_limit must be >= 1");
    }

    if cfg.dashboard.heartbeat_seconds == 0 {
        anyhow::bail!("dashboard.heartbeat_seconds must be >= 1");
    }

    if !cfg.admin_keys.iter().any(|k| k.enabled) {
        anyhow::bail!("At least one enabled admin key must be configured");
    }

    for key in &cfg.admin_keys {
        if key.name.is_empty() {
            anyhow::bail!("Admin key name cannot be empty");
        }
        if key.key.is_empty() {
            anyhow::bail!("Admin key '{}' has an empty key", key.name);
        }
    }

    Ok(())
}
