// Application config (TOML file, validated on load)

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub brain: BrainConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub publishing: PublishingConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Prediction service ("the Brain") endpoint and polling cadence.
#[derive(Debug, Clone, Deserialize)]
pub struct BrainConfig {
    pub url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Per-request timeout for the prediction GET.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_request_timeout_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_series_capacity")]
    pub series_capacity: usize,
    #[serde(default = "default_alert_capacity")]
    pub alert_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            series_capacity: default_series_capacity(),
            alert_capacity: default_alert_capacity(),
        }
    }
}

fn default_series_capacity() -> usize {
    crate::monitor::SERIES_CAPACITY
}

fn default_alert_capacity() -> usize {
    crate::monitor::ALERT_CAPACITY
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of snapshots kept in the broadcast channel for /ws/monitor (slow clients may lag).
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

fn default_broadcast_capacity() -> usize {
    16
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to log poll stats (ws clients, polls ok/failed) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(!self.brain.url.is_empty(), "brain.url must be non-empty");
        anyhow::ensure!(
            self.brain.url.starts_with("http://") || self.brain.url.starts_with("https://"),
            "brain.url must be an http(s) URL, got {}",
            self.brain.url
        );
        anyhow::ensure!(
            self.brain.poll_interval_ms > 0,
            "brain.poll_interval_ms must be > 0, got {}",
            self.brain.poll_interval_ms
        );
        anyhow::ensure!(
            self.brain.request_timeout_ms > 0,
            "brain.request_timeout_ms must be > 0, got {}",
            self.brain.request_timeout_ms
        );
        anyhow::ensure!(
            self.monitor.series_capacity > 0,
            "monitor.series_capacity must be > 0, got {}",
            self.monitor.series_capacity
        );
        anyhow::ensure!(
            self.monitor.alert_capacity > 0,
            "monitor.alert_capacity must be > 0, got {}",
            self.monitor.alert_capacity
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
