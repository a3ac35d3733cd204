//! Configuration module for statusboard.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::status::DEFAULT_WARNING_THRESHOLD;

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 8080)
    pub http_port: u16,
    /// URL or file path of the site dataset (default: "sites.json")
    pub source: String,
    /// Timeout for upstream requests (default: 10s)
    pub fetch_timeout: Duration,
    pub status: StatusConfig,
    pub refresh: RefreshConfig,
    pub page: PageConfig,
}

/// Policy used when deriving summaries from a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusConfig {
    /// Average uptime at or above which a failing site is a transient issue.
    pub warning_threshold: f64,
    /// Number of most recent daily records kept per site.
    pub days: usize,
}

/// Timing of periodic and user-triggered refreshes.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    /// Minimum interval between accepted user refreshes.
    pub cooldown: Duration,
    /// Interval of the periodic refresh timer.
    pub interval: Duration,
    /// Whether periodic refreshes are also subject to the cooldown.
    pub cooldown_applies_to_periodic: bool,
}

/// Values passed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub site_name: String,
    pub home_url: Option<String>,
    pub show_links: bool,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            days: 60,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(60),
            interval: Duration::from_secs(300),
            cooldown_applies_to_periodic: false,
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            site_name: "Site Status".to_string(),
            home_url: None,
            show_links: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            source: "sites.json".to_string(),
            fetch_timeout: Duration::from_secs(10),
            status: StatusConfig::default(),
            refresh: RefreshConfig::default(),
            page: PageConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STATUSBOARD_HTTP_PORT`: HTTP port (default: 8080)
    /// - `STATUSBOARD_SOURCE`: dataset URL or file path (default: "sites.json")
    /// - `STATUSBOARD_FETCH_TIMEOUT_SECS`: upstream timeout (default: 10)
    /// - `STATUSBOARD_REFRESH_COOLDOWN_SECS`: user refresh cooldown (default: 60)
    /// - `STATUSBOARD_REFRESH_INTERVAL_SECS`: periodic refresh interval (default: 300)
    /// - `STATUSBOARD_COOLDOWN_APPLIES_TO_PERIODIC`: gate the timer too (default: false)
    /// - `STATUSBOARD_WARNING_THRESHOLD`: transient issue threshold, 0-100 (default: 70)
    /// - `STATUSBOARD_DAYS`: displayed history window in days (default: 60)
    /// - `STATUSBOARD_SITE_NAME`: page title (default: "Site Status")
    /// - `STATUSBOARD_HOME_URL`: home link (default: none)
    /// - `STATUSBOARD_SHOW_LINKS`: show site URLs (default: true)
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(port) = parse_var(&lookup, "STATUSBOARD_HTTP_PORT") {
            cfg.http_port = port;
        }

        if let Some(source) = lookup("STATUSBOARD_SOURCE") {
            cfg.source = source;
        }

        if let Some(secs) = parse_var::<u64, _>(&lookup, "STATUSBOARD_FETCH_TIMEOUT_SECS") {
            cfg.fetch_timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(secs) = parse_var::<u64, _>(&lookup, "STATUSBOARD_REFRESH_COOLDOWN_SECS") {
            cfg.refresh.cooldown = Duration::from_secs(secs);
        }

        if let Some(secs) = parse_var::<u64, _>(&lookup, "STATUSBOARD_REFRESH_INTERVAL_SECS") {
            if secs == 0 {
                tracing::warn!("STATUSBOARD_REFRESH_INTERVAL_SECS must be positive, keeping default");
            } else {
                cfg.refresh.interval = Duration::from_secs(secs);
            }
        }

        if let Some(flag) = parse_var(&lookup, "STATUSBOARD_COOLDOWN_APPLIES_TO_PERIODIC") {
            cfg.refresh.cooldown_applies_to_periodic = flag;
        }

        if let Some(threshold) = parse_var::<f64, _>(&lookup, "STATUSBOARD_WARNING_THRESHOLD") {
            if (0.0..=100.0).contains(&threshold) {
                cfg.status.warning_threshold = threshold;
            } else {
                tracing::warn!(
                    "STATUSBOARD_WARNING_THRESHOLD {} is outside 0-100, keeping default",
                    threshold
                );
            }
        }

        if let Some(days) = parse_var::<usize, _>(&lookup, "STATUSBOARD_DAYS") {
            if days == 0 {
                tracing::warn!("STATUSBOARD_DAYS must be positive, keeping default");
            } else {
                cfg.status.days = days;
            }
        }

        if let Some(name) = lookup("STATUSBOARD_SITE_NAME") {
            cfg.page.site_name = name;
        }

        cfg.page.home_url = lookup("STATUSBOARD_HOME_URL").filter(|url| !url.is_empty());

        if let Some(show) = parse_var(&lookup, "STATUSBOARD_SHOW_LINKS") {
            cfg.page.show_links = show;
        }

        cfg
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid value {:?} for {}", raw, key);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_from(vars: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.http_port, 8080);
        assert_eq!(cfg.source, "sites.json");
        assert_eq!(cfg.refresh.cooldown, Duration::from_secs(60));
        assert_eq!(cfg.refresh.interval, Duration::from_secs(300));
        assert!(!cfg.refresh.cooldown_applies_to_periodic);
        assert_eq!(cfg.status.warning_threshold, 70.0);
        assert_eq!(cfg.status.days, 60);
    }

    #[test]
    fn test_overrides() {
        let cfg = load_from(&[
            ("STATUSBOARD_HTTP_PORT", "9000"),
            ("STATUSBOARD_SOURCE", "https://api.example.com/sites"),
            ("STATUSBOARD_REFRESH_COOLDOWN_SECS", "30"),
            ("STATUSBOARD_COOLDOWN_APPLIES_TO_PERIODIC", "true"),
            ("STATUSBOARD_WARNING_THRESHOLD", "85.5"),
            ("STATUSBOARD_DAYS", "90"),
            ("STATUSBOARD_HOME_URL", "https://example.com"),
            ("STATUSBOARD_SHOW_LINKS", "false"),
        ]);
        assert_eq!(cfg.http_port, 9000);
        assert_eq!(cfg.source, "https://api.example.com/sites");
        assert_eq!(cfg.refresh.cooldown, Duration::from_secs(30));
        assert!(cfg.refresh.cooldown_applies_to_periodic);
        assert_eq!(cfg.status.warning_threshold, 85.5);
        assert_eq!(cfg.status.days, 90);
        assert_eq!(cfg.page.home_url.as_deref(), Some("https://example.com"));
        assert!(!cfg.page.show_links);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let cfg = load_from(&[
            ("STATUSBOARD_HTTP_PORT", "not-a-port"),
            ("STATUSBOARD_WARNING_THRESHOLD", "140"),
            ("STATUSBOARD_DAYS", "0"),
            ("STATUSBOARD_REFRESH_INTERVAL_SECS", "0"),
        ]);
        assert_eq!(cfg.http_port, 8080);
        assert_eq!(cfg.status.warning_threshold, 70.0);
        assert_eq!(cfg.status.days, 60);
        assert_eq!(cfg.refresh.interval, Duration::from_secs(300));
    }
}
