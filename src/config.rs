use std::env;
use std::time::Duration;
use std::num::NonZeroU32;
use std::str::FromStr;
use governor::Quota;
use crate::session::store::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,

    // Upstream server list
    pub upstream_url: String,
    pub fetch_timeout_secs: u64,
    pub auto_refresh_enabled: bool,
    pub auto_refresh_secs: u64,

    // Dashboard defaults
    pub default_page_size: usize,
    pub map_catalog_path: Option<String>,

    // Comma separated CIDRs allowed to set X-Forwarded-For
    pub trusted_proxies: String,

    // Rate limiting for manual refresh
    pub refresh_period_secs: u64,
    pub refresh_burst_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            upstream_url: "http://127.0.0.1:9000/rwr_server_list.json".to_string(),
            fetch_timeout_secs: 15,
            auto_refresh_enabled: true,
            auto_refresh_secs: 60,
            default_page_size: DEFAULT_PAGE_SIZE,
            map_catalog_path: None,
            trusted_proxies: String::new(),
            refresh_period_secs: 5,
            refresh_burst_limit: 3,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parse_var("PORT", defaults.port),
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            fetch_timeout_secs: parse_var("FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs),
            auto_refresh_enabled: parse_var("AUTO_REFRESH", defaults.auto_refresh_enabled),
            auto_refresh_secs: parse_var("AUTO_REFRESH_SECS", defaults.auto_refresh_secs),
            default_page_size: parse_var("DEFAULT_PAGE_SIZE", defaults.default_page_size),
            map_catalog_path: env::var("MAP_CATALOG_PATH").ok().filter(|p| !p.is_empty()),
            trusted_proxies: env::var("TRUSTED_PROXIES").unwrap_or(defaults.trusted_proxies),
            refresh_period_secs: parse_var("REFRESH_PERIOD_SECS", defaults.refresh_period_secs),
            refresh_burst_limit: parse_var("REFRESH_BURST_LIMIT", defaults.refresh_burst_limit),
        }
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    pub fn auto_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.auto_refresh_secs.max(1))
    }

    pub fn refresh_quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.refresh_burst_limit).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(Duration::from_secs(self.refresh_period_secs.max(1)))
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst)
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
