// src/refresh.rs
use crate::models::server::normalize_batch;
use crate::storage::memory::SnapshotStore;
use async_trait::async_trait;
use log::{debug, error, info};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug)]
pub enum FetchError {
    Http(String),
    Status(u16),
    Decode(String),
    Timeout(Duration),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Server list request failed: {}", e),
            Self::Status(code) => write!(f, "Server list request returned status {}", code),
            Self::Decode(e) => write!(f, "Server list payload could not be decoded: {}", e),
            Self::Timeout(limit) => {
                write!(f, "Server list request timed out after {}s", limit.as_secs())
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Source of raw server entries.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Value>, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self) -> Result<Vec<Value>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout)
                } else {
                    FetchError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Committed(usize),
    /// A newer fetch was started while this one was in flight.
    Superseded,
}

#[derive(Clone)]
pub struct Refresher {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<SnapshotStore>,
    timeout: Duration,
}

impl Refresher {
    pub fn new(fetcher: Arc<dyn Fetcher>, store: Arc<SnapshotStore>, timeout: Duration) -> Self {
        Self {
            fetcher,
            store,
            timeout,
        }
    }

    /// Fetches and commits a new snapshot. On failure the previous snapshot
    /// stays in place.
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        let request_id = self.store.begin_request();
        debug!("Starting server list fetch {}", request_id);

        let result = match time::timeout(self.timeout, self.fetcher.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                error!("Server list fetch {} failed: {}", request_id, e);
                self.store.record_failure(request_id, e.to_string());
                return Err(e);
            }
        };

        let records = normalize_batch(entries);
        let count = records.len();
        if self.store.commit(request_id, records) {
            debug!("Committed {} servers from fetch {}", count, request_id);
            Ok(RefreshOutcome::Committed(count))
        } else {
            Ok(RefreshOutcome::Superseded)
        }
    }
}

/// Shortest accepted poll interval.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);
/// Longest accepted poll interval (one day).
pub const MAX_INTERVAL: Duration = Duration::from_secs(86_400);

/// The periodic poll. At most one timer task exists at a time; toggling or
/// retiming stops the old one before starting another.
pub struct AutoRefresh {
    refresher: Refresher,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl AutoRefresh {
    pub fn new(refresher: Refresher, interval: Duration) -> Self {
        Self {
            refresher,
            interval: interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
            task: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.task.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Must be called from within a tokio runtime when enabling.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.stop();
        if enabled {
            self.start();
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        if self.is_enabled() {
            self.stop();
            self.start();
        }
    }

    fn start(&mut self) {
        let refresher = self.refresher.clone();
        let period = self.interval;
        info!("Auto refresh every {}s", period.as_secs());

        self.task = Some(tokio::spawn(async move {
            let now = Instant::now();
            let first = now.checked_add(period).unwrap_or(now);
            let mut ticker = time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // Failures are already logged and recorded by the refresher.
                let _ = refresher.refresh().await;
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Auto refresh stopped");
        }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}
