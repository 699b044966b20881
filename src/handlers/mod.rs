pub mod catalog;
pub mod index;
pub mod refresh;
pub mod servers;

use crate::filters::QuickFilterRegistry;
use crate::models::catalog::MapCatalog;
use crate::refresh::{AutoRefresh, Refresher};
use crate::storage::memory::SnapshotStore;
use actix_web::web;
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::RateLimiter;
use parking_lot::Mutex;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

pub type KeyedRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Read side of the service: the snapshot and the static data needed to
/// filter and group it.
pub struct Dashboard {
    pub store: Arc<SnapshotStore>,
    pub registry: Arc<QuickFilterRegistry>,
    pub catalog: Arc<MapCatalog>,
    pub default_page_size: usize,
}

pub struct RefreshControl {
    pub refresher: Refresher,
    pub auto_refresh: Mutex<AutoRefresh>,
    /// Clients may slow the poll down but never below the configured interval.
    pub min_interval: Duration,
}

impl RefreshControl {
    pub fn new(refresher: Refresher, auto_refresh: AutoRefresh) -> Self {
        Self {
            refresher,
            min_interval: auto_refresh.interval(),
            auto_refresh: Mutex::new(auto_refresh),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index::index))
        .route("/servers", web::get().to(servers::get_servers))
        .route("/quick-filters", web::get().to(catalog::get_quick_filters))
        .route("/maps", web::get().to(catalog::get_maps))
        .route("/refresh", web::post().to(refresh::trigger_refresh))
        .route("/auto-refresh", web::post().to(refresh::set_auto_refresh));
}
