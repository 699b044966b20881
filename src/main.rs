// src/main.rs
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use governor::RateLimiter;
use log::{error, info, warn};
use rwrs_browser::config::Config;
use rwrs_browser::filters::QuickFilterRegistry;
use rwrs_browser::handlers::{self, Dashboard, KeyedRateLimiter, RefreshControl};
use rwrs_browser::models::catalog::MapCatalog;
use rwrs_browser::proxy::TrustedProxies;
use rwrs_browser::refresh::{AutoRefresh, HttpFetcher, Refresher};
use rwrs_browser::storage::memory::SnapshotStore;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();

    let catalog = match MapCatalog::load(config.map_catalog_path.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load map catalog: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    let store = Arc::new(SnapshotStore::new());
    let fetcher = Arc::new(HttpFetcher::new(config.upstream_url.clone(), config.fetch_timeout()));
    let refresher = Refresher::new(fetcher, store.clone(), config.fetch_timeout());

    // Initial fetch; a failure just leaves the list empty until the next poll
    info!("Fetching server list from {}", config.upstream_url);
    if let Err(e) = refresher.refresh().await {
        warn!("Initial server list fetch failed: {}", e);
    }

    let mut auto_refresh = AutoRefresh::new(refresher.clone(), config.auto_refresh_interval());
    auto_refresh.set_enabled(config.auto_refresh_enabled);

    let dashboard = web::Data::new(Dashboard {
        store,
        registry: Arc::new(QuickFilterRegistry::builtin()),
        catalog: Arc::new(catalog),
        default_page_size: config.default_page_size,
    });
    let control = web::Data::new(RefreshControl::new(refresher, auto_refresh));
    let proxies = web::Data::new(TrustedProxies::from_list(&config.trusted_proxies));
    let refresh_rate_limiter: web::Data<KeyedRateLimiter> =
        web::Data::new(RateLimiter::keyed(config.refresh_quota()));

    let bind = config.bind();
    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(dashboard.clone())
            .app_data(control.clone())
            .app_data(proxies.clone())
            .app_data(refresh_rate_limiter.clone())
            .configure(handlers::configure)
    })
        .bind(&bind)?
        .run().await
}
