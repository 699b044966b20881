//! HTTP surface tests against an in-process app with a canned upstream.

use actix_web::{test, web, App};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use parking_lot::Mutex;
use rwrs_browser::filters::QuickFilterRegistry;
use rwrs_browser::handlers::{self, Dashboard, KeyedRateLimiter, RefreshControl};
use rwrs_browser::models::catalog::MapCatalog;
use rwrs_browser::proxy::TrustedProxies;
use rwrs_browser::refresh::{AutoRefresh, FetchError, Fetcher, Refresher};
use rwrs_browser::storage::memory::SnapshotStore;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Upstream stand-in whose payload can be swapped between requests.
struct CannedFetcher {
    payload: Mutex<Result<Vec<Value>, u16>>,
}

impl CannedFetcher {
    fn new(entries: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            payload: Mutex::new(Ok(entries)),
        })
    }

    fn fail_with(&self, status: u16) {
        *self.payload.lock() = Err(status);
    }
}

#[async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self) -> Result<Vec<Value>, FetchError> {
        self.payload.lock().clone().map_err(FetchError::Status)
    }
}

fn upstream() -> Vec<Value> {
    vec![
        json!({
            "name": "Alpha Invasion", "ip_address": "10.0.0.1", "port": 1240,
            "map_id": "media/packages/vanilla/maps/map1", "realm": "official_invasion",
            "current_players": 12, "max_players": 16, "player_list": ["Alice", 7]
        }),
        json!({
            "name": "Bravo Dominance", "ip_address": "10.0.0.2", "port": 1241,
            "map_id": "media/packages/vanilla/maps/map3", "realm": "official_dominance",
            "current_players": 3, "max_players": 8
        }),
        json!({
            "name": "Charlie Invasion", "ip_address": "10.0.0.3", "port": 1242,
            "map_id": "media/packages/vanilla/maps/map1", "realm": "official_invasion",
            "current_players": 7, "max_players": 16
        }),
    ]
}

struct Harness {
    fetcher: Arc<CannedFetcher>,
    dashboard: web::Data<Dashboard>,
    control: web::Data<RefreshControl>,
    limiter: web::Data<KeyedRateLimiter>,
}

async fn harness(burst: u32) -> Harness {
    let fetcher = CannedFetcher::new(upstream());
    let store = Arc::new(SnapshotStore::new());
    let refresher = Refresher::new(fetcher.clone(), store.clone(), Duration::from_secs(5));
    refresher.refresh().await.unwrap();

    let auto_refresh = AutoRefresh::new(refresher.clone(), Duration::from_secs(60));
    let quota = Quota::per_hour(NonZeroU32::new(1).unwrap())
        .allow_burst(NonZeroU32::new(burst).unwrap());

    Harness {
        fetcher,
        dashboard: web::Data::new(Dashboard {
            store,
            registry: Arc::new(QuickFilterRegistry::builtin()),
            catalog: Arc::new(MapCatalog::builtin().unwrap()),
            default_page_size: 2,
        }),
        control: web::Data::new(RefreshControl::new(refresher, auto_refresh)),
        limiter: web::Data::new(RateLimiter::keyed(quota)),
    }
}

macro_rules! app {
    ($h:expr) => {
        test::init_service(
            App::new()
                .app_data($h.dashboard.clone())
                .app_data($h.control.clone())
                .app_data(web::Data::new(TrustedProxies::default()))
                .app_data($h.limiter.clone())
                .configure(handlers::configure),
        )
        .await
    };
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

#[actix_web::test]
async fn table_view_pages_and_projects() {
    let h = harness(5).await;
    let app = app!(h);

    let req = test::TestRequest::get().uri("/servers?page=1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["viewMode"], "table");
    assert_eq!(body["pageCount"], 2);
    assert_eq!(body["pageIndex"], 1);
    assert_eq!(body["stats"]["totalServers"], 3);
    assert_eq!(body["rows"].as_array().unwrap().len(), 1);
    assert_eq!(body["rows"][0]["cells"]["name"], "Charlie Invasion");
    assert_eq!(body["rows"][0]["cells"]["map_name"], "map1");
    assert!(body["rows"][0]["cells"].get("realm").is_none());
}

#[actix_web::test]
async fn search_and_quick_filters_from_query() {
    let h = harness(5).await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/servers?search=ALICE&quickFilters=invasion,unknown&columns=name,player_list")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["stats"]["filteredServers"], 1);
    assert_eq!(body["columns"], json!(["name", "player_list"]));
    assert_eq!(body["rows"][0]["cells"]["player_list"], json!(["Alice"]));
    assert_eq!(body["rows"][0]["key"], "10.0.0.1:1240");
}

#[actix_web::test]
async fn sorting_by_players() {
    let h = harness(5).await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/servers?sort=current_players&order=desc&pageSize=10")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<_> = body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["cells"]["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Alpha Invasion", "Charlie Invasion", "Bravo Dominance"]);
}

#[actix_web::test]
async fn map_view_groups_in_catalog_order() {
    let h = harness(5).await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/servers?viewMode=map&quickFilters=invasion,dominance&multiSelect=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["viewMode"], "map");
    let maps = body["maps"].as_array().unwrap();
    assert_eq!(maps[0]["id"], "map1");
    assert_eq!(maps[0]["count"], 2);
    assert_eq!(maps[2]["id"], "map3");
    assert_eq!(maps[2]["count"], 1);
    assert_eq!(maps[1]["count"], 0);
    assert_eq!(body["omitted"], 0);
}

#[actix_web::test]
async fn failed_refresh_keeps_snapshot() {
    let h = harness(5).await;
    let app = app!(h);
    h.fetcher.fail_with(503);

    let req = test::TestRequest::post().uri("/refresh").peer_addr(peer()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 502);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["servers"], 3);
    assert!(body["lastError"].as_str().unwrap().contains("503"));
}

#[actix_web::test]
async fn refresh_is_rate_limited() {
    let h = harness(1).await;
    let app = app!(h);

    let req = test::TestRequest::post().uri("/refresh").peer_addr(peer()).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["servers"], 3);

    let req = test::TestRequest::post().uri("/refresh").peer_addr(peer()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 429);
}

#[actix_web::test]
async fn auto_refresh_toggles() {
    let h = harness(5).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/auto-refresh")
        .peer_addr(peer())
        .set_payload(r#"{"enabled": true, "intervalSecs": 90}"#)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "enabled": true, "intervalSecs": 90 }));

    let req = test::TestRequest::post()
        .uri("/auto-refresh")
        .peer_addr(peer())
        .set_payload(r#"{"enabled": false}"#)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["enabled"], false);

    let req = test::TestRequest::post()
        .uri("/auto-refresh")
        .peer_addr(peer())
        .set_payload("not json")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn auto_refresh_rejects_out_of_range_intervals() {
    let h = harness(5).await;
    let app = app!(h);

    for payload in [
        format!(r#"{{"enabled": true, "intervalSecs": {}}}"#, u64::MAX),
        r#"{"enabled": true, "intervalSecs": 30}"#.to_string(),
        r#"{"enabled": true, "intervalSecs": 86401}"#.to_string(),
    ] {
        let req = test::TestRequest::post()
            .uri("/auto-refresh")
            .peer_addr(peer())
            .set_payload(payload)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    // Rejected requests leave the timer as configured.
    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["autoRefresh"]["enabled"], false);
    assert_eq!(body["autoRefresh"]["intervalSecs"], 60);

    let req = test::TestRequest::post()
        .uri("/auto-refresh")
        .peer_addr(peer())
        .set_payload(r#"{"enabled": true, "intervalSecs": 86400}"#)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "enabled": true, "intervalSecs": 86400 }));
}

#[actix_web::test]
async fn auto_refresh_is_rate_limited() {
    let h = harness(1).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/auto-refresh")
        .peer_addr(peer())
        .set_payload(r#"{"enabled": false}"#)
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::post()
        .uri("/auto-refresh")
        .peer_addr(peer())
        .set_payload(r#"{"enabled": true}"#)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 429);
}

#[actix_web::test]
async fn static_listings() {
    let h = harness(5).await;
    let app = app!(h);

    let req = test::TestRequest::get().uri("/quick-filters").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0], json!({ "id": "invasion", "label": "Official Invasion" }));

    let req = test::TestRequest::get().uri("/maps").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["invasion"][0]["id"], "map1");
}
