// src/handlers/index.rs
use crate::handlers::{Dashboard, RefreshControl};
use actix_web::{web, HttpResponse};
use serde_json::json;

pub async fn index(
    dashboard: web::Data<Dashboard>,
    control: web::Data<RefreshControl>,
) -> HttpResponse {
    let snapshot = dashboard.store.snapshot();
    let auto_refresh = control.auto_refresh.lock();

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "servers": snapshot.records.len(),
        "fetchedAt": snapshot.fetched_at,
        "lastError": dashboard.store.last_error(),
        "autoRefresh": {
            "enabled": auto_refresh.is_enabled(),
            "intervalSecs": auto_refresh.interval().as_secs(),
        },
    }))
}
