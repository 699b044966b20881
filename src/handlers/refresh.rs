// src/handlers/refresh.rs
use crate::handlers::{KeyedRateLimiter, RefreshControl};
use crate::proxy::TrustedProxies;
use crate::refresh::{RefreshOutcome, MAX_INTERVAL};
use crate::utils::{extract_client_ip, RequestError};
use actix_web::{web, HttpRequest, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub async fn trigger_refresh(
    req: HttpRequest,
    control: web::Data<RefreshControl>,
    proxies: web::Data<TrustedProxies>,
    rate_limiter: web::Data<KeyedRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    let client_ip = extract_client_ip(&req, &proxies)?;

    // Rate Limiting
    if rate_limiter.check_key(&client_ip).is_err() {
        error!("Rate limit exceeded for refresh for ip: {}", client_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    match control.refresher.refresh().await {
        Ok(RefreshOutcome::Committed(count)) => {
            Ok(HttpResponse::Ok().json(json!({ "status": "ok", "servers": count })))
        }
        Ok(RefreshOutcome::Superseded) => {
            Ok(HttpResponse::Ok().json(json!({ "status": "superseded" })))
        }
        Err(e) => Err(RequestError::FetchFailed(e.to_string())),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRefreshRequest {
    pub enabled: bool,
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

pub async fn set_auto_refresh(
    req: HttpRequest,
    control: web::Data<RefreshControl>,
    proxies: web::Data<TrustedProxies>,
    rate_limiter: web::Data<KeyedRateLimiter>,
    bytes: web::Bytes,
) -> Result<HttpResponse, RequestError> {
    let client_ip = extract_client_ip(&req, &proxies)?;

    if rate_limiter.check_key(&client_ip).is_err() {
        error!("Rate limit exceeded for auto refresh for ip: {}", client_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    let request: AutoRefreshRequest = serde_json::from_slice(&bytes)
        .map_err(|e| RequestError::InvalidBody(e.to_string()))?;

    let interval = match request.interval_secs {
        Some(secs) => {
            let interval = Duration::from_secs(secs);
            if interval < control.min_interval || interval > MAX_INTERVAL {
                return Err(RequestError::InvalidBody(format!(
                    "intervalSecs must be between {} and {}",
                    control.min_interval.as_secs(),
                    MAX_INTERVAL.as_secs()
                )));
            }
            Some(interval)
        }
        None => None,
    };

    let mut auto_refresh = control.auto_refresh.lock();
    if let Some(interval) = interval {
        auto_refresh.set_interval(interval);
    }
    auto_refresh.set_enabled(request.enabled);
    info!(
        "Auto refresh {} ({}s)",
        if request.enabled { "enabled" } else { "disabled" },
        auto_refresh.interval().as_secs()
    );

    Ok(HttpResponse::Ok().json(json!({
        "enabled": auto_refresh.is_enabled(),
        "intervalSecs": auto_refresh.interval().as_secs(),
    })))
}
