// src/utils.rs
use crate::proxy::TrustedProxies;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use log::debug;
use std::fmt;
use std::net::IpAddr;

#[derive(Debug)]
pub enum RequestError {
    MissingPeerIP,
    RateLimitExceeded,
    InvalidBody(String),
    FetchFailed(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPeerIP => write!(f, "Failed to extract client IP"),
            Self::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            Self::InvalidBody(reason) => write!(f, "Invalid request body: {}", reason),
            Self::FetchFailed(reason) => write!(f, "Refresh failed: {}", reason),
        }
    }
}

impl ResponseError for RequestError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::RateLimitExceeded => HttpResponse::TooManyRequests().body(self.to_string()),
            Self::FetchFailed(_) => HttpResponse::BadGateway().body(self.to_string()),
            _ => HttpResponse::BadRequest().body(self.to_string()),
        }
    }
}

/// Client address for rate limiting. Forwarding headers only count when the
/// connection itself comes from a trusted proxy.
pub fn extract_client_ip(req: &HttpRequest, proxies: &TrustedProxies) -> Result<IpAddr, RequestError> {
    let peer_ip = match req.peer_addr() {
        Some(addr) => addr.ip(),
        None => return Err(RequestError::MissingPeerIP),
    };

    if !proxies.is_trusted(peer_ip) {
        return Ok(peer_ip);
    }

    // Check X-Forwarded-For first
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(ip_str) = forwarded_for.to_str() {
            if let Some(first_ip) = ip_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return Ok(ip);
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            if let Ok(ip) = ip_str.trim().parse::<IpAddr>() {
                return Ok(ip);
            }
        }
    }

    debug!("Trusted proxy {} sent no usable forwarding header", peer_ip);
    Ok(peer_ip)
}
