// src/handlers/catalog.rs
use crate::handlers::Dashboard;
use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

pub async fn get_quick_filters(dashboard: web::Data<Dashboard>) -> HttpResponse {
    let filters: Vec<_> = dashboard.registry.iter().collect();
    HttpResponse::Ok().json(filters)
}

pub async fn get_maps(dashboard: web::Data<Dashboard>) -> HttpResponse {
    let categories: Map<String, Value> = dashboard
        .catalog
        .categories()
        .map(|(category, maps)| (category.to_string(), serde_json::json!(maps)))
        .collect();
    HttpResponse::Ok().json(categories)
}
