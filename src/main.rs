// src/main.rs
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use log::{info, warn};
use std::sync::Arc;

mod errors;
mod handlers;
mod models;
mod services;

use crate::handlers::analyze_resource;
use crate::services::{AnalyzerService, GroqClient};

#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<AnalyzerService>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting VintedBot API...");

    // Read once per process. A missing key is reported per request as a 500,
    // before any upstream call.
    let groq_key = std::env::var("GROQ_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    if groq_key.is_none() {
        warn!("GROQ_KEY is not set; analysis requests will fail until it is configured");
    }

    let analyzer = Arc::new(AnalyzerService::new(groq_key, Arc::new(GroqClient::new())));

    let app_state = AppState { analyzer };

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .service(web::scope("/api/v1").service(analyze_resource()))
            .route("/health", web::get().to(health_check))
    })
    .bind(bind_addr)?
    .run()
    .await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "vintedbot-api",
        "version": "0.1.0"
    }))
}
