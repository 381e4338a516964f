// Route exports
pub mod booking;
pub mod chat;
pub mod documents;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::DirectoryStore;
use crate::models::HealthResponse;
use crate::services::{ChatClient, LocationProvider, StoredState, TranscriptStore};

pub use booking::ActivationRegistry;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<DirectoryStore>,
    pub provider: Arc<LocationProvider>,
    pub chat: Arc<ChatClient>,
    pub store: Arc<TranscriptStore>,
    pub transcript: Arc<Mutex<StoredState>>,
    pub activations: ActivationRegistry,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(booking::configure)
            .configure(chat::configure)
            .configure(documents::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.directory.is_empty() {
        "degraded"
    } else {
        "healthy"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
