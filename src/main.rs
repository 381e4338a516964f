use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use legalmate::config::Settings;
use legalmate::core::DirectoryStore;
use legalmate::routes::{self, ActivationRegistry, AppState};
use legalmate::services::{ChatClient, IpGeolocationSensor, LocationProvider, TranscriptStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting LegalMate booking service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Load the bundled lawyer directory
    let directory = Arc::new(DirectoryStore::bundled());

    info!(
        "Lawyer directory loaded ({} professionals, {} specialties)",
        directory.len(),
        directory.specialties().len()
    );

    // Initialize the location provider
    let sensor = Arc::new(IpGeolocationSensor::new(settings.location.endpoint.clone()));
    let provider = Arc::new(LocationProvider::new(
        sensor,
        Duration::from_secs(settings.location.timeout_secs),
    ));

    info!(
        "Location provider initialized (timeout: {}s)",
        settings.location.timeout_secs
    );

    // Initialize the chat backend client
    if settings.chat.api_key.is_empty() {
        error!("Chat API key is not set; chat replies will fall back to the apology message");
    }

    let chat = Arc::new(ChatClient::new(
        settings.chat.endpoint.clone(),
        settings.chat.api_key.clone(),
        settings.chat.model.clone(),
        Duration::from_secs(settings.chat.session_ttl_secs),
    ));

    info!("Chat client initialized (model: {})", settings.chat.model);

    // Load the persisted transcript
    let store = Arc::new(TranscriptStore::new(&settings.storage.path));
    let transcript = Arc::new(tokio::sync::Mutex::new(store.load()));

    info!("Transcript loaded from {}", settings.storage.path);

    // Build application state
    let app_state = AppState {
        directory,
        provider,
        chat,
        store,
        transcript,
        activations: ActivationRegistry::new(Duration::from_secs(
            settings.booking.activation_ttl_secs,
        )),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
