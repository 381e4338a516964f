use actix_web::{web, HttpResponse, Responder};
use chrono::Local;
use moka::future::Cache;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

use crate::core::booking::{AppointmentScheduler, BookingFlow, Effect};
use crate::core::MatchEngine;
use crate::models::{
    BookAppointmentRequest, BookingSnapshot, ErrorResponse, LocationFix, SelectSpecialtyRequest,
};
use crate::routes::AppState;
use crate::services::LocationProvider;

/// Upper bound on concurrently open activations
const MAX_OPEN_ACTIVATIONS: u64 = 10_000;

/// Server-held booking activations, keyed by activation id
///
/// Closing a flow removes it eagerly; flows abandoned without an explicit
/// close age out after the idle TTL, so a client that opens activations and
/// disappears cannot grow the registry without bound.
#[derive(Clone)]
pub struct ActivationRegistry {
    flows: Cache<Uuid, Arc<Mutex<BookingFlow>>>,
}

impl ActivationRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            flows: Cache::builder()
                .max_capacity(MAX_OPEN_ACTIVATIONS)
                .time_to_idle(idle_ttl)
                .build(),
        }
    }

    pub async fn insert(&self, id: Uuid, flow: BookingFlow) {
        self.flows.insert(id, Arc::new(Mutex::new(flow))).await;
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<BookingFlow>>> {
        self.flows.get(&id).await
    }

    pub async fn remove(&self, id: Uuid) -> Option<Arc<Mutex<BookingFlow>>> {
        self.flows.remove(&id).await
    }
}

/// Configure all booking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/booking")
            .route("", web::post().to(activate))
            .route("/{id}", web::get().to(get_activation))
            .route("/{id}/specialty", web::put().to(select_specialty))
            .route("/{id}/search", web::post().to(search))
            .route("/{id}/book", web::post().to(book))
            .route("/{id}", web::delete().to(close)),
    );
}

fn snapshot(id: Uuid, flow: &BookingFlow) -> BookingSnapshot {
    BookingSnapshot {
        activation_id: id,
        state: flow.state(),
        specialties: flow.specialties().to_vec(),
        selected_specialty: flow.selected_specialty().map(str::to_string),
        location_advisory: flow.location_advisory(),
        results: flow.results().to_vec(),
        confirmation: flow.confirmation().cloned(),
    }
}

fn not_found(id: Uuid) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Unknown activation".to_string(),
        message: format!("No booking activation with id {}", id),
        status_code: 404,
    })
}

/// Report an acquisition outcome to the activation that asked for it
///
/// Returns false when the fix was discarded: the activation is gone from
/// the registry, or it was reactivated and the generation token is stale.
async fn apply_location_fix(
    activations: &ActivationRegistry,
    id: Uuid,
    generation: u64,
    fix: LocationFix,
) -> bool {
    let applied = match activations.get(id).await {
        Some(flow) => flow.lock().await.location_resolved(generation, fix),
        None => false,
    };

    if applied {
        tracing::debug!("Activation {} received location fix", id);
    } else {
        tracing::debug!("Discarding stale location fix for activation {}", id);
    }
    applied
}

/// Run the side effects a transition requested
///
/// The only effect today is the location acquisition; it runs detached so
/// the activation responds immediately, and reports back with its generation
/// token so a late fix for an abandoned activation is discarded.
fn run_effects(
    effects: Vec<Effect>,
    id: Uuid,
    provider: Arc<LocationProvider>,
    activations: ActivationRegistry,
) {
    for effect in effects {
        match effect {
            Effect::AcquireLocation { generation } => {
                let provider = Arc::clone(&provider);
                let activations = activations.clone();
                tokio::spawn(async move {
                    let fix = provider.acquire().await;
                    apply_location_fix(&activations, id, generation, fix).await;
                });
            }
        }
    }
}

/// Open the booking flow
///
/// POST /api/v1/booking
async fn activate(state: web::Data<AppState>) -> impl Responder {
    let id = Uuid::new_v4();
    let mut flow = BookingFlow::new();
    let effects = flow.activate(&state.directory);

    tracing::info!(
        "Booking activation {} opened ({} specialties)",
        id,
        flow.specialties().len()
    );

    let response = snapshot(id, &flow);
    state.activations.insert(id, flow).await;

    run_effects(
        effects,
        id,
        Arc::clone(&state.provider),
        state.activations.clone(),
    );

    HttpResponse::Ok().json(response)
}

/// Poll the state of an activation
///
/// GET /api/v1/booking/{id}
async fn get_activation(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();

    match state.activations.get(id).await {
        Some(flow) => HttpResponse::Ok().json(snapshot(id, &*flow.lock().await)),
        None => not_found(id),
    }
}

/// Change the selected specialty
///
/// PUT /api/v1/booking/{id}/specialty
async fn select_specialty(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<SelectSpecialtyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let id = path.into_inner();
    let Some(flow) = state.activations.get(id).await else {
        return not_found(id);
    };
    let mut flow = flow.lock().await;

    if !flow.select_specialty(&req.specialty) {
        tracing::debug!(
            "Ignored specialty selection {:?} for activation {}",
            req.specialty,
            id
        );
    }
    HttpResponse::Ok().json(snapshot(id, &flow))
}

/// Search for professionals with the selected specialty
///
/// POST /api/v1/booking/{id}/search
///
/// A no-op while the location acquisition is still pending; the snapshot's
/// state tells the client whether the search ran.
async fn search(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    let Some(flow) = state.activations.get(id).await else {
        return not_found(id);
    };
    let mut flow = flow.lock().await;

    if flow.search(&MatchEngine::new(), &state.directory) {
        tracing::info!(
            "Activation {} search returned {} results",
            id,
            flow.results().len()
        );
    }
    HttpResponse::Ok().json(snapshot(id, &flow))
}

/// Book an appointment with a professional from the current results
///
/// POST /api/v1/booking/{id}/book
async fn book(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<BookAppointmentRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let Some(flow) = state.activations.get(id).await else {
        return not_found(id);
    };
    let mut flow = flow.lock().await;

    let mut scheduler = AppointmentScheduler::new(StdRng::from_os_rng());
    let now = Local::now().naive_local();

    match flow.book(req.lawyer_id, &mut scheduler, now) {
        Some(confirmation) => {
            tracing::info!(
                "Activation {} booked {} for {}",
                id,
                confirmation.lawyer_name,
                confirmation.scheduled_for
            );
            HttpResponse::Ok().json(snapshot(id, &flow))
        }
        // A target outside the current results is a stale caller reference
        None => HttpResponse::Conflict().json(ErrorResponse {
            error: "Invalid booking target".to_string(),
            message: format!(
                "Lawyer {} is not part of the current results",
                req.lawyer_id
            ),
            status_code: 409,
        }),
    }
}

/// Close the flow and discard all transient state
///
/// DELETE /api/v1/booking/{id}
///
/// Removing the entry drops the only handle to the flow, so all transient
/// state goes with it.
async fn close(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();

    match state.activations.remove(id).await {
        Some(_) => {
            tracing::info!("Booking activation {} closed", id);
            HttpResponse::NoContent().finish()
        }
        None => not_found(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::booking::FlowState;
    use crate::core::DirectoryStore;
    use crate::models::Coordinate;
    use crate::routes::testing;
    use actix_web::{test, App};

    fn bangalore() -> LocationFix {
        LocationFix::Resolved(Coordinate::new(12.9716, 77.5946))
    }

    /// Poll GET /booking/{id} until the activation leaves `activating`
    macro_rules! poll_until_ready {
        ($app:expr, $id:expr) => {{
            let mut snap = serde_json::Value::Null;
            for _ in 0..100 {
                let req = test::TestRequest::get()
                    .uri(&format!("/booking/{}", $id))
                    .to_request();
                snap = test::call_and_read_body_json(&$app, req).await;
                if snap["state"] != "activating" {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            assert_ne!(snap["state"], "activating", "activation never resolved");
            snap
        }};
    }

    #[actix_web::test]
    async fn test_activate_then_poll_reaches_ready_to_search() {
        let state = testing::app_state("http://127.0.0.1:9");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/booking").to_request();
        let opened: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(opened["state"], "activating");
        assert_eq!(opened["specialties"][0], "Corporate Law");
        assert_eq!(opened["selectedSpecialty"], "Corporate Law");

        let id = opened["activationId"].as_str().unwrap().to_string();
        let snap = poll_until_ready!(app, id);
        assert_eq!(snap["state"], "readyToSearch");
        assert_eq!(snap["locationAdvisory"], false);
    }

    #[actix_web::test]
    async fn test_search_and_book_over_http() {
        let state = testing::app_state("http://127.0.0.1:9");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/booking").to_request();
        let opened: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = opened["activationId"].as_str().unwrap().to_string();
        poll_until_ready!(app, id);

        let req = test::TestRequest::put()
            .uri(&format!("/booking/{}/specialty", id))
            .set_json(serde_json::json!({ "specialty": "Property Law" }))
            .to_request();
        let snap: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snap["selectedSpecialty"], "Property Law");

        let req = test::TestRequest::post()
            .uri(&format!("/booking/{}/search", id))
            .to_request();
        let snap: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snap["state"], "resultsShown");
        assert_eq!(snap["results"].as_array().unwrap().len(), 1);
        assert_eq!(snap["results"][0]["name"], "Ananya Sharma");

        let req = test::TestRequest::post()
            .uri(&format!("/booking/{}/book", id))
            .set_json(serde_json::json!({ "lawyerId": 1 }))
            .to_request();
        let snap: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snap["state"], "confirmed");
        assert_eq!(snap["confirmation"]["lawyerName"], "Ananya Sharma");
    }

    #[actix_web::test]
    async fn test_unknown_activation_returns_404() {
        let state = testing::app_state("http://127.0.0.1:9");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/booking/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_close_removes_activation() {
        let state = testing::app_state("http://127.0.0.1:9");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/booking").to_request();
        let opened: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = opened["activationId"].as_str().unwrap().to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("/booking/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);

        let req = test::TestRequest::get()
            .uri(&format!("/booking/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_abandoned_activation_expires() {
        let registry = ActivationRegistry::new(Duration::from_millis(50));
        let id = Uuid::new_v4();

        let mut flow = BookingFlow::new();
        flow.activate(&DirectoryStore::bundled());
        registry.insert(id, flow).await;
        assert!(registry.get(id).await.is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(registry.get(id).await.is_none());
    }

    #[actix_web::test]
    async fn test_late_fix_for_reactivated_flow_is_discarded() {
        let registry = ActivationRegistry::new(Duration::from_secs(60));
        let directory = DirectoryStore::bundled();
        let id = Uuid::new_v4();

        let mut flow = BookingFlow::new();
        flow.activate(&directory);
        let stale = flow.generation();
        flow.close();
        flow.activate(&directory);
        let current = flow.generation();
        registry.insert(id, flow).await;

        // The abandoned acquisition reports back last; nothing changes
        assert!(!apply_location_fix(&registry, id, stale, bangalore()).await);
        {
            let flow = registry.get(id).await.unwrap();
            assert_eq!(flow.lock().await.state(), FlowState::Activating);
        }

        // The current acquisition still applies
        assert!(apply_location_fix(&registry, id, current, bangalore()).await);
        let flow = registry.get(id).await.unwrap();
        assert_eq!(flow.lock().await.state(), FlowState::ReadyToSearch);
    }

    #[actix_web::test]
    async fn test_fix_for_removed_activation_is_discarded() {
        let registry = ActivationRegistry::new(Duration::from_secs(60));
        let id = Uuid::new_v4();

        let mut flow = BookingFlow::new();
        flow.activate(&DirectoryStore::bundled());
        let generation = flow.generation();
        registry.insert(id, flow).await;
        registry.remove(id).await;

        assert!(!apply_location_fix(&registry, id, generation, bangalore()).await);
    }
}
