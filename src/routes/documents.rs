use actix_web::{web, HttpResponse, Responder};

use crate::models::{DocumentResponse, ErrorResponse};
use crate::services::{render_bail_application, BailApplicationFields};

/// Configure all document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/documents/bail", web::post().to(render_bail));
}

/// Render a bail application from a field map
///
/// POST /api/v1/documents/bail
///
/// All fields are required except groundsForBail.
async fn render_bail(fields: web::Json<BailApplicationFields>) -> impl Responder {
    match render_bail_application(&fields) {
        Ok(content) => HttpResponse::Ok().json(DocumentResponse {
            filename: "Bail_Application.txt".to_string(),
            content,
        }),
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
    }
}
