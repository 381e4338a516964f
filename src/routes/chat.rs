use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    ChatMessage, ErrorResponse, Sender, SendMessageRequest, SendMessageResponse,
    SetLanguageRequest, TranscriptResponse,
};
use crate::routes::AppState;
use crate::services::LANGUAGES;

/// Configure all chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/chat")
            .route("/message", web::post().to(send_message))
            .route("/transcript", web::get().to(get_transcript))
            .route("/language", web::put().to(set_language))
            .route("/languages", web::get().to(list_languages)),
    );
}

/// Send a chat message and get the assistant's reply
///
/// POST /api/v1/chat/message
///
/// The transcript is persisted after every exchange; persistence failures
/// are logged and do not affect the reply.
async fn send_message(
    state: web::Data<AppState>,
    req: web::Json<SendMessageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    // The lock is released before the backend call; holding it across that
    // await would serialize every chat and transcript request behind one
    // in-flight message
    {
        let mut transcript = state.transcript.lock().await;
        transcript.messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            text: req.text.clone(),
            sender: Sender::User,
        });
        state.store.save(&transcript);
    }

    let reply_text = state.chat.send_message(&req.text, &req.language).await;
    let reply = ChatMessage {
        id: Uuid::new_v4().to_string(),
        text: reply_text,
        sender: Sender::Bot,
    };

    let mut transcript = state.transcript.lock().await;
    transcript.messages.push(reply.clone());
    state.store.save(&transcript);

    HttpResponse::Ok().json(SendMessageResponse { message: reply })
}

/// Fetch the persisted transcript and language
///
/// GET /api/v1/chat/transcript
async fn get_transcript(state: web::Data<AppState>) -> impl Responder {
    let transcript = state.transcript.lock().await;

    HttpResponse::Ok().json(TranscriptResponse {
        messages: transcript.messages.clone(),
        language: transcript.language.clone(),
    })
}

/// Change the display language
///
/// PUT /api/v1/chat/language
async fn set_language(
    state: web::Data<AppState>,
    req: web::Json<SetLanguageRequest>,
) -> impl Responder {
    if !LANGUAGES.iter().any(|(code, _)| *code == req.language) {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Unsupported language".to_string(),
            message: format!("Language code {:?} is not supported", req.language),
            status_code: 400,
        });
    }

    let mut transcript = state.transcript.lock().await;
    transcript.language = req.language.clone();
    state.store.save(&transcript);

    HttpResponse::Ok().json(TranscriptResponse {
        messages: transcript.messages.clone(),
        language: transcript.language.clone(),
    })
}

/// List the supported display languages
///
/// GET /api/v1/chat/languages
async fn list_languages() -> impl Responder {
    let languages: Vec<serde_json::Value> = LANGUAGES
        .iter()
        .map(|(code, name)| serde_json::json!({ "code": code, "name": name }))
        .collect();

    HttpResponse::Ok().json(languages)
}
