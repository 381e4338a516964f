use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Fixed reply returned whenever the chat backend fails
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again later.";

/// Display languages supported by the assistant
pub const LANGUAGES: [(&str, &str); 7] = [
    ("en", "English"),
    ("ta", "தமிழ் (Tamil)"),
    ("te", "తెలుగు (Telugu)"),
    ("hi", "हिन्दी (Hindi)"),
    ("mr", "मराठी (Marathi)"),
    ("ml", "മലയാളം (Malayalam)"),
    ("kn", "ಕನ್ನಡ (Kannada)"),
];

/// Resolve a language code to its display name, falling back to English
pub fn language_name(code: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("English")
}

/// Errors that can occur when talking to the chat backend
///
/// Internal only: `send_message` swallows these into the fallback reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct Turn {
    role: &'static str,
    parts: Vec<Part>,
}

/// One ongoing conversation, private to a language code
#[derive(Debug, Default)]
struct ChatSession {
    history: Vec<Turn>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    system_instruction: SystemInstruction,
    contents: Vec<Turn>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Client for the conversational legal-assistance backend
///
/// Keeps one conversation context per language code, created lazily and held
/// in a bounded session cache so idle conversations age out instead of
/// accumulating for the process lifetime.
pub struct ChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    sessions: Cache<String, Arc<Mutex<ChatSession>>>,
}

impl ChatClient {
    pub fn new(endpoint: String, api_key: String, model: String, session_ttl: Duration) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let sessions = Cache::builder()
            .max_capacity(LANGUAGES.len() as u64)
            .time_to_idle(session_ttl)
            .build();

        Self {
            client,
            endpoint,
            api_key,
            model,
            sessions,
        }
    }

    fn system_instruction(language_code: &str) -> String {
        let language = language_name(language_code);
        format!(
            "You are LegalMate, a friendly and professional AI-powered law consultant. \
             Respond ONLY in {language}. \
             Your role is to provide clear, helpful, and general legal information. \
             You must always include a disclaimer at the end of every response. The disclaimer is: \
             \"Disclaimer: I am an AI assistant and this is not legal advice. Please consult with \
             a qualified legal professional for your specific situation.\" \
             You MUST translate this disclaimer into {language} as well. \
             Keep your responses concise and easy to understand."
        )
    }

    async fn session(&self, language_code: &str) -> Arc<Mutex<ChatSession>> {
        self.sessions
            .get_with(language_code.to_string(), async {
                tracing::debug!("Creating chat session for language: {}", language_code);
                Arc::new(Mutex::new(ChatSession::default()))
            })
            .await
    }

    /// Send one message in the conversation for `language_code`
    ///
    /// Never fails: any backend problem yields the fixed apology reply and
    /// leaves the conversation as it was before the attempt.
    pub async fn send_message(&self, text: &str, language_code: &str) -> String {
        let session = self.session(language_code).await;
        let mut session = session.lock().await;

        session.history.push(Turn {
            role: "user",
            parts: vec![Part {
                text: text.to_string(),
            }],
        });

        match self.generate(language_code, &session.history).await {
            Ok(reply) => {
                session.history.push(Turn {
                    role: "model",
                    parts: vec![Part {
                        text: reply.clone(),
                    }],
                });
                reply
            }
            Err(e) => {
                tracing::error!("Chat backend failed: {}", e);
                // Drop the unanswered turn so it is not replayed next time
                session.history.pop();
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn generate(&self, language_code: &str, history: &[Turn]) -> Result<String, ChatError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            self.api_key
        );

        let request = GenerateRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: Self::system_instruction(language_code),
                }],
            },
            contents: history.to_vec(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(ChatError::ApiError(format!(
                "chat backend returned {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response.json().await?;

        let reply = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| ChatError::InvalidResponse("no candidates in response".into()))?;

        if reply.is_empty() {
            return Err(ChatError::InvalidResponse("empty candidate text".into()));
        }

        Ok(reply)
    }
}
