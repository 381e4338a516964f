use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to send a chat message
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1))]
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// Request to change the display language
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetLanguageRequest {
    #[validate(length(min = 1))]
    pub language: String,
}

/// Request to change the selected specialty of an activation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SelectSpecialtyRequest {
    #[validate(length(min = 1))]
    pub specialty: String,
}

/// Request to book an appointment with a lawyer from the current results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    #[serde(alias = "lawyer_id", rename = "lawyerId")]
    pub lawyer_id: u32,
}
