use serde::{Deserialize, Serialize};

use crate::core::booking::FlowState;
use crate::models::domain::{AppointmentConfirmation, ChatMessage, RankedLawyer};

/// Snapshot of a booking activation returned by every booking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSnapshot {
    #[serde(rename = "activationId")]
    pub activation_id: uuid::Uuid,
    pub state: FlowState,
    pub specialties: Vec<String>,
    #[serde(rename = "selectedSpecialty")]
    pub selected_specialty: Option<String>,
    /// True when the activation runs without a resolved location and the
    /// client should show the degraded-mode advisory.
    #[serde(rename = "locationAdvisory")]
    pub location_advisory: bool,
    pub results: Vec<RankedLawyer>,
    pub confirmation: Option<AppointmentConfirmation>,
}

/// Response for the chat message endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message: ChatMessage,
}

/// Response for the chat transcript endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub messages: Vec<ChatMessage>,
    pub language: String,
}

/// Response for the document rendering endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub filename: String,
    pub content: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
