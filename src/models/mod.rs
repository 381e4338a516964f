// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AppointmentConfirmation, ChatMessage, Coordinate, Lawyer, LocationFix, RankedLawyer, Sender,
    SensorFailure,
};
pub use requests::{
    BookAppointmentRequest, SelectSpecialtyRequest, SendMessageRequest, SetLanguageRequest,
};
pub use responses::{
    BookingSnapshot, DocumentResponse, ErrorResponse, HealthResponse, SendMessageResponse,
    TranscriptResponse,
};
