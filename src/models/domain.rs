use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A legal professional listed in the directory
///
/// Records are loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lawyer {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub location: Coordinate,
    pub bio: String,
    pub phone: String,
    pub email: String,
}

/// Why the location sensor failed to produce a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorFailure {
    PermissionDenied,
    Timeout,
    PositionUnavailable,
}

/// Outcome of a single location acquisition attempt
///
/// All sensor failures collapse into `Unavailable`; the flow degrades to
/// distance-less matching rather than surfacing an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum LocationFix {
    Resolved(Coordinate),
    Unavailable(SensorFailure),
}

impl LocationFix {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            LocationFix::Resolved(c) => Some(*c),
            LocationFix::Unavailable(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, LocationFix::Resolved(_))
    }
}

/// A directory entry annotated with its distance to the user
///
/// `distance_km` is `None` when the search ran in degraded mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedLawyer {
    #[serde(flatten)]
    pub lawyer: Lawyer,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
}

/// Simulated appointment confirmation
///
/// Held only for the duration of the confirmation view; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentConfirmation {
    #[serde(rename = "lawyerName")]
    pub lawyer_name: String,
    #[serde(rename = "scheduledFor")]
    pub scheduled_for: String,
}

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in the chat transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
}
