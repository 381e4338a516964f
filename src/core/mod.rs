// Core subsystem exports
pub mod booking;
pub mod directory;
pub mod distance;
pub mod matcher;

pub use booking::{AppointmentScheduler, BookingFlow, Effect, FlowState};
pub use directory::DirectoryStore;
pub use distance::haversine_km;
pub use matcher::MatchEngine;
