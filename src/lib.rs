//! LegalMate - Lawyer discovery and booking service
//!
//! This library provides the core subsystem behind the LegalMate assistant's
//! "find a lawyer" feature: proximity ranking over a static directory of
//! legal professionals and the booking flow state machine, plus the thin
//! collaborator clients (chat backend, location sensor, transcript storage,
//! document rendering) the surrounding shell needs.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    haversine_km, AppointmentScheduler, BookingFlow, DirectoryStore, FlowState, MatchEngine,
};
pub use crate::models::{AppointmentConfirmation, Coordinate, Lawyer, LocationFix, RankedLawyer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let a = Coordinate::new(12.9716, 77.5946);
        let b = Coordinate::new(12.9784, 77.5935);
        assert!(haversine_km(a, b) < 2.0);
    }
}
