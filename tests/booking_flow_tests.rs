// End-to-end tests for the booking flow state machine

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use legalmate::core::{AppointmentScheduler, BookingFlow, DirectoryStore, FlowState, MatchEngine};
use legalmate::models::{Coordinate, LocationFix, SensorFailure};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bangalore() -> LocationFix {
    LocationFix::Resolved(Coordinate::new(12.9716, 77.5946))
}

fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Drive an activation to ResultsShown against the bundled directory
fn flow_with_results(specialty: &str, fix: LocationFix) -> (BookingFlow, DirectoryStore) {
    let directory = DirectoryStore::bundled();
    let mut flow = BookingFlow::new();
    flow.activate(&directory);
    flow.location_resolved(flow.generation(), fix);
    flow.select_specialty(specialty);
    flow.search(&MatchEngine::new(), &directory);
    (flow, directory)
}

#[test]
fn test_activation_defaults_to_first_specialty() {
    let directory = DirectoryStore::bundled();
    let mut flow = BookingFlow::new();
    flow.activate(&directory);

    // Bundled catalog starts with Corporate Law alphabetically
    assert_eq!(flow.selected_specialty(), flow.specialties().first().map(String::as_str));
    assert_eq!(flow.specialties(), directory.specialties().as_slice());
}

#[test]
fn test_results_only_populated_after_explicit_search() {
    let directory = DirectoryStore::bundled();
    let mut flow = BookingFlow::new();
    flow.activate(&directory);
    flow.location_resolved(flow.generation(), bangalore());

    // Selecting a specialty alone never populates results
    flow.select_specialty("Property Law");
    assert!(flow.results().is_empty());

    flow.search(&MatchEngine::new(), &directory);
    assert_eq!(flow.results().len(), 1);
}

#[test]
fn test_degraded_search_returns_all_matches_with_advisory() {
    // Permission denied: Family Law still returns both practitioners,
    // in directory order, with the advisory flag set
    let (flow, _) = flow_with_results(
        "Family Law",
        LocationFix::Unavailable(SensorFailure::PermissionDenied),
    );

    assert!(flow.location_advisory());
    let ids: Vec<u32> = flow.results().iter().map(|r| r.lawyer.id).collect();
    assert_eq!(ids, vec![3, 8]);
    assert!(flow.results().iter().all(|r| r.distance_km.is_none()));
}

#[test]
fn test_resolved_search_has_no_advisory() {
    let (flow, _) = flow_with_results("Property Law", bangalore());

    assert!(!flow.location_advisory());
    assert!(flow.results()[0].distance_km.is_some());
}

#[test]
fn test_empty_specialty_search_is_valid_state() {
    let (flow, _) = flow_with_results("Criminal Law", bangalore());

    // One criminal lawyer exists; now re-search a tag with zero matches
    let directory = DirectoryStore::new(vec![]);
    let mut empty_flow = BookingFlow::new();
    empty_flow.activate(&directory);
    empty_flow.location_resolved(empty_flow.generation(), bangalore());
    assert!(!empty_flow.search(&MatchEngine::new(), &directory));

    assert_eq!(flow.state(), FlowState::ResultsShown);
}

#[test]
fn test_booking_produces_bounded_confirmation() {
    let now = noon();

    for seed in 0..50 {
        let (mut flow, _) = flow_with_results("Property Law", bangalore());
        let lawyer_id = flow.results()[0].lawyer.id;

        let mut scheduler = AppointmentScheduler::new(StdRng::seed_from_u64(seed));
        let confirmation = flow
            .book(lawyer_id, &mut scheduler, now)
            .cloned()
            .expect("booking a listed lawyer succeeds");

        assert_eq!(flow.state(), FlowState::Confirmed);
        assert_eq!(confirmation.lawyer_name, "Ananya Sharma");

        // The same seed reproduces the slot, so assert its bounds directly
        let slot = AppointmentScheduler::new(StdRng::seed_from_u64(seed)).propose(now);
        let offset = (slot.date() - now.date()).num_days();
        assert!((1..=7).contains(&offset));
        assert!((9..=16).contains(&slot.hour()));
        assert!(slot.minute() == 0 || slot.minute() == 30);
        assert_eq!(
            confirmation.scheduled_for,
            slot.format("%A, %B %-d at %-I:%M %p").to_string()
        );
    }
}

#[test]
fn test_booking_outside_results_is_rejected() {
    let (mut flow, _) = flow_with_results("Property Law", bangalore());

    // Lawyer 2 (Criminal Law) is not in the Property Law results
    let mut scheduler = AppointmentScheduler::new(StdRng::seed_from_u64(1));
    assert!(flow.book(2, &mut scheduler, noon()).is_none());
    assert_eq!(flow.state(), FlowState::ResultsShown);
    assert!(flow.confirmation().is_none());
}

#[test]
fn test_activate_then_close_leaves_no_state() {
    let directory = DirectoryStore::bundled();
    let mut flow = BookingFlow::new();

    flow.activate(&directory);
    flow.close();

    assert_eq!(flow.state(), FlowState::Idle);
    assert!(flow.results().is_empty());
    assert!(flow.confirmation().is_none());

    // The next activation starts clean
    flow.activate(&directory);
    assert_eq!(flow.state(), FlowState::Activating);
    assert!(flow.results().is_empty());
    assert!(flow.confirmation().is_none());
    assert_eq!(
        flow.selected_specialty(),
        flow.specialties().first().map(String::as_str)
    );
}

#[test]
fn test_reactivation_discards_late_location_fix() {
    let directory = DirectoryStore::bundled();
    let mut flow = BookingFlow::new();

    flow.activate(&directory);
    let abandoned = flow.generation();

    flow.close();
    flow.activate(&directory);

    // The abandoned acquisition resolves late and must not apply
    assert!(!flow.location_resolved(abandoned, bangalore()));
    assert_eq!(flow.state(), FlowState::Activating);
    assert!(!flow.location_advisory());
}

#[test]
fn test_results_match_specialty_at_search_time() {
    let directory = DirectoryStore::bundled();
    let mut flow = BookingFlow::new();
    flow.activate(&directory);
    flow.location_resolved(flow.generation(), bangalore());
    flow.select_specialty("Family Law");
    flow.search(&MatchEngine::new(), &directory);

    let family_ids: Vec<u32> = flow.results().iter().map(|r| r.lawyer.id).collect();
    assert_eq!(family_ids, vec![3, 8]);

    // Changing the selection invalidates the stale results instead of
    // showing them against the new specialty
    flow.select_specialty("Tax Law");
    assert_eq!(flow.state(), FlowState::ReadyToSearch);
    assert!(flow.results().is_empty());

    flow.search(&MatchEngine::new(), &directory);
    let tax_ids: Vec<u32> = flow.results().iter().map(|r| r.lawyer.id).collect();
    assert_eq!(tax_ids, vec![11]);
}

#[test]
fn test_full_flow_against_bundled_directory() {
    let directory = DirectoryStore::bundled();
    let engine = MatchEngine::new();
    let mut flow = BookingFlow::new();

    flow.activate(&directory);
    assert_eq!(flow.state(), FlowState::Activating);

    flow.location_resolved(flow.generation(), bangalore());
    assert_eq!(flow.state(), FlowState::ReadyToSearch);

    flow.select_specialty("Property Law");
    flow.search(&engine, &directory);
    assert_eq!(flow.state(), FlowState::ResultsShown);
    assert_eq!(flow.results().len(), 1);

    let mut scheduler = AppointmentScheduler::new(StdRng::seed_from_u64(5));
    let confirmation = flow
        .book(flow.results()[0].lawyer.id, &mut scheduler, noon())
        .cloned()
        .unwrap();
    assert_eq!(flow.state(), FlowState::Confirmed);
    assert_eq!(confirmation.lawyer_name, "Ananya Sharma");

    flow.close();
    assert_eq!(flow.state(), FlowState::Idle);
}
