use crate::core::directory::DirectoryStore;
use crate::core::distance::haversine_km;
use crate::models::{LocationFix, RankedLawyer};

/// Filters the directory by specialty and ranks by proximity
///
/// # Pipeline Stages
/// 1. Exact specialty filter (controlled vocabulary, case-sensitive)
/// 2. Distance annotation when a location is resolved
/// 3. Stable ascending sort by distance; degraded mode keeps directory order
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchEngine;

impl MatchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Rank the professionals matching `specialty` for the given location fix
    ///
    /// An unknown specialty or an empty directory yields an empty result;
    /// both are valid, displayable outcomes rather than errors. With an
    /// `Unavailable` fix the candidates come back unranked, in directory
    /// order, and `distance_km` stays `None`.
    pub fn rank(
        &self,
        directory: &DirectoryStore,
        specialty: &str,
        location: LocationFix,
    ) -> Vec<RankedLawyer> {
        let user_position = location.coordinate();

        let mut ranked: Vec<RankedLawyer> = directory
            .by_specialty(specialty)
            .into_iter()
            .map(|lawyer| RankedLawyer {
                distance_km: user_position.map(|here| haversine_km(here, lawyer.location)),
                lawyer: lawyer.clone(),
            })
            .collect();

        if user_position.is_some() {
            // sort_by is stable: distance ties keep directory order
            ranked.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        ranked
    }
}
