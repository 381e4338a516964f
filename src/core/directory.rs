use crate::models::Lawyer;

/// Directory data bundled into the binary at compile time
const BUNDLED_DIRECTORY: &str = include_str!("../../data/lawyers.json");

/// Static in-memory registry of legal professionals
///
/// Populated once at startup; offers read-only lookups. Safe to share
/// across concurrent activations.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    lawyers: Vec<Lawyer>,
}

impl DirectoryStore {
    pub fn new(lawyers: Vec<Lawyer>) -> Self {
        Self { lawyers }
    }

    /// Load the directory bundled with the binary
    pub fn bundled() -> Self {
        let lawyers: Vec<Lawyer> =
            serde_json::from_str(BUNDLED_DIRECTORY).expect("bundled lawyer directory is valid JSON");
        Self::new(lawyers)
    }

    /// All professionals, in directory order
    pub fn all(&self) -> &[Lawyer] {
        &self.lawyers
    }

    pub fn len(&self) -> usize {
        self.lawyers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lawyers.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Lawyer> {
        self.lawyers.iter().find(|l| l.id == id)
    }

    /// Distinct specialty tags, lexicographically ascending
    pub fn specialties(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.lawyers.iter().map(|l| l.specialty.clone()).collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Professionals whose specialty equals `tag`, in directory order
    ///
    /// Tags are controlled vocabulary, so the comparison is exact and
    /// case-sensitive. An unknown tag yields an empty slice of matches.
    pub fn by_specialty(&self, tag: &str) -> Vec<&Lawyer> {
        self.lawyers.iter().filter(|l| l.specialty == tag).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    fn make_lawyer(id: u32, specialty: &str) -> Lawyer {
        Lawyer {
            id,
            name: format!("Lawyer {}", id),
            specialty: specialty.to_string(),
            location: Coordinate::new(12.9716, 77.5946),
            bio: String::new(),
            phone: String::new(),
            email: String::new(),
        }
    }

    #[test]
    fn test_bundled_directory_loads() {
        let directory = DirectoryStore::bundled();
        assert_eq!(directory.len(), 11);
        assert_eq!(directory.get(1).unwrap().name, "Ananya Sharma");
    }

    #[test]
    fn test_specialties_sorted_and_distinct() {
        let directory = DirectoryStore::new(vec![
            make_lawyer(1, "Property Law"),
            make_lawyer(2, "Criminal Law"),
            make_lawyer(3, "Property Law"),
        ]);

        assert_eq!(
            directory.specialties(),
            vec!["Criminal Law".to_string(), "Property Law".to_string()]
        );
    }

    #[test]
    fn test_specialties_idempotent() {
        let directory = DirectoryStore::bundled();
        assert_eq!(directory.specialties(), directory.specialties());
    }

    #[test]
    fn test_by_specialty_preserves_directory_order() {
        let directory = DirectoryStore::new(vec![
            make_lawyer(5, "Family Law"),
            make_lawyer(2, "Criminal Law"),
            make_lawyer(9, "Family Law"),
        ]);

        let family: Vec<u32> = directory
            .by_specialty("Family Law")
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(family, vec![5, 9]);
    }

    #[test]
    fn test_by_specialty_is_case_sensitive() {
        let directory = DirectoryStore::new(vec![make_lawyer(1, "Tax Law")]);

        assert_eq!(directory.by_specialty("Tax Law").len(), 1);
        assert!(directory.by_specialty("tax law").is_empty());
    }

    #[test]
    fn test_unknown_specialty_yields_empty() {
        let directory = DirectoryStore::bundled();
        assert!(directory.by_specialty("Maritime Law").is_empty());
    }
}
