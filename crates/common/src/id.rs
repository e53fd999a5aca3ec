//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// Prefix for synthetic ids given to static-bank questions that were never
/// persisted. The reaction recorder must not write rows for these.
pub const FALLBACK_ID_PREFIX: &str = "fallback-";

/// Legacy prefix for mock questions from early client builds. Treated the
/// same as [`FALLBACK_ID_PREFIX`].
pub const MOCK_ID_PREFIX: &str = "mock-";

/// Sentinel user id that attributes AI-generated or anonymous content.
pub const SYSTEM_USER_ID: &str = "0000000000000000000000000";

/// Returns true if the id denotes a question that exists only in memory.
#[must_use]
pub fn is_transient_question_id(id: &str) -> bool {
    id.starts_with(FALLBACK_ID_PREFIX) || id.starts_with(MOCK_ID_PREFIX)
}

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a synthetic id for a non-persisted fallback question.
    #[must_use]
    pub fn generate_fallback(&self) -> String {
        format!("{FALLBACK_ID_PREFIX}{}", self.generate())
    }

    /// Generate a new random UUID v4.
    #[must_use]
    pub fn generate_uuid_v4(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_fallback_is_transient() {
        let id_gen = IdGenerator::new();
        let id = id_gen.generate_fallback();

        assert!(id.starts_with(FALLBACK_ID_PREFIX));
        assert!(is_transient_question_id(&id));
    }

    #[test]
    fn test_transient_id_prefixes() {
        assert!(is_transient_question_id("fallback-01hq3kq8"));
        assert!(is_transient_question_id("mock-42"));
        assert!(!is_transient_question_id("01hq3kq8"));
        assert!(!is_transient_question_id(SYSTEM_USER_ID));
    }
}
