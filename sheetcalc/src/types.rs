//! Common type definitions.
//!
//! # ID Types
//!
//! - [`JobId`]: identifier correlating one upload with its output artifact

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier for a single calculation request.
///
/// Generated fresh for every upload. It names both the stored upload and the
/// output artifact, and carries no other metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a new random (v4) job id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for JobId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_ids_are_unique() {
        let a = JobId::new();
        let b = JobId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_job_id_display_is_hyphenated_uuid() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let job = JobId::from(uuid);
        assert_eq!(job.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(
            serde_json::to_string(&job).unwrap(),
            "\"550e8400-e29b-41d4-a716-446655440000\""
        );
    }
}
