//! Typed links between two entities.

use crate::ids::RelationshipId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Type tag for a link between two characters.
pub const CHARACTER_CHARACTER: &str = "character_character";

/// Type tag for a link between a character and a location.
pub const CHARACTER_LOCATION: &str = "character_location";

/// A relationship between two entities of any kind.
///
/// Source and target are raw entity ids: a relationship may connect a
/// character to a location, a scene to a character, and so on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub source_id: String,
    pub target_id: String,
    /// Free-form type tag, e.g. [`CHARACTER_LOCATION`].
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Relationship {
    pub fn new(
        id: impl Into<RelationshipId>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        kind: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind: kind.into(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check if this relationship involves a specific entity.
    pub fn involves(&self, entity_id: &str) -> bool {
        self.source_id == entity_id || self.target_id == entity_id
    }

    /// Get the other entity in the relationship.
    pub fn other(&self, entity_id: &str) -> Option<&str> {
        if self.source_id == entity_id {
            Some(&self.target_id)
        } else if self.target_id == entity_id {
            Some(&self.source_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_creation() {
        let rel = Relationship::new("r-1", "c-1", "l-1", CHARACTER_LOCATION, Utc::now())
            .with_description("Grew up here");

        assert!(rel.involves("c-1"));
        assert!(rel.involves("l-1"));
        assert!(!rel.involves("c-2"));
        assert_eq!(rel.other("c-1"), Some("l-1"));
        assert_eq!(rel.other("l-1"), Some("c-1"));
        assert_eq!(rel.other("x"), None);
    }
}
