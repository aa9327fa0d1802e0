//! Characters appearing in a story.

use crate::ids::CharacterId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A character tracked by the project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Character {
    /// Unique identifier.
    pub id: CharacterId,
    /// Display name, used for deduplication.
    pub name: String,
    /// Narrative role ("protagonist", "mentor", ...). Empty when detected.
    pub role: String,
    /// Free-form description.
    pub description: String,
    /// What the character wants, in order of importance.
    pub goals: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Character {
    /// Create a character with an empty role.
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: String::new(),
            description: String::new(),
            goals: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a goal.
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goals.push(goal.into());
        self
    }

    /// Mark the character as modified.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_character_creation() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let character = Character::new("c-1", "Aragorn", now)
            .with_role("ranger")
            .with_goal("Reclaim the throne")
            .with_goal("Protect the hobbits");

        assert_eq!(character.id, "c-1");
        assert_eq!(character.name, "Aragorn");
        assert_eq!(character.role, "ranger");
        assert_eq!(character.goals.len(), 2);
        assert_eq!(character.created_at, character.updated_at);
    }
}
