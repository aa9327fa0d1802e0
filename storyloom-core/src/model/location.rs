//! Places where the story happens.

use crate::ids::LocationId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A location tracked by the project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// Kind of place ("city", "forest", ...). Stored as `type` on disk.
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Location {
    pub fn new(id: impl Into<LocationId>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: String::new(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the kind of place.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
