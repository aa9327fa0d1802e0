//! Scenes: ordered units of the story.

use crate::ids::{CharacterId, LocationId, SceneId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A scene within the project.
///
/// `character_ids` and `location_id` reference entities owned by the same
/// project. `order_index` is a placement hint and may repeat or skip values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub id: SceneId,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub character_ids: Vec<CharacterId>,
    pub location_id: Option<LocationId>,
    pub order_index: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Scene {
    pub fn new(id: impl Into<SceneId>, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: String::new(),
            content: String::new(),
            character_ids: Vec::new(),
            location_id: None,
            order_index: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Add a character appearing in this scene.
    pub fn with_character(mut self, id: impl Into<CharacterId>) -> Self {
        self.character_ids.push(id.into());
        self
    }

    /// Set where the scene takes place.
    pub fn with_location(mut self, id: impl Into<LocationId>) -> Self {
        self.location_id = Some(id.into());
        self
    }

    pub fn with_order_index(mut self, order_index: i64) -> Self {
        self.order_index = order_index;
        self
    }

    /// Check if a character appears in this scene.
    pub fn features(&self, character_id: &CharacterId) -> bool {
        self.character_ids.contains(character_id)
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
