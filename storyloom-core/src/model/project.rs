//! The project: master prose plus the entities extracted from it.

use super::{Character, Location, Relationship, Scene};
use crate::ids::{CharacterId, LocationId, ProjectId, SceneId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Title given to projects created without one.
pub const DEFAULT_TITLE: &str = "Untitled Project";

/// A story project and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    /// The master prose text.
    pub content: String,
    pub characters: Vec<Character>,
    pub scenes: Vec<Scene>,
    pub locations: Vec<Location>,
    pub relationships: Vec<Relationship>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Where the project was loaded from or last saved to.
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}

impl Project {
    /// Create an empty project.
    pub fn new(id: impl Into<ProjectId>, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            content: String::new(),
            characters: Vec::new(),
            scenes: Vec::new(),
            locations: Vec::new(),
            relationships: Vec::new(),
            created_at: now,
            updated_at: now,
            file_path: None,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Find a character by exact, case-sensitive name.
    pub fn character_named(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| &c.id == id)
    }

    pub fn location(&self, id: &LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| &l.id == id)
    }

    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| &s.id == id)
    }

    /// Names of all characters, in stored order.
    pub fn character_names(&self) -> impl Iterator<Item = &str> {
        self.characters.iter().map(|c| c.name.as_str())
    }

    /// Scenes stably sorted by `order_index`.
    pub fn scenes_in_order(&self) -> Vec<&Scene> {
        let mut scenes: Vec<_> = self.scenes.iter().collect();
        scenes.sort_by_key(|s| s.order_index);
        scenes
    }

    /// Drop every relationship touching `entity_id`. Returns how many were removed.
    pub(crate) fn drop_relationships_of(&mut self, entity_id: &str) -> usize {
        let before = self.relationships.len();
        self.relationships.retain(|r| !r.involves(entity_id));
        before - self.relationships.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenes_in_order_is_stable() {
        let now = Utc::now();
        let mut project = Project::new("p-1", "Test", now);
        project.scenes.push(Scene::new("s-1", "Late", now).with_order_index(2));
        project.scenes.push(Scene::new("s-2", "Early", now).with_order_index(0));
        project.scenes.push(Scene::new("s-3", "Also late", now).with_order_index(2));

        let titles: Vec<_> = project.scenes_in_order().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Late", "Also late"]);
    }

    #[test]
    fn test_character_lookup_is_case_sensitive() {
        let now = Utc::now();
        let mut project = Project::new("p-1", "Test", now);
        project.characters.push(Character::new("c-1", "Gandalf", now));

        assert!(project.character_named("Gandalf").is_some());
        assert!(project.character_named("gandalf").is_none());
        assert!(project.character(&CharacterId::new("c-1")).is_some());
    }
}
