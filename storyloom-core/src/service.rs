//! ProjectService - the primary public API for story projects.
//!
//! The service owns the active project and its story graph. Front-ends
//! create one service at startup and call into it; nothing here is global.
//!
//! Operations that need an active project report its absence with `false`
//! or an empty slice. Operations that touch disk return a [`ServiceError`]
//! and log the failure before returning it.

use crate::clock::{Clock, SystemClock};
use crate::config::ServiceConfig;
use crate::extract;
use crate::graph::{Connection, StoryGraph};
use crate::ids::{CharacterId, IdSource, LocationId, SceneId, UuidIds};
use crate::model::{Character, Location, Project, Relationship, Scene, DEFAULT_TITLE};
use crate::persist::{self, PersistError, ProjectSummary};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from ProjectService operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No active project")]
    NoActiveProject,

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Owns the active project and exposes operations over it.
pub struct ProjectService {
    config: ServiceConfig,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
    active: Option<Project>,
    graph: StoryGraph,
}

impl ProjectService {
    /// Create a service using the system clock and random ids.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_sources(config, Box::new(SystemClock::new()), Box::new(UuidIds::new()))
    }

    /// Create a service with explicit time and id sources.
    ///
    /// The projects directory is created if missing. Failure to create it is
    /// logged; saves into it will report their own errors later.
    pub fn with_sources(config: ServiceConfig, clock: Box<dyn Clock>, ids: Box<dyn IdSource>) -> Self {
        if let Err(e) = fs::create_dir_all(&config.projects_dir) {
            tracing::warn!(
                dir = %config.projects_dir.display(),
                error = %e,
                "could not create projects directory"
            );
        }

        Self {
            config,
            clock,
            ids,
            active: None,
            graph: StoryGraph::new(),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn projects_dir(&self) -> &Path {
        &self.config.projects_dir
    }

    // =========================================================================
    // Entity factories
    // =========================================================================

    /// A fresh character with an empty role.
    pub fn new_character(&self, name: impl Into<String>) -> Character {
        Character::new(self.ids.next_id(), name, self.clock.now())
    }

    pub fn new_location(&self, name: impl Into<String>) -> Location {
        Location::new(self.ids.next_id(), name, self.clock.now())
    }

    pub fn new_scene(&self, title: impl Into<String>) -> Scene {
        Scene::new(self.ids.next_id(), title, self.clock.now())
    }

    pub fn new_relationship(
        &self,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        kind: impl Into<String>,
    ) -> Relationship {
        Relationship::new(self.ids.next_id(), source_id, target_id, kind, self.clock.now())
    }

    // =========================================================================
    // Project lifecycle
    // =========================================================================

    /// Start a new empty project and make it active.
    pub fn create_project(&mut self, title: impl Into<String>) -> &Project {
        let project = Project::new(self.ids.next_id(), title, self.clock.now());
        tracing::debug!(id = %project.id, title = %project.title, "created project");
        self.graph.clear();
        self.active.insert(project)
    }

    /// Start a new project titled [`DEFAULT_TITLE`].
    pub fn create_untitled_project(&mut self) -> &Project {
        self.create_project(DEFAULT_TITLE)
    }

    /// Load a project from disk and make it active.
    ///
    /// On failure the previously active project is left untouched.
    pub fn open_project(&mut self, path: impl AsRef<Path>) -> Result<&Project, ServiceError> {
        let path = path.as_ref();
        let project = match persist::load_project(path, &*self.clock) {
            Ok(project) => project,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to open project");
                return Err(e.into());
            }
        };

        tracing::info!(
            path = %path.display(),
            id = %project.id,
            characters = project.characters.len(),
            locations = project.locations.len(),
            scenes = project.scenes.len(),
            "opened project"
        );

        self.graph.clear();
        for rel in &project.relationships {
            self.graph.connect(&rel.source_id, &rel.target_id, rel.kind.clone());
        }
        Ok(&*self.active.insert(project))
    }

    /// Save the active project.
    ///
    /// A project without a file path is saved into the projects directory
    /// under a name derived from its title. Returns the path written.
    pub fn save_project(&mut self) -> Result<PathBuf, ServiceError> {
        let Some(project) = self.active.as_mut() else {
            tracing::warn!("save requested with no active project");
            return Err(ServiceError::NoActiveProject);
        };
        write_project(&self.config, project)
    }

    /// Save a project that is not the active one, with the same path rules
    /// as [`save_project`](Self::save_project).
    pub fn save_detached(&self, project: &mut Project) -> Result<PathBuf, ServiceError> {
        write_project(&self.config, project)
    }

    /// Describe every project file in the projects directory.
    pub fn list_projects(&self) -> Result<Vec<ProjectSummary>, ServiceError> {
        persist::list_projects(&self.config.projects_dir, &self.config.file_extension).map_err(|e| {
            tracing::error!(
                dir = %self.config.projects_dir.display(),
                error = %e,
                "failed to list projects"
            );
            ServiceError::from(e)
        })
    }

    /// Drop the active project without saving it.
    pub fn close_project(&mut self) -> Option<Project> {
        self.graph.clear();
        self.active.take()
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.active.as_ref()
    }

    pub fn active_project_mut(&mut self) -> Option<&mut Project> {
        self.active.as_mut()
    }

    pub fn has_active_project(&self) -> bool {
        self.active.is_some()
    }

    /// Replace the master prose text.
    pub fn update_project_content(&mut self, text: impl Into<String>) {
        let now = self.clock.now();
        if let Some(project) = self.active.as_mut() {
            project.content = text.into();
            project.touch(now);
        }
    }

    pub fn rename_project(&mut self, title: impl Into<String>) -> bool {
        let now = self.clock.now();
        let Some(project) = self.active.as_mut() else {
            return false;
        };
        project.title = title.into();
        project.touch(now);
        true
    }

    pub fn set_project_description(&mut self, description: impl Into<String>) -> bool {
        let now = self.clock.now();
        let Some(project) = self.active.as_mut() else {
            return false;
        };
        project.description = description.into();
        project.touch(now);
        true
    }

    // =========================================================================
    // Characters
    // =========================================================================

    /// Propose characters for names found in `text`.
    ///
    /// Names already used by a character in the active project are skipped.
    /// With no active project every candidate is returned. Nothing is added.
    pub fn detect_characters_in_text(&self, text: &str) -> Vec<Character> {
        let existing: Vec<&str> = self
            .active
            .as_ref()
            .map(|p| p.character_names().collect())
            .unwrap_or_default();

        extract::new_names(text, existing)
            .into_iter()
            .map(|name| self.new_character(name))
            .collect()
    }

    /// Editor flow: store `text` as the project content, then add a character
    /// for every new name found in it.
    ///
    /// Returns the characters that were added.
    pub fn sync_characters_from_text(&mut self, text: &str) -> Vec<Character> {
        if self.active.is_none() {
            return Vec::new();
        }
        self.update_project_content(text);

        let mut added = Vec::new();
        for character in self.detect_characters_in_text(text) {
            if self.add_character(character.clone()) {
                added.push(character);
            }
        }
        if !added.is_empty() {
            tracing::debug!(count = added.len(), "added detected characters");
        }
        added
    }

    /// Add a character unless one with the same name or id already exists.
    pub fn add_character(&mut self, character: Character) -> bool {
        let Some(project) = self.active.as_mut() else {
            return false;
        };
        if project.character_named(&character.name).is_some()
            || project.character(&character.id).is_some()
        {
            return false;
        }
        tracing::debug!(id = %character.id, name = %character.name, "added character");
        project.characters.push(character);
        true
    }

    /// Remove a character by id.
    ///
    /// Also drops the character from scenes, relationships and the story
    /// graph. Returns `true` whenever a project is active, even if the id
    /// was unknown.
    pub fn remove_character(&mut self, id: &CharacterId) -> bool {
        let Some(project) = self.active.as_mut() else {
            return false;
        };

        let before = project.characters.len();
        project.characters.retain(|c| &c.id != id);
        if project.characters.len() < before {
            for scene in &mut project.scenes {
                scene.character_ids.retain(|c| c != id);
            }
            let relationships = project.drop_relationships_of(id.as_str());
            let edges = self.graph.disconnect_all(id);
            tracing::debug!(%id, relationships, edges, "removed character");
        }
        true
    }

    /// Replace the character with the same id, keeping its position.
    pub fn update_character(&mut self, mut character: Character) -> bool {
        let now = self.clock.now();
        let Some(slot) = self
            .active
            .as_mut()
            .and_then(|p| p.characters.iter_mut().find(|c| c.id == character.id))
        else {
            return false;
        };
        character.touch(now);
        *slot = character;
        true
    }

    pub fn get_characters(&self) -> &[Character] {
        self.active
            .as_ref()
            .map(|p| p.characters.as_slice())
            .unwrap_or(&[])
    }

    // =========================================================================
    // Locations
    // =========================================================================

    /// Add a location. Duplicate names are allowed, duplicate ids are not.
    pub fn add_location(&mut self, location: Location) -> bool {
        let Some(project) = self.active.as_mut() else {
            return false;
        };
        if project.location(&location.id).is_some() {
            return false;
        }
        tracing::debug!(id = %location.id, name = %location.name, "added location");
        project.locations.push(location);
        true
    }

    pub fn update_location(&mut self, mut location: Location) -> bool {
        let now = self.clock.now();
        let Some(slot) = self
            .active
            .as_mut()
            .and_then(|p| p.locations.iter_mut().find(|l| l.id == location.id))
        else {
            return false;
        };
        location.touch(now);
        *slot = location;
        true
    }

    /// Remove a location by id, clearing it from scenes, relationships and
    /// the story graph.
    pub fn remove_location(&mut self, id: &LocationId) -> bool {
        let Some(project) = self.active.as_mut() else {
            return false;
        };

        let before = project.locations.len();
        project.locations.retain(|l| &l.id != id);
        if project.locations.len() < before {
            for scene in &mut project.scenes {
                if scene.location_id.as_ref() == Some(id) {
                    scene.location_id = None;
                }
            }
            let relationships = project.drop_relationships_of(id.as_str());
            let edges = self.graph.disconnect_all(id);
            tracing::debug!(%id, relationships, edges, "removed location");
        }
        true
    }

    pub fn get_locations(&self) -> &[Location] {
        self.active
            .as_ref()
            .map(|p| p.locations.as_slice())
            .unwrap_or(&[])
    }

    // =========================================================================
    // Scenes
    // =========================================================================

    /// Add a scene unless its id is already taken.
    pub fn add_scene(&mut self, scene: Scene) -> bool {
        let Some(project) = self.active.as_mut() else {
            return false;
        };
        if project.scene(&scene.id).is_some() {
            return false;
        }
        tracing::debug!(id = %scene.id, title = %scene.title, "added scene");
        project.scenes.push(scene);
        true
    }

    pub fn update_scene(&mut self, mut scene: Scene) -> bool {
        let now = self.clock.now();
        let Some(slot) = self
            .active
            .as_mut()
            .and_then(|p| p.scenes.iter_mut().find(|s| s.id == scene.id))
        else {
            return false;
        };
        scene.touch(now);
        *slot = scene;
        true
    }

    pub fn remove_scene(&mut self, id: &SceneId) -> bool {
        let Some(project) = self.active.as_mut() else {
            return false;
        };

        let before = project.scenes.len();
        project.scenes.retain(|s| &s.id != id);
        if project.scenes.len() < before {
            project.drop_relationships_of(id.as_str());
            self.graph.disconnect_all(id);
        }
        true
    }

    /// Scenes in stored order.
    pub fn get_scenes(&self) -> &[Scene] {
        self.active
            .as_ref()
            .map(|p| p.scenes.as_slice())
            .unwrap_or(&[])
    }

    /// Scenes sorted by `order_index`, ties in stored order.
    pub fn scenes_in_order(&self) -> Vec<&Scene> {
        self.active
            .as_ref()
            .map(Project::scenes_in_order)
            .unwrap_or_default()
    }

    // =========================================================================
    // Relationships and the story graph
    // =========================================================================

    /// Record a relationship and connect its ends in the story graph, using
    /// the relationship type as the edge reason.
    pub fn add_relationship(&mut self, relationship: Relationship) -> bool {
        let Some(project) = self.active.as_mut() else {
            return false;
        };
        self.graph.connect(
            &relationship.source_id,
            &relationship.target_id,
            relationship.kind.clone(),
        );
        project.relationships.push(relationship);
        true
    }

    pub fn get_relationships(&self) -> &[Relationship] {
        self.active
            .as_ref()
            .map(|p| p.relationships.as_slice())
            .unwrap_or(&[])
    }

    /// Connect two entity ids in the story graph without recording a
    /// relationship. Such edges last for the session only.
    ///
    /// The ids are not checked against the project.
    pub fn connect_entities(
        &mut self,
        a_id: impl AsRef<str>,
        b_id: impl AsRef<str>,
        reason: impl Into<String>,
    ) -> bool {
        if self.active.is_none() {
            return false;
        }
        self.graph.connect(a_id, b_id, reason);
        true
    }

    pub fn connections_for(&self, id: impl AsRef<str>) -> &[Connection] {
        self.graph.connections_for(id)
    }

    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }
}

/// Write `project` to its file path, deriving one from the title first if
/// it has none.
fn write_project(config: &ServiceConfig, project: &mut Project) -> Result<PathBuf, ServiceError> {
    let path = project.file_path.clone().unwrap_or_else(|| {
        persist::project_save_path(&config.projects_dir, &project.title, &config.file_extension)
    });

    if let Err(e) = persist::save_project(project, &path) {
        tracing::error!(path = %path.display(), error = %e, "failed to save project");
        return Err(e.into());
    }

    tracing::info!(path = %path.display(), id = %project.id, "saved project");
    project.file_path = Some(path.clone());
    Ok(path)
}
