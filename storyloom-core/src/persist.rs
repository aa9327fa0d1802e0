//! Project persistence.
//!
//! Projects are stored as pretty-printed JSON with a `.story` extension.
//! Writing goes straight from the model types; reading goes through lenient
//! record types so that every field but `id` may be missing. Timestamps are
//! written as RFC 3339 strings and parsed back on load.

use crate::clock::Clock;
use crate::ids::{CharacterId, LocationId, SceneId};
use crate::model::{Character, Location, Project, Relationship, Scene, DEFAULT_TITLE};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of saved project files, without the dot.
pub const PROJECT_EXTENSION: &str = "story";

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed project file: {0} is missing an id")]
    MissingId(&'static str),
}

/// Write a project to `path`, creating parent directories and replacing any
/// existing file.
pub fn save_project(project: &Project, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(project)?;
    fs::write(path, content)?;
    Ok(())
}

/// Read a project from `path`.
///
/// Missing timestamps fall back to `clock.now()`. The returned project's
/// `file_path` is set to `path`.
pub fn load_project(path: impl AsRef<Path>, clock: &dyn Clock) -> Result<Project, PersistError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let record: ProjectRecord = serde_json::from_str(&content)?;
    let mut project = record.into_project(clock.now())?;
    project.file_path = Some(path.to_path_buf());
    Ok(project)
}

/// Derive the save path for a project that has never been saved.
///
/// Spaces and path separators in the title become underscores.
pub fn project_save_path(dir: impl AsRef<Path>, title: &str, extension: &str) -> PathBuf {
    let title = if title.trim().is_empty() {
        DEFAULT_TITLE
    } else {
        title
    };
    let sanitized = title
        .chars()
        .map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
        .collect::<String>();
    dir.as_ref().join(format!("{sanitized}.{extension}"))
}

/// Quick description of a saved project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub path: PathBuf,
    pub id: String,
    pub title: String,
    pub character_count: usize,
    pub location_count: usize,
    pub scene_count: usize,
    /// Last modification time as written in the file, if any.
    pub updated_at: Option<String>,
}

/// Describe a project file without building the full project.
pub fn peek_project(path: impl AsRef<Path>) -> Result<ProjectSummary, PersistError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    // Parse just enough to describe the project
    #[derive(Deserialize)]
    struct Partial {
        id: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        characters: Vec<IgnoredAny>,
        #[serde(default)]
        locations: Vec<IgnoredAny>,
        #[serde(default)]
        scenes: Vec<IgnoredAny>,
        #[serde(default)]
        updated_at: Option<String>,
    }

    let partial: Partial = serde_json::from_str(&content)?;
    let id = partial.id.ok_or(PersistError::MissingId("project"))?;

    Ok(ProjectSummary {
        path: path.to_path_buf(),
        id,
        title: partial.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        character_count: partial.characters.len(),
        location_count: partial.locations.len(),
        scene_count: partial.scenes.len(),
        updated_at: partial.updated_at,
    })
}

/// List every readable project file in `dir`, sorted by title.
///
/// A missing directory is created and yields an empty list. Files that fail
/// to parse are skipped.
pub fn list_projects(
    dir: impl AsRef<Path>,
    extension: &str,
) -> Result<Vec<ProjectSummary>, PersistError> {
    let mut projects = Vec::new();

    let dir_path = dir.as_ref();
    if !dir_path.exists() {
        fs::create_dir_all(dir_path)?;
        return Ok(projects);
    }

    for entry in fs::read_dir(dir_path)? {
        let path = entry?.path();
        if path.extension().map(|e| e == extension).unwrap_or(false) {
            match peek_project(&path) {
                Ok(summary) => projects.push(summary),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable project"),
            }
        }
    }

    projects.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.path.cmp(&b.path)));
    Ok(projects)
}

/// Parse a stored timestamp, falling back to `fallback` when it is missing
/// or unreadable.
///
/// Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC).
fn parse_timestamp(raw: Option<&str>, fallback: DateTime<Utc>, field: &str) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return fallback;
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc();
    }
    tracing::warn!(field, value = raw, "unreadable timestamp, using load time");
    fallback
}

// ============================================================================
// On-disk records
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProjectRecord {
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    characters: Vec<CharacterRecord>,
    #[serde(default)]
    locations: Vec<LocationRecord>,
    #[serde(default)]
    scenes: Vec<SceneRecord>,
    #[serde(default)]
    relationships: Vec<RelationshipRecord>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CharacterRecord {
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    goals: Option<Vec<String>>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationRecord {
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SceneRecord {
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    character_ids: Option<Vec<String>>,
    #[serde(default)]
    location_id: Option<String>,
    #[serde(default)]
    order_index: Option<i64>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelationshipRecord {
    id: Option<String>,
    #[serde(default)]
    source_id: Option<String>,
    #[serde(default)]
    target_id: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl ProjectRecord {
    fn into_project(self, now: DateTime<Utc>) -> Result<Project, PersistError> {
        let id = self.id.ok_or(PersistError::MissingId("project"))?;

        let characters = self
            .characters
            .into_iter()
            .map(|c| c.into_character(now))
            .collect::<Result<Vec<_>, _>>()?;
        let locations = self
            .locations
            .into_iter()
            .map(|l| l.into_location(now))
            .collect::<Result<Vec<_>, _>>()?;
        let scenes = self
            .scenes
            .into_iter()
            .map(|s| s.into_scene(now))
            .collect::<Result<Vec<_>, _>>()?;
        let relationships = self
            .relationships
            .into_iter()
            .map(|r| r.into_relationship(now))
            .collect::<Result<Vec<_>, _>>()?;

        let mut project = Project::new(id, self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()), now);
        project.description = self.description.unwrap_or_default();
        project.content = self.content.unwrap_or_default();
        project.characters = characters;
        project.locations = locations;
        project.scenes = scenes;
        project.relationships = relationships;
        project.created_at = parse_timestamp(self.created_at.as_deref(), now, "project.created_at");
        project.updated_at = parse_timestamp(self.updated_at.as_deref(), now, "project.updated_at");
        Ok(project)
    }
}

impl CharacterRecord {
    fn into_character(self, now: DateTime<Utc>) -> Result<Character, PersistError> {
        let id = self.id.ok_or(PersistError::MissingId("character"))?;
        let mut character = Character::new(id, self.name.unwrap_or_default(), now);
        character.role = self.role.unwrap_or_default();
        character.description = self.description.unwrap_or_default();
        character.goals = self.goals.unwrap_or_default();
        character.created_at = parse_timestamp(self.created_at.as_deref(), now, "character.created_at");
        character.updated_at = parse_timestamp(self.updated_at.as_deref(), now, "character.updated_at");
        Ok(character)
    }
}

impl LocationRecord {
    fn into_location(self, now: DateTime<Utc>) -> Result<Location, PersistError> {
        let id = self.id.ok_or(PersistError::MissingId("location"))?;
        let mut location = Location::new(id, self.name.unwrap_or_default(), now);
        location.kind = self.kind.unwrap_or_default();
        location.description = self.description.unwrap_or_default();
        location.created_at = parse_timestamp(self.created_at.as_deref(), now, "location.created_at");
        location.updated_at = parse_timestamp(self.updated_at.as_deref(), now, "location.updated_at");
        Ok(location)
    }
}

impl SceneRecord {
    fn into_scene(self, now: DateTime<Utc>) -> Result<Scene, PersistError> {
        let id = self.id.ok_or(PersistError::MissingId("scene"))?;
        let mut scene = Scene::new(SceneId::new(id), self.title.unwrap_or_default(), now);
        scene.summary = self.summary.unwrap_or_default();
        scene.content = self.content.unwrap_or_default();
        scene.character_ids = self
            .character_ids
            .unwrap_or_default()
            .into_iter()
            .map(CharacterId::from)
            .collect();
        scene.location_id = self.location_id.map(LocationId::from);
        scene.order_index = self.order_index.unwrap_or(0);
        scene.created_at = parse_timestamp(self.created_at.as_deref(), now, "scene.created_at");
        scene.updated_at = parse_timestamp(self.updated_at.as_deref(), now, "scene.updated_at");
        Ok(scene)
    }
}

impl RelationshipRecord {
    fn into_relationship(self, now: DateTime<Utc>) -> Result<Relationship, PersistError> {
        let id = self.id.ok_or(PersistError::MissingId("relationship"))?;
        let mut rel = Relationship::new(
            id,
            self.source_id.unwrap_or_default(),
            self.target_id.unwrap_or_default(),
            self.kind.unwrap_or_default(),
            now,
        );
        rel.description = self.description.unwrap_or_default();
        rel.created_at = parse_timestamp(self.created_at.as_deref(), now, "relationship.created_at");
        rel.updated_at = parse_timestamp(self.updated_at.as_deref(), now, "relationship.updated_at");
        Ok(rel)
    }
}
