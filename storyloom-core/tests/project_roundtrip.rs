//! Save/open round trips through the service.

use storyloom_core::model::CHARACTER_LOCATION;
use storyloom_core::testing::test_service;
use storyloom_core::{Character, ProjectService, ServiceError};
use tempfile::TempDir;

fn populated_service(temp_dir: &TempDir) -> ProjectService {
    let mut service = test_service(temp_dir.path().join("projects"));
    service.create_project("The Fellowship");
    service.set_project_description("Nine walkers");
    service.sync_characters_from_text(
        "Aragorn and Boromir argued. Gandalf watched from Rivendell.",
    );

    let rivendell = service.new_location("Rivendell").with_kind("Elven Kingdom");
    service.add_location(rivendell.clone());

    let mut aragorn = service
        .get_characters()
        .iter()
        .find(|c| c.name == "Aragorn")
        .cloned()
        .expect("Aragorn should be detected");
    aragorn.role = "ranger".to_string();
    aragorn.goals = vec!["Claim the throne".to_string()];
    service.update_character(aragorn.clone());

    service.add_scene(
        service
            .new_scene("The Council")
            .with_summary("Everyone argues")
            .with_character(aragorn.id.clone())
            .with_location(rivendell.id.clone())
            .with_order_index(3),
    );
    service.add_scene(service.new_scene("Departure").with_order_index(4));
    service.add_relationship(
        service
            .new_relationship(aragorn.id.as_str(), rivendell.id.as_str(), CHARACTER_LOCATION)
            .with_description("Raised here"),
    );
    service
}

#[test]
fn test_round_trip_preserves_everything() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut service = populated_service(&temp_dir);

    let path = service.save_project().expect("Save should succeed");
    let original = service.close_project().expect("Project should be active");

    let loaded = service.open_project(&path).expect("Open should succeed").clone();

    assert_eq!(loaded.id, original.id);
    assert_eq!(loaded.title, original.title);
    assert_eq!(loaded.description, original.description);
    assert_eq!(loaded.content, original.content);
    assert_eq!(loaded.characters, original.characters);
    assert_eq!(loaded.locations, original.locations);
    assert_eq!(loaded.scenes, original.scenes);
    assert_eq!(loaded.relationships, original.relationships);
    assert_eq!(loaded.created_at, original.created_at);
    assert_eq!(loaded.updated_at, original.updated_at);
    assert_eq!(loaded.file_path.as_deref(), Some(path.as_path()));
}

#[test]
fn test_round_trip_restores_graph() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut service = populated_service(&temp_dir);
    let path = service.save_project().expect("Save should succeed");

    let mut fresh = test_service(temp_dir.path().join("projects"));
    fresh.open_project(&path).expect("Open should succeed");

    let rel = &fresh.get_relationships()[0];
    let links = fresh.connections_for(&rel.source_id);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].other_id, rel.target_id);
    assert_eq!(links[0].reason, CHARACTER_LOCATION);
}

#[test]
fn test_save_with_no_project_fails_without_panicking() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut service = test_service(temp_dir.path());
    assert!(matches!(service.save_project(), Err(ServiceError::NoActiveProject)));
}

#[test]
fn test_save_scenario_file_location() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let projects_dir = temp_dir.path().join("projects");
    let mut service = test_service(&projects_dir);
    service.create_project("My Story");
    service.update_project_content("Once upon a time.");

    let path = service.save_project().expect("Save should succeed");
    assert_eq!(path, projects_dir.join("My_Story.story"));

    let written = std::fs::read_to_string(&path).expect("File should be readable");
    let json: serde_json::Value = serde_json::from_str(&written).expect("File should be JSON");
    assert_eq!(json["title"], "My Story");
    assert_eq!(json["content"], "Once upon a time.");
}

#[test]
fn test_save_overwrites_existing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut service = test_service(temp_dir.path());
    service.create_project("Draft");
    service.update_project_content("first");
    let path = service.save_project().expect("Save should succeed");

    service.update_project_content("second");
    service.save_project().expect("Save should succeed");

    let mut other = test_service(temp_dir.path());
    let content = other.open_project(&path).expect("Open should succeed").content.clone();
    assert_eq!(content, "second");
}

#[test]
fn test_open_malformed_document_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("bad.story");
    std::fs::write(&path, r#"{"title": "No id here"}"#).expect("Write should succeed");

    let mut service = test_service(temp_dir.path());
    service.create_project("Keep me");
    assert!(service.open_project(&path).is_err());
    assert_eq!(service.active_project().map(|p| p.title.as_str()), Some("Keep me"));
}

#[test]
fn test_open_file_written_by_older_tool() {
    // Naive timestamps, no relationships, missing optional fields.
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("legacy.story");
    std::fs::write(
        &path,
        r#"{
  "id": "0b7c",
  "title": "Legacy",
  "content": "Aragorn rode on.",
  "characters": [
    {"id": "c1", "name": "Aragorn", "goals": ["Ride"], "created_at": "2024-02-03T10:11:12.000001"}
  ],
  "locations": [{"id": "l1", "name": "Rohan", "type": "Kingdom"}],
  "scenes": [{"id": "s1", "title": "Ride", "character_ids": ["c1"], "location_id": null, "order_index": 2}],
  "created_at": "2024-02-03T10:11:12.000001",
  "updated_at": "2024-02-03T10:11:12.000001"
}"#,
    )
    .expect("Write should succeed");

    let mut service = test_service(temp_dir.path());
    let project = service.open_project(&path).expect("Open should succeed");

    assert_eq!(project.characters[0].name, "Aragorn");
    assert_eq!(project.characters[0].goals, vec!["Ride".to_string()]);
    assert_eq!(project.locations[0].kind, "Kingdom");
    assert_eq!(project.scenes[0].order_index, 2);
    assert_eq!(project.created_at.to_rfc3339(), "2024-02-03T10:11:12.000001+00:00");
    assert!(project.relationships.is_empty());

    let characters: Vec<Character> = service.get_characters().to_vec();
    assert_eq!(characters.len(), 1);
}
