//! Story project persistence and entity extraction.
//!
//! This crate provides:
//! - Story entities (characters, locations, scenes, relationships) owned by a project
//! - Heuristic character-name detection in free prose
//! - JSON project files with lenient loading
//! - An undirected story graph between entity ids
//!
//! # Quick Start
//!
//! ```no_run
//! use storyloom_core::{ProjectService, ServiceConfig};
//!
//! let mut service = ProjectService::new(ServiceConfig::from_env());
//! service.create_project("My Story");
//!
//! let added = service.sync_characters_from_text("Alice met Bob in the Old Mill.");
//! for character in &added {
//!     println!("new character: {}", character.name);
//! }
//!
//! match service.save_project() {
//!     Ok(path) => println!("saved to {}", path.display()),
//!     Err(e) => eprintln!("save failed: {e}"),
//! }
//! ```

pub mod clock;
pub mod config;
pub mod extract;
pub mod graph;
pub mod ids;
pub mod model;
pub mod persist;
pub mod service;
pub mod testing;

// Primary public API
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ServiceConfig;
pub use graph::{Connection, StoryGraph};
pub use ids::{CharacterId, IdSource, LocationId, ProjectId, RelationshipId, SceneId, SequentialIds, UuidIds};
pub use model::{Character, Location, Project, Relationship, Scene};
pub use persist::{PersistError, ProjectSummary};
pub use service::{ProjectService, ServiceError};
