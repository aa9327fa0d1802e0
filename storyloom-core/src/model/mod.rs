//! Story entities owned by a project.

mod character;
mod location;
mod project;
mod relationship;
mod scene;

pub use character::Character;
pub use location::Location;
pub use project::{Project, DEFAULT_TITLE};
pub use relationship::{Relationship, CHARACTER_CHARACTER, CHARACTER_LOCATION};
pub use scene::Scene;
