//! Layered config repository assembly.
//!
//! This crate provides:
//! - Definition categories (jobs, partition sets, schedules, sensors)
//! - The [`RepositoryData`] seam and the bundled [`CachingRepositoryData`]
//! - [`RepositoryDefinition`], built from a list, a category map with lazy
//!   entries, or custom data

pub mod category;
pub mod data;
pub mod repository;

pub use category::{DefinitionCategory, VALID_CATEGORY_KEYS};
pub use data::{CachingRepositoryData, DefinitionSource, LazyDefinition, RepositoryData};
pub use repository::{RepositoryDefinition, RepositorySource};
