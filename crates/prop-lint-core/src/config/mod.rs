//! Marker configuration: TOML surface and validated domain model.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! ConfigDto
//!   ↓ validate + convert
//! MarkerConfig (pure domain model)
//!   ↓ Extractor::new()
//! extraction engine
//! ```
//!
//! The domain model is the single source of truth inside the engine; the
//! DTO layer exists only for the `prop-lint.toml` surface. Callers embedding
//! the engine can skip TOML entirely and construct the configuration through
//! [`crate::ExtractorBuilder`].

pub mod dto;
pub mod loader;
pub mod model;

pub use dto::{ConfigDto, IgnoredRootsDto, OverrideDto};
pub use loader::{LoadError, LoadedConfig};
pub use model::{ConfigError, MarkerClass, MarkerConfig, MarkerName};
