//! # prop-lint-core
//!
//! Core engine for prop-lint: property-metadata resolution over modeled
//! type hierarchies.
//!
//! Given a pre-materialized description of one type's inheritance chain
//! (classes, interfaces, fields, accessor methods, attached markers) and an
//! immutable marker configuration, the engine determines which single
//! semantic category applies to each logically distinct property and emits
//! non-fatal diagnostics for declarations that are ambiguous, misplaced, or
//! missing required markers.
//!
//! - [`Extractor`] — the engine, built once from a validated configuration
//! - [`description::TypeDescription`] — the per-call input
//! - [`Extraction`] — resolved properties plus ordered diagnostics
//! - [`config`] — the TOML surface and validated domain model
//!
//! ## Example
//!
//! ```
//! use prop_lint_core::description::{MethodDecl, TypeDecl, TypeDescription};
//! use prop_lint_core::Extractor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::builder()
//!     .domain_label("task property annotation")
//!     .categories(["Input", "InputFile"])
//!     .narrows("Input", "InputFile")
//!     .build()
//!     .map_err(|errors| format!("{errors:?}"))?;
//!
//! let description = TypeDescription::new("CopyTask")
//!     .ty(TypeDecl::class("CopyTask").method(MethodDecl::getter("getSource")));
//!
//! let extraction = extractor.extract(&description)?;
//! assert!(extraction.has_diagnostics()); // getSource carries no marker
//! # Ok(())
//! # }
//! ```
//!
//! The engine is a pure function of its inputs: it performs no I/O, keeps
//! no state between calls, and is safe to share across threads.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod diagnostics;
mod extractor;
mod hierarchy;
mod resolve;
mod types;

pub mod config;
pub mod description;

pub use config::{ConfigError, LoadError, LoadedConfig, MarkerClass, MarkerConfig, MarkerName};
pub use extractor::{ExtractError, Extractor, ExtractorBuilder};
pub use types::{Diagnostic, DiagnosticKind, Extraction, ResolvedProperty, Severity};
