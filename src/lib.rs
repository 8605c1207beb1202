//! Selective merging of OWL ontologies.
//!
//! A merge run copies chosen class subtrees of an import ontology into a base
//! ontology under fresh sequential identifiers, together with the object and
//! data properties whose class references survive the move.
//!
//! The [`ontology`] module holds the graph model and its RDF store, [`merge`]
//! the engine, and [`cli`] the command line entry point.

pub use self::errors::Error;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod logger;
pub mod merge;
pub mod ontology;

/// Application results options list
pub type Result<T, E = Error> = std::result::Result<T, E>;
