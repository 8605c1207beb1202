//! Ontology graph model and the infrastructure around it.
//!
//! The module keeps the graph primitives (classes, properties, annotations)
//! separate from the traits describing how graphs are persisted and checked,
//! with one file-backed store and two consistency checkers as adapters.

pub mod annotations;
pub mod entities;
pub mod rdf;
pub mod reasoner;
pub mod repositories;
pub mod value_objects;
pub mod vocab;

pub use annotations::{AnnotationKind, AnnotationRegistry};
pub use entities::{Class, Ontology, OntologyError, Property, PropertyKind};
pub use rdf::{RdfFileStore, StoreError};
pub use reasoner::{CommandReasoner, ConsistencyChecker, ReasonerError, StructuralReasoner};
pub use repositories::{OntologyFormat, OntologyStore};
pub use value_objects::{Iri, IriError};
