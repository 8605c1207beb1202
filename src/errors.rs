//! # Application Error Handling

use std::path::PathBuf;

use crate::{
    merge::TaskFileError,
    ontology::{IriError, OntologyError, ReasonerError, StoreError},
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Iri(#[from] IriError),

    #[error(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The consistency check rejected the import ontology.
    #[error(transparent)]
    Reasoner(#[from] ReasonerError),

    #[error(transparent)]
    TaskFile(#[from] TaskFileError),

    #[error("failed to access `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    JSON(#[from] serde_json::Error),

    #[error(transparent)]
    YAML(#[from] serde_yaml::Error),

    #[error(transparent)]
    Tera(#[from] tera::Error),

    #[error(transparent)]
    Any(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Any(Box::new(err))
    }
}
