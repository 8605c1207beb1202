use std::path::Path;

use oxrdfio::RdfFormat;
use serde::{Deserialize, Serialize};

use super::entities::Ontology;

/// Serialization formats understood by ontology stores.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OntologyFormat {
    RdfXml,
    Turtle,
    NTriples,
}

impl OntologyFormat {
    /// Guesses the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "owl" | "rdf" | "xml" => Some(Self::RdfXml),
            "ttl" => Some(Self::Turtle),
            "nt" => Some(Self::NTriples),
            _ => None,
        }
    }

    /// Converts to the `oxrdfio` format.
    #[must_use]
    pub fn to_rdf_format(self) -> RdfFormat {
        match self {
            Self::RdfXml => RdfFormat::RdfXml,
            Self::Turtle => RdfFormat::Turtle,
            Self::NTriples => RdfFormat::NTriples,
        }
    }
}

/// Contract describing persistence responsibilities for ontology graphs.
pub trait OntologyStore {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Loads an ontology graph, returning it together with its format.
    fn load(&self, path: &Path) -> Result<(Ontology, OntologyFormat), Self::Error>;

    /// Writes an ontology graph to `path` using `format`.
    ///
    /// Implementors must replace any existing file at `path`.
    fn save(
        &self,
        ontology: &Ontology,
        path: &Path,
        format: OntologyFormat,
    ) -> Result<(), Self::Error>;
}
