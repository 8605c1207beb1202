use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use oxrdf::NamedNode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value object ensuring that supplied text represents a valid IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri {
    value: String,
}

impl Iri {
    /// Validates and constructs a new [`Iri`] value object.
    ///
    /// Malformed identifiers are rejected so that every class and property
    /// written to a destination graph carries a canonical identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        NamedNode::new(value.as_str()).map_err(|_| IriError::Invalid {
            value: value.clone(),
        })?;
        Ok(Self { value })
    }

    /// Wraps a vocabulary constant known to be a valid IRI.
    pub(crate) fn from_vocab(value: &'static str) -> Self {
        Self {
            value: value.to_owned(),
        }
    }

    /// Builds an identifier by appending `suffix` to a namespace IRI.
    pub fn in_namespace(namespace: &Iri, suffix: &str) -> Result<Self, IriError> {
        Self::new(format!("{}{suffix}", namespace.as_str()))
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the fragment after the last `#`, or the last path segment.
    ///
    /// ```
    /// use owl_merge::ontology::Iri;
    ///
    /// let iri = Iri::new("http://example.org/onto#Viral_Infection").unwrap();
    /// assert_eq!(iri.local_name(), "Viral_Infection");
    /// ```
    #[must_use]
    pub fn local_name(&self) -> &str {
        let cut = self
            .value
            .rfind('#')
            .or_else(|| self.value.rfind('/'))
            .map_or(0, |index| index + 1);
        &self.value[cut..]
    }

    /// Returns the part of the IRI following `namespace`, if it starts with it.
    #[must_use]
    pub fn suffix_after(&self, namespace: &str) -> Option<&str> {
        self.value.strip_prefix(namespace)
    }

    /// Converts into an `oxrdf` named node.
    #[must_use]
    pub fn to_named_node(&self) -> NamedNode {
        NamedNode::new_unchecked(self.value.clone())
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Borrow<str> for Iri {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for Iri {
    type Error = IriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NamedNode> for Iri {
    fn from(node: NamedNode) -> Self {
        Self {
            value: node.into_string(),
        }
    }
}

impl From<Iri> for String {
    fn from(iri: Iri) -> Self {
        iri.value
    }
}

/// Errors produced when validating an [`Iri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text could not be parsed as an IRI.
    #[error("invalid IRI: {value}")]
    Invalid { value: String },
}
