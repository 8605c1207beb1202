use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::ontology::{Iri, IriError, Ontology, PropertyKind};

static CLASS_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)$").expect("class suffix pattern"));
static OBJECT_PROPERTY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^R(\d+)$").expect("object property suffix pattern"));
static DATA_PROPERTY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^D(\d+)$").expect("data property suffix pattern"));

/// Entity families that draw from independent counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Class,
    ObjectProperty,
    DataProperty,
}

impl IdentifierKind {
    /// Letter placed between the base IRI and the zero-padded index.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Class => "",
            Self::ObjectProperty => "R",
            Self::DataProperty => "D",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Class => &CLASS_SUFFIX,
            Self::ObjectProperty => &OBJECT_PROPERTY_SUFFIX,
            Self::DataProperty => &DATA_PROPERTY_SUFFIX,
        }
    }
}

impl From<PropertyKind> for IdentifierKind {
    fn from(kind: PropertyKind) -> Self {
        match kind {
            PropertyKind::Object => Self::ObjectProperty,
            PropertyKind::Data => Self::DataProperty,
        }
    }
}

/// Issues sequential identifiers under a destination base IRI.
///
/// Counters are seeded from a scan of the destination and only move forward:
/// an index handed out once is never returned again by the same allocator,
/// whether or not the caller ends up using it.
#[derive(Clone, Debug)]
pub struct IdentifierAllocator {
    base: Iri,
    next_class: u64,
    next_object_property: u64,
    next_data_property: u64,
}

impl IdentifierAllocator {
    /// Scans `destination` for identifiers under `base` and positions every
    /// counter one past the highest index in use, or at 1 when none exist.
    #[must_use]
    pub fn scan(destination: &Ontology, base: &Iri) -> Self {
        let properties = move |kind: PropertyKind| {
            destination
                .properties_of_kind(kind)
                .map(|property| property.id())
        };

        Self {
            base: base.clone(),
            next_class: next_index(destination.classes().keys(), base, IdentifierKind::Class),
            next_object_property: next_index(
                properties(PropertyKind::Object),
                base,
                IdentifierKind::ObjectProperty,
            ),
            next_data_property: next_index(
                properties(PropertyKind::Data),
                base,
                IdentifierKind::DataProperty,
            ),
        }
    }

    /// The index the next call to [`Self::allocate`] will use for `kind`.
    #[must_use]
    pub fn peek(&self, kind: IdentifierKind) -> u64 {
        match kind {
            IdentifierKind::Class => self.next_class,
            IdentifierKind::ObjectProperty => self.next_object_property,
            IdentifierKind::DataProperty => self.next_data_property,
        }
    }

    /// Issues the next identifier of `kind`, formatted as the base IRI
    /// followed by the kind prefix and a five digit zero-padded index.
    ///
    /// # Errors
    ///
    /// Returns an error when the base IRI and suffix do not form a valid IRI.
    pub fn allocate(&mut self, kind: IdentifierKind) -> Result<Iri, IriError> {
        let counter = match kind {
            IdentifierKind::Class => &mut self.next_class,
            IdentifierKind::ObjectProperty => &mut self.next_object_property,
            IdentifierKind::DataProperty => &mut self.next_data_property,
        };
        let index = *counter;
        *counter += 1;
        Iri::in_namespace(&self.base, &format!("{}{index:05}", kind.prefix()))
    }
}

/// One past the highest index among `iris` that live under `base` and match
/// the suffix pattern of `kind`, or 1 when there is none. Indices too large
/// for `u64` are ignored.
fn next_index<'a>(iris: impl Iterator<Item = &'a Iri>, base: &Iri, kind: IdentifierKind) -> u64 {
    let pattern = kind.pattern();
    iris.filter_map(|iri| iri.suffix_after(base.as_str()))
        .filter_map(|suffix| pattern.captures(suffix))
        .filter_map(|captures| captures.get(1)?.as_str().parse::<u64>().ok())
        .max()
        .map_or(1, |max| max.saturating_add(1))
}
