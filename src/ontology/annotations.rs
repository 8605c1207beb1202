use std::collections::{BTreeMap, BTreeSet};

use super::{
    entities::{Class, Ontology},
    value_objects::Iri,
    vocab::{rdfs, skos},
};

/// Role of an annotation property known to a registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnnotationKind {
    Label,
    Comment,
    Definition,
    AltLabel,
    /// Any other property declared with `owl:AnnotationProperty`.
    Custom,
}

impl AnnotationKind {
    fn of(property: &str) -> Self {
        match property {
            rdfs::LABEL => Self::Label,
            rdfs::COMMENT => Self::Comment,
            skos::DEFINITION => Self::Definition,
            skos::ALT_LABEL => Self::AltLabel,
            _ => Self::Custom,
        }
    }
}

const WELL_KNOWN: [&str; 4] = [rdfs::LABEL, rdfs::COMMENT, skos::DEFINITION, skos::ALT_LABEL];

/// Annotation properties of one ontology, keyed by property IRI.
///
/// Built once per ontology. The label, comment, definition and alternative
/// label properties are always present; every property declared by the
/// ontology is added on top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationRegistry {
    entries: BTreeMap<Iri, AnnotationKind>,
}

impl AnnotationRegistry {
    #[must_use]
    pub fn for_ontology(ontology: &Ontology) -> Self {
        let mut entries: BTreeMap<Iri, AnnotationKind> = WELL_KNOWN
            .into_iter()
            .map(|iri| (Iri::from_vocab(iri), AnnotationKind::of(iri)))
            .collect();
        for declared in ontology.annotation_properties() {
            entries
                .entry(declared.clone())
                .or_insert_with(|| AnnotationKind::of(declared.as_str()));
        }
        Self { entries }
    }

    /// Returns the role of a registered property, `None` for unknown keys.
    #[must_use]
    pub fn kind(&self, property: &str) -> Option<AnnotationKind> {
        self.entries.get(property).copied()
    }

    /// Returns the values of `property` on `class`.
    ///
    /// A key that is neither registered nor used on the class yields an empty
    /// slice.
    #[must_use]
    pub fn values<'c>(&self, class: &'c Class, property: &str) -> &'c [String] {
        class.annotation_values(property)
    }

    /// Returns the properties whose values move with `class`: every registered
    /// property plus every property the class carries a value for.
    #[must_use]
    pub fn properties_to_copy<'a>(&'a self, class: &'a Class) -> BTreeSet<&'a Iri> {
        self.entries
            .keys()
            .chain(class.annotated_properties())
            .collect()
    }

    /// Merges the annotations of `source` into `target` with set-union
    /// semantics and returns how many values were added.
    pub fn copy_annotations(&self, source: &Class, target: &mut Class) -> usize {
        let mut added = 0;
        for property in self.properties_to_copy(source) {
            for value in self.values(source, property.as_str()) {
                if target.add_annotation(property.clone(), value.clone()) {
                    added += 1;
                }
            }
        }
        added
    }
}
