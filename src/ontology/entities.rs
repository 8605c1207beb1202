use std::collections::{BTreeMap, BTreeSet};

use oxrdf::Triple;
use serde::Serialize;
use thiserror::Error;

use super::{
    value_objects::Iri,
    vocab::{owl, rdfs, skos},
};

/// Ontology class definition capturing parent relationships and annotations.
///
/// Annotation values are kept per annotation property in insertion order and
/// never hold the same value twice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Class {
    id: Iri,
    annotations: BTreeMap<Iri, Vec<String>>,
    super_classes: BTreeSet<Iri>,
}

impl Class {
    /// Creates a new [`Class`] with the supplied identifier.
    #[must_use]
    pub fn new(id: Iri) -> Self {
        Self {
            id,
            annotations: BTreeMap::new(),
            super_classes: BTreeSet::new(),
        }
    }

    /// Adds a human friendly label for the class.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.add_label(label);
        self
    }

    /// Adds a textual description for the class.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.add_comment(comment);
        self
    }

    /// Adds a parent relation while building the class.
    #[must_use]
    pub fn with_parent(mut self, parent: Iri) -> Self {
        self.add_parent(parent);
        self
    }

    /// Adds a value for the given annotation property.
    ///
    /// Returns `false` when the value was already present.
    pub fn add_annotation(&mut self, property: Iri, value: impl Into<String>) -> bool {
        let value = value.into();
        let values = self.annotations.entry(property).or_default();
        if values.contains(&value) {
            return false;
        }
        values.push(value);
        true
    }

    /// Adds an `rdfs:label` value.
    pub fn add_label(&mut self, label: impl Into<String>) -> bool {
        self.add_annotation(Iri::from_vocab(rdfs::LABEL), label)
    }

    /// Adds an `rdfs:comment` value.
    pub fn add_comment(&mut self, comment: impl Into<String>) -> bool {
        self.add_annotation(Iri::from_vocab(rdfs::COMMENT), comment)
    }

    /// Adds a new parent class relation.
    pub fn add_parent(&mut self, parent: Iri) -> bool {
        self.super_classes.insert(parent)
    }

    /// Returns the unique identifier of the class.
    #[must_use]
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Returns the values stored for an annotation property.
    ///
    /// Unknown properties yield an empty slice.
    #[must_use]
    pub fn annotation_values(&self, property: &str) -> &[String] {
        self.annotations
            .get(property)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        self.annotation_values(rdfs::LABEL)
    }

    #[must_use]
    pub fn comments(&self) -> &[String] {
        self.annotation_values(rdfs::COMMENT)
    }

    #[must_use]
    pub fn definitions(&self) -> &[String] {
        self.annotation_values(skos::DEFINITION)
    }

    #[must_use]
    pub fn alt_labels(&self) -> &[String] {
        self.annotation_values(skos::ALT_LABEL)
    }

    /// Returns every annotation property carrying at least one value.
    pub fn annotated_properties(&self) -> impl Iterator<Item = &Iri> {
        self.annotations
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(property, _)| property)
    }

    /// Returns all annotations keyed by property.
    #[must_use]
    pub fn annotations(&self) -> &BTreeMap<Iri, Vec<String>> {
        &self.annotations
    }

    /// Returns the parent classes in lexical order.
    #[must_use]
    pub fn parents(&self) -> &BTreeSet<Iri> {
        &self.super_classes
    }
}

/// Ontology property definition supporting object and data properties.
///
/// For data properties the ranges hold datatype IRIs rather than classes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    id: Iri,
    kind: PropertyKind,
    labels: Vec<String>,
    comments: Vec<String>,
    domains: BTreeSet<Iri>,
    ranges: BTreeSet<Iri>,
    anonymous_domains: usize,
    anonymous_ranges: usize,
}

impl Property {
    /// Creates a new property with the provided identifier and kind.
    #[must_use]
    pub fn new(id: Iri, kind: PropertyKind) -> Self {
        Self {
            id,
            kind,
            labels: Vec::new(),
            comments: Vec::new(),
            domains: BTreeSet::new(),
            ranges: BTreeSet::new(),
            anonymous_domains: 0,
            anonymous_ranges: 0,
        }
    }

    /// Adds a human readable label for the property.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.add_label(label);
        self
    }

    pub fn add_label(&mut self, label: impl Into<String>) -> bool {
        push_unique(&mut self.labels, label.into())
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) -> bool {
        push_unique(&mut self.comments, comment.into())
    }

    /// Declares that the property applies to the supplied domain class.
    pub fn add_domain(&mut self, class: Iri) -> bool {
        self.domains.insert(class)
    }

    /// Declares the range class (object) or datatype (data) of the property.
    pub fn add_range(&mut self, range: Iri) -> bool {
        self.ranges.insert(range)
    }

    /// Records a domain given as an anonymous class expression
    /// (`owl:unionOf`, a restriction, ...), which has no IRI to map.
    pub fn add_anonymous_domain(&mut self) {
        self.anonymous_domains += 1;
    }

    /// Records a range given as an anonymous class or data range expression.
    pub fn add_anonymous_range(&mut self) {
        self.anonymous_ranges += 1;
    }

    /// Returns the property identifier.
    #[must_use]
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Returns the property kind.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Returns the registered domain classes.
    #[must_use]
    pub fn domains(&self) -> &BTreeSet<Iri> {
        &self.domains
    }

    /// Returns the registered ranges.
    #[must_use]
    pub fn ranges(&self) -> &BTreeSet<Iri> {
        &self.ranges
    }

    #[must_use]
    pub fn anonymous_domains(&self) -> usize {
        self.anonymous_domains
    }

    #[must_use]
    pub fn anonymous_ranges(&self) -> usize {
        self.anonymous_ranges
    }
}

fn push_unique(values: &mut Vec<String>, value: String) -> bool {
    if values.contains(&value) {
        return false;
    }
    values.push(value);
    true
}

/// Classifies the type of values a property can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Object properties link two classes.
    Object,
    /// Data properties link a class to literal values.
    Data,
}

impl PropertyKind {
    /// Returns the OWL type IRI declaring a property of this kind.
    #[must_use]
    pub fn type_iri(self) -> &'static str {
        match self {
            Self::Object => owl::OBJECT_PROPERTY,
            Self::Data => owl::DATATYPE_PROPERTY,
        }
    }
}

/// Aggregates ontology classes and properties.
///
/// Triples that are not modeled (ontology header, restrictions, individuals,
/// blank-node structures) are carried along untouched as residual content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ontology {
    id: Option<Iri>,
    classes: BTreeMap<Iri, Class>,
    properties: BTreeMap<Iri, Property>,
    annotation_properties: BTreeSet<Iri>,
    residual: Vec<Triple>,
}

impl Ontology {
    /// Creates an empty ontology without an identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ontology identifier.
    #[must_use]
    pub fn with_id(mut self, id: Iri) -> Self {
        self.id = Some(id);
        self
    }

    /// Adds a class to the ontology, enforcing unique identifiers.
    pub fn add_class(&mut self, class: Class) -> Result<(), OntologyError> {
        let id = class.id().clone();
        if self.classes.contains_key(&id) {
            return Err(OntologyError::DuplicateClass(id));
        }
        self.classes.insert(id, class);
        Ok(())
    }

    /// Adds a property to the ontology, validating references to known classes.
    ///
    /// Every domain must be a class of this ontology, and so must every range
    /// of an object property.
    pub fn add_property(&mut self, property: Property) -> Result<(), OntologyError> {
        let id = property.id().clone();
        if self.properties.contains_key(&id) {
            return Err(OntologyError::DuplicateProperty(id));
        }

        let ranges_are_classes = property.kind() == PropertyKind::Object;
        let class_refs = property.domains().iter().chain(
            property
                .ranges()
                .iter()
                .filter(|_| ranges_are_classes),
        );
        for class in class_refs {
            if !self.classes.contains_key(class) {
                return Err(OntologyError::MissingClass {
                    property: id,
                    class: class.clone(),
                });
            }
        }

        self.properties.insert(id, property);
        Ok(())
    }

    /// Stores a property as read from a serialized graph, without checking
    /// that its domain and range classes are declared.
    pub(crate) fn insert_loaded_property(&mut self, property: Property) {
        self.properties.insert(property.id().clone(), property);
    }

    /// Declares an annotation property.
    pub fn declare_annotation_property(&mut self, property: Iri) -> bool {
        self.annotation_properties.insert(property)
    }

    pub(crate) fn push_residual(&mut self, triple: Triple) {
        self.residual.push(triple);
    }

    /// Returns the ontology identifier.
    #[must_use]
    pub fn id(&self) -> Option<&Iri> {
        self.id.as_ref()
    }

    /// Retrieves a class by identifier.
    #[must_use]
    pub fn class(&self, id: &str) -> Option<&Class> {
        self.classes.get(id)
    }

    /// Retrieves a class by identifier for mutation.
    pub fn class_mut(&mut self, id: &str) -> Option<&mut Class> {
        self.classes.get_mut(id)
    }

    /// Returns `true` when the class is declared in this ontology.
    #[must_use]
    pub fn contains_class(&self, id: &str) -> bool {
        self.classes.contains_key(id)
    }

    /// Retrieves a property by identifier.
    #[must_use]
    pub fn property(&self, id: &str) -> Option<&Property> {
        self.properties.get(id)
    }

    /// Returns all classes ordered by identifier.
    #[must_use]
    pub fn classes(&self) -> &BTreeMap<Iri, Class> {
        &self.classes
    }

    /// Returns all properties ordered by identifier.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<Iri, Property> {
        &self.properties
    }

    /// Returns the properties of the given kind ordered by identifier.
    pub fn properties_of_kind(&self, kind: PropertyKind) -> impl Iterator<Item = &Property> {
        self.properties
            .values()
            .filter(move |property| property.kind() == kind)
    }

    /// Returns the declared annotation properties.
    #[must_use]
    pub fn annotation_properties(&self) -> &BTreeSet<Iri> {
        &self.annotation_properties
    }

    /// Returns the triples carried along without being modeled.
    #[must_use]
    pub fn residual(&self) -> &[Triple] {
        &self.residual
    }
}

/// Errors raised when manipulating an ontology aggregate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OntologyError {
    /// Attempted to add a class with an existing identifier.
    #[error("class `{0}` already exists")]
    DuplicateClass(Iri),
    /// Attempted to add a property with an existing identifier.
    #[error("property `{0}` already exists")]
    DuplicateProperty(Iri),
    /// A property referenced a class that is not part of the ontology.
    #[error("property `{property}` references class `{class}` which does not exist")]
    MissingClass { property: Iri, class: Iri },
}
