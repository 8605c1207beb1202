//! File-backed [`OntologyStore`] reading and writing RDF graphs.
//!
//! Loading classifies every triple either into the [`Ontology`] model or into
//! its residual content; saving writes the model back out followed by the
//! residual triples, so axioms the model does not understand survive a
//! load/save cycle unchanged.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use oxrdf::{Literal, NamedNode, NamedOrBlankNode, Term, Triple};
use oxrdfio::{RdfParseError, RdfParser, RdfSerializer};
use tracing::debug;

use super::{
    entities::{Class, Ontology, Property, PropertyKind},
    repositories::{OntologyFormat, OntologyStore},
    value_objects::Iri,
    vocab::{owl, rdf, rdfs, skos, xsd},
};

const PREFIXES: [(&str, &str); 5] = [
    ("owl", owl::NAMESPACE),
    ("rdf", rdf::NAMESPACE),
    ("rdfs", rdfs::NAMESPACE),
    ("skos", skos::NAMESPACE),
    ("xsd", xsd::NAMESPACE),
];

/// Errors raised by [`RdfFileStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file extension does not map to a supported serialization.
    #[error("cannot infer an RDF serialization from `{path}`")]
    UnsupportedFormat { path: PathBuf },
    /// Reading or writing the file failed.
    #[error("failed to access ontology file `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file content is not valid RDF.
    #[error("failed to parse ontology file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        source: RdfParseError,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Ontology store persisting graphs as RDF/XML, Turtle or N-Triples files.
#[derive(Clone, Debug, Default)]
pub struct RdfFileStore;

impl RdfFileStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parses an ontology from any reader.
    pub fn read<R: Read>(reader: R, format: OntologyFormat) -> Result<Ontology, RdfParseError> {
        let triples = RdfParser::from_format(format.to_rdf_format())
            .for_reader(reader)
            .map(|quad| quad.map(|quad| Triple::new(quad.subject, quad.predicate, quad.object)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ontology_from_triples(triples))
    }

    /// Serializes an ontology into any writer and returns the writer.
    pub fn write<W: Write>(
        ontology: &Ontology,
        format: OntologyFormat,
        writer: W,
    ) -> std::io::Result<W> {
        let mut serializer = RdfSerializer::from_format(format.to_rdf_format());
        for (prefix, namespace) in PREFIXES {
            serializer = serializer
                .with_prefix(prefix, namespace)
                .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
        }
        let mut writer = serializer.for_writer(writer);
        for triple in &ontology_to_triples(ontology) {
            writer.serialize_triple(triple)?;
        }
        for triple in ontology.residual() {
            writer.serialize_triple(triple)?;
        }
        writer.finish()
    }
}

impl OntologyStore for RdfFileStore {
    type Error = StoreError;

    fn load(&self, path: &Path) -> Result<(Ontology, OntologyFormat), Self::Error> {
        let format = OntologyFormat::from_path(path).ok_or_else(|| StoreError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let file = File::open(path).map_err(|source| StoreError::io(path, source))?;
        let ontology =
            Self::read(BufReader::new(file), format).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            path = %path.display(),
            classes = ontology.classes().len(),
            properties = ontology.properties().len(),
            residual = ontology.residual().len(),
            "ontology_loaded"
        );
        Ok((ontology, format))
    }

    fn save(
        &self,
        ontology: &Ontology,
        path: &Path,
        format: OntologyFormat,
    ) -> Result<(), Self::Error> {
        let file = File::create(path).map_err(|source| StoreError::io(path, source))?;
        Self::write(ontology, format, BufWriter::new(file))
            .and_then(|mut writer| writer.flush())
            .map_err(|source| StoreError::io(path, source))?;
        debug!(path = %path.display(), "ontology_saved");
        Ok(())
    }
}

fn node(iri: &str) -> NamedNode {
    NamedNode::new_unchecked(iri)
}

#[derive(Default)]
struct Declarations {
    ontology: Option<Iri>,
    classes: BTreeSet<Iri>,
    properties: BTreeMap<Iri, PropertyKind>,
    annotation_properties: BTreeSet<Iri>,
}

impl Declarations {
    fn collect(triples: &[Triple]) -> Self {
        let mut declarations = Self::default();
        for triple in triples {
            let (NamedOrBlankNode::NamedNode(subject), Term::NamedNode(object)) =
                (&triple.subject, &triple.object)
            else {
                continue;
            };
            if triple.predicate.as_str() != rdf::TYPE {
                continue;
            }
            let subject = Iri::from(subject.clone());
            match object.as_str() {
                owl::ONTOLOGY => declarations.ontology = Some(subject),
                owl::CLASS => {
                    declarations.classes.insert(subject);
                }
                owl::OBJECT_PROPERTY => {
                    declarations
                        .properties
                        .insert(subject, PropertyKind::Object);
                }
                owl::DATATYPE_PROPERTY => {
                    declarations
                        .properties
                        .entry(subject)
                        .or_insert(PropertyKind::Data);
                }
                owl::ANNOTATION_PROPERTY => {
                    declarations.annotation_properties.insert(subject);
                }
                _ => {}
            }
        }
        declarations
    }
}

/// Builds the ontology model out of a set of triples.
pub fn ontology_from_triples(triples: Vec<Triple>) -> Ontology {
    let declarations = Declarations::collect(&triples);

    let mut classes: BTreeMap<Iri, Class> = declarations
        .classes
        .iter()
        .map(|iri| (iri.clone(), Class::new(iri.clone())))
        .collect();
    let mut properties: BTreeMap<Iri, Property> = declarations
        .properties
        .iter()
        .filter(|(iri, _)| !classes.contains_key(*iri))
        .map(|(iri, kind)| (iri.clone(), Property::new(iri.clone(), *kind)))
        .collect();

    let mut ontology = Ontology::new();
    if let Some(id) = declarations.ontology {
        ontology = ontology.with_id(id);
    }
    for annotation_property in &declarations.annotation_properties {
        ontology.declare_annotation_property(annotation_property.clone());
    }

    for triple in triples {
        let consumed = match &triple.subject {
            NamedOrBlankNode::NamedNode(subject) => {
                if let Some(class) = classes.get_mut(subject.as_str()) {
                    absorb_class_triple(class, &triple)
                } else if let Some(property) = properties.get_mut(subject.as_str()) {
                    absorb_property_triple(property, &triple)
                } else {
                    declarations.annotation_properties.contains(subject.as_str())
                        && is_type(&triple, owl::ANNOTATION_PROPERTY)
                }
            }
            _ => false,
        };
        if !consumed {
            ontology.push_residual(triple);
        }
    }

    for class in classes.into_values() {
        // identifiers come from a set, so this cannot collide
        let _ = ontology.add_class(class);
    }
    for property in properties.into_values() {
        ontology.insert_loaded_property(property);
    }
    ontology
}

fn is_type(triple: &Triple, type_iri: &str) -> bool {
    triple.predicate.as_str() == rdf::TYPE
        && matches!(&triple.object, Term::NamedNode(object) if object.as_str() == type_iri)
}

fn absorb_class_triple(class: &mut Class, triple: &Triple) -> bool {
    if is_type(triple, owl::CLASS) {
        return true;
    }
    match (triple.predicate.as_str(), &triple.object) {
        (rdfs::SUB_CLASS_OF, Term::NamedNode(parent)) => {
            if parent.as_str() != owl::THING {
                class.add_parent(Iri::from(parent.clone()));
            }
            true
        }
        (predicate, Term::Literal(value)) if predicate != rdf::TYPE => {
            class.add_annotation(Iri::from(triple.predicate.clone()), value.value());
            true
        }
        _ => false,
    }
}

fn absorb_property_triple(property: &mut Property, triple: &Triple) -> bool {
    if is_type(triple, property.kind().type_iri()) {
        return true;
    }
    match (triple.predicate.as_str(), &triple.object) {
        (rdfs::DOMAIN, Term::NamedNode(class)) => {
            property.add_domain(Iri::from(class.clone()));
            true
        }
        (rdfs::RANGE, Term::NamedNode(range)) => {
            property.add_range(Iri::from(range.clone()));
            true
        }
        // the expression itself stays in the residual triples
        (rdfs::DOMAIN, Term::BlankNode(_)) => {
            property.add_anonymous_domain();
            false
        }
        (rdfs::RANGE, Term::BlankNode(_)) => {
            property.add_anonymous_range();
            false
        }
        (rdfs::LABEL, Term::Literal(value)) => {
            property.add_label(value.value());
            true
        }
        (rdfs::COMMENT, Term::Literal(value)) => {
            property.add_comment(value.value());
            true
        }
        _ => false,
    }
}

/// Emits the modeled part of an ontology as triples, in a stable order.
pub fn ontology_to_triples(ontology: &Ontology) -> Vec<Triple> {
    let type_predicate = node(rdf::TYPE);
    let mut triples = Vec::new();

    for annotation_property in ontology.annotation_properties() {
        triples.push(Triple::new(
            annotation_property.to_named_node(),
            type_predicate.clone(),
            node(owl::ANNOTATION_PROPERTY),
        ));
    }

    for class in ontology.classes().values() {
        let subject = class.id().to_named_node();
        triples.push(Triple::new(
            subject.clone(),
            type_predicate.clone(),
            node(owl::CLASS),
        ));
        for parent in class.parents() {
            triples.push(Triple::new(
                subject.clone(),
                node(rdfs::SUB_CLASS_OF),
                parent.to_named_node(),
            ));
        }
        for (property, values) in class.annotations() {
            for value in values {
                triples.push(Triple::new(
                    subject.clone(),
                    property.to_named_node(),
                    Literal::new_simple_literal(value),
                ));
            }
        }
    }

    for property in ontology.properties().values() {
        let subject = property.id().to_named_node();
        triples.push(Triple::new(
            subject.clone(),
            type_predicate.clone(),
            node(property.kind().type_iri()),
        ));
        for domain in property.domains() {
            triples.push(Triple::new(
                subject.clone(),
                node(rdfs::DOMAIN),
                domain.to_named_node(),
            ));
        }
        for range in property.ranges() {
            triples.push(Triple::new(
                subject.clone(),
                node(rdfs::RANGE),
                range.to_named_node(),
            ));
        }
        for label in property.labels() {
            triples.push(Triple::new(
                subject.clone(),
                node(rdfs::LABEL),
                Literal::new_simple_literal(label),
            ));
        }
        for comment in property.comments() {
            triples.push(Triple::new(
                subject.clone(),
                node(rdfs::COMMENT),
                Literal::new_simple_literal(comment),
            ));
        }
    }

    triples
}
