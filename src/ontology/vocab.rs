//! Vocabulary IRIs read and written by the ontology store.

/// RDF vocabulary constants
pub mod rdf {
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// RDFS vocabulary constants
pub mod rdfs {
    pub const NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:subClassOf IRI
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

    /// rdfs:domain IRI
    pub const DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";

    /// rdfs:range IRI
    pub const RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:comment IRI
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

    /// rdfs:Literal IRI
    pub const LITERAL: &str = "http://www.w3.org/2000/01/rdf-schema#Literal";
}

/// OWL vocabulary constants
pub mod owl {
    pub const NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";

    /// owl:Ontology IRI
    pub const ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";

    /// owl:Class IRI
    pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";

    /// owl:Thing IRI, the universal root class
    pub const THING: &str = "http://www.w3.org/2002/07/owl#Thing";

    /// owl:ObjectProperty IRI
    pub const OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";

    /// owl:DatatypeProperty IRI
    pub const DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";

    /// owl:AnnotationProperty IRI
    pub const ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
}

/// SKOS vocabulary constants
pub mod skos {
    pub const NAMESPACE: &str = "http://www.w3.org/2004/02/skos/core#";

    /// skos:definition IRI
    pub const DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";

    /// skos:altLabel IRI
    pub const ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
}

/// XSD vocabulary constants
pub mod xsd {
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
}

/// Returns `true` when the IRI names a datatype rather than a class.
#[must_use]
pub fn is_datatype(iri: &str) -> bool {
    iri.starts_with(xsd::NAMESPACE) || iri == rdfs::LITERAL || iri.starts_with(rdf::NAMESPACE)
}
