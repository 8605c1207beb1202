use std::collections::BTreeMap;

use super::identifiers::IdentifierAllocator;
use crate::ontology::{Iri, Ontology};

/// Source class IRI to destination class IRI, shared by every task of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassMap {
    entries: BTreeMap<Iri, Iri>,
}

impl ClassMap {
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&Iri> {
        self.entries.get(source)
    }

    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    /// Records a migration. An existing mapping is never replaced; the
    /// destination already recorded is returned instead.
    pub fn insert(&mut self, source: Iri, destination: Iri) -> &Iri {
        self.entries.entry(source).or_insert(destination)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Exclusive handle on the destination graph for the duration of a run.
///
/// Every migration step goes through this handle, which owns the destination
/// ontology, the identifier counters and the class map.
#[derive(Debug)]
pub struct MergeContext {
    destination: Ontology,
    allocator: IdentifierAllocator,
    class_map: ClassMap,
}

impl MergeContext {
    /// Opens a context over `destination`, seeding the identifier counters
    /// from the identifiers it already holds under `base_iri`.
    #[must_use]
    pub fn new(destination: Ontology, base_iri: &Iri) -> Self {
        let allocator = IdentifierAllocator::scan(&destination, base_iri);
        Self {
            destination,
            allocator,
            class_map: ClassMap::default(),
        }
    }

    #[must_use]
    pub fn destination(&self) -> &Ontology {
        &self.destination
    }

    #[must_use]
    pub fn class_map(&self) -> &ClassMap {
        &self.class_map
    }

    #[must_use]
    pub fn allocator(&self) -> &IdentifierAllocator {
        &self.allocator
    }

    /// Splits the handle into its mutable parts.
    pub(crate) fn parts_mut(&mut self) -> (&mut Ontology, &mut IdentifierAllocator, &mut ClassMap) {
        (&mut self.destination, &mut self.allocator, &mut self.class_map)
    }

    /// Closes the context, yielding the merged destination.
    #[must_use]
    pub fn into_destination(self) -> Ontology {
        self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassMap, MergeContext};
    use crate::{
        merge::identifiers::IdentifierKind,
        ontology::{Class, Iri, Ontology},
    };

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    #[test]
    fn class_map_keeps_first_mapping() {
        let mut map = ClassMap::default();
        map.insert(iri("http://import.example/onto#10"), iri("http://base.example/onto#00002"));
        let kept = map
            .insert(iri("http://import.example/onto#10"), iri("http://base.example/onto#00009"))
            .clone();

        assert_eq!(kept, iri("http://base.example/onto#00002"));
        assert_eq!(map.len(), 1);
        assert!(map.contains("http://import.example/onto#10"));
        assert!(map.get("http://import.example/onto#11").is_none());
    }

    #[test]
    fn context_seeds_allocator_from_destination() {
        let mut destination = Ontology::new();
        destination
            .add_class(Class::new(iri("http://base.example/onto#00001")))
            .expect("class");

        let context = MergeContext::new(destination, &iri("http://base.example/onto#"));

        assert_eq!(context.allocator().peek(IdentifierKind::Class), 2);
        assert!(context.class_map().is_empty());
        assert_eq!(context.into_destination().classes().len(), 1);
    }
}
