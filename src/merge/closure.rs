use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::ontology::{Iri, Ontology};

/// Reverse index of the `rdfs:subClassOf` edges of one ontology.
///
/// Children are listed in identifier order, which keeps every traversal built
/// on the index reproducible.
#[derive(Debug)]
pub struct SubclassIndex<'a> {
    children: BTreeMap<&'a Iri, Vec<&'a Iri>>,
}

impl<'a> SubclassIndex<'a> {
    #[must_use]
    pub fn new(ontology: &'a Ontology) -> Self {
        let mut children: BTreeMap<&'a Iri, Vec<&'a Iri>> = BTreeMap::new();
        for class in ontology.classes().values() {
            for parent in class.parents() {
                children.entry(parent).or_default().push(class.id());
            }
        }
        Self { children }
    }

    /// Direct subclasses of `class`.
    #[must_use]
    pub fn children(&self, class: &Iri) -> &[&'a Iri] {
        self.children.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `root` followed by all of its transitive subclasses in
    /// breadth-first discovery order.
    ///
    /// A worklist with a visited set keeps the walk bounded even when the
    /// hierarchy contains a cycle; revisiting a class is a no-op.
    #[must_use]
    pub fn closure(&self, root: &'a Iri) -> Vec<&'a Iri> {
        let mut visited: BTreeSet<&'a Iri> = BTreeSet::from([root]);
        let mut closure = vec![root];
        let mut worklist = VecDeque::from([root]);

        while let Some(current) = worklist.pop_front() {
            for child in self.children(current) {
                if visited.insert(child) {
                    closure.push(child);
                    worklist.push_back(child);
                }
            }
        }
        closure
    }
}
