use std::collections::{BTreeMap, VecDeque};

use crate::ontology::{Iri, Ontology};

/// Parent-before-child ordering of a class set.
#[derive(Debug, Default)]
pub struct TopologicalOrder<'a> {
    /// Classes whose in-set parents all precede them.
    pub ordered: Vec<&'a Iri>,
    /// Members left over because they sit on a subclass cycle.
    pub cyclic: Vec<&'a Iri>,
}

/// Orders `members` so that every class appears after each of its parents
/// that is also a member.
///
/// Parents outside `members` are ignored. Classes that become ready at the
/// same time keep their relative order in `members`, so the result is
/// deterministic for a given input.
#[must_use]
pub fn topological_order<'a>(ontology: &Ontology, members: &[&'a Iri]) -> TopologicalOrder<'a> {
    let position: BTreeMap<&Iri, usize> = members
        .iter()
        .enumerate()
        .map(|(index, iri)| (*iri, index))
        .collect();

    let mut in_degree = vec![0_usize; members.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); members.len()];
    for (index, member) in members.iter().enumerate() {
        let Some(class) = ontology.class(member.as_str()) else {
            continue;
        };
        for parent in class.parents() {
            if let Some(&parent_index) = position.get(parent) {
                in_degree[index] += 1;
                children[parent_index].push(index);
            }
        }
    }

    let mut ready: VecDeque<usize> = (0..members.len())
        .filter(|index| in_degree[*index] == 0)
        .collect();
    let mut ordered = Vec::with_capacity(members.len());

    while let Some(index) = ready.pop_front() {
        ordered.push(members[index]);
        for &child in &children[index] {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                ready.push_back(child);
            }
        }
    }

    let cyclic = (0..members.len())
        .filter(|index| in_degree[*index] > 0)
        .map(|index| members[index])
        .collect();

    TopologicalOrder { ordered, cyclic }
}
