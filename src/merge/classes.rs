//! Class migration: recreates a subclass closure of the import ontology inside
//! the destination, one class at a time in parent-before-child order.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::{
    closure::SubclassIndex,
    context::MergeContext,
    identifiers::IdentifierKind,
    labels::format_label,
    report::{MigratedClass, TaskOutcome, TaskReport},
    task::MergeTask,
    topology::topological_order,
};
use crate::{
    ontology::{vocab::owl, AnnotationKind, AnnotationRegistry, Class, Iri, Ontology},
    Error, Result,
};

#[derive(Debug, PartialEq, Eq)]
enum ParentResolution {
    Resolved(BTreeSet<Iri>),
    /// None of the original parents has been migrated.
    FallbackToRoot,
    BaseParentMissing,
}

/// Migrates class subtrees from one source ontology.
///
/// The subclass index and annotation registry are built once from the source
/// and reused by every task of the run.
#[derive(Debug)]
pub struct ClassMigrator<'s> {
    source: &'s Ontology,
    index: SubclassIndex<'s>,
    registry: AnnotationRegistry,
}

impl<'s> ClassMigrator<'s> {
    #[must_use]
    pub fn new(source: &'s Ontology) -> Self {
        Self {
            source,
            index: SubclassIndex::new(source),
            registry: AnnotationRegistry::for_ontology(source),
        }
    }

    /// Runs the class loop of one task against the destination held by
    /// `context`.
    ///
    /// A missing import class or base parent ends the task early and is
    /// reported through [`TaskReport::outcome`], not as an error.
    ///
    /// # Errors
    ///
    /// Fails when an identifier cannot be built or when the destination
    /// rejects a class, both of which mean the run itself is broken.
    pub fn migrate(&self, context: &mut MergeContext, task: &MergeTask) -> Result<TaskReport> {
        let mut report = TaskReport::new(task.import_class_iri.clone(), task.base_parent_iri.clone());

        let Some(root) = self.source.class(&task.import_class_iri) else {
            warn!(
                import_class = %task.import_class_iri,
                valid_iri = Iri::new(task.import_class_iri.as_str()).is_ok(),
                "import_class_not_found"
            );
            report.outcome = TaskOutcome::ImportClassNotFound;
            return Ok(report);
        };

        let closure = self.index.closure(root.id());
        let order = topological_order(self.source, &closure);
        debug!(
            import_class = %root.id(),
            closure = closure.len(),
            ordered = order.ordered.len(),
            "class_closure_collected"
        );
        for cyclic in &order.cyclic {
            warn!(class = %cyclic, import_class = %root.id(), "class_skipped_on_subclass_cycle");
        }
        report.cyclic = order.cyclic.iter().map(|iri| (*iri).clone()).collect();

        for class_iri in order.ordered {
            let Some(class) = self.source.class(class_iri.as_str()) else {
                continue;
            };

            let parents = match self.resolve_parents(context, class, root.id(), &task.base_parent_iri) {
                ParentResolution::Resolved(parents) => parents,
                ParentResolution::FallbackToRoot => {
                    warn!(
                        class = %class_iri,
                        original_parents = ?class.parents(),
                        "class_parent_fallback_to_root"
                    );
                    report.root_fallbacks.push(class_iri.clone());
                    BTreeSet::new()
                }
                ParentResolution::BaseParentMissing => {
                    warn!(
                        base_parent = %task.base_parent_iri,
                        valid_iri = Iri::new(task.base_parent_iri.as_str()).is_ok(),
                        import_class = %root.id(),
                        "base_parent_not_found"
                    );
                    report.outcome = TaskOutcome::BaseParentNotFound;
                    break;
                }
            };

            report.classes.push(self.migrate_class(context, class, parents)?);
        }

        info!(
            import_class = %root.id(),
            outcome = ?report.outcome,
            created = report.created_count(),
            "class_migration_finished"
        );
        Ok(report)
    }

    /// Destination parents of `class`. The task root hangs under the base
    /// parent, or under nothing when the base parent is `owl:Thing`; every
    /// other class hangs under the migrated counterparts of its parents.
    fn resolve_parents(
        &self,
        context: &MergeContext,
        class: &Class,
        root: &Iri,
        base_parent: &str,
    ) -> ParentResolution {
        if class.id() == root {
            if base_parent == owl::THING {
                return ParentResolution::Resolved(BTreeSet::new());
            }
            return context.destination().class(base_parent).map_or(
                ParentResolution::BaseParentMissing,
                |parent| ParentResolution::Resolved(BTreeSet::from([parent.id().clone()])),
            );
        }

        let mapped: BTreeSet<Iri> = class
            .parents()
            .iter()
            .filter_map(|parent| context.class_map().get(parent.as_str()).cloned())
            .collect();
        if mapped.is_empty() && !context.class_map().contains(class.id().as_str()) {
            ParentResolution::FallbackToRoot
        } else {
            ParentResolution::Resolved(mapped)
        }
    }

    fn migrate_class(
        &self,
        context: &mut MergeContext,
        class: &Class,
        parents: BTreeSet<Iri>,
    ) -> Result<MigratedClass> {
        let (destination, allocator, class_map) = context.parts_mut();

        if let Some(existing) = class_map.get(class.id().as_str()).cloned() {
            let target = destination.class_mut(existing.as_str()).ok_or_else(|| {
                Error::Message(format!(
                    "class `{existing}` mapped from `{}` is missing from the destination",
                    class.id()
                ))
            })?;
            for parent in parents {
                target.add_parent(parent);
            }
            debug!(source = %class.id(), destination = %existing, "class_reused");
            return Ok(MigratedClass {
                source: class.id().clone(),
                destination: existing,
                parents: target.parents().iter().cloned().collect(),
                reused: true,
            });
        }

        let id = allocator.allocate(IdentifierKind::Class)?;
        let mut migrated = Class::new(id.clone());
        for parent in parents {
            migrated.add_parent(parent);
        }

        if class.labels().is_empty() {
            let name = class.id().local_name();
            if !name.is_empty() && !name.chars().all(|ch| ch.is_ascii_digit()) {
                migrated.add_label(format_label(name));
            }
        } else {
            for label in class.labels() {
                migrated.add_label(format_label(label));
            }
        }

        self.registry.copy_annotations(class, &mut migrated);
        for property in class.annotated_properties() {
            if !matches!(
                self.registry.kind(property.as_str()),
                Some(AnnotationKind::Label | AnnotationKind::Comment)
            ) {
                destination.declare_annotation_property(property.clone());
            }
        }
        migrated.add_comment(format!("Original IRI: {}", class.id()));

        let parents: Vec<Iri> = migrated.parents().iter().cloned().collect();
        destination.add_class(migrated)?;
        class_map.insert(class.id().clone(), id.clone());

        info!(source = %class.id(), destination = %id, parents = ?parents, "class_migrated");
        Ok(MigratedClass {
            source: class.id().clone(),
            destination: id,
            parents,
            reused: false,
        })
    }
}
