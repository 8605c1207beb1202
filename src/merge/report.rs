//! Observable record of a merge run.
//!
//! Every decision that changes what reaches the destination (skipped tasks,
//! aborted class loops, root fallbacks, excluded properties) is captured here
//! as well as logged, so callers can tell exactly which classes made it into
//! the class map.

use std::path::PathBuf;

use serde::Serialize;

use crate::ontology::{Iri, PropertyKind};

/// How a task ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    Completed,
    /// The import class is not a class of the import ontology; nothing was
    /// migrated.
    ImportClassNotFound,
    /// The base parent is not a class of the destination; the class loop
    /// stopped before the first class.
    BaseParentNotFound,
}

/// A source class and the destination class it maps to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MigratedClass {
    pub source: Iri,
    pub destination: Iri,
    /// Destination parents after this step; empty means top level.
    pub parents: Vec<Iri>,
    /// `true` when an earlier task had already migrated the class and only
    /// its parents were extended.
    pub reused: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    /// Import class IRI as written in the task file.
    pub import_class: String,
    /// Base parent IRI as written in the task file.
    pub base_parent: String,
    pub outcome: TaskOutcome,
    pub classes: Vec<MigratedClass>,
    /// Classes placed at the top level because none of their parents had
    /// been migrated.
    pub root_fallbacks: Vec<Iri>,
    /// Closure members left out because they sit on a subclass cycle.
    pub cyclic: Vec<Iri>,
    /// Checkpoint written after the task.
    pub checkpoint: Option<PathBuf>,
}

impl TaskReport {
    #[must_use]
    pub fn new(import_class: impl Into<String>, base_parent: impl Into<String>) -> Self {
        Self {
            import_class: import_class.into(),
            base_parent: base_parent.into(),
            outcome: TaskOutcome::Completed,
            classes: Vec::new(),
            root_fallbacks: Vec::new(),
            cyclic: Vec::new(),
            checkpoint: None,
        }
    }

    /// Number of classes this task created, reuses excluded.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.classes.iter().filter(|class| !class.reused).count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MigratedProperty {
    pub source: Iri,
    pub destination: Iri,
    pub kind: PropertyKind,
    pub labels: Vec<String>,
    pub domains: Vec<Iri>,
    pub ranges: Vec<Iri>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExcludedProperty {
    pub source: Iri,
    pub kind: PropertyKind,
    /// Domain or range classes found neither in the class map nor in the
    /// destination.
    pub unresolved: Vec<Iri>,
    /// Domains given as anonymous class expressions, which never resolve.
    pub anonymous_domains: usize,
    /// Ranges given as anonymous class or data range expressions.
    pub anonymous_ranges: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PropertyReport {
    pub created: Vec<MigratedProperty>,
    pub excluded: Vec<ExcludedProperty>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub tasks: Vec<TaskReport>,
    pub properties: PropertyReport,
    pub final_output: Option<PathBuf>,
}

impl MergeReport {
    /// Total classes created across all tasks.
    #[must_use]
    pub fn created_class_count(&self) -> usize {
        self.tasks.iter().map(TaskReport::created_count).sum()
    }

    /// Tasks that did not complete.
    pub fn incomplete_tasks(&self) -> impl Iterator<Item = &TaskReport> {
        self.tasks
            .iter()
            .filter(|task| task.outcome != TaskOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::{MergeReport, MigratedClass, TaskOutcome, TaskReport};
    use crate::ontology::Iri;

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    #[test]
    fn counts_skip_reused_classes() {
        let mut task = TaskReport::new("http://import.example/onto#10", "http://base.example/onto#00001");
        task.classes.push(MigratedClass {
            source: iri("http://import.example/onto#10"),
            destination: iri("http://base.example/onto#00002"),
            parents: vec![iri("http://base.example/onto#00001")],
            reused: false,
        });
        task.classes.push(MigratedClass {
            source: iri("http://import.example/onto#11"),
            destination: iri("http://base.example/onto#00003"),
            parents: vec![iri("http://base.example/onto#00002")],
            reused: true,
        });
        let mut skipped = TaskReport::new("http://import.example/onto#99", "http://base.example/onto#00001");
        skipped.outcome = TaskOutcome::ImportClassNotFound;

        let report = MergeReport {
            tasks: vec![task, skipped],
            ..MergeReport::default()
        };

        assert_eq!(report.created_class_count(), 1);
        assert_eq!(report.incomplete_tasks().count(), 1);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(TaskOutcome::BaseParentNotFound).expect("json");
        assert_eq!(json, serde_json::json!({ "status": "base_parent_not_found" }));
    }
}
