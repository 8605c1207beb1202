//! Selective merge engine.
//!
//! Leaves first: [`closure`] collects a subclass subtree, [`topology`] orders
//! it, [`identifiers`] issues fresh IRIs, [`classes`] and [`properties`]
//! migrate entities into the destination, and [`orchestrator`] drives the
//! tasks of a run.

pub mod classes;
pub mod closure;
pub mod context;
pub mod identifiers;
pub mod labels;
pub mod orchestrator;
pub mod properties;
pub mod report;
pub mod task;
pub mod topology;

pub use classes::ClassMigrator;
pub use closure::SubclassIndex;
pub use context::{ClassMap, MergeContext};
pub use identifiers::{IdentifierAllocator, IdentifierKind};
pub use labels::format_label;
pub use orchestrator::{execute, MergeOrchestrator, MergeRequest};
pub use properties::PropertyMigrator;
pub use report::{
    ExcludedProperty, MergeReport, MigratedClass, MigratedProperty, PropertyReport, TaskOutcome,
    TaskReport,
};
pub use task::{load_tasks, parse_tasks, MergeTask, TaskFileError};
pub use topology::{topological_order, TopologicalOrder};
