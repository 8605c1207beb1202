//! Drives a complete merge run.
//!
//! A run loads both ontologies, checks the import ontology, executes the tasks
//! in order against one destination (saving a checkpoint after each), migrates
//! properties, and finally writes the merged ontology and a JSON report.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{error, info};

use super::{
    classes::ClassMigrator, context::MergeContext, properties::PropertyMigrator,
    report::MergeReport, task::MergeTask,
};
use crate::{
    ontology::{ConsistencyChecker, Iri, Ontology, OntologyFormat, OntologyStore},
    Error, Result,
};

/// Typed inputs of a merge run.
#[derive(Clone, Debug)]
pub struct MergeRequest {
    pub base: PathBuf,
    pub import: PathBuf,
    pub tasks: Vec<MergeTask>,
    pub base_iri: Iri,
    pub output_dir: PathBuf,
    pub final_output: PathBuf,
}

impl MergeRequest {
    #[must_use]
    pub fn final_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.final_output)
    }

    /// `<final_output>.report.json` in the output directory.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        let mut name = self.final_output.as_os_str().to_os_string();
        name.push(".report.json");
        self.output_dir.join(name)
    }
}

/// Runs the tasks against an already loaded destination.
///
/// `checkpoint` is invoked once after every task, including tasks that were
/// skipped or aborted, and returns the location it wrote to. The caller
/// decides where and how checkpoints are persisted.
///
/// # Errors
///
/// Propagates migration invariant violations and checkpoint failures; task
/// level problems are recorded in the report instead.
pub fn execute<F>(
    source: &Ontology,
    context: &mut MergeContext,
    tasks: &[MergeTask],
    mut checkpoint: F,
) -> Result<MergeReport>
where
    F: FnMut(&Ontology, &MergeTask) -> Result<PathBuf>,
{
    let classes = ClassMigrator::new(source);
    let mut report = MergeReport::default();

    for (index, task) in tasks.iter().enumerate() {
        info!(
            task = index + 1,
            import_class = %task.import_class_iri,
            base_parent = %task.base_parent_iri,
            "merge_task_started"
        );
        let mut task_report = classes.migrate(context, task)?;
        let saved = checkpoint(context.destination(), task)?;
        info!(task = index + 1, checkpoint = %saved.display(), "merge_task_checkpointed");
        task_report.checkpoint = Some(saved);
        report.tasks.push(task_report);
    }

    report.properties = PropertyMigrator::new(source).migrate(context)?;
    for property in &report.properties.created {
        info!(
            property = %property.destination,
            kind = ?property.kind,
            labels = ?property.labels,
            domains = ?property.domains,
            ranges = ?property.ranges,
            "merged_property"
        );
    }
    Ok(report)
}

/// Loads, merges and saves through an [`OntologyStore`].
pub struct MergeOrchestrator<'a, S> {
    store: &'a S,
    checker: Option<&'a dyn ConsistencyChecker>,
}

impl<'a, S> MergeOrchestrator<'a, S>
where
    S: OntologyStore,
    Error: From<S::Error>,
{
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            checker: None,
        }
    }

    /// Checks the import ontology with `checker` before any migration.
    #[must_use]
    pub fn with_checker(mut self, checker: &'a dyn ConsistencyChecker) -> Self {
        self.checker = Some(checker);
        self
    }

    /// Executes a full run.
    ///
    /// Checkpoints already written stay on disk when a later step fails.
    ///
    /// # Errors
    ///
    /// Fails when an ontology cannot be loaded or saved, when the consistency
    /// check rejects the import ontology, or when the report cannot be
    /// written.
    pub fn run(&self, request: &MergeRequest) -> Result<MergeReport> {
        let (destination, format) = self.store.load(&request.base)?;
        let (source, _) = self.store.load(&request.import)?;
        info!(
            base = %request.base.display(),
            import = %request.import.display(),
            destination_classes = destination.classes().len(),
            source_classes = source.classes().len(),
            "ontologies_loaded"
        );

        self.check(&source, &request.import)?;

        fs::create_dir_all(&request.output_dir).map_err(|source| Error::Io {
            path: request.output_dir.clone(),
            source,
        })?;

        let mut context = MergeContext::new(destination, &request.base_iri);
        let mut report = execute(&source, &mut context, &request.tasks, |ontology, task| {
            let path = request.output_dir.join(&task.output_file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| Error::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            self.save(ontology, &path, format)?;
            Ok(path)
        })?;

        let final_path = request.final_output_path();
        self.save(context.destination(), &final_path, format)?;
        info!(path = %final_path.display(), "merged_ontology_saved");
        report.final_output = Some(final_path);

        let report_path = request.report_path();
        write_report(&report, &report_path)?;
        info!(path = %report_path.display(), "merge_report_saved");
        Ok(report)
    }

    fn check(&self, source: &Ontology, path: &Path) -> Result<()> {
        let Some(checker) = self.checker else {
            info!("consistency_check_disabled");
            return Ok(());
        };
        info!(checker = checker.name(), path = %path.display(), "consistency_check_started");
        checker.check(source, path).map_err(|err| {
            error!(checker = checker.name(), err.msg = %err, err.detail = ?err, "consistency_check_failed");
            Error::Reasoner(err)
        })?;
        info!(checker = checker.name(), "consistency_check_passed");
        Ok(())
    }

    fn save(&self, ontology: &Ontology, path: &Path, format: OntologyFormat) -> Result<()> {
        self.store.save(ontology, path, format)?;
        Ok(())
    }
}

fn write_report(report: &MergeReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
