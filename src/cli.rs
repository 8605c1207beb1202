//! # Command Line Interface
//!
//! The binary takes the six inputs of a merge run as flags. Logging and the
//! consistency checker are configured through the YAML file described in
//! [`crate::config`].
//!
//! ```sh
//! owl-merge --base base.owl --import-onto import.owl --tasks tasks.json \
//!     --base-iri http://example.org/onto# --output-dir out --final-output merged.owl
//! ```

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use crate::{
    config::Config,
    logger,
    merge::{load_tasks, MergeOrchestrator, MergeReport, MergeRequest, TaskOutcome},
    ontology::{reasoner, Iri, RdfFileStore},
    Result,
};

#[derive(Parser, Debug)]
#[command(name = "owl-merge", version, about = "Transplant class subtrees between OWL ontologies")]
pub struct Cli {
    /// Base ontology receiving the merged classes
    #[arg(long)]
    pub base: PathBuf,

    /// Ontology the classes are imported from
    #[arg(long = "import-onto", alias = "import_onto")]
    pub import_onto: PathBuf,

    /// JSON list of merge tasks
    #[arg(long)]
    pub tasks: PathBuf,

    /// Namespace of the identifiers issued in the base ontology
    #[arg(long = "base-iri", alias = "base_iri")]
    pub base_iri: String,

    /// Directory receiving checkpoints, the merged ontology and the report
    #[arg(long = "output-dir", alias = "output_dir")]
    pub output_dir: PathBuf,

    /// File name of the merged ontology inside the output directory
    #[arg(long = "final-output", alias = "final_output")]
    pub final_output: PathBuf,
}

impl Cli {
    /// Validates the flags into a [`MergeRequest`], reading the task file.
    ///
    /// # Errors
    ///
    /// Fails when the base IRI is invalid or the task file cannot be loaded.
    pub fn into_request(self) -> Result<MergeRequest> {
        Ok(MergeRequest {
            base_iri: Iri::new(self.base_iri)?,
            tasks: load_tasks(&self.tasks)?,
            base: self.base,
            import: self.import_onto,
            output_dir: self.output_dir,
            final_output: self.final_output,
        })
    }
}

/// Parses the command line and runs the merge.
///
/// # Errors
///
/// Returns any configuration, loading, checking or saving failure of the run.
pub fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let _guard = logger::init(&config.logger)?;

    let request = cli.into_request()?;
    let store = RdfFileStore::new();
    let checker = reasoner::from_settings(&config.reasoner);

    let mut orchestrator = MergeOrchestrator::new(&store);
    if let Some(checker) = checker.as_deref() {
        orchestrator = orchestrator.with_checker(checker);
    }
    let report = orchestrator.run(&request)?;
    print_summary(&report);
    Ok(())
}

fn print_summary(report: &MergeReport) {
    for (index, task) in report.tasks.iter().enumerate() {
        let status = match task.outcome {
            TaskOutcome::Completed => "completed".green(),
            TaskOutcome::ImportClassNotFound => "skipped, import class not found".yellow(),
            TaskOutcome::BaseParentNotFound => "aborted, base parent not found".red(),
        };
        println!(
            "task {}: {} -> {} [{status}] {} classes created",
            index + 1,
            task.import_class,
            task.base_parent,
            task.created_count()
        );
        for class in &task.root_fallbacks {
            println!("  {} {class} placed at the top level", "warning:".yellow());
        }
        for class in &task.cyclic {
            println!("  {} {class} skipped, subclass cycle", "warning:".yellow());
        }
    }

    println!(
        "properties: {} created, {} excluded",
        report.properties.created.len(),
        report.properties.excluded.len()
    );
    for excluded in &report.properties.excluded {
        let mut reasons: Vec<String> = excluded.unresolved.iter().map(ToString::to_string).collect();
        let anonymous = excluded.anonymous_domains + excluded.anonymous_ranges;
        if anonymous > 0 {
            reasons.push(format!("{anonymous} class expression(s)"));
        }
        println!(
            "  {} {} excluded, unresolved {}",
            "warning:".yellow(),
            excluded.source,
            reasons.join(", ")
        );
    }
    if let Some(path) = &report.final_output {
        println!("{} {}", "merged ontology:".bold(), path.display());
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::Cli;

    #[test]
    fn accepts_hyphenated_and_underscored_flags() {
        let hyphenated = Cli::try_parse_from([
            "owl-merge",
            "--base",
            "base.owl",
            "--import-onto",
            "import.owl",
            "--tasks",
            "tasks.json",
            "--base-iri",
            "http://base.example/onto#",
            "--output-dir",
            "out",
            "--final-output",
            "merged.owl",
        ])
        .expect("hyphenated flags");
        let underscored = Cli::try_parse_from([
            "owl-merge",
            "--base",
            "base.owl",
            "--import_onto",
            "import.owl",
            "--tasks",
            "tasks.json",
            "--base_iri",
            "http://base.example/onto#",
            "--output_dir",
            "out",
            "--final_output",
            "merged.owl",
        ])
        .expect("underscored flags");

        assert_eq!(hyphenated.import_onto, underscored.import_onto);
        assert_eq!(underscored.output_dir, PathBuf::from("out"));
        assert_eq!(underscored.final_output, PathBuf::from("merged.owl"));
    }

    #[test]
    fn every_flag_is_required() {
        let err = Cli::try_parse_from(["owl-merge", "--base", "base.owl"]).expect_err("missing");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn invalid_base_iri_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tasks = dir.path().join("tasks.json");
        std::fs::write(&tasks, "[]").expect("tasks");
        let cli = Cli::try_parse_from([
            "owl-merge",
            "--base",
            "base.owl",
            "--import-onto",
            "import.owl",
            "--tasks",
            tasks.to_str().expect("utf-8 path"),
            "--base-iri",
            "not an iri",
            "--output-dir",
            "out",
            "--final-output",
            "merged.owl",
        ])
        .expect("flags");

        assert!(matches!(cli.into_request(), Err(crate::Error::Iri(_))));
    }
}
