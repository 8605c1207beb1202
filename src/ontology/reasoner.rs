//! Consistency checking performed on the import ontology before a merge.
//!
//! The check is a black box to the merge engine: it either passes or the run
//! stops. Calls block until the checker returns; there is no timeout.

use std::{collections::BTreeMap, path::Path};

use tracing::{debug, info};

use super::{
    entities::{Ontology, PropertyKind},
    value_objects::Iri,
    vocab,
};
use crate::config::{ReasonerBackend, ReasonerSettings};

/// Errors reported by consistency checkers.
#[derive(Debug, thiserror::Error)]
pub enum ReasonerError {
    /// The ontology failed the structural checks.
    #[error("ontology is inconsistent: {}", .reasons.join("; "))]
    Inconsistent { reasons: Vec<String> },
    /// The external reasoner could not be started.
    #[error("failed to run reasoner `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    /// The external reasoner exited unsuccessfully.
    #[error("reasoner `{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Validates an ontology before any of its classes are migrated.
pub trait ConsistencyChecker {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Checks `ontology`, which was loaded from `source`.
    fn check(&self, ontology: &Ontology, source: &Path) -> Result<(), ReasonerError>;
}

/// Builds the checker selected by the settings, `None` when checking is off.
#[must_use]
pub fn from_settings(settings: &ReasonerSettings) -> Option<Box<dyn ConsistencyChecker>> {
    if !settings.enable {
        return None;
    }
    let checker: Box<dyn ConsistencyChecker> = match &settings.backend {
        ReasonerBackend::Native => Box::new(StructuralReasoner),
        ReasonerBackend::Command { program, args } => {
            Box::new(CommandReasoner::new(program.clone(), args.clone()))
        }
    };
    Some(checker)
}

/// In-process checker for the structural problems that break a merge:
/// subclass cycles and object properties ranging over datatypes.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuralReasoner;

impl StructuralReasoner {
    fn subclass_cycles(ontology: &Ontology) -> Vec<Vec<Iri>> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Active,
            Done,
        }

        let mut marks: BTreeMap<&Iri, Mark> = BTreeMap::new();
        let mut cycles = Vec::new();

        for start in ontology.classes().keys() {
            if marks.contains_key(start) {
                continue;
            }
            // (class, parents still to visit) frames
            let mut path: Vec<&Iri> = vec![start];
            let mut stack = vec![(start, Self::class_parents(ontology, start))];
            marks.insert(start, Mark::Active);

            while let Some((current, pending)) = stack.last_mut() {
                let Some(parent) = pending.pop() else {
                    marks.insert(*current, Mark::Done);
                    stack.pop();
                    path.pop();
                    continue;
                };
                match marks.get(parent) {
                    Some(Mark::Active) => {
                        let from = path.iter().position(|iri| *iri == parent).unwrap_or(0);
                        cycles.push(path[from..].iter().map(|iri| (*iri).clone()).collect());
                    }
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(parent, Mark::Active);
                        path.push(parent);
                        stack.push((parent, Self::class_parents(ontology, parent)));
                    }
                }
            }
        }
        cycles
    }

    fn class_parents<'a>(ontology: &'a Ontology, class: &Iri) -> Vec<&'a Iri> {
        ontology
            .class(class.as_str())
            .map(|class| {
                class
                    .parents()
                    .iter()
                    .filter(|parent| ontology.contains_class(parent.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ConsistencyChecker for StructuralReasoner {
    fn name(&self) -> &str {
        "native"
    }

    fn check(&self, ontology: &Ontology, _source: &Path) -> Result<(), ReasonerError> {
        let mut reasons: Vec<String> = Self::subclass_cycles(ontology)
            .into_iter()
            .map(|cycle| {
                let members: Vec<&str> = cycle.iter().map(Iri::as_str).collect();
                format!("subclass cycle through {}", members.join(" -> "))
            })
            .collect();

        for property in ontology.properties_of_kind(PropertyKind::Object) {
            for range in property.ranges() {
                if vocab::is_datatype(range.as_str()) {
                    reasons.push(format!(
                        "object property `{}` ranges over datatype `{range}`",
                        property.id()
                    ));
                }
            }
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(ReasonerError::Inconsistent { reasons })
        }
    }
}

/// Runs an external reasoner program on the ontology file.
///
/// The program receives the configured arguments followed by the ontology
/// path. Any non-zero exit status is a failure.
#[derive(Clone, Debug)]
pub struct CommandReasoner {
    program: String,
    args: Vec<String>,
}

impl CommandReasoner {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl ConsistencyChecker for CommandReasoner {
    fn name(&self) -> &str {
        &self.program
    }

    fn check(&self, _ontology: &Ontology, source: &Path) -> Result<(), ReasonerError> {
        let mut args: Vec<std::ffi::OsString> = self.args.iter().map(Into::into).collect();
        args.push(source.as_os_str().to_os_string());

        debug!(program = %self.program, source = %source.display(), "reasoner_command_started");
        let output = duct::cmd(self.program.as_str(), args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|source| ReasonerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            info!(program = %self.program, "reasoner_command_succeeded");
            Ok(())
        } else {
            Err(ReasonerError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{from_settings, CommandReasoner, ConsistencyChecker, ReasonerError, StructuralReasoner};
    use crate::{
        config::{ReasonerBackend, ReasonerSettings},
        ontology::{Class, Iri, Ontology, Property, PropertyKind},
    };

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    fn hierarchy() -> Ontology {
        let mut ontology = Ontology::new();
        ontology
            .add_class(Class::new(iri("http://example.org/A")))
            .expect("a");
        ontology
            .add_class(Class::new(iri("http://example.org/B")).with_parent(iri("http://example.org/A")))
            .expect("b");
        ontology
            .add_class(
                Class::new(iri("http://example.org/C"))
                    .with_parent(iri("http://example.org/A"))
                    .with_parent(iri("http://example.org/B")),
            )
            .expect("c");
        ontology
    }

    #[test]
    fn acyclic_hierarchy_passes() {
        let ontology = hierarchy();
        StructuralReasoner
            .check(&ontology, Path::new("import.owl"))
            .expect("consistent");
    }

    #[test]
    fn subclass_cycle_is_reported() {
        let mut ontology = hierarchy();
        ontology
            .class_mut("http://example.org/A")
            .expect("a")
            .add_parent(iri("http://example.org/C"));

        let err = StructuralReasoner
            .check(&ontology, Path::new("import.owl"))
            .expect_err("cycle");
        match err {
            ReasonerError::Inconsistent { reasons } => {
                assert!(!reasons.is_empty());
                assert!(reasons[0].starts_with("subclass cycle through"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn object_property_over_datatype_is_reported() {
        let mut ontology = hierarchy();
        let mut property = Property::new(iri("http://example.org/hasAge"), PropertyKind::Object);
        property.add_domain(iri("http://example.org/A"));
        property.add_range(iri("http://www.w3.org/2001/XMLSchema#integer"));
        ontology.insert_loaded_property(property);

        let err = StructuralReasoner
            .check(&ontology, Path::new("import.owl"))
            .expect_err("datatype range");
        assert!(err.to_string().contains("hasAge"));
    }

    #[test]
    fn disabled_settings_build_no_checker() {
        let settings = ReasonerSettings {
            enable: false,
            backend: ReasonerBackend::Native,
        };
        assert!(from_settings(&settings).is_none());
        assert!(from_settings(&ReasonerSettings::default()).is_some());
    }

    #[cfg(unix)]
    #[test]
    fn command_exit_status_decides_the_outcome() {
        let ontology = hierarchy();
        CommandReasoner::new("true", vec![])
            .check(&ontology, Path::new("import.owl"))
            .expect("true succeeds");

        let err = CommandReasoner::new("false", vec![])
            .check(&ontology, Path::new("import.owl"))
            .expect_err("false fails");
        assert!(matches!(err, ReasonerError::Failed { .. }));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = CommandReasoner::new("owl-merge-no-such-reasoner", vec![])
            .check(&hierarchy(), Path::new("import.owl"))
            .expect_err("spawn");
        assert!(matches!(err, ReasonerError::Spawn { .. }));
    }
}
