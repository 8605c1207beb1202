use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// One unit of work: attach the subtree rooted at `import_class_iri` under
/// `base_parent_iri` and snapshot the destination to `output_file`.
///
/// The IRIs are kept as written. They are only ever searched for, so a
/// malformed one behaves like an IRI that names no class and affects its own
/// task alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeTask {
    pub import_class_iri: String,
    pub base_parent_iri: String,
    /// Checkpoint file name, relative to the run's output directory.
    pub output_file: PathBuf,
}

/// Errors raised while reading a task file.
#[derive(Debug, thiserror::Error)]
pub enum TaskFileError {
    #[error("failed to read task file `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid task file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A checkpoint name is empty or would escape the output directory.
    #[error("task {index} has an invalid output file `{output_file}`")]
    InvalidOutputFile { index: usize, output_file: PathBuf },
}

/// Parses an ordered task list from JSON text.
///
/// # Errors
///
/// Returns [`TaskFileError::Parse`] for malformed JSON or missing fields, and
/// [`TaskFileError::InvalidOutputFile`] when an output file is empty, absolute
/// or climbs out through `..`.
pub fn parse_tasks(content: &str, path: &Path) -> Result<Vec<MergeTask>, TaskFileError> {
    let tasks: Vec<MergeTask> =
        serde_json::from_str(content).map_err(|source| TaskFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    for (index, task) in tasks.iter().enumerate() {
        if !is_contained(&task.output_file) {
            return Err(TaskFileError::InvalidOutputFile {
                index,
                output_file: task.output_file.clone(),
            });
        }
    }
    Ok(tasks)
}

fn is_contained(output_file: &Path) -> bool {
    !output_file.as_os_str().is_empty()
        && output_file
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Reads and parses the task file at `path`.
///
/// # Errors
///
/// See [`parse_tasks`]; unreadable files yield [`TaskFileError::Io`].
pub fn load_tasks(path: &Path) -> Result<Vec<MergeTask>, TaskFileError> {
    let content = fs::read_to_string(path).map_err(|source| TaskFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tasks(&content, path)
}
