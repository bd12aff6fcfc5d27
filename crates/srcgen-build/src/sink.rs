use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;
use tracing::debug;

/// Logical name of the caller-type-name unit; stable across passes.
pub const LOGICAL_NAME: &str = "CallerTypeNameExtensions.g";

///
/// SinkError
///

#[derive(Debug, ThisError)]
pub enum SinkError {
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove stale '{path}': {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

///
/// GeneratedUnit
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedUnit {
    logical_name: String,
    text: String,
}

impl GeneratedUnit {
    #[must_use]
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// File name the unit is persisted under (`<logical name>.rs`).
    #[must_use]
    pub fn file_name(&self) -> String {
        file_name(&self.logical_name)
    }
}

#[must_use]
pub fn file_name(logical_name: &str) -> String {
    format!("{logical_name}.rs")
}

///
/// OutputContext
///
/// Artifacts registered during one pass, in registration order.
///

#[derive(Debug, Default)]
pub struct OutputContext {
    units: Vec<GeneratedUnit>,
}

impl OutputContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit.
    ///
    /// # Panics
    /// When `logical_name` was already registered in this context.
    pub fn add_source(&mut self, logical_name: &str, text: String) {
        assert!(
            self.get(logical_name).is_none(),
            "logical name '{logical_name}' registered twice in one pass"
        );

        self.units.push(GeneratedUnit {
            logical_name: logical_name.to_string(),
            text,
        });
    }

    #[must_use]
    pub fn get(&self, logical_name: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|u| u.logical_name == logical_name)
    }

    #[must_use]
    pub fn units(&self) -> &[GeneratedUnit] {
        &self.units
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Write every unit into `dir`, returning the written paths.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, SinkError> {
        let mut written = Vec::with_capacity(self.units.len());

        for unit in &self.units {
            let path = dir.join(unit.file_name());
            write_if_changed(&path, unit.text())?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Register `text` under `logical_name`; absent text registers nothing.
pub fn emit(context: &mut OutputContext, logical_name: &str, text: Option<String>) {
    if let Some(text) = text {
        context.add_source(logical_name, text);
    }
}

/// Remove a previously persisted unit so an empty pass leaves nothing behind.
pub fn remove_stale(dir: &Path, logical_name: &str) -> Result<bool, SinkError> {
    let path = dir.join(file_name(logical_name));

    match fs::remove_file(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale generated unit");
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(SinkError::Remove { path, source }),
    }
}

// Leave identical files untouched so their mtime does not trigger rebuilds.
fn write_if_changed(path: &Path, text: &str) -> Result<(), SinkError> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == text) {
        return Ok(());
    }

    let to_err = |source| SinkError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_err)?;
    }
    fs::write(path, text).map_err(to_err)?;

    debug!(path = %path.display(), bytes = text.len(), "wrote generated unit");

    Ok(())
}

///
/// TESTS
///
