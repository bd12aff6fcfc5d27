use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Config file looked up next to the consuming crate's `Cargo.toml`.
pub const CONFIG_FILE: &str = "srcgen.toml";

/// Fully-qualified name of the marker attribute exported by `srcgen`.
pub const DEFAULT_MARKER: &str = "srcgen::my_special";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("marker must be a non-empty path, got '{0}'")]
    InvalidMarker(String),
}

///
/// GeneratorConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Fully-qualified marker attribute, `::`-separated.
    pub marker: String,

    /// Crate root file relative to the manifest dir; `src/lib.rs` or
    /// `src/main.rs` when unset.
    pub entry: Option<PathBuf>,

    /// Also copy generated units into `generated_files_dir`.
    pub emit_generated_files: bool,

    pub generated_files_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            entry: None,
            emit_generated_files: false,
            generated_files_dir: PathBuf::from("generated"),
        }
    }
}

impl GeneratorConfig {
    /// Load `srcgen.toml` from `manifest_dir`; a missing file gives the defaults.
    pub fn load(manifest_dir: &Path) -> Result<Self, ConfigError> {
        let path = manifest_dir.join(CONFIG_FILE);

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        Self::parse(&text, &path)
    }

    /// Parse config text; `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let marker = self.marker.trim_start_matches("::");
        if marker.is_empty() || marker.split("::").any(str::is_empty) {
            return Err(ConfigError::InvalidMarker(self.marker.clone()));
        }

        Ok(())
    }

    /// Marker with any leading `::` removed, as symbols report it.
    #[must_use]
    pub fn marker_fqn(&self) -> &str {
        self.marker.trim_start_matches("::")
    }

    /// Resolve the crate root file, if one exists.
    #[must_use]
    pub fn entry_path(&self, manifest_dir: &Path) -> Option<PathBuf> {
        if let Some(entry) = &self.entry {
            return Some(manifest_dir.join(entry));
        }

        ["src/lib.rs", "src/main.rs"]
            .into_iter()
            .map(|rel| manifest_dir.join(rel))
            .find(|path| path.is_file())
    }

    /// Directory that mirrors emitted units when `emit_generated_files` is on.
    #[must_use]
    pub fn generated_files_path(&self, manifest_dir: &Path) -> Option<PathBuf> {
        self.emit_generated_files.then(|| {
            manifest_dir
                .join(&self.generated_files_dir)
                .join(env!("CARGO_PKG_NAME"))
                .join(crate::GENERATOR_NAME)
        })
    }
}

///
/// TESTS
///
