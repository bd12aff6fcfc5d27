//! Build-time generator for `srcgen`.
//!
//! Scans a crate for methods carrying the marker attribute and writes one
//! `CallerTypeNameExtensions` unit with a caller-reporting wrapper per method.
//! Call it from `build.rs` through [`build!`] and pull the result in with
//! `srcgen::include_generated!()`.

pub mod config;
pub mod extract;
pub mod generator;
pub mod host;
pub mod matcher;
pub mod render;
pub mod sink;

mod macros;

pub use config::{ConfigError, GeneratorConfig};
pub use generator::{CallerTypeNameGenerator, PassOutcome, Stage};
pub use host::{LoadError, Program};
pub use sink::{LOGICAL_NAME, OutputContext, SinkError};

use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::info;

/// Name the generator's emitted files are grouped under.
pub const GENERATOR_NAME: &str = "CallerTypeNameGenerator";

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    LoadError(#[from] LoadError),

    #[error(transparent)]
    SinkError(#[from] SinkError),
}

///
/// BuildOutcome
///

#[derive(Debug)]
pub struct BuildOutcome {
    pub pass: PassOutcome,

    /// Every source file read, for `cargo:rerun-if-changed`.
    pub sources: Vec<PathBuf>,

    /// Files written this pass, including mirrored copies.
    pub written: Vec<PathBuf>,
}

// generate
/// Run one generation pass over the crate at `manifest_dir`, writing into `out_dir`.
///
/// An empty pass removes any unit a previous pass left in `out_dir`.
pub fn generate(manifest_dir: &Path, out_dir: &Path) -> Result<BuildOutcome, Error> {
    let config = GeneratorConfig::load(manifest_dir)?;
    let entry = config
        .entry_path(manifest_dir)
        .unwrap_or_else(|| manifest_dir.join("src/lib.rs"));

    let program = Program::load(&entry)?;
    let sources = program.sources().map(Path::to_path_buf).collect();

    let mut context = OutputContext::new();
    let pass = CallerTypeNameGenerator::new(config.marker_fqn()).run(&program, &mut context);

    let mut dirs = vec![out_dir.to_path_buf()];
    dirs.extend(config.generated_files_path(manifest_dir));

    let mut written = Vec::new();
    for dir in &dirs {
        match pass {
            PassOutcome::Emitted { .. } => written.extend(context.write_to(dir)?),
            PassOutcome::Skipped => {
                sink::remove_stale(dir, LOGICAL_NAME)?;
            }
        }
    }

    info!(stage = %pass.stage(), files = written.len(), "srcgen pass complete");

    Ok(BuildOutcome {
        pass,
        sources,
        written,
    })
}
