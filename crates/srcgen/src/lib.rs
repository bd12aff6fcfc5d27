//! ## Crate layout
//! - `build`: the build-time generator, driven from `build.rs` with [`build!`].
//! - [`my_special`]: marker attribute for methods that get a caller-type-name wrapper.
//!
//! A crate marks methods, calls `srcgen::build!()` from its build script and
//! brings the wrappers in with [`include_generated!`]; they live in
//! `generated::CallerTypeNameExtensions`.

pub use srcgen_build as build;
pub use srcgen_macros::my_special;

mod macros;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use srcgen_build::build;
