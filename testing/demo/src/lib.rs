//! Fixture crate for the srcgen build pipeline.
//!
//! `build.rs` scans this crate and the generated wrappers are included below.

pub mod jobs;
pub mod my_class;

srcgen::include_generated!();

/// Text of the unit generated for this crate.
pub const GENERATED_SOURCE: &str =
    include_str!(concat!(env!("OUT_DIR"), "/CallerTypeNameExtensions.g.rs"));
