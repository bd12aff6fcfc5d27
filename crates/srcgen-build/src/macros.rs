/// Build-script entry point: runs one srcgen pass for the current crate.
///
/// Expands to statements that use `?`, so the calling `main` must return a
/// `Result` whose error type accepts `srcgen_build::Error` and
/// `std::env::VarError`.
#[macro_export]
macro_rules! build {
    () => {
        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");

        let manifest_dir = ::std::path::PathBuf::from(::std::env::var("CARGO_MANIFEST_DIR")?);
        let out_dir = ::std::path::PathBuf::from(::std::env::var("OUT_DIR")?);

        let config_file = manifest_dir.join($crate::config::CONFIG_FILE);
        if config_file.is_file() {
            println!("cargo:rerun-if-changed={}", config_file.display());
        }

        //
        // GENERATED CODE
        //

        let outcome = $crate::generate(&manifest_dir, &out_dir)?;
        for source in &outcome.sources {
            println!("cargo:rerun-if-changed={}", source.display());
        }
    };
}
