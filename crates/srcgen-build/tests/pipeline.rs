use srcgen_build::{
    CallerTypeNameGenerator, Error, GeneratorConfig, LOGICAL_NAME, LoadError, OutputContext,
    PassOutcome, Program, generate,
};
use std::{fs, path::Path};
use tempfile::TempDir;

fn run(source: &str) -> Option<String> {
    let program = Program::parse_str(source).expect("fixture should parse");
    let mut context = OutputContext::new();
    CallerTypeNameGenerator::default().run(&program, &mut context);

    context.get(LOGICAL_NAME).map(|unit| unit.text().to_string())
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(path, text).expect("write fixture");
}

const TEST_CLASS: &str = r"
pub mod test_namespace {
    use srcgen::my_special;

    pub struct TestClass;

    impl TestClass {
        #[my_special]
        pub fn test_method() {}
    }
}
";

#[test]
fn program_without_marks_emits_nothing() {
    let text = run(
        r"
        pub struct TestClass;
        impl TestClass {
            pub fn test_method() {}
        }
        ",
    );

    assert!(text.is_none());
}

#[test]
fn single_marked_method_renders_its_wrapper() {
    let text = run(TEST_CLASS).expect("unit should be emitted");

    for needle in [
        "CallerTypeNameExtensions",
        "pub fn test_method_caller_type_name()",
        "crate::test_namespace::TestClass::test_method();",
        "#[track_caller]",
        "::core::panic::Location::caller()",
    ] {
        assert!(text.contains(needle), "missing `{needle}` in:\n{text}");
    }
    assert_eq!(text.matches("_caller_type_name()").count(), 1);
}

#[test]
fn two_marked_methods_each_call_their_own() {
    let text = run(
        r"
        pub struct TestClass;
        impl TestClass {
            #[srcgen::my_special]
            pub fn first_method() {}
            #[srcgen::my_special]
            pub fn second_method() {}
        }
        ",
    )
    .expect("unit should be emitted");

    let first = text.find("fn first_method_caller_type_name").expect("first wrapper");
    let first_call = text.find("crate::TestClass::first_method();").expect("first call");
    let second = text.find("fn second_method_caller_type_name").expect("second wrapper");
    let second_call = text.find("crate::TestClass::second_method();").expect("second call");

    assert!(first < first_call && first_call < second && second < second_call, "{text}");
}

#[test]
fn marker_on_a_type_generates_nothing() {
    let text = run(
        r"
        #[srcgen::my_special]
        pub struct TestClass;
        impl TestClass {
            pub fn test_method() {}
        }
        ",
    );

    assert!(text.is_none());
}

#[test]
fn instance_methods_are_not_special_cased() {
    let text = run(
        r"
        pub struct TestClass;
        impl TestClass {
            #[srcgen::my_special]
            pub fn test_method(&self) {}
        }
        ",
    )
    .expect("unit should be emitted");

    assert!(text.contains("crate::TestClass::test_method();"), "{text}");
}

#[test]
fn trait_impl_methods_are_called_through_the_trait() {
    let text = run(
        r"
        pub mod jobs {
            pub trait Job {
                fn run();
            }

            pub struct Nightly;

            impl Job for Nightly {
                #[srcgen::my_special]
                fn run() {}
            }
        }
        ",
    )
    .expect("unit should be emitted");

    assert!(
        text.contains("<crate::jobs::Nightly as crate::jobs::Job>::run();"),
        "{text}"
    );
}

#[test]
fn cfg_gated_methods_get_gated_wrappers() {
    let text = run(
        r#"
        pub struct Plain;
        impl Plain {
            #[srcgen::my_special]
            pub fn always() {}
        }

        #[cfg(feature = "nightly")]
        pub mod gated {
            pub struct Gated;
            impl Gated {
                #[srcgen::my_special]
                pub fn gated() {}
            }
        }

        #[cfg(test)]
        mod tests {
            pub struct Fixture;
            impl Fixture {
                #[srcgen::my_special]
                #[cfg(unix)]
                pub fn only_in_tests() {}
            }
        }
        "#,
    )
    .expect("unit should be emitted");

    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    for needle in [
        "#[track_caller]pubfnalways_caller_type_name",
        "#[cfg(feature=\"nightly\")]#[track_caller]pubfngated_caller_type_name",
        "#[cfg(all(test,unix))]#[track_caller]pubfnonly_in_tests_caller_type_name",
    ] {
        assert!(compact.contains(needle), "missing `{needle}` in:\n{text}");
    }
}

#[test]
fn repeated_passes_are_byte_identical() {
    let first = run(TEST_CLASS);
    let second = run(TEST_CLASS);

    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn generate_writes_and_clears_the_unit() {
    let crate_dir = TempDir::new().expect("tempdir");
    let out_dir = TempDir::new().expect("tempdir");
    write(crate_dir.path(), "src/lib.rs", "pub mod test_namespace;\n");
    write(
        crate_dir.path(),
        "src/test_namespace.rs",
        "use srcgen::my_special;\npub struct TestClass;\nimpl TestClass {\n    #[my_special]\n    pub fn test_method() {}\n}\n",
    );

    let outcome = generate(crate_dir.path(), out_dir.path()).expect("generate should succeed");
    let unit = out_dir.path().join("CallerTypeNameExtensions.g.rs");

    assert!(matches!(outcome.pass, PassOutcome::Emitted { .. }));
    assert_eq!(outcome.written, [unit.clone()]);
    assert_eq!(outcome.sources.len(), 2);
    let text = fs::read_to_string(&unit).expect("unit written");
    assert!(text.contains("crate::test_namespace::TestClass::test_method();"), "{text}");

    // removing the marker leaves no stale unit behind
    write(crate_dir.path(), "src/test_namespace.rs", "pub struct TestClass;\n");
    let outcome = generate(crate_dir.path(), out_dir.path()).expect("generate should succeed");

    assert_eq!(outcome.pass, PassOutcome::Skipped);
    assert!(outcome.written.is_empty());
    assert!(!unit.exists());
}

#[test]
fn generate_honors_config() {
    let crate_dir = TempDir::new().expect("tempdir");
    let out_dir = TempDir::new().expect("tempdir");
    write(
        crate_dir.path(),
        "srcgen.toml",
        "marker = \"acme::traced\"\nentry = \"src/tool.rs\"\nemit_generated_files = true\n",
    );
    write(
        crate_dir.path(),
        "src/tool.rs",
        "pub struct Job;\nimpl Job {\n    #[acme::traced]\n    pub fn run() {}\n}\n",
    );

    let outcome = generate(crate_dir.path(), out_dir.path()).expect("generate should succeed");

    let config = GeneratorConfig::load(crate_dir.path()).expect("config loads");
    let mirror = config
        .generated_files_path(crate_dir.path())
        .expect("mirroring enabled")
        .join("CallerTypeNameExtensions.g.rs");
    assert_eq!(outcome.written.len(), 2);
    assert!(mirror.is_file(), "missing mirrored unit {}", mirror.display());
    assert!(
        fs::read_to_string(mirror)
            .expect("read mirror")
            .contains("pub fn run_caller_type_name()")
    );
}

#[test]
fn generate_reports_a_missing_crate_root() {
    let crate_dir = TempDir::new().expect("tempdir");
    let out_dir = TempDir::new().expect("tempdir");

    let err = generate(crate_dir.path(), out_dir.path()).expect_err("no crate root");

    assert!(
        matches!(err, Error::LoadError(LoadError::MissingEntry(_))),
        "got: {err}"
    );
}
