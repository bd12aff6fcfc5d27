use crate::extract::ExtractionRecord;
use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::{BTreeMap, BTreeSet};
use syn::{Meta, parse_quote};

/// Module wrapping the generated container.
pub const MODULE_NAME: &str = "generated";

/// Unit struct whose associated functions are the generated wrappers.
pub const CONTAINER_NAME: &str = "CallerTypeNameExtensions";

/// Suffix appended to every wrapper name.
pub const MEMBER_SUFFIX: &str = "caller_type_name";

const BANNER: &str = "// @generated by srcgen-build. Do not edit.\n\n";

/// Render the compilation unit for `records`, or `None` when there is nothing to generate.
///
/// Output depends only on the records and their order.
#[must_use]
pub fn render(records: &[ExtractionRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let module = format_ident!("{MODULE_NAME}");
    let container = format_ident!("{CONTAINER_NAME}");
    let members = member_names(records)
        .into_iter()
        .zip(records)
        .map(|(name, record)| member(&name, record));

    let file: syn::File = parse_quote! {
        #[allow(dead_code, non_snake_case)]
        pub mod #module {
            /// Wrappers that call a marked method and report who called them.
            pub struct #container;

            impl #container {
                #(#members)*
            }
        }
    };

    Some(format!("{BANNER}{}", prettyplease::unparse(&file)))
}

// One wrapper: call the original, then report the caller and the declaring type.
fn member(name: &str, record: &ExtractionRecord) -> TokenStream {
    let ident = format_ident!("{name}");
    let ty = type_path(&record.type_display_name);
    let method = format_ident!("{}", record.method_name);
    let type_name = &record.type_display_name;
    let cfg = cfg_attr(&record.cfg);

    // trait methods are called through the trait, which is not in scope here
    let target = match &record.trait_display_name {
        Some(trait_name) => {
            let trait_path = type_path(trait_name);
            quote!(<#ty as #trait_path>)
        }
        None => ty,
    };

    quote! {
        #cfg
        #[track_caller]
        pub fn #ident() {
            let caller = ::core::panic::Location::caller();
            #target::#method();
            ::std::println!("Called from: {} in {}", caller, #type_name);
        }
    }
}

// The wrapper is compiled exactly when the wrapped method is.
fn cfg_attr(cfg: &[Meta]) -> TokenStream {
    match cfg {
        [] => quote!(),
        [predicate] => quote!(#[cfg(#predicate)]),
        predicates => quote!(#[cfg(all(#(#predicates),*))]),
    }
}

// Paths outside this crate are anchored at the extern prelude.
fn type_path(display_name: &str) -> TokenStream {
    let segments: Vec<_> = display_name
        .split("::")
        .map(|segment| format_ident!("{segment}"))
        .collect();

    match segments.first() {
        Some(first) if first != "crate" && segments.len() > 1 => quote!(::#(#segments)::*),
        _ => quote!(#(#segments)::*),
    }
}

/// Wrapper names for `records`, unique within the container.
///
/// A method name used by one record only gives `{method}_caller_type_name`.
/// Names shared by several records are qualified with the snake-cased
/// containing type (`crate::jobs::Nightly` + `run` gives
/// `jobs_nightly_run_caller_type_name`). Any name still taken gets `_2`, `_3`…
/// in input order.
#[must_use]
pub fn member_names(records: &[ExtractionRecord]) -> Vec<String> {
    let base: Vec<String> = records
        .iter()
        .map(|record| format!("{}_{MEMBER_SUFFIX}", unraw(&record.method_name)))
        .collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in &base {
        *counts.entry(name.as_str()).or_default() += 1;
    }

    let planned: Vec<String> = records
        .iter()
        .zip(&base)
        .map(|(record, name)| {
            if counts[name.as_str()] > 1 {
                qualified_name(record)
            } else {
                name.clone()
            }
        })
        .collect();

    let mut taken = BTreeSet::new();
    planned
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut n = 1;
            while !taken.insert(candidate.clone()) {
                n += 1;
                candidate = format!("{name}_{n}");
            }

            candidate
        })
        .collect()
}

fn qualified_name(record: &ExtractionRecord) -> String {
    let mut parts: Vec<String> = record
        .type_display_name
        .split("::")
        .filter(|segment| *segment != "crate")
        .map(|segment| unraw(segment).to_case(Case::Snake))
        .collect();
    parts.push(unraw(&record.method_name).to_string());
    parts.push(MEMBER_SUFFIX.to_string());

    parts.join("_")
}

fn unraw(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ty: &str, method: &str) -> ExtractionRecord {
        ExtractionRecord::new(ty, method)
    }

    #[test]
    fn empty_records_render_nothing() {
        assert!(render(&[]).is_none());
    }

    #[test]
    fn single_record_renders_one_wrapper() {
        let text = render(&[record("crate::test_namespace::TestClass", "test_method")])
            .expect("one record should render");

        for needle in [
            CONTAINER_NAME,
            "pub mod generated",
            "pub fn test_method_caller_type_name()",
            "crate::test_namespace::TestClass::test_method();",
            "#[track_caller]",
            "::core::panic::Location::caller()",
            "\"Called from: {} in {}\"",
            "\"crate::test_namespace::TestClass\"",
        ] {
            assert!(text.contains(needle), "missing `{needle}` in:\n{text}");
        }
        assert_eq!(text.matches("#[track_caller]").count(), 1);
        assert!(text.starts_with("// @generated"));
    }

    #[test]
    fn wrappers_follow_record_order_and_reference_their_own_method() {
        let text = render(&[
            record("crate::TestClass", "second_method"),
            record("crate::TestClass", "first_method"),
        ])
        .expect("records should render");

        let second = text
            .find("fn second_method_caller_type_name")
            .expect("second wrapper rendered");
        let first = text
            .find("fn first_method_caller_type_name")
            .expect("first wrapper rendered");
        assert!(second < first, "input order must be preserved");

        let second_call = text
            .find("crate::TestClass::second_method();")
            .expect("second call rendered");
        let first_call = text
            .find("crate::TestClass::first_method();")
            .expect("first call rendered");
        assert!(second < second_call && second_call < first);
        assert!(first < first_call);
    }

    #[test]
    fn rendering_is_deterministic() {
        let records = [
            record("crate::a::A", "one"),
            record("crate::b::B", "two"),
        ];

        assert_eq!(render(&records), render(&records));
    }

    #[test]
    fn colliding_names_are_qualified_by_type() {
        let names = member_names(&[
            record("crate::jobs::Nightly", "run"),
            record("crate::jobs::Hourly", "run"),
            record("crate::jobs::Hourly", "stop"),
        ]);

        assert_eq!(
            names,
            [
                "jobs_nightly_run_caller_type_name",
                "jobs_hourly_run_caller_type_name",
                "stop_caller_type_name",
            ]
        );
    }

    #[test]
    fn identical_records_get_numbered() {
        let names = member_names(&[
            record("crate::Job", "run"),
            record("crate::Job", "run"),
            record("crate::Job", "run"),
        ]);

        assert_eq!(
            names,
            [
                "job_run_caller_type_name",
                "job_run_caller_type_name_2",
                "job_run_caller_type_name_3",
            ]
        );
    }

    #[test]
    fn raw_identifiers_are_called_raw_and_named_plain() {
        let text = render(&[record("crate::r#type::Kind", "r#match")])
            .expect("record should render");

        assert!(text.contains("fn match_caller_type_name()"), "{text}");
        assert!(text.contains("crate::r#type::Kind::r#match();"), "{text}");
    }

    #[test]
    fn trait_methods_are_called_through_their_trait() {
        let text = render(&[
            record("crate::jobs::Nightly", "area").with_trait("crate::shapes::Shape"),
            record("crate::jobs::Nightly", "fmt").with_trait("std::fmt::Display"),
            record("crate::jobs::Nightly", "default").with_trait("Default"),
        ])
        .expect("records should render");

        for needle in [
            "<crate::jobs::Nightly as crate::shapes::Shape>::area();",
            "<crate::jobs::Nightly as ::std::fmt::Display>::fmt();",
            "<crate::jobs::Nightly as Default>::default();",
            "\"crate::jobs::Nightly\"",
        ] {
            assert!(text.contains(needle), "missing `{needle}` in:\n{text}");
        }
    }

    #[test]
    fn cfg_gates_follow_the_method() {
        let text = render(&[
            record("crate::Plain", "run"),
            record("crate::tests::Gated", "gated").with_cfg(vec![parse_quote!(test)]),
            record("crate::jobs::Nightly", "start").with_cfg(vec![
                parse_quote!(feature = "jobs"),
                parse_quote!(not(windows)),
            ]),
        ])
        .expect("records should render");

        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        for needle in [
            "#[cfg(test)]#[track_caller]pubfngated_caller_type_name",
            "#[cfg(all(feature=\"jobs\",not(windows)))]#[track_caller]pubfnstart_caller_type_name",
        ] {
            assert!(compact.contains(needle), "missing `{needle}` in:\n{text}");
        }
        assert_eq!(text.matches("#[cfg(").count(), 2, "ungated wrappers carry no cfg");
    }

    #[test]
    fn external_types_are_anchored() {
        let text = render(&[record("other_crate::Thing", "build")]).expect("record should render");

        assert!(text.contains("::other_crate::Thing::build();"), "{text}");
    }
}
