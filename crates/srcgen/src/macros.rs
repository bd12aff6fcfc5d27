// include_generated
/// Include the unit written by `srcgen::build!()`; expands to `pub mod generated`.
///
/// Only valid once at least one method is marked, since an empty pass writes nothing.
#[macro_export]
macro_rules! include_generated {
    () => {
        // CallerTypeNameExtensions.g.rs
        include!(concat!(env!("OUT_DIR"), "/CallerTypeNameExtensions.g.rs"));
    };
}
