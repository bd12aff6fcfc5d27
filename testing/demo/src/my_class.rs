use srcgen::my_special;
use std::sync::atomic::{AtomicUsize, Ordering};

static CALLS: AtomicUsize = AtomicUsize::new(0);

///
/// MyClass
///

pub struct MyClass;

impl MyClass {
    #[my_special]
    pub fn do_something() {
        CALLS.fetch_add(1, Ordering::Relaxed);
    }

    /// Times `do_something` has run.
    #[must_use]
    pub fn calls() -> usize {
        CALLS.load(Ordering::Relaxed)
    }
}
