use std::sync::atomic::{AtomicUsize, Ordering};

static NIGHTLY_RUNS: AtomicUsize = AtomicUsize::new(0);
static HOURLY_RUNS: AtomicUsize = AtomicUsize::new(0);
static SCHEDULED: AtomicUsize = AtomicUsize::new(0);

///
/// Job
///

pub trait Job {
    fn schedule();
}

///
/// Nightly
///

pub struct Nightly;

impl Nightly {
    #[srcgen::my_special]
    pub fn run() {
        NIGHTLY_RUNS.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn runs() -> usize {
        NIGHTLY_RUNS.load(Ordering::Relaxed)
    }
}

///
/// Hourly
///

pub struct Hourly;

impl Hourly {
    #[srcgen::my_special]
    pub fn run() {
        HOURLY_RUNS.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn runs() -> usize {
        HOURLY_RUNS.load(Ordering::Relaxed)
    }
}

impl Job for Nightly {
    #[srcgen::my_special]
    fn schedule() {
        SCHEDULED.fetch_add(1, Ordering::Relaxed);
    }
}

/// Times any `Job::schedule` has run.
#[must_use]
pub fn scheduled() -> usize {
    SCHEDULED.load(Ordering::Relaxed)
}

#[cfg(feature = "weekly")]
pub mod weekly {
    ///
    /// Weekly
    ///

    pub struct Weekly;

    impl Weekly {
        #[srcgen::my_special]
        pub fn run() {}
    }
}

// not a method, so no wrapper is generated for it
#[srcgen::my_special]
pub fn schedule_all() {
    Nightly::run();
    Hourly::run();
}
