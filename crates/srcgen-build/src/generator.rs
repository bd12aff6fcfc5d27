use crate::{
    extract::extract,
    host::Program,
    matcher::match_symbols,
    render::{member_names, render},
    sink::{LOGICAL_NAME, OutputContext, emit},
};
use std::fmt::{self, Display};
use tracing::{debug, debug_span};

///
/// Stage
///
/// Where a pass is. Every pass starts at `Idle` and ends at `Emitting` or
/// `Skipped`; nothing carries over into the next pass.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Idle,
    Matching,
    Extracting,
    Rendering,
    Emitting,
    Skipped,
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Matching => "matching",
            Self::Extracting => "extracting",
            Self::Rendering => "rendering",
            Self::Emitting => "emitting",
            Self::Skipped => "skipped",
        };

        f.write_str(label)
    }
}

///
/// PassOutcome
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PassOutcome {
    /// One unit was registered under `logical_name` with these wrapper names.
    Emitted {
        logical_name: String,
        members: Vec<String>,
    },
    Skipped,
}

impl PassOutcome {
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Emitted { .. } => Stage::Emitting,
            Self::Skipped => Stage::Skipped,
        }
    }
}

///
/// CallerTypeNameGenerator
///
/// Matches marked methods, extracts their facts, renders a single unit and
/// registers it. Holds no state between passes.
///

#[derive(Clone, Debug)]
pub struct CallerTypeNameGenerator {
    marker: String,
}

impl CallerTypeNameGenerator {
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Run one pass over `program`, registering at most one unit in `context`.
    pub fn run(&self, program: &Program, context: &mut OutputContext) -> PassOutcome {
        let span = debug_span!("srcgen_pass", marker = %self.marker);
        let _enter = span.enter();

        debug!(stage = %Stage::Matching, declarations = program.declarations().len());
        let symbols = match_symbols(program, &self.marker);

        debug!(stage = %Stage::Extracting, symbols = symbols.len());
        let records = extract(&symbols);

        debug!(stage = %Stage::Rendering, records = records.len());
        let members = member_names(&records);
        let text = render(&records);

        let outcome = if text.is_some() {
            PassOutcome::Emitted {
                logical_name: LOGICAL_NAME.to_string(),
                members,
            }
        } else {
            PassOutcome::Skipped
        };
        emit(context, LOGICAL_NAME, text);

        debug!(stage = %outcome.stage(), units = context.units().len());

        outcome
    }
}

impl Default for CallerTypeNameGenerator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MARKER)
    }
}

///
/// TESTS
///
