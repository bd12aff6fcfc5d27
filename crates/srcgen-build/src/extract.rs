use crate::host::Symbol;
use syn::Meta;
use tracing::warn;

///
/// ExtractionRecord
///
/// The facts the renderer needs about one matched method.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ExtractionRecord {
    /// Fully-qualified containing type, e.g. `crate::shop::Widget`.
    pub type_display_name: String,
    pub method_name: String,

    /// Trait the method implements, when declared in `impl Trait for Type`.
    pub trait_display_name: Option<String>,

    /// `cfg` predicates the method is compiled under.
    pub cfg: Vec<Meta>,
}

impl ExtractionRecord {
    pub fn new(type_display_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            type_display_name: type_display_name.into(),
            method_name: method_name.into(),
            trait_display_name: None,
            cfg: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_trait(mut self, trait_display_name: impl Into<String>) -> Self {
        self.trait_display_name = Some(trait_display_name.into());
        self
    }

    #[must_use]
    pub fn with_cfg(mut self, cfg: Vec<Meta>) -> Self {
        self.cfg = cfg;
        self
    }
}

/// Map symbols to records, dropping any symbol without a containing type.
#[must_use]
pub fn extract(symbols: &[Symbol]) -> Vec<ExtractionRecord> {
    symbols
        .iter()
        .filter_map(|symbol| {
            let Some(ty) = &symbol.containing_type else {
                warn!(method = %symbol.name, "marked method has no containing type, skipping");
                return None;
            };

            let record = ExtractionRecord::new(ty.display_name(), symbol.name.clone())
                .with_cfg(symbol.cfg.clone());

            Some(match &symbol.containing_trait {
                Some(tr) => record.with_trait(tr.display_name()),
                None => record,
            })
        })
        .collect()
}

///
/// TESTS
///
