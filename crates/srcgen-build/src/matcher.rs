use crate::host::{Declaration, DeclarationKind, Program, Symbol};
use tracing::{trace, warn};

/// Structural filter: only methods (functions in `impl` and `trait` blocks) pass.
#[must_use]
pub fn structural_predicate(decl: &Declaration) -> bool {
    decl.kind == DeclarationKind::Method
}

/// Semantic filter: the resolved symbol carries the marker attribute.
#[must_use]
pub fn semantic_predicate(symbol: &Symbol, marker: &str) -> bool {
    symbol.has_attribute(marker)
}

/// Resolve every method of `program` that carries `marker`, in declaration order.
///
/// Each declaration is visited once, so a method marked twice still yields a
/// single symbol. Marked non-methods never reach the semantic filter.
#[must_use]
pub fn match_symbols(program: &Program, marker: &str) -> Vec<Symbol> {
    program
        .declarations()
        .iter()
        .filter(|decl| {
            let keep = structural_predicate(decl);
            if !keep
                && !decl.attributes.is_empty()
                && semantic_predicate(&program.resolve(decl), marker)
            {
                warn!(item = %decl.path(), kind = ?decl.kind, "marker on a non-method ignored");
            }

            keep
        })
        .map(|decl| program.resolve(decl))
        .filter(|symbol| semantic_predicate(symbol, marker))
        .inspect(|symbol| trace!(method = %symbol.name, "matched"))
        .collect()
}

///
/// TESTS
///
