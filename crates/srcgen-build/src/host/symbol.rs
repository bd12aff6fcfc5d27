use crate::host::{
    declaration::{Declaration, Owner},
    scope::SimplePath,
};
use std::collections::BTreeSet;
use syn::Meta;

///
/// TypeSymbol
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeSymbol {
    segments: Vec<String>,
}

impl TypeSymbol {
    #[must_use]
    pub const fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Fully-qualified display name, e.g. `crate::shop::Widget`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.segments.join("::")
    }
}

///
/// Symbol
///
/// Semantic identity of a declaration. `containing_type` is `None` for
/// anything not declared inside an `impl` of a nameable type;
/// `containing_trait` is set for methods of `impl Trait for Type` blocks.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub containing_type: Option<TypeSymbol>,
    pub containing_trait: Option<TypeSymbol>,
    pub attributes: Vec<String>,
    pub is_static: bool,
    pub arity: usize,
    pub cfg: Vec<Meta>,
}

impl Symbol {
    #[must_use]
    pub fn has_attribute(&self, fqn: &str) -> bool {
        self.attributes.iter().any(|attr| attr == fqn)
    }
}

pub(crate) fn resolve(decl: &Declaration, known: &BTreeSet<String>) -> Symbol {
    let attributes = decl
        .attributes
        .iter()
        .map(|attr| decl.scope.resolve(attr, known).join("::"))
        .collect();

    let type_symbol = |path: &SimplePath| {
        let segments = decl.scope.resolve(path, known);
        (!segments.is_empty()).then(|| TypeSymbol::new(segments))
    };

    let (containing_type, containing_trait) = match &decl.owner {
        Some(Owner::Impl {
            self_ty: Some(self_ty),
            trait_path,
        }) => (
            type_symbol(self_ty),
            trait_path.as_ref().and_then(type_symbol),
        ),
        Some(Owner::Impl { self_ty: None, .. } | Owner::Trait) | None => (None, None),
    };

    Symbol {
        name: decl.ident.clone(),
        containing_type,
        containing_trait,
        attributes,
        is_static: !decl.has_receiver,
        arity: decl.arity,
        cfg: decl.cfg.clone(),
    }
}

///
/// TESTS
///
