use crate::host::{
    SourceFile,
    scope::{ModulePath, Scope, SimplePath},
};
use std::{collections::BTreeMap, sync::Arc};
use syn::{
    Attribute, FnArg, ImplItem, ImplItemFn, ItemConst, ItemEnum, ItemFn, ItemImpl, ItemMod,
    ItemStatic, ItemStruct, ItemTrait, ItemType, ItemUnion, Meta, Signature, TraitItem,
    TraitItemFn, Type, visit::Visit,
};

///
/// DeclarationKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeclarationKind {
    /// `fn` inside an `impl` or `trait` block.
    Method,
    /// Free `fn` at module level.
    Function,
    /// struct, enum, union, trait or type alias.
    Type,
    Module,
    /// const and static items.
    Value,
}

///
/// Owner
///
/// The block a method is declared in.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Owner {
    /// `impl Type` or `impl Trait for Type`; `self_ty` is `None` when the
    /// implementing type is not a plain path (`&T`, tuples, slices, `dyn`).
    Impl {
        self_ty: Option<SimplePath>,
        trait_path: Option<SimplePath>,
    },

    /// A `trait` definition.
    Trait,
}

///
/// Declaration
///
/// One item of the program snapshot, in natural source order.
///

#[derive(Clone, Debug)]
pub struct Declaration {
    pub ordinal: usize,
    pub kind: DeclarationKind,
    pub ident: String,
    pub attributes: Vec<SimplePath>,
    pub scope: Arc<Scope>,
    pub owner: Option<Owner>,
    pub has_receiver: bool,
    pub arity: usize,

    /// `cfg` predicates of the item and every enclosing module and `impl`,
    /// outermost first.
    pub cfg: Vec<Meta>,
}

impl Declaration {
    /// Absolute path of the declared item (`crate::module::Ident`).
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}::{}", self.scope.module, self.ident)
    }
}

///
/// DeclarationCollector
///
/// Walks a crate's module tree and records every declaration it meets.
/// Out-of-line `mod name;` items are followed into their loaded files at the
/// point they are declared, so ordinals follow reading order across files.
/// Function bodies are not entered.
///

pub(crate) struct DeclarationCollector<'a> {
    files: &'a BTreeMap<ModulePath, SourceFile>,
    scope: Arc<Scope>,
    owner: Option<Owner>,
    cfg: Vec<Meta>,
    pub(crate) declarations: Vec<Declaration>,
}

impl<'a> DeclarationCollector<'a> {
    pub(crate) fn new(files: &'a BTreeMap<ModulePath, SourceFile>) -> Self {
        Self {
            files,
            scope: Arc::new(Scope::default()),
            owner: None,
            cfg: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Collect declarations starting from the crate root.
    pub(crate) fn collect(mut self) -> Vec<Declaration> {
        if let Some(root) = self.files.get(&ModulePath::root()) {
            self.enter_file(root);
        }

        self.declarations
    }

    fn enter_file(&mut self, source: &'a SourceFile) {
        let scope = Arc::new(Scope::new(source.module.clone(), &source.syntax.items));
        let prev_scope = std::mem::replace(&mut self.scope, scope);
        let prev_owner = self.owner.take();
        let depth = self.cfg.len();
        self.cfg.extend(cfg_predicates(&source.syntax.attrs));

        for item in &source.syntax.items {
            self.visit_item(item);
        }

        self.scope = prev_scope;
        self.owner = prev_owner;
        self.cfg.truncate(depth);
    }

    fn push(&mut self, kind: DeclarationKind, ident: &syn::Ident, attrs: &[Attribute]) {
        self.push_fn(kind, ident, attrs, None);
    }

    fn push_fn(
        &mut self,
        kind: DeclarationKind,
        ident: &syn::Ident,
        attrs: &[Attribute],
        sig: Option<&Signature>,
    ) {
        let (has_receiver, arity) = sig.map_or((false, 0), |sig| {
            let has_receiver = sig.receiver().is_some();
            let arity = sig
                .inputs
                .iter()
                .filter(|arg| matches!(arg, FnArg::Typed(_)))
                .count();

            (has_receiver, arity)
        });

        let mut cfg = self.cfg.clone();
        cfg.extend(cfg_predicates(attrs));

        self.declarations.push(Declaration {
            ordinal: self.declarations.len(),
            kind,
            ident: ident.to_string(),
            attributes: attrs.iter().map(|a| SimplePath::from(a.path())).collect(),
            scope: Arc::clone(&self.scope),
            owner: self.owner.clone(),
            has_receiver,
            arity,
            cfg,
        });
    }
}

// Predicates of `#[cfg(..)]` / `#![cfg(..)]` attributes.
fn cfg_predicates(attrs: &[Attribute]) -> impl Iterator<Item = Meta> + '_ {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("cfg"))
        .filter_map(|attr| attr.parse_args::<Meta>().ok())
}

impl<'ast> Visit<'ast> for DeclarationCollector<'ast> {
    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        self.push(DeclarationKind::Module, &node.ident, &node.attrs);

        let child = self.scope.module.child(&node.ident.to_string());
        let depth = self.cfg.len();
        self.cfg.extend(cfg_predicates(&node.attrs));

        if let Some((_, items)) = &node.content {
            let scope = Arc::new(Scope::new(child, items));
            let prev_scope = std::mem::replace(&mut self.scope, scope);
            let prev_owner = self.owner.take();

            for item in items {
                self.visit_item(item);
            }

            self.scope = prev_scope;
            self.owner = prev_owner;
        } else if let Some(source) = self.files.get(&child) {
            self.enter_file(source);
        }

        self.cfg.truncate(depth);
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        let self_ty = match node.self_ty.as_ref() {
            Type::Path(type_path) if type_path.qself.is_none() => {
                Some(SimplePath::from(&type_path.path))
            }
            _ => None,
        };
        let trait_path = node
            .trait_
            .as_ref()
            .map(|(_, path, _)| SimplePath::from(path));

        let prev = self.owner.replace(Owner::Impl {
            self_ty,
            trait_path,
        });
        let depth = self.cfg.len();
        self.cfg.extend(cfg_predicates(&node.attrs));

        for item in &node.items {
            if let ImplItem::Fn(item_fn) = item {
                self.visit_impl_item_fn(item_fn);
            }
        }

        self.owner = prev;
        self.cfg.truncate(depth);
    }

    fn visit_item_trait(&mut self, node: &'ast ItemTrait) {
        self.push(DeclarationKind::Type, &node.ident, &node.attrs);

        let prev = self.owner.replace(Owner::Trait);
        for item in &node.items {
            if let TraitItem::Fn(item_fn) = item {
                self.visit_trait_item_fn(item_fn);
            }
        }
        self.owner = prev;
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        self.push_fn(
            DeclarationKind::Method,
            &node.sig.ident,
            &node.attrs,
            Some(&node.sig),
        );
    }

    fn visit_trait_item_fn(&mut self, node: &'ast TraitItemFn) {
        self.push_fn(
            DeclarationKind::Method,
            &node.sig.ident,
            &node.attrs,
            Some(&node.sig),
        );
    }

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        self.push_fn(
            DeclarationKind::Function,
            &node.sig.ident,
            &node.attrs,
            Some(&node.sig),
        );
    }

    fn visit_item_struct(&mut self, node: &'ast ItemStruct) {
        self.push(DeclarationKind::Type, &node.ident, &node.attrs);
    }

    fn visit_item_enum(&mut self, node: &'ast ItemEnum) {
        self.push(DeclarationKind::Type, &node.ident, &node.attrs);
    }

    fn visit_item_union(&mut self, node: &'ast ItemUnion) {
        self.push(DeclarationKind::Type, &node.ident, &node.attrs);
    }

    fn visit_item_type(&mut self, node: &'ast ItemType) {
        self.push(DeclarationKind::Type, &node.ident, &node.attrs);
    }

    fn visit_item_const(&mut self, node: &'ast ItemConst) {
        self.push(DeclarationKind::Value, &node.ident, &node.attrs);
    }

    fn visit_item_static(&mut self, node: &'ast ItemStatic) {
        self.push(DeclarationKind::Value, &node.ident, &node.attrs);
    }
}

///
/// TESTS
///
