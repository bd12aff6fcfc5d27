//! Read-only view of the crate being scanned.
//!
//! A [`Program`] is an immutable snapshot: the parsed module tree, every
//! declaration in reading order, and the resolution of those declarations to
//! [`Symbol`]s. The generator never mutates it.

pub mod declaration;
pub mod loader;
pub mod scope;
pub mod symbol;

pub use declaration::{Declaration, DeclarationKind, Owner};
pub use loader::LoadError;
pub use scope::{ModulePath, Scope, SimplePath};
pub use symbol::{Symbol, TypeSymbol};

use declaration::DeclarationCollector;
use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

///
/// SourceFile
///

#[derive(Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub module: ModulePath,
    pub syntax: syn::File,
}

///
/// Program
///

pub struct Program {
    files: BTreeMap<ModulePath, SourceFile>,
    declarations: Vec<Declaration>,
    known_items: BTreeSet<String>,
}

impl Program {
    /// Build a snapshot from already-parsed files keyed by module path.
    #[must_use]
    pub fn new(files: BTreeMap<ModulePath, SourceFile>) -> Self {
        let declarations = DeclarationCollector::new(&files).collect();
        let known_items = declarations
            .iter()
            .filter(|d| matches!(d.kind, DeclarationKind::Type | DeclarationKind::Module))
            .map(Declaration::path)
            .collect();

        Self {
            files,
            declarations,
            known_items,
        }
    }

    /// Load a crate's module tree from its root file.
    pub fn load(entry: &Path) -> Result<Self, LoadError> {
        loader::load_files(entry).map(Self::new)
    }

    /// Snapshot of a single in-memory root file.
    pub fn parse_str(source: &str) -> Result<Self, syn::Error> {
        let syntax = syn::parse_file(source)?;
        let module = ModulePath::root();
        let file = SourceFile {
            path: PathBuf::from("lib.rs"),
            module: module.clone(),
            syntax,
        };

        Ok(Self::new(BTreeMap::from([(module, file)])))
    }

    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Paths of every file in the snapshot.
    pub fn sources(&self) -> impl Iterator<Item = &Path> {
        self.files.values().map(|file| file.path.as_path())
    }

    /// Resolve a declaration to its symbol.
    #[must_use]
    pub fn resolve(&self, decl: &Declaration) -> Symbol {
        symbol::resolve(decl, &self.known_items)
    }
}
