use crate::host::{ModulePath, SourceFile};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::{Path, PathBuf},
};
use syn::{Attribute, Expr, ExprLit, Item, Lit, Meta};
use thiserror::Error as ThisError;
use tracing::{debug, warn};

///
/// LoadError
///

#[derive(Debug, ThisError)]
pub enum LoadError {
    #[error("crate root '{0}' not found")]
    MissingEntry(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },
}

/// Read and parse every file reachable from `entry` through `mod name;` items.
///
/// Module files that cannot be found are skipped with a warning; the compiler
/// reports those itself, and they are often behind a `cfg` that is off.
pub(crate) fn load_files(entry: &Path) -> Result<BTreeMap<ModulePath, SourceFile>, LoadError> {
    if !entry.is_file() {
        return Err(LoadError::MissingEntry(entry.to_path_buf()));
    }

    let mut loader = Loader::default();
    let dir = entry.parent().map(Path::to_path_buf).unwrap_or_default();
    loader.load(entry, ModulePath::root(), dir)?;

    debug!(files = loader.files.len(), entry = %entry.display(), "loaded module tree");

    Ok(loader.files)
}

#[derive(Default)]
struct Loader {
    files: BTreeMap<ModulePath, SourceFile>,
    seen: BTreeSet<PathBuf>,
}

impl Loader {
    // `dir` is where child modules of this file live.
    fn load(&mut self, path: &Path, module: ModulePath, dir: PathBuf) -> Result<(), LoadError> {
        if !self.seen.insert(path.to_path_buf()) {
            return Ok(());
        }

        let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let syntax = syn::parse_file(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let children = child_modules(&syntax.items, &module, &dir);

        self.files.insert(
            module.clone(),
            SourceFile {
                path: path.to_path_buf(),
                module,
                syntax,
            },
        );

        for child in children {
            let Some(file) = child.locate() else {
                warn!(module = %child.module, "module file not found, skipping");
                continue;
            };
            let dir = child_dir(&file, &child.name);
            self.load(&file, child.module, dir)?;
        }

        Ok(())
    }
}

// An out-of-line `mod name;` waiting to be read.
struct PendingModule {
    module: ModulePath,
    name: String,
    dir: PathBuf,
    explicit: Option<PathBuf>,
}

impl PendingModule {
    fn locate(&self) -> Option<PathBuf> {
        if let Some(path) = &self.explicit {
            return path.is_file().then(|| path.clone());
        }

        [
            self.dir.join(format!("{}.rs", self.name)),
            self.dir.join(&self.name).join("mod.rs"),
        ]
        .into_iter()
        .find(|candidate| candidate.is_file())
    }
}

// Collect out-of-line modules declared in `items`, descending into inline modules.
fn child_modules(items: &[Item], module: &ModulePath, dir: &Path) -> Vec<PendingModule> {
    let mut out = Vec::new();

    for item in items {
        let Item::Mod(item_mod) = item else {
            continue;
        };

        let name = item_mod.ident.to_string();
        let child = module.child(&name);
        let explicit = path_attr(&item_mod.attrs).map(|p| dir.join(p));

        match &item_mod.content {
            Some((_, inner)) => {
                let inner_dir = explicit.unwrap_or_else(|| dir.join(&name));
                out.extend(child_modules(inner, &child, &inner_dir));
            }
            None => out.push(PendingModule {
                module: child,
                name,
                dir: dir.to_path_buf(),
                explicit,
            }),
        }
    }

    out
}

// Directory holding the children of a module loaded from `file`.
fn child_dir(file: &Path, name: &str) -> PathBuf {
    let parent = file.parent().map(Path::to_path_buf).unwrap_or_default();

    if file.file_name().is_some_and(|f| f == "mod.rs") {
        parent
    } else {
        parent.join(name)
    }
}

// Value of a `#[path = "..."]` attribute.
fn path_attr(attrs: &[Attribute]) -> Option<String> {
    attrs.iter().find_map(|attr| {
        let Meta::NameValue(nv) = &attr.meta else {
            return None;
        };
        if !nv.path.is_ident("path") {
            return None;
        }

        match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => Some(lit.value()),
            _ => None,
        }
    })
}

///
/// TESTS
///
