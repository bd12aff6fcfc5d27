use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Display},
};
use syn::{Item, UseTree};

///
/// ModulePath
///
/// Absolute module path inside the crate being scanned, always rooted at `crate`.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ModulePath(Vec<String>);

impl ModulePath {
    #[must_use]
    pub fn root() -> Self {
        Self(vec!["crate".to_string()])
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());

        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl Default for ModulePath {
    fn default() -> Self {
        Self::root()
    }
}

impl Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("::"))
    }
}

///
/// SimplePath
///
/// Owned, generics-free copy of a `syn::Path` (`::a::b`, `crate::c`, `D`).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimplePath {
    pub leading_colon: bool,
    pub segments: Vec<String>,
}

impl SimplePath {
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }
}

impl From<&syn::Path> for SimplePath {
    fn from(path: &syn::Path) -> Self {
        Self {
            leading_colon: path.leading_colon.is_some(),
            segments: path.segments.iter().map(|s| s.ident.to_string()).collect(),
        }
    }
}

impl Display for SimplePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.leading_colon {
            f.write_str("::")?;
        }

        f.write_str(&self.segments.join("::"))
    }
}

///
/// Scope
///
/// Name-resolution view of one module: its own path, the names its `use`
/// items bind, its glob imports, and the items it declares directly.
///

#[derive(Clone, Debug, Default)]
pub struct Scope {
    pub module: ModulePath,
    imports: BTreeMap<String, Vec<String>>,
    globs: Vec<Vec<String>>,
    locals: BTreeSet<String>,
}

impl Scope {
    #[must_use]
    pub fn new(module: ModulePath, items: &[Item]) -> Self {
        let mut scope = Self {
            module,
            ..Self::default()
        };

        // locals first, `use` prefixes may name a child module
        for item in items {
            match item {
                Item::Struct(item) => scope.add_local(&item.ident),
                Item::Enum(item) => scope.add_local(&item.ident),
                Item::Union(item) => scope.add_local(&item.ident),
                Item::Trait(item) => scope.add_local(&item.ident),
                Item::Type(item) => scope.add_local(&item.ident),
                Item::Mod(item) => scope.add_local(&item.ident),
                _ => {}
            }
        }

        for item in items {
            if let Item::Use(item_use) = item {
                let mut prefix = Vec::new();
                if item_use.leading_colon.is_some() {
                    prefix.push(String::new());
                }
                scope.insert_use_tree(&item_use.tree, &mut prefix);
            }
        }

        scope
    }

    fn add_local(&mut self, ident: &syn::Ident) {
        self.locals.insert(ident.to_string());
    }

    fn insert_use_tree(&mut self, tree: &UseTree, prefix: &mut Vec<String>) {
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.insert_use_tree(&path.tree, prefix);
                prefix.pop();
            }
            UseTree::Name(name) => {
                let ident = name.ident.to_string();

                // `use a::b::{self}` binds `b`
                if ident == "self" {
                    if let Some(last) = prefix.last().cloned() {
                        let target = self.absolutize(prefix);
                        self.imports.insert(last, target);
                    }
                    return;
                }

                prefix.push(ident.clone());
                let target = self.absolutize(prefix);
                prefix.pop();
                self.imports.insert(ident, target);
            }
            UseTree::Rename(rename) => {
                let alias = rename.rename.to_string();
                if alias == "_" {
                    return;
                }

                prefix.push(rename.ident.to_string());
                let target = self.absolutize(prefix);
                prefix.pop();
                self.imports.insert(alias, target);
            }
            UseTree::Glob(_) => {
                let target = self.absolutize(prefix);
                self.globs.push(target);
            }
            UseTree::Group(group) => {
                for item in &group.items {
                    self.insert_use_tree(item, prefix);
                }
            }
        }
    }

    // Turn a `use` prefix into an absolute path; an empty first segment marks `::`.
    fn absolutize(&self, segments: &[String]) -> Vec<String> {
        match segments.first().map(String::as_str) {
            Some("") => segments[1..].to_vec(),
            Some("crate") => segments.to_vec(),
            Some("self" | "super") => self.relative(segments),
            Some(first) if self.locals.contains(first) => {
                let mut out = self.module.segments().to_vec();
                out.extend(segments.iter().cloned());
                out
            }
            _ => segments.to_vec(),
        }
    }

    // Resolve leading `self`/`super` segments against this module.
    fn relative(&self, segments: &[String]) -> Vec<String> {
        let mut module = self.module.segments().to_vec();
        let mut idx = 0;

        while idx < segments.len() && segments[idx] == "super" {
            if module.len() > 1 {
                module.pop();
            }
            idx += 1;
        }
        if idx == 0 && segments.first().is_some_and(|s| s == "self") {
            idx = 1;
        }

        module.extend(segments[idx..].iter().cloned());
        module
    }

    /// Resolve a path written in this module to its absolute segments.
    ///
    /// `known` is the set of absolute item paths declared anywhere in the
    /// program; it is only consulted to see through glob imports. Paths that
    /// cannot be tied to this crate are returned as written, which makes them
    /// external (`srcgen::my_special`, `String`).
    #[must_use]
    pub fn resolve(&self, path: &SimplePath, known: &BTreeSet<String>) -> Vec<String> {
        if path.leading_colon {
            return path.segments.clone();
        }

        let Some(first) = path.first() else {
            return Vec::new();
        };
        let rest = &path.segments[1..];

        match first {
            "crate" => path.segments.clone(),
            "self" | "super" => self.relative(&path.segments),
            _ if self.locals.contains(first) => {
                let mut out = self.module.segments().to_vec();
                out.extend(path.segments.iter().cloned());
                out
            }
            _ => {
                if let Some(target) = self.imports.get(first) {
                    let mut out = target.clone();
                    out.extend(rest.iter().cloned());
                    return out;
                }

                for glob in &self.globs {
                    let mut candidate = glob.clone();
                    candidate.push(first.to_string());
                    if known.contains(&candidate.join("::")) {
                        candidate.extend(rest.iter().cloned());
                        return candidate;
                    }
                }

                path.segments.clone()
            }
        }
    }
}

///
/// TESTS
///
