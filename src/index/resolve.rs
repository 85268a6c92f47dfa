//! Cross-file queries over a built index: import resolution, related files,
//! and files that share exported names.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Component, Path};

use serde::Serialize;

use super::ProjectIndex;
use crate::model::{ImportTarget, Symbol};

/// Appended to a joined import specifier, in probe order.
pub const RESOLUTION_SUFFIXES: &[&str] = &["", ".ts", ".tsx", "/index.ts", "/index.tsx"];

/// A file ranked by how many exported names it shares with a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimilarFile<'a> {
    /// Root-relative path.
    pub path: &'a str,
    /// Number of its exported names that the target also exports.
    pub score: usize,
}

/// Everything the index knows about one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileContext<'a> {
    /// Root-relative path.
    pub path: &'a str,
    /// Exported symbols.
    pub symbols: &'a [Symbol],
    /// Raw import specifiers.
    pub imports: &'a [ImportTarget],
    /// Resolved relative imports, in path order.
    pub related: Vec<&'a str>,
    /// Up to three files sharing exported names.
    pub similar: Vec<SimilarFile<'a>>,
}

/// Lexically joins `specifier` onto the directory of `from`.
///
/// `None` when the result would escape the project root.
fn join_specifier(from: &str, specifier: &str) -> Option<String> {
    let dir = Path::new(from).parent().unwrap_or_else(|| Path::new(""));
    let cleaned = path_clean::clean(dir.join(specifier));
    let mut parts = Vec::new();
    for component in cleaned.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

impl ProjectIndex {
    /// Resolves one relative specifier imported by `from` to an indexed path.
    ///
    /// Tries the joined path as written, then with each of
    /// [`RESOLUTION_SUFFIXES`]; the first indexed hit wins. Bare specifiers
    /// (packages) never resolve.
    #[must_use]
    pub fn resolve_import(&self, from: &str, target: &ImportTarget) -> Option<&str> {
        if !target.is_relative() {
            return None;
        }
        let joined = join_specifier(from, target.as_str())?;
        RESOLUTION_SUFFIXES.iter().find_map(|suffix| {
            let candidate = format!("{joined}{suffix}");
            self.files.get_key_value(&candidate).filter(|_| self.ready).map(|(k, _)| k.as_str())
        })
    }

    /// Files `path` imports that resolved inside the project, with their text.
    ///
    /// Unresolved and external imports are dropped.
    #[must_use]
    pub fn related_files(&self, path: &str) -> BTreeMap<&str, &str> {
        let Some(file) = self.get(path) else {
            return BTreeMap::new();
        };
        file.imports
            .iter()
            .filter_map(|target| self.resolve_import(path, target))
            .filter_map(|resolved| self.get(resolved).map(|f| (resolved, f.text.as_str())))
            .collect()
    }

    /// Other files ranked by exported names shared with `path`.
    ///
    /// Highest score first; equal scores in path order. Files sharing nothing
    /// are left out.
    #[must_use]
    pub fn similar_files(&self, path: &str, limit: usize) -> Vec<SimilarFile<'_>> {
        let Some(target) = self.get(path) else {
            return Vec::new();
        };
        if limit == 0 || target.symbols.is_empty() {
            return Vec::new();
        }

        let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();
        for file in self.files().filter(|f| f.path != path) {
            for symbol in &file.symbols {
                owners.entry(symbol.name.as_str()).or_default().push(file.path.as_str());
            }
        }

        let target_names: HashSet<&str> = target.symbols.iter().map(|s| s.name.as_str()).collect();
        let mut scores: HashMap<&str, usize> = HashMap::new();
        for name in target_names {
            for owner in owners.get(name).into_iter().flatten() {
                *scores.entry(*owner).or_default() += 1;
            }
        }

        let mut ranked: Vec<SimilarFile<'_>> =
            scores.into_iter().map(|(path, score)| SimilarFile { path, score }).collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.path.cmp(b.path)));
        ranked.truncate(limit);
        ranked
    }

    /// Exported symbols of each related file.
    #[must_use]
    pub fn export_context(&self, path: &str) -> BTreeMap<&str, &[Symbol]> {
        self.related_files(path)
            .into_keys()
            .filter_map(|related| self.get(related).map(|f| (related, f.symbols.as_slice())))
            .collect()
    }

    /// Symbols, imports, related files and the top three similar files.
    #[must_use]
    pub fn file_context(&self, path: &str) -> Option<FileContext<'_>> {
        let file = self.get(path)?;
        Some(FileContext {
            path: file.path.as_str(),
            symbols: &file.symbols,
            imports: &file.imports,
            related: self.related_files(path).into_keys().collect(),
            similar: self.similar_files(path, 3),
        })
    }
}
