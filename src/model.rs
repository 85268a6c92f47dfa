//! Source model: files, exported symbols, and import targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::extract;

/// Target test framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Jest, imported from `@jest/globals`; tests use the `.test.ts` suffix.
    Jest,
    /// Vitest; tests use the `.spec.ts` suffix.
    Vitest,
}

impl Framework {
    /// Suffix appended to a source stem to form its generated test path.
    #[must_use]
    pub fn test_suffix(self) -> &'static str {
        match self {
            Self::Jest => ".test.ts",
            Self::Vitest => ".spec.ts",
        }
    }

    /// Lowercase identifier, as accepted on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jest => "jest",
            Self::Vitest => "vitest",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jest" => Ok(Self::Jest),
            "vitest" => Ok(Self::Vitest),
            other => Err(format!("unknown framework: {other} (must be jest or vitest)")),
        }
    }
}

/// Declaration form of an exported symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// `export [async] function name(...)`.
    Function,
    /// `export const name = [async] (...) =>`.
    ArrowFunction,
    /// `export class Name`.
    Class,
    /// `export default ...`.
    Default,
}

impl SymbolKind {
    /// Short human label used in test names and prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Function | Self::ArrowFunction => "function",
            Self::Class => "class",
            Self::Default => "default export",
        }
    }

    /// Expected `typeof` result, when the form pins it down.
    ///
    /// Classes are functions at runtime. A default export may be any value.
    #[must_use]
    pub fn typeof_value(self) -> Option<&'static str> {
        match self {
            Self::Function | Self::ArrowFunction | Self::Class => Some("function"),
            Self::Default => None,
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Binding name.
    pub name: String,
    /// Raw annotation text after `:`, if any. Never interpreted beyond
    /// keyword heuristics.
    pub hint: Option<String>,
}

impl Param {
    /// Creates an unannotated parameter.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: None,
        }
    }

    /// Creates a parameter with a free-text type hint.
    #[must_use]
    pub fn hinted(name: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: Some(hint.into()),
        }
    }
}

/// One exported declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Exported name; `default` for anonymous default exports.
    pub name: String,
    /// Declaration form.
    pub kind: SymbolKind,
    /// Whether the declaration is `async`.
    pub is_async: bool,
    /// Parameters in declaration order.
    pub params: Vec<Param>,
}

impl Symbol {
    /// Identifier used to bind this symbol in generated code.
    ///
    /// Anonymous default exports have no usable name, so they bind as
    /// `defaultExport`.
    #[must_use]
    pub fn binding(&self) -> &str {
        if self.kind == SymbolKind::Default && self.name == "default" {
            "defaultExport"
        } else {
            &self.name
        }
    }
}

/// A raw module specifier from an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportTarget(pub String);

impl ImportTarget {
    /// Specifier text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only relative specifiers can resolve to project files.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        self.0.starts_with('.')
    }
}

impl fmt::Display for ImportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed source file. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the project root, `/`-separated.
    pub path: String,
    /// Full text as read.
    pub text: String,
    /// Exported symbols in first-seen order.
    pub symbols: Vec<Symbol>,
    /// Import specifiers in source order, duplicates kept.
    pub imports: Vec<ImportTarget>,
}

impl SourceFile {
    /// Runs both extractors over `text`.
    #[must_use]
    pub fn parse(path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let symbols = extract::extract_symbols(&text);
        let imports = extract::extract_imports(&text);
        Self {
            path: path.into(),
            text,
            symbols,
            imports,
        }
    }

    /// Path without its final extension.
    #[must_use]
    pub fn stem_path(&self) -> &str {
        strip_extension(&self.path)
    }
}

/// Drops the last `.ext` of the final path segment, if any.
#[must_use]
pub fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}
