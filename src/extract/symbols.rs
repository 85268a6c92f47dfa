//! Exported-declaration matchers.
//!
//! Each supported form has its own matcher. Matchers run independently over
//! the whole text and report `(offset, Symbol)` pairs; the caller merges them
//! into first-seen order.
//!
//! Recognized:
//! - `export [async] function [*]name[<T>](...)`
//! - `export const name[: Type] = [async] [<T>](...)[: Ret] =>`
//! - `export [abstract] class Name`
//! - `export default [async] [function|class] [name]` (first occurrence only)
//!
//! Not recognized: `export { a, b }` lists, `export * from`, `export let/var`,
//! single-parameter arrows without parentheses (`x => x`), generic parameter
//! lists containing nested `<>` on functions, and declarations split by a
//! comment between `export` and the keyword. Declarations inside comments or
//! strings are not filtered out.

use std::sync::LazyLock;

use regex::Regex;

use super::params::{find_closing_paren, parse_params};
use crate::model::{Param, Symbol, SymbolKind};

static FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexport\s+(async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)\s*(?:<[^<>()]*>\s*)?\(")
        .expect("function pattern is valid")
});

static ARROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bexport\s+const\s+([A-Za-z_$][\w$]*)\s*(?::[^=;]+)?=\s*(async\s*)?(?:<[^<>()]*>\s*)?\(",
    )
    .expect("arrow pattern is valid")
});

static CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexport\s+(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)")
        .expect("class pattern is valid")
});

static DEFAULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bexport\s+default\s+(async\s+)?(?:(?:function\b\s*\*?|class\b)\s*)?([A-Za-z_$][\w$]*)?",
    )
    .expect("default pattern is valid")
});

/// Words that can follow `export default` without naming anything.
const NOT_A_NAME: &[&str] =
    &["new", "await", "typeof", "void", "null", "undefined", "true", "false", "this", "abstract"];

/// A symbol tagged with the byte offset where its declaration starts.
pub(crate) type Located = (usize, Symbol);

/// One independent recognizer.
pub(crate) type Matcher = fn(&str) -> Vec<Located>;

/// All matchers, in the order their results are merged on offset ties.
pub(crate) const MATCHERS: &[Matcher] = &[functions, arrow_functions, classes, default_export];

/// Reads the parameter list whose `(` is the last byte of a match ending at `end`.
fn params_at(text: &str, end: usize) -> Option<(Vec<Param>, usize)> {
    let open = end - 1;
    let close = find_closing_paren(text, open)?;
    Some((parse_params(&text[open + 1..close]), close))
}

pub(crate) fn functions(text: &str) -> Vec<Located> {
    FUNCTION
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (params, _) = params_at(text, whole.end())?;
            Some((
                whole.start(),
                Symbol {
                    name: caps[2].to_string(),
                    kind: SymbolKind::Function,
                    is_async: caps.get(1).is_some(),
                    params,
                },
            ))
        })
        .collect()
}

pub(crate) fn arrow_functions(text: &str) -> Vec<Located> {
    ARROW
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (params, close) = params_at(text, whole.end())?;
            if !followed_by_arrow(&text[close + 1..]) {
                return None;
            }
            Some((
                whole.start(),
                Symbol {
                    name: caps[1].to_string(),
                    kind: SymbolKind::ArrowFunction,
                    is_async: caps.get(2).is_some(),
                    params,
                },
            ))
        })
        .collect()
}

/// True when `rest` opens with `=>`, optionally after a return annotation.
fn followed_by_arrow(rest: &str) -> bool {
    let rest = rest.trim_start();
    if rest.starts_with("=>") {
        return true;
    }
    let Some(annotation) = rest.strip_prefix(':') else {
        return false;
    };
    annotation.find("=>").is_some_and(|at| {
        let between = &annotation[..at];
        !between.contains(';') && !between.contains('=')
    })
}

pub(crate) fn classes(text: &str) -> Vec<Located> {
    CLASS
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((
                whole.start(),
                Symbol {
                    name: caps[1].to_string(),
                    kind: SymbolKind::Class,
                    is_async: false,
                    params: Vec::new(),
                },
            ))
        })
        .collect()
}

pub(crate) fn default_export(text: &str) -> Vec<Located> {
    let Some(caps) = DEFAULT.captures(text) else {
        return Vec::new();
    };
    let Some(whole) = caps.get(0) else {
        return Vec::new();
    };
    let name = caps
        .get(2)
        .map(|m| m.as_str())
        .filter(|n| !NOT_A_NAME.contains(n))
        .unwrap_or("default");
    vec![(
        whole.start(),
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Default,
            is_async: caps.get(1).is_some(),
            params: Vec::new(),
        },
    )]
}
