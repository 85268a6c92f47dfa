//! Import-statement scanning.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::ImportTarget;

static FROM_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bfrom\s*['"]([^'"]+)['"]"#).expect("from-clause pattern is valid")
});

/// Collects the quoted `from` target of every line that starts with `import`.
///
/// Side-effect imports (`import './polyfill'`), multi-line import lists whose
/// `from` sits on a later line, and re-exports are not import lines in this
/// sense and are skipped. Duplicates are kept.
pub fn extract_imports(code: &str) -> Vec<ImportTarget> {
    code.lines()
        .map(str::trim)
        .filter(|line| is_import_line(line))
        .filter_map(|line| FROM_CLAUSE.captures(line))
        .map(|caps| ImportTarget(caps[1].to_string()))
        .collect()
}

fn is_import_line(line: &str) -> bool {
    line.strip_prefix("import")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_whitespace() || c == '{' || c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(code: &str) -> Vec<String> {
        extract_imports(code).into_iter().map(|t| t.0).collect()
    }

    #[test]
    fn collects_in_order_with_duplicates() {
        let code = r#"
import { a } from './a';
import type { B } from "../types/b";
import * as fs from 'fs';
import { a as again } from './a';
"#;
        assert_eq!(targets(code), vec!["./a", "../types/b", "fs", "./a"]);
    }

    #[test]
    fn skips_non_import_lines() {
        let code = "export { x } from './x';\nconst from = 'y';\nimportant('z');\n";
        assert!(targets(code).is_empty());
    }

    #[test]
    fn skips_side_effect_imports() {
        assert!(targets("import './polyfill';").is_empty());
    }

    #[test]
    fn identifier_containing_from_does_not_confuse_target() {
        let code = "import { fromJson } from './codec';";
        assert_eq!(targets(code), vec!["./codec"]);
    }

    #[test]
    fn unbraced_import() {
        assert_eq!(targets("import{x}from'./x'"), vec!["./x"]);
    }
}
