//! Static extraction of exported symbols and import targets from source text.
//!
//! Pattern-based on purpose: no parser front end, only the declaration forms
//! listed in [`symbols`]. Malformed declarations are skipped whole; an empty
//! result is not an error here.

mod imports;
mod params;
mod symbols;

use std::collections::HashSet;

pub use imports::extract_imports;

use crate::model::Symbol;

/// Extracts exported symbols in first-seen order.
///
/// Every matcher in [`symbols::MATCHERS`] runs over the full text; results are
/// merged by source offset. A name already seen earlier in the file is not
/// emitted again (overload signatures, `export default name` re-exporting a
/// function declared above).
pub fn extract_symbols(code: &str) -> Vec<Symbol> {
    let mut located: Vec<_> = symbols::MATCHERS.iter().flat_map(|matcher| matcher(code)).collect();
    located.sort_by_key(|(offset, _)| *offset);

    let mut seen = HashSet::new();
    located
        .into_iter()
        .map(|(_, symbol)| symbol)
        .filter(|symbol| seen.insert(symbol.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Param, SymbolKind};

    #[test]
    fn merges_forms_in_source_order() {
        let code = r"
export class Cache {}
export const hit = (key: string) => true;
export async function warm(keys: string[]) {}
export default Cache;
";
        let names: Vec<_> = extract_symbols(code).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Cache", "hit", "warm"]);
    }

    #[test]
    fn one_symbol_per_form() {
        let cases = [
            ("export function f(a) {}", SymbolKind::Function),
            ("export const f = (a) => a;", SymbolKind::ArrowFunction),
            ("export class F {}", SymbolKind::Class),
            ("export default {};", SymbolKind::Default),
        ];
        for (code, kind) in cases {
            let found = extract_symbols(code);
            assert_eq!(found.len(), 1, "{code}");
            assert_eq!(found[0].kind, kind, "{code}");
        }
    }

    #[test]
    fn extraction_is_idempotent() {
        let code = "export function a(x: number) {}\nexport const b = async () => 1;\n";
        assert_eq!(extract_symbols(code), extract_symbols(code));
    }

    #[test]
    fn overloads_collapse_to_first_signature() {
        let code = "export function parse(s: string): number;\nexport function parse(s: any) {}";
        let found = extract_symbols(code);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].params, vec![Param::hinted("s", "string")]);
    }

    #[test]
    fn add_example() {
        let found =
            extract_symbols("export function add(a: number, b: number): number { return a+b }");
        assert_eq!(
            found,
            vec![Symbol {
                name: "add".into(),
                kind: SymbolKind::Function,
                is_async: false,
                params: vec![Param::hinted("a", "number"), Param::hinted("b", "number")],
            }]
        );
    }

    #[test]
    fn commented_parameters_do_not_hide_exports() {
        let found = extract_symbols(
            "export function retry(\n  times: number, // don't go negative\n  delay: number,\n) {}",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "retry");
        let names: Vec<&str> = found[0].params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["times", "delay"]);

        let found = extract_symbols("export const go = (\n  ms: number, // wait (ms\n) => ms;\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, SymbolKind::ArrowFunction);
        assert_eq!(found[0].params[0].name, "ms");
    }

    #[test]
    fn nothing_exported() {
        assert!(extract_symbols("function local() {}\nconst x = 1;").is_empty());
    }
}
