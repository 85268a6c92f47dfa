//! Test-file rendering.
//!
//! Output depends only on the inputs: no timestamps, no randomness, and
//! every collection is walked in a fixed order.

use crate::model::{strip_extension, Framework, Symbol, SymbolKind};

use super::scenario::Scenario;

/// How the generator arrived at its inputs; named in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One file on its own.
    Standalone,
    /// With the project index at hand.
    Context,
}

impl Mode {
    fn label(self) -> &'static str {
        match self {
            Self::Standalone => "standalone",
            Self::Context => "project context",
        }
    }
}

/// Everything needed to render one test file.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Root-relative source path.
    pub source_path: &'a str,
    /// Target framework.
    pub framework: Framework,
    /// Exported symbols, in source order.
    pub symbols: &'a [Symbol],
    /// Scenarios for those symbols.
    pub scenarios: &'a [Scenario],
    /// Root-relative paths of files the source imports; mock hints only.
    pub related: &'a [&'a str],
    /// Generation mode.
    pub mode: Mode,
}

/// Line buffer with two-space indentation.
struct Out(String);

impl Out {
    fn line(&mut self, depth: usize, text: &str) {
        if !text.is_empty() {
            for _ in 0..depth {
                self.0.push_str("  ");
            }
            self.0.push_str(text);
        }
        self.0.push('\n');
    }

    fn blank(&mut self) {
        self.0.push('\n');
    }
}

/// Module specifier for `path` as seen from a test file one level down.
fn import_specifier(path: &str) -> String {
    format!("../{}", strip_extension(path))
}

/// Renders a complete test file.
#[must_use]
pub fn render(request: &RenderRequest<'_>) -> String {
    let mut out = Out(String::new());

    out.line(0, "/**");
    out.line(0, " * Auto-generated test file");
    out.line(0, &format!(" * Source: {}", request.source_path));
    out.line(0, &format!(" * Mode: {}", request.mode.label()));
    out.line(0, " */");
    out.blank();

    out.line(0, &source_import(request.symbols, request.source_path));
    out.blank();
    out.line(0, framework_import(request.framework));
    out.blank();

    if request.mode == Mode::Context && !request.related.is_empty() {
        let mock_fn = match request.framework {
            Framework::Jest => "jest.mock",
            Framework::Vitest => "vi.mock",
        };
        out.line(0, "// Mock setup for related dependencies");
        for related in request.related {
            out.line(0, &format!("// {mock_fn}('{}');", import_specifier(related)));
        }
        out.blank();
    }

    for (i, symbol) in request.symbols.iter().enumerate() {
        if i > 0 {
            out.blank();
        }
        describe_block(&mut out, symbol, request.scenarios);
    }
    out.0
}

fn source_import(symbols: &[Symbol], source_path: &str) -> String {
    let default = symbols.iter().find(|s| s.kind == SymbolKind::Default).map(Symbol::binding);
    let named: Vec<&str> =
        symbols.iter().filter(|s| s.kind != SymbolKind::Default).map(|s| s.name.as_str()).collect();

    let clause = match (default, named.is_empty()) {
        (Some(default), true) => default.to_string(),
        (Some(default), false) => format!("{default}, {{ {} }}", named.join(", ")),
        (None, _) => format!("{{ {} }}", named.join(", ")),
    };
    format!("import {clause} from '{}';", import_specifier(source_path))
}

fn framework_import(framework: Framework) -> &'static str {
    match framework {
        Framework::Vitest => {
            "import { describe, it, expect, beforeEach, afterEach, vi } from 'vitest';"
        }
        Framework::Jest => {
            "import { describe, it, expect, beforeEach, afterEach, jest } from '@jest/globals';"
        }
    }
}

fn describe_block(out: &mut Out, symbol: &Symbol, scenarios: &[Scenario]) {
    let binding = symbol.binding();
    out.line(0, &format!("describe('{binding}', () => {{"));
    out.line(1, "let result: any;");

    for scenario in scenarios.iter().filter(|s| s.symbol == symbol.name) {
        out.blank();
        scenario_test(out, symbol, scenario);
    }

    out.blank();
    out.line(1, "it('should be defined', () => {");
    out.line(2, &format!("expect({binding}).toBeDefined();"));
    out.line(1, "});");
    out.blank();
    out.line(1, &format!("it('should be a {}', () => {{", symbol.kind.label()));
    match symbol.kind.typeof_value() {
        Some(expected) => out.line(2, &format!("expect(typeof {binding}).toBe('{expected}');")),
        None => {
            out.line(2, &format!("expect(['function', 'object']).toContain(typeof {binding});"));
        }
    }
    out.line(1, "});");
    out.line(0, "});");
}

fn scenario_test(out: &mut Out, symbol: &Symbol, scenario: &Scenario) {
    let prefix = if scenario.edge_case { "[EDGE CASE] " } else { "" };
    let callback = if symbol.is_async { "async () =>" } else { "() =>" };
    out.line(1, &format!("it('{prefix}{}', {callback} {{", scenario.description));
    let expected = scenario.expected.label();
    out.line(2, &format!("// Scenario: {} (expected: {expected})", scenario.name));

    out.line(2, "// Arrange");
    if scenario.inputs.is_empty() {
        out.line(2, "// (no inputs)");
    }
    for (name, value) in &scenario.inputs {
        out.line(2, &format!("const {name} = {};", value.literal()));
    }
    out.blank();

    out.line(2, "// Act");
    out.line(2, &format!("result = {};", invocation(symbol, scenario)));
    out.blank();

    out.line(2, "// Assert");
    out.line(2, "expect(result).toBeDefined();");
    out.line(2, "// TODO: Add specific assertions based on expected behavior");
    out.line(1, "});");
}

/// The expression exercising `symbol` with the scenario's bindings.
///
/// Default exports may be any value, so they are only called when callable.
fn invocation(symbol: &Symbol, scenario: &Scenario) -> String {
    let binding = symbol.binding();
    let args: Vec<&str> = symbol
        .params
        .iter()
        .filter(|p| scenario.inputs.iter().any(|(name, _)| *name == p.name))
        .map(|p| p.name.as_str())
        .collect();
    let args = args.join(", ");
    let awaited = if symbol.is_async { "await " } else { "" };

    match symbol.kind {
        SymbolKind::Function | SymbolKind::ArrowFunction => format!("{awaited}{binding}({args})"),
        SymbolKind::Class => format!("new {binding}({args})"),
        SymbolKind::Default => {
            format!("typeof {binding} === 'function' ? {awaited}{binding}() : {binding}")
        }
    }
}
