//! Scenario synthesis: which test cases each symbol gets, with sample inputs.

use serde::Serialize;

use crate::model::{Param, Symbol};

/// A placeholder input value chosen from a parameter's type hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleValue {
    /// A representative string.
    Str,
    /// A representative integer.
    Int,
    /// `true`.
    Bool,
    /// An empty array.
    EmptyList,
    /// An empty object.
    EmptyMap,
    /// `null`.
    Null,
}

impl SampleValue {
    /// Picks a value from a free-text hint by keyword, first match wins.
    ///
    /// Checked in order: string, number, boolean, array, object.
    #[must_use]
    pub fn for_hint(hint: Option<&str>) -> Self {
        let Some(hint) = hint.map(str::to_ascii_lowercase) else {
            return Self::Null;
        };
        if hint.contains("string") {
            Self::Str
        } else if hint.contains("number") {
            Self::Int
        } else if hint.contains("boolean") {
            Self::Bool
        } else if hint.contains("array") {
            Self::EmptyList
        } else if hint.contains("object") {
            Self::EmptyMap
        } else {
            Self::Null
        }
    }

    /// Source literal for this value.
    #[must_use]
    pub fn literal(self) -> &'static str {
        match self {
            Self::Str => "'sample'",
            Self::Int => "42",
            Self::Bool => "true",
            Self::EmptyList => "[]",
            Self::EmptyMap => "{}",
            Self::Null => "null",
        }
    }
}

/// Coarse expected outcome of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Returns normally.
    Success,
    /// Throws or falls back to a default.
    ErrorOrDefault,
    /// The returned promise resolves.
    Resolved,
}

impl Expectation {
    /// Label written into generated tests.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ErrorOrDefault => "error or default",
            Self::Resolved => "resolved",
        }
    }
}

/// Which of the fixed scenario shapes this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Representative inputs.
    HappyPath,
    /// Every parameter `null`.
    NullInput,
    /// Called with no arguments.
    EmptyInput,
    /// Happy-path inputs, awaited.
    AsyncResolution,
}

impl ScenarioKind {
    fn suffix(self) -> &'static str {
        match self {
            Self::HappyPath => "happy path",
            Self::NullInput => "null input",
            Self::EmptyInput => "empty input",
            Self::AsyncResolution => "async resolution",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::HappyPath => "should work with valid inputs",
            Self::NullInput => "should handle null inputs",
            Self::EmptyInput => "should handle empty inputs",
            Self::AsyncResolution => "should resolve async operations",
        }
    }
}

/// One synthesized test case for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Name of the symbol under test.
    pub symbol: String,
    /// Shape of the case.
    pub kind: ScenarioKind,
    /// `"<symbol> - <shape>"`.
    pub name: String,
    /// Test title.
    pub description: String,
    /// Parameter name to sample value, in parameter order.
    pub inputs: Vec<(String, SampleValue)>,
    /// Coarse expected outcome.
    pub expected: Expectation,
    /// Whether this is an edge case.
    pub edge_case: bool,
}

impl Scenario {
    fn new(
        symbol: &Symbol,
        kind: ScenarioKind,
        inputs: Vec<(String, SampleValue)>,
        expected: Expectation,
    ) -> Self {
        Self {
            symbol: symbol.name.clone(),
            kind,
            name: format!("{} - {}", symbol.name, kind.suffix()),
            description: kind.description().to_string(),
            inputs,
            expected,
            edge_case: matches!(kind, ScenarioKind::NullInput | ScenarioKind::EmptyInput),
        }
    }
}

fn happy_inputs(params: &[Param]) -> Vec<(String, SampleValue)> {
    params.iter().map(|p| (p.name.clone(), SampleValue::for_hint(p.hint.as_deref()))).collect()
}

/// Scenarios for one symbol, in fixed order: happy path, null input (only
/// with parameters), empty input, async resolution (only when async).
#[must_use]
pub fn scenarios_for(symbol: &Symbol) -> Vec<Scenario> {
    let scenario = |kind, inputs, expected| Scenario::new(symbol, kind, inputs, expected);
    let happy = happy_inputs(&symbol.params);
    let mut out = vec![scenario(ScenarioKind::HappyPath, happy.clone(), Expectation::Success)];

    if !symbol.params.is_empty() {
        let nulls = symbol.params.iter().map(|p| (p.name.clone(), SampleValue::Null)).collect();
        out.push(scenario(ScenarioKind::NullInput, nulls, Expectation::ErrorOrDefault));
    }

    out.push(scenario(ScenarioKind::EmptyInput, Vec::new(), Expectation::ErrorOrDefault));

    if symbol.is_async {
        out.push(scenario(ScenarioKind::AsyncResolution, happy, Expectation::Resolved));
    }
    out
}

/// Scenarios for every symbol, grouped by symbol in symbol order.
#[must_use]
pub fn synthesize(symbols: &[Symbol]) -> Vec<Scenario> {
    symbols.iter().flat_map(scenarios_for).collect()
}
