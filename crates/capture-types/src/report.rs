// ─────────────────────────────────────────────────────────────────────
// Capture Kit: Scenario Vocabulary and Report Types
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a scenario's callable reaches its enclosing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// No access to the enclosing scope.
    None,
    /// Independent copy moved into the callable.
    ByValue,
    /// Copy of an immutable binding; read-only inside the callable.
    ByConstValue,
    /// Borrow of the original; mutations are visible afterwards.
    ByReference,
    /// Ownership of a shared handle moved into the callable.
    SharedOwned,
}

impl CaptureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::None => "none",
            CaptureMode::ByValue => "by_value",
            CaptureMode::ByConstValue => "by_const_value",
            CaptureMode::ByReference => "by_reference",
            CaptureMode::SharedOwned => "shared_owned",
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How a scenario calls its callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStyle {
    /// Defined in place and handed straight to the invoker.
    Invoker,
    /// Bound to a name, then handed to the invoker.
    NamedThenInvoker,
    /// Bound to a name and called directly.
    NamedDirect,
    /// Defined and called in the same expression.
    Inline,
}

impl InvocationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationStyle::Invoker => "invoker",
            InvocationStyle::NamedThenInvoker => "named_then_invoker",
            InvocationStyle::NamedDirect => "named_direct",
            InvocationStyle::Inline => "inline",
        }
    }
}

impl fmt::Display for InvocationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An additional check a scenario makes besides the returned value,
/// e.g. the number of times a counter was bumped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffect {
    pub label: String,
    pub expected: i32,
    pub actual: i32,
}

impl SideEffect {
    pub fn new(label: impl Into<String>, expected: i32, actual: i32) -> Self {
        Self {
            label: label.into(),
            expected,
            actual,
        }
    }

    pub fn holds(&self) -> bool {
        self.expected == self.actual
    }
}

/// What a scenario body observed after invoking its callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub result: i32,
    pub side_effects: Vec<SideEffect>,
}

impl Observation {
    pub fn result(result: i32) -> Self {
        Self {
            result,
            side_effects: Vec::new(),
        }
    }

    pub fn with_side_effect(mut self, side_effect: SideEffect) -> Self {
        self.side_effects.push(side_effect);
        self
    }

    /// Looks up a recorded side effect by label.
    pub fn side_effect(&self, label: &str) -> Option<&SideEffect> {
        self.side_effects.iter().find(|e| e.label == label)
    }

    /// First side effect whose expectation does not hold.
    pub fn first_violation(&self) -> Option<&SideEffect> {
        self.side_effects.iter().find(|e| !e.holds())
    }
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub mode: CaptureMode,
    pub style: InvocationStyle,
    pub passed: bool,
    pub expected: i32,
    /// `None` if the scenario failed before producing a value.
    pub actual: Option<i32>,
    pub side_effects: Vec<SideEffect>,
    pub error: Option<String>,
}

/// Outcome of a suite run, in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteReport {
    pub reports: Vec<ScenarioReport>,
    pub passed: usize,
    pub failed: usize,
}

impl SuiteReport {
    pub fn push(&mut self, report: ScenarioReport) {
        if report.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.reports.push(report);
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.reports.iter().filter(|r| !r.passed)
    }
}
