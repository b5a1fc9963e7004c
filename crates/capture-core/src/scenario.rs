// ─────────────────────────────────────────────────────────────────────
// Capture Kit: Capture Scenario Suite
// ─────────────────────────────────────────────────────────────────────
//! Independent demonstration scenarios, one per capture strategy.
//!
//! Each scenario builds a closure that reaches its enclosing state in a
//! different way, invokes it with the probe, and checks the result.
//! Scenarios share nothing; a failure (or panic) in one is reported
//! and the rest still run.
//!
//! Borrowing closures never outlive the block that owns their state:
//! the borrow checker rejects any attempt to return or store them past
//! it. `shared_counter_owned` shows the alternative where the closure
//! takes ownership of a shared handle instead.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

pub use capture_types::INCREASE;

use capture_types::{
    CaptureError, CaptureMode, CaptureResult, HarnessConfig, InvocationStyle, Observation,
    ScenarioReport, SideEffect, SuiteReport,
};

use crate::invoker::{panic_message, Invoker};
use crate::stream::TextStream;

pub type ScenarioBody = fn(&Invoker, &HarnessConfig) -> CaptureResult<Observation>;

/// A named capture scenario.
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub mode: CaptureMode,
    pub style: InvocationStyle,
    pub description: &'static str,
    body: ScenarioBody,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("style", &self.style)
            .finish()
    }
}

impl Scenario {
    pub const fn new(
        name: &'static str,
        mode: CaptureMode,
        style: InvocationStyle,
        description: &'static str,
        body: ScenarioBody,
    ) -> Self {
        Self {
            name,
            mode,
            style,
            description,
            body,
        }
    }

    /// Value the callable must return under `config`.
    pub fn expected(&self, config: &HarnessConfig) -> i32 {
        match self.mode {
            CaptureMode::None => config.expected_uncaptured(),
            _ => config.expected(),
        }
    }

    /// Run the body and assert on what it observed.
    ///
    /// Returns `Assertion` on a result or side-effect mismatch. A panic
    /// in the body propagates; `run` is the isolating variant.
    pub fn check(&self, invoker: &Invoker, config: &HarnessConfig) -> CaptureResult<Observation> {
        let observation = (self.body)(invoker, config)?;
        let expected = self.expected(config);
        if observation.result != expected {
            return Err(CaptureError::Assertion {
                scenario: self.name.to_string(),
                expected,
                actual: observation.result,
            });
        }
        if let Some(effect) = observation.first_violation() {
            return Err(CaptureError::Assertion {
                scenario: format!("{}: {}", self.name, effect.label),
                expected: effect.expected,
                actual: effect.actual,
            });
        }
        Ok(observation)
    }

    /// Run the scenario in isolation and report the outcome.
    pub fn run(&self, invoker: &Invoker, config: &HarnessConfig) -> ScenarioReport {
        let mut report = ScenarioReport {
            name: self.name.to_string(),
            mode: self.mode,
            style: self.style,
            passed: false,
            expected: self.expected(config),
            actual: None,
            side_effects: Vec::new(),
            error: None,
        };

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| (self.body)(invoker, config))) {
            Ok(outcome) => outcome,
            Err(payload) => Err(CaptureError::CallablePanicked(panic_message(payload.as_ref()))),
        };

        match outcome {
            Ok(observation) => {
                report.actual = Some(observation.result);
                report.side_effects = observation.side_effects.clone();
                let violation = observation.first_violation();
                report.passed = observation.result == report.expected && violation.is_none();
                if !report.passed {
                    report.error = Some(match violation {
                        Some(effect) => format!(
                            "{}: expected {}, got {}",
                            effect.label, effect.expected, effect.actual
                        ),
                        None => format!(
                            "expected {}, got {}",
                            report.expected, observation.result
                        ),
                    });
                }
            }
            Err(e) => report.error = Some(e.to_string()),
        }

        if report.passed {
            log::info!("scenario {} passed ({}, {})", self.name, self.mode, self.style);
        } else {
            log::warn!(
                "scenario {} failed: {}",
                self.name,
                report.error.as_deref().unwrap_or("unknown")
            );
        }
        report
    }
}

// ── Scenario bodies ─────────────────────────────────────────────────

fn empty_capture(invoker: &Invoker, _config: &HarnessConfig) -> CaptureResult<Observation> {
    let result = invoker.try_invoke(Some(|n: i32| n + 2))?;
    Ok(Observation::result(result))
}

fn empty_capture_const(invoker: &Invoker, _config: &HarnessConfig) -> CaptureResult<Observation> {
    // A const item is inlined, not captured.
    const INCR: i32 = INCREASE;
    let result = invoker.invoke(|n| n + INCR);
    Ok(Observation::result(result))
}

fn const_capture(invoker: &Invoker, config: &HarnessConfig) -> CaptureResult<Observation> {
    let size = config.increase;
    let incr = size;
    let result = invoker.invoke(move |n| n + incr);
    Ok(Observation::result(result))
}

fn value_capture(invoker: &Invoker, config: &HarnessConfig) -> CaptureResult<Observation> {
    let size = config.increase;
    let result = invoker.invoke(move |n| n + size);
    Ok(Observation::result(result))
}

fn reference_counter(invoker: &Invoker, config: &HarnessConfig) -> CaptureResult<Observation> {
    let increase = config.increase;
    let mut numrun = 0;
    let result = invoker.invoke(|n| {
        numrun += 1;
        n + increase
    });
    Ok(Observation::result(result).with_side_effect(SideEffect::new("numrun", 1, numrun)))
}

/// Result of a stream scenario, with the extracted increase and the
/// stream's exhaustion recorded as side effects.
fn stream_observation(
    result: i32,
    config: &HarnessConfig,
    extracted: i32,
    input: &TextStream,
) -> Observation {
    Observation::result(result)
        .with_side_effect(SideEffect::new("increase", config.increase, extracted))
        .with_side_effect(SideEffect::new(
            "exhausted",
            1,
            i32::from(input.is_exhausted()),
        ))
}

fn stream_through_invoker(invoker: &Invoker, config: &HarnessConfig) -> CaptureResult<Observation> {
    let mut input = TextStream::new(config.stream_text());
    let mut extracted = 0;
    let result = invoker.invoke(|n| {
        let increase: i32 = input.extract_or_default();
        extracted = increase;
        n + increase
    });
    Ok(stream_observation(result, config, extracted, &input))
}

fn stream_named_direct(invoker: &Invoker, config: &HarnessConfig) -> CaptureResult<Observation> {
    let mut input = TextStream::new(config.stream_text());
    let mut extracted = 0;
    let mut code = |n: i32| {
        let increase: i32 = input.extract_or_default();
        extracted = increase;
        n + increase
    };
    let result = code(invoker.probe());
    Ok(stream_observation(result, config, extracted, &input))
}

fn stream_named_passed(invoker: &Invoker, config: &HarnessConfig) -> CaptureResult<Observation> {
    let mut input = TextStream::new(config.stream_text());
    let mut extracted = 0;
    let mut code = |n: i32| {
        let increase: i32 = input.extract_or_default();
        extracted = increase;
        n + increase
    };
    let result = invoker.invoke_dyn(&mut code);
    Ok(stream_observation(result, config, extracted, &input))
}

fn stream_inline(invoker: &Invoker, config: &HarnessConfig) -> CaptureResult<Observation> {
    let mut input = TextStream::new(config.stream_text());
    let mut extracted = 0;
    let result = (|n: i32| {
        let increase: i32 = input.extract_or_default();
        extracted = increase;
        n + increase
    })(invoker.probe());
    Ok(stream_observation(result, config, extracted, &input))
}

fn shared_counter_owned(invoker: &Invoker, config: &HarnessConfig) -> CaptureResult<Observation> {
    let counter = Arc::new(Mutex::new(0));
    let handle = Arc::clone(&counter);
    let increase = config.increase;
    let result = invoker.invoke(move |n| {
        *handle.lock() += 1;
        n + increase
    });
    let calls = *counter.lock();
    Ok(Observation::result(result).with_side_effect(SideEffect::new("calls", 1, calls)))
}

fn value_capture_independent(
    invoker: &Invoker,
    config: &HarnessConfig,
) -> CaptureResult<Observation> {
    let seen = Cell::new(0);
    let seen_ref = &seen;
    let mut size = config.increase;
    // `size` is copied in; only the reference to `seen` is shared.
    let code = move |n: i32| {
        seen_ref.set(size);
        n + size
    };
    size = 0;
    let result = invoker.invoke(code);
    Ok(Observation::result(result)
        .with_side_effect(SideEffect::new("captured_size", config.increase, seen.get()))
        .with_side_effect(SideEffect::new("original_size", 0, size)))
}

fn reference_observes_mutation(
    invoker: &Invoker,
    config: &HarnessConfig,
) -> CaptureResult<Observation> {
    let size = Cell::new(0);
    let code = |n: i32| n + size.get();
    size.set(config.increase);
    let result = invoker.invoke(code);
    Ok(Observation::result(result))
}

/// Scenarios in the order `ScenarioSuite::standard` registers them.
pub const STANDARD_SCENARIOS: &[Scenario] = &[
    Scenario::new(
        "empty_capture",
        CaptureMode::None,
        InvocationStyle::Invoker,
        "no capture, literal increment",
        empty_capture,
    ),
    Scenario::new(
        "empty_capture_const",
        CaptureMode::None,
        InvocationStyle::Invoker,
        "no capture, increment from a const item",
        empty_capture_const,
    ),
    Scenario::new(
        "const_capture",
        CaptureMode::ByConstValue,
        InvocationStyle::Invoker,
        "immutable binding moved into the closure",
        const_capture,
    ),
    Scenario::new(
        "value_capture",
        CaptureMode::ByValue,
        InvocationStyle::Invoker,
        "local integer copied into the closure",
        value_capture,
    ),
    Scenario::new(
        "reference_counter",
        CaptureMode::ByReference,
        InvocationStyle::Invoker,
        "counter borrowed mutably and bumped once",
        reference_counter,
    ),
    Scenario::new(
        "stream_through_invoker",
        CaptureMode::ByReference,
        InvocationStyle::Invoker,
        "text stream borrowed and consumed inside the closure",
        stream_through_invoker,
    ),
    Scenario::new(
        "stream_named_direct",
        CaptureMode::ByReference,
        InvocationStyle::NamedDirect,
        "named stream closure called directly",
        stream_named_direct,
    ),
    Scenario::new(
        "stream_named_passed",
        CaptureMode::ByReference,
        InvocationStyle::NamedThenInvoker,
        "named stream closure passed as a dyn callable",
        stream_named_passed,
    ),
    Scenario::new(
        "stream_inline",
        CaptureMode::ByReference,
        InvocationStyle::Inline,
        "stream closure defined and called in one expression",
        stream_inline,
    ),
    Scenario::new(
        "shared_counter_owned",
        CaptureMode::SharedOwned,
        InvocationStyle::Invoker,
        "Arc<Mutex> counter moved into the closure",
        shared_counter_owned,
    ),
    Scenario::new(
        "value_capture_independent",
        CaptureMode::ByValue,
        InvocationStyle::Invoker,
        "copy unaffected by later mutation of the original",
        value_capture_independent,
    ),
    Scenario::new(
        "reference_observes_mutation",
        CaptureMode::ByReference,
        InvocationStyle::Invoker,
        "borrow sees a mutation made before invocation",
        reference_observes_mutation,
    ),
];

/// Ordered registry of scenarios sharing one config and invoker.
#[derive(Debug, Clone)]
pub struct ScenarioSuite {
    config: HarnessConfig,
    invoker: Invoker,
    scenarios: IndexMap<&'static str, Scenario>,
}

impl ScenarioSuite {
    /// Empty suite. Fails if `config` does not validate.
    pub fn new(config: HarnessConfig) -> CaptureResult<Self> {
        config.validate()?;
        Ok(Self {
            invoker: Invoker::from_config(&config),
            config,
            scenarios: IndexMap::new(),
        })
    }

    /// Suite holding every scenario in `STANDARD_SCENARIOS`.
    pub fn standard(config: HarnessConfig) -> CaptureResult<Self> {
        let mut suite = Self::new(config)?;
        for scenario in STANDARD_SCENARIOS {
            suite.register(*scenario);
        }
        Ok(suite)
    }

    /// Add a scenario, replacing (in place) any with the same name.
    pub fn register(&mut self, scenario: Scenario) -> Option<Scenario> {
        self.scenarios.insert(scenario.name, scenario)
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scenarios.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn run_one(&self, name: &str) -> CaptureResult<ScenarioReport> {
        let scenario = self
            .get(name)
            .ok_or_else(|| CaptureError::UnknownScenario(name.to_string()))?;
        Ok(scenario.run(&self.invoker, &self.config))
    }

    /// Run the named scenarios in the given order.
    ///
    /// Every name is resolved before anything runs.
    pub fn run_selected<S: AsRef<str>>(&self, names: &[S]) -> CaptureResult<SuiteReport> {
        let selected = names
            .iter()
            .map(|name| {
                self.get(name.as_ref())
                    .ok_or_else(|| CaptureError::UnknownScenario(name.as_ref().to_string()))
            })
            .collect::<CaptureResult<Vec<_>>>()?;
        let mut suite = SuiteReport::default();
        for scenario in selected {
            suite.push(scenario.run(&self.invoker, &self.config));
        }
        Ok(suite)
    }

    pub fn run_all(&self) -> SuiteReport {
        let mut suite = SuiteReport::default();
        for scenario in self.scenarios.values() {
            suite.push(scenario.run(&self.invoker, &self.config));
        }
        log::info!(
            "suite finished: {} passed, {} failed",
            suite.passed,
            suite.failed
        );
        suite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> ScenarioSuite {
        ScenarioSuite::standard(HarnessConfig::default()).unwrap()
    }

    fn check(name: &str) -> Observation {
        let suite = standard();
        suite
            .get(name)
            .unwrap()
            .check(suite.invoker(), suite.config())
            .unwrap()
    }

    fn off_by_one(invoker: &Invoker, _config: &HarnessConfig) -> CaptureResult<Observation> {
        Ok(Observation::result(invoker.invoke(|n| n + 1)))
    }

    fn panics(_invoker: &Invoker, _config: &HarnessConfig) -> CaptureResult<Observation> {
        panic!("scenario blew up")
    }

    fn double_call(invoker: &Invoker, _config: &HarnessConfig) -> CaptureResult<Observation> {
        let mut calls = 0;
        let mut code = |n: i32| {
            calls += 1;
            n + INCREASE
        };
        let result = invoker.invoke(&mut code);
        invoker.invoke(&mut code);
        Ok(Observation::result(result).with_side_effect(SideEffect::new("calls", 1, calls)))
    }

    // ── Standard scenarios ────────────────────────────────────────

    #[test]
    fn test_empty_capture() {
        assert_eq!(check("empty_capture").result, 7);
    }

    #[test]
    fn test_empty_capture_const() {
        assert_eq!(check("empty_capture_const").result, 7);
    }

    #[test]
    fn test_const_capture() {
        assert_eq!(check("const_capture").result, 7);
    }

    #[test]
    fn test_value_capture() {
        assert_eq!(check("value_capture").result, 7);
    }

    #[test]
    fn test_reference_counter_runs_once() {
        let obs = check("reference_counter");
        assert_eq!(obs.result, 7);
        assert_eq!(obs.side_effect("numrun").unwrap().actual, 1);
    }

    #[test]
    fn test_stream_through_invoker() {
        let obs = check("stream_through_invoker");
        assert_eq!(obs.result, 7);
        assert_eq!(obs.side_effect("increase").unwrap().actual, 2);
        assert_eq!(obs.side_effect("exhausted").unwrap().actual, 1);
    }

    #[test]
    fn test_stream_named_direct() {
        let obs = check("stream_named_direct");
        assert_eq!(obs.result, 7);
        assert_eq!(obs.side_effect("exhausted").unwrap().actual, 1);
    }

    #[test]
    fn test_stream_named_passed() {
        assert_eq!(check("stream_named_passed").result, 7);
    }

    #[test]
    fn test_stream_inline() {
        assert_eq!(check("stream_inline").result, 7);
    }

    #[test]
    fn test_shared_counter_owned() {
        let obs = check("shared_counter_owned");
        assert_eq!(obs.result, 7);
        assert_eq!(obs.side_effect("calls").unwrap().actual, 1);
    }

    #[test]
    fn test_value_capture_independent() {
        let obs = check("value_capture_independent");
        assert_eq!(obs.result, 7);
        assert_eq!(obs.side_effect("captured_size").unwrap().actual, 2);
        assert_eq!(obs.side_effect("original_size").unwrap().actual, 0);
    }

    #[test]
    fn test_value_capture_independent_custom_increase() {
        let config = HarnessConfig {
            increase: 9,
            ..Default::default()
        };
        let report = ScenarioSuite::standard(config)
            .unwrap()
            .run_one("value_capture_independent")
            .unwrap();
        assert!(report.passed);
        assert_eq!(report.actual, Some(14));
        assert_eq!(report.side_effects[0].actual, 9);
    }

    #[test]
    fn test_stream_leftover_token_fails_exhaustion() {
        let mut input = TextStream::new("2 2");
        let extracted: i32 = input.extract_or_default();
        let obs = stream_observation(7, &HarnessConfig::default(), extracted, &input);
        let violation = obs.first_violation().unwrap();
        assert_eq!(violation.label, "exhausted");
        assert_eq!(violation.actual, 0);
    }

    #[test]
    fn test_reference_observes_mutation() {
        assert_eq!(check("reference_observes_mutation").result, 7);
    }

    // ── Capture properties outside the suite ──────────────────────

    #[test]
    fn test_stream_exhausted_after_closure() {
        let mut input = TextStream::new("2");
        assert_eq!(input.peek(), Some("2"));
        let result = Invoker::default().invoke(|n| n + input.extract_or_default::<i32>());
        assert_eq!(result, 7);
        assert!(input.is_exhausted());
        assert!(input.extract::<i32>().is_err());
    }

    #[test]
    fn test_reference_counter_visible_after_call() {
        let mut numrun = 0;
        let result = Invoker::default().invoke(|n| {
            numrun += 1;
            n + 2
        });
        assert_eq!(result, 7);
        assert_eq!(numrun, 1);
    }

    // ── Suite behaviour ───────────────────────────────────────────

    #[test]
    fn test_standard_suite_all_pass() {
        let report = standard().run_all();
        assert_eq!(report.len(), STANDARD_SCENARIOS.len());
        assert!(report.all_passed(), "failures: {:?}", report.failures().collect::<Vec<_>>());
        assert!(report.reports.iter().all(|r| r.actual == Some(7)));
    }

    #[test]
    fn test_registration_order_kept() {
        let suite = standard();
        let names: Vec<&str> = suite.names().collect();
        assert_eq!(names.first(), Some(&"empty_capture"));
        assert_eq!(names.last(), Some(&"reference_observes_mutation"));
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_failure_does_not_stop_others() {
        let mut suite = standard();
        suite.register(Scenario::new(
            "off_by_one",
            CaptureMode::None,
            InvocationStyle::Invoker,
            "returns probe + 1",
            off_by_one,
        ));
        suite.register(Scenario::new(
            "panics",
            CaptureMode::None,
            InvocationStyle::Inline,
            "panics in its body",
            panics,
        ));
        let report = suite.run_all();
        assert_eq!(report.failed, 2);
        assert_eq!(report.passed, STANDARD_SCENARIOS.len());

        let failed: Vec<&ScenarioReport> = report.failures().collect();
        assert_eq!(failed[0].name, "off_by_one");
        assert_eq!(failed[0].actual, Some(6));
        assert_eq!(failed[1].name, "panics");
        assert_eq!(failed[1].actual, None);
        assert!(failed[1].error.as_deref().unwrap().contains("scenario blew up"));
    }

    #[test]
    fn test_check_reports_assertion() {
        let suite = standard();
        let scenario = Scenario::new(
            "off_by_one",
            CaptureMode::None,
            InvocationStyle::Invoker,
            "",
            off_by_one,
        );
        let err = scenario.check(suite.invoker(), suite.config()).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::Assertion { expected: 7, actual: 6, .. }
        ));
    }

    #[test]
    fn test_side_effect_mismatch_fails() {
        let suite = standard();
        let scenario = Scenario::new(
            "double_call",
            CaptureMode::ByReference,
            InvocationStyle::Invoker,
            "",
            double_call,
        );
        let report = scenario.run(suite.invoker(), suite.config());
        assert!(!report.passed);
        assert_eq!(report.actual, Some(7));
        assert_eq!(report.error.as_deref(), Some("calls: expected 1, got 2"));
    }

    #[test]
    fn test_run_one_unknown() {
        let err = standard().run_one("nope").unwrap_err();
        assert!(matches!(err, CaptureError::UnknownScenario(ref n) if n == "nope"));
    }

    #[test]
    fn test_run_selected_order() {
        let report = standard()
            .run_selected(&["stream_inline", "empty_capture"])
            .unwrap();
        let names: Vec<&str> = report.reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["stream_inline", "empty_capture"]);
        assert!(report.all_passed());
    }

    #[test]
    fn test_run_selected_unknown_runs_nothing() {
        assert!(standard().run_selected(&["empty_capture", "nope"]).is_err());
    }

    #[test]
    fn test_custom_config() {
        let config = HarnessConfig {
            probe: 10,
            increase: 4,
            stream_text: None,
        };
        let report = ScenarioSuite::standard(config).unwrap().run_all();
        assert!(report.all_passed());
        for r in &report.reports {
            match r.mode {
                CaptureMode::None => assert_eq!(r.expected, 12),
                _ => assert_eq!(r.expected, 14),
            }
        }
    }

    #[test]
    fn test_uncaptured_expectation_ignores_increase() {
        let config = HarnessConfig {
            increase: 4,
            ..Default::default()
        };
        let suite = ScenarioSuite::standard(config).unwrap();
        let report = suite.run_one("empty_capture").unwrap();
        assert!(report.passed);
        assert_eq!(report.expected, 7);
        assert_eq!(suite.config().expected(), 9);
    }

    #[test]
    fn test_uncaptured_overflow_config_rejected() {
        let config = HarnessConfig {
            probe: i32::MAX - 1,
            increase: 1,
            stream_text: None,
        };
        let err = ScenarioSuite::standard(config).unwrap_err();
        assert!(matches!(err, CaptureError::Config(_)));
    }

    #[test]
    fn test_near_limit_config_all_pass() {
        let config = HarnessConfig {
            probe: i32::MAX - 2,
            increase: 1,
            stream_text: None,
        };
        let report = ScenarioSuite::standard(config).unwrap().run_all();
        assert!(report.all_passed(), "failures: {:?}", report.failures().collect::<Vec<_>>());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = HarnessConfig {
            probe: i32::MAX,
            ..Default::default()
        };
        assert!(ScenarioSuite::standard(config).is_err());
    }
}
