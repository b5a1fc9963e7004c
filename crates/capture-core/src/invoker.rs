// ─────────────────────────────────────────────────────────────────────
// Capture Kit: Invoker
// ─────────────────────────────────────────────────────────────────────
//! Applies a unary callable to the probe value and hands back its
//! result unchanged.
//!
//! Two entry points:
//! - `run`: free function with the fixed probe `PROBE`.
//! - `Invoker`: configurable probe, plus checked and type-erased variants.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use capture_types::{CaptureError, CaptureResult, HarnessConfig};

/// Argument every callable under test receives.
pub const PROBE: i32 = 5;

/// Type-erased callable, for callers that hold a `dyn` value rather
/// than a concrete closure type.
pub type DynCallable<'a> = &'a mut dyn FnMut(i32) -> i32;

/// Invoke `code` once with `PROBE` and return its result.
#[inline]
pub fn run<F>(code: F) -> i32
where
    F: FnOnce(i32) -> i32,
{
    code(PROBE)
}

/// Invokes callables with a configured probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invoker {
    probe: i32,
}

impl Default for Invoker {
    fn default() -> Self {
        Self::new(PROBE)
    }
}

impl Invoker {
    pub fn new(probe: i32) -> Self {
        Self { probe }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.probe)
    }

    pub fn probe(&self) -> i32 {
        self.probe
    }

    /// Invoke `code` exactly once with the probe.
    ///
    /// Side effects are whatever `code` itself performs; a panic in
    /// `code` propagates.
    pub fn invoke<F>(&self, code: F) -> i32
    where
        F: FnOnce(i32) -> i32,
    {
        let result = code(self.probe);
        log::debug!("invoke: probe={} result={result}", self.probe);
        result
    }

    /// Checked invocation.
    ///
    /// `None` yields `InvalidCallable`. A panic inside `code` is caught
    /// here and reported as `CallablePanicked`.
    pub fn try_invoke<F>(&self, code: Option<F>) -> CaptureResult<i32>
    where
        F: FnOnce(i32) -> i32,
    {
        let code = code.ok_or(CaptureError::InvalidCallable)?;
        let probe = self.probe;
        match panic::catch_unwind(AssertUnwindSafe(move || code(probe))) {
            Ok(result) => {
                log::debug!("try_invoke: probe={probe} result={result}");
                Ok(result)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("Callable panicked during invocation: {message}");
                Err(CaptureError::CallablePanicked(message))
            }
        }
    }

    /// Invoke a type-erased callable once with the probe.
    pub fn invoke_dyn(&self, code: DynCallable<'_>) -> i32 {
        self.invoke(|n| code(n))
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
