// ─────────────────────────────────────────────────────────────────────
// Capture Kit: Harness Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};

/// Increment used by closures that capture nothing. They cannot see
/// the runtime config, so they always add this.
pub const INCREASE: i32 = 2;

/// Runtime configuration for the scenario harness.
///
/// Every scenario feeds `probe` to its callable. Capturing callables
/// add `increase` and expect `probe + increase`; callables that
/// capture nothing add the `INCREASE` const and expect
/// `probe + INCREASE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Argument handed to every callable under test.
    /// Default: 5.
    pub probe: i32,

    /// Amount each capturing scenario's callable adds to the probe.
    /// Default: 2.
    pub increase: i32,

    /// Text buffered by the stream scenarios. Must be a single token
    /// equal to `increase`, so one extraction exhausts the stream.
    /// Default: `None`, meaning `increase` rendered as text ("2").
    pub stream_text: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            probe: 5,
            increase: 2,
            stream_text: None,
        }
    }
}

impl HarnessConfig {
    /// Value a capturing scenario must produce.
    ///
    /// Wraps on overflow; `validate()` rejects such configs.
    pub fn expected(&self) -> i32 {
        self.probe.wrapping_add(self.increase)
    }

    /// Value a scenario whose callable captures nothing must produce.
    ///
    /// Wraps on overflow; `validate()` rejects such configs.
    pub fn expected_uncaptured(&self) -> i32 {
        self.probe.wrapping_add(INCREASE)
    }

    /// Text a stream scenario buffers before its callable consumes it.
    pub fn stream_text(&self) -> String {
        match &self.stream_text {
            Some(text) => text.clone(),
            None => self.increase.to_string(),
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> CaptureResult<()> {
        if self.probe.checked_add(self.increase).is_none() {
            return Err(CaptureError::Config(format!(
                "probe + increase overflows i32: {} + {}",
                self.probe, self.increase
            )));
        }
        if self.probe.checked_add(INCREASE).is_none() {
            return Err(CaptureError::Config(format!(
                "probe + {INCREASE} overflows i32: probe = {}",
                self.probe
            )));
        }
        if let Some(text) = &self.stream_text {
            let first = text.split_whitespace().next().ok_or_else(|| {
                CaptureError::Config("stream_text must hold at least one token".to_string())
            })?;
            match first.parse::<i32>() {
                Ok(v) if v == self.increase => {}
                Ok(v) => {
                    return Err(CaptureError::Config(format!(
                        "stream_text first token must equal increase ({}), got {v}",
                        self.increase
                    )));
                }
                Err(_) => {
                    return Err(CaptureError::Config(format!(
                        "stream_text first token is not an integer: {first:?}"
                    )));
                }
            }
            if text.split_whitespace().nth(1).is_some() {
                return Err(CaptureError::Config(format!(
                    "stream_text must hold exactly one token, got {text:?}"
                )));
            }
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> CaptureResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CaptureError::Config(format!("JSON parse error: {e}")))
    }
}
