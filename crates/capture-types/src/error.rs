// ─────────────────────────────────────────────────────────────────────
// Capture Kit: Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all capture kit failures.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No callable was handed to the invoker.
    #[error("invalid callable: no callable supplied")]
    InvalidCallable,

    /// The callable panicked while being invoked.
    #[error("callable panicked: {0}")]
    CallablePanicked(String),

    /// Extraction attempted on a stream with no remaining token.
    #[error("stream exhausted: no token left to extract")]
    StreamExhausted,

    /// Extraction attempted on a stream left failed by an earlier read.
    #[error("stream failed: an earlier extraction failed")]
    StreamFailed,

    /// The next token could not be converted to the requested type.
    #[error("parse error: cannot read {token:?} as {target}")]
    Parse { token: String, target: &'static str },

    /// A scenario observed a value different from its expectation.
    #[error("assertion failed in {scenario}: expected {expected}, got {actual}")]
    Assertion {
        scenario: String,
        expected: i32,
        actual: i32,
    },

    /// No scenario registered under the given name.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CaptureResult<T> = Result<T, CaptureError>;
