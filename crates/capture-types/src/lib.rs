// ─────────────────────────────────────────────────────────────────────
// Capture Kit: Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Configuration, error hierarchy, and report types shared by the
//! invoker, the scenario suite, and the demo binary.

pub mod config;
pub mod error;
pub mod report;

pub use config::{HarnessConfig, INCREASE};
pub use error::{CaptureError, CaptureResult};
pub use report::{
    CaptureMode, InvocationStyle, Observation, ScenarioReport, SideEffect, SuiteReport,
};
