// ─────────────────────────────────────────────────────────────────────
// Capture Kit: Core
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Invoker, text stream, numeric helpers, and the closure-capture
//! scenario suite.
//!
//! # Invariants
//!
//! 1. **One call per invocation**: every invoker entry point takes an
//!    `FnOnce` (or drives a `dyn FnMut` exactly once), so a callable
//!    cannot run twice through a single call.
//!
//! 2. **Borrows are scope-bound**: closures that capture by reference
//!    are built and invoked inside the block owning the captured state.
//!    Where state must outlive that block, the closure takes ownership
//!    of a shared handle (`Arc<Mutex<_>>`) instead.
//!
//! 3. **Scenarios are isolated**: a failing or panicking scenario is
//!    recorded in its report; the suite carries on with the next one.

pub mod invoker;
pub mod numeric;
pub mod scenario;
pub mod stream;

pub use invoker::{run, Invoker, PROBE};
pub use numeric::{average, average_as, average_explicit};
pub use scenario::{Scenario, ScenarioSuite, STANDARD_SCENARIOS};
pub use stream::TextStream;
