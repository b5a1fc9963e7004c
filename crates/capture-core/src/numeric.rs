// ─────────────────────────────────────────────────────────────────────
// Capture Kit: Numeric Helpers
// ─────────────────────────────────────────────────────────────────────
//! Integer mean, exposed with three return-type shapes.
//!
//! All three truncate toward zero, even the one that returns `f64`:
//! the division happens on integers before any conversion.

#[inline]
fn truncated_mean(n1: i32, n2: i32) -> i32 {
    // The i64 mean of two i32 values always fits back in i32.
    ((i64::from(n1) + i64::from(n2)) / 2) as i32
}

/// Mean with a declared floating-point result. The fraction is dropped.
pub fn average(n1: i32, n2: i32) -> f64 {
    f64::from(truncated_mean(n1, n2))
}

/// Mean with an explicit integral result.
pub fn average_explicit(n1: i32, n2: i32) -> i32 {
    truncated_mean(n1, n2)
}

/// Mean in whatever type the caller asks for.
pub fn average_as<T: From<i32>>(n1: i32, n2: i32) -> T {
    T::from(truncated_mean(n1, n2))
}
