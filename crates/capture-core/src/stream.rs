// ─────────────────────────────────────────────────────────────────────
// Capture Kit: Text Stream
// ─────────────────────────────────────────────────────────────────────
//! Whitespace-tokenized text buffer with formatted extraction.
//!
//! This is the stateful object the stream scenarios capture by
//! reference: each `extract` consumes one token, so a stream buffering
//! `"2"` yields exactly one value.
//!
//! A failed extraction puts the stream in a failed state that refuses
//! every later read until `clear()`. Tokens are parsed whole: `"2abc"`
//! is a parse failure, not `2` followed by `"abc"`.

use std::any::type_name;
use std::str::FromStr;

use capture_types::{CaptureError, CaptureResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStream {
    buffer: String,
    pos: usize,
    failed: bool,
}

impl TextStream {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            buffer: text.into(),
            pos: 0,
            failed: false,
        }
    }

    /// Byte range of the next token, if any.
    fn next_token(&self) -> Option<(usize, usize)> {
        let rest = &self.buffer[self.pos..];
        let start = self.pos + (rest.len() - rest.trim_start().len());
        if start == self.buffer.len() {
            return None;
        }
        let len = self.buffer[start..]
            .find(char::is_whitespace)
            .unwrap_or(self.buffer.len() - start);
        Some((start, start + len))
    }

    /// Next token without consuming it.
    pub fn peek(&self) -> Option<&str> {
        self.next_token().map(|(s, e)| &self.buffer[s..e])
    }

    /// Consume the next token and parse it as `T`.
    ///
    /// On a parse failure the token stays in the buffer. Either failure
    /// leaves the stream in its failed state, and a failed stream
    /// returns `StreamFailed` without reading.
    pub fn extract<T: FromStr>(&mut self) -> CaptureResult<T> {
        if self.failed {
            log::debug!("extract: stream in failed state");
            return Err(CaptureError::StreamFailed);
        }
        let Some((start, end)) = self.next_token() else {
            self.failed = true;
            self.pos = self.buffer.len();
            log::debug!("extract: stream exhausted");
            return Err(CaptureError::StreamExhausted);
        };
        let token = &self.buffer[start..end];
        match token.parse::<T>() {
            Ok(value) => {
                self.pos = end;
                Ok(value)
            }
            Err(_) => {
                self.failed = true;
                log::debug!("extract: {token:?} is not a {}", type_name::<T>());
                Err(CaptureError::Parse {
                    token: token.to_string(),
                    target: type_name::<T>(),
                })
            }
        }
    }

    /// Like `extract`, but yields `T::default()` on failure.
    pub fn extract_or_default<T: FromStr + Default>(&mut self) -> T {
        self.extract().unwrap_or_default()
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_token().is_none()
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Leave the failed state so reads can resume.
    pub fn clear(&mut self) {
        self.failed = false;
    }

    /// Unconsumed text, leading whitespace included.
    pub fn remaining(&self) -> &str {
        &self.buffer[self.pos..]
    }
}

impl From<&str> for TextStream {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
