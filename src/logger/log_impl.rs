// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::fmt::Write as _;
use std::panic::Location;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::Caller;
use crate::Handler;
use crate::Level;
use crate::LogConfig;
use crate::LogRecord;
use crate::clock::Clock;
use crate::trap::Trap;

/// The start of the marker appended to truncated messages.
///
/// The full marker is `... (truncated from N bytes)`, where `N` is the original length.
pub const TRUNCATION_MARKER_PREFIX: &str = "... (truncated from ";

/// A logger that filters, formats and fans records out to its handlers.
///
/// A logger starts open and becomes closed on [`close`](Logger::close) or when dropped. Logging
/// through a closed logger is a no-op.
///
/// Logging never fails from the caller's point of view: handler errors go to the logger's
/// [`Trap`]. One logger may be shared between threads; calls are serialized internally.
///
/// # Examples
///
/// ```
/// use logges::Level;
/// use logges::LogConfig;
/// use logges::handler::Testing;
///
/// let dir = std::env::temp_dir().join("logges-doc-logger");
/// let config = LogConfig::builder("doc").directory(&dir).build().unwrap();
/// let testing = Testing::default();
/// let logger = logges::builder(config).handler(testing.clone()).build();
///
/// logger.info("started");
/// logger.debug("below the threshold");
/// logger.log("boom", Level::Error, &[("job", "sync")]);
/// logger.close();
///
/// assert_eq!(testing.records().len(), 2);
/// assert_eq!(testing.records()[1].extra_value("job"), Some("sync"));
/// ```
#[derive(Debug)]
pub struct Logger {
    config: LogConfig,
    trap: Box<dyn Trap>,
    clock: Clock,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    handlers: Vec<Box<dyn Handler>>,
    closed: bool,
}

impl Logger {
    pub(super) fn new(
        config: LogConfig,
        handlers: Vec<Box<dyn Handler>>,
        trap: Box<dyn Trap>,
        clock: Clock,
    ) -> Self {
        Self {
            config,
            trap,
            clock,
            state: Mutex::new(State {
                handlers,
                closed: false,
            }),
        }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Whether records at `level` pass the configured threshold.
    pub fn enabled(&self, level: Level) -> bool {
        level.meets_threshold(self.config.level())
    }

    pub fn is_closed(&self) -> bool {
        self.lock_state().closed
    }

    /// Log a message at `level` with extra key-values.
    ///
    /// The call site's file and line are captured; the function is recorded as `unknown`. Use
    /// [`log_at`](Logger::log_at) with [`caller!`](crate::caller) or the logging macros to
    /// record the function as well.
    #[track_caller]
    pub fn log(&self, message: impl fmt::Display, level: Level, extra: &[(&str, &str)]) {
        let caller = Caller::from_location(Location::caller());
        self.log_impl(caller, &message, level, extra);
    }

    /// Log a message at `level` on behalf of `caller`.
    pub fn log_at(
        &self,
        caller: Caller,
        message: impl fmt::Display,
        level: Level,
        extra: &[(&str, &str)],
    ) {
        self.log_impl(caller, &message, level, extra);
    }

    /// Log a message at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(message, Level::Debug, &[]);
    }

    /// Log a message at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(message, Level::Info, &[]);
    }

    /// Log a message at [`Level::Warning`].
    #[track_caller]
    pub fn warning(&self, message: impl fmt::Display) {
        self.log(message, Level::Warning, &[]);
    }

    /// Log a message at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(message, Level::Error, &[]);
    }

    /// Log a message at [`Level::Critical`].
    #[track_caller]
    pub fn critical(&self, message: impl fmt::Display) {
        self.log(message, Level::Critical, &[]);
    }

    /// Log a message at [`Level::Debug`] with extra key-values.
    #[track_caller]
    pub fn debug_with(&self, message: impl fmt::Display, extra: &[(&str, &str)]) {
        self.log(message, Level::Debug, extra);
    }

    /// Log a message at [`Level::Info`] with extra key-values.
    #[track_caller]
    pub fn info_with(&self, message: impl fmt::Display, extra: &[(&str, &str)]) {
        self.log(message, Level::Info, extra);
    }

    /// Log a message at [`Level::Warning`] with extra key-values.
    #[track_caller]
    pub fn warning_with(&self, message: impl fmt::Display, extra: &[(&str, &str)]) {
        self.log(message, Level::Warning, extra);
    }

    /// Log a message at [`Level::Error`] with extra key-values.
    #[track_caller]
    pub fn error_with(&self, message: impl fmt::Display, extra: &[(&str, &str)]) {
        self.log(message, Level::Error, extra);
    }

    /// Log a message at [`Level::Critical`] with extra key-values.
    #[track_caller]
    pub fn critical_with(&self, message: impl fmt::Display, extra: &[(&str, &str)]) {
        self.log(message, Level::Critical, extra);
    }

    /// Close every handler.
    ///
    /// Each handler is closed exactly once; a failure is reported to the trap and does not stop
    /// the others from closing. Calling `close` again is a no-op.
    pub fn close(&self) {
        let mut state = self.lock_state();
        if state.closed {
            return;
        }
        state.closed = true;

        for handler in &state.handlers {
            if let Err(err) = handler.close() {
                self.trap.trap(&err.with_context("during", "close"));
            }
        }
    }

    pub(crate) fn log_impl<K, V>(
        &self,
        caller: Caller,
        message: &dyn fmt::Display,
        level: Level,
        extra: &[(K, V)],
    ) where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        // the level check runs first so that discarded records are never stringified
        if !self.enabled(level) || self.config.should_ignore(caller.filename()) {
            return;
        }

        let state = self.lock_state();
        if state.closed || state.handlers.is_empty() {
            return;
        }

        let mut text = String::new();
        if write!(text, "{message}").is_err() {
            text = "<message formatting failed>".to_string();
        }
        let message = truncate_message(text, self.config.max_message_size());

        let mut builder = LogRecord::builder()
            .timestamp(self.clock.time_of_day())
            .level(level)
            .message(message)
            .caller(caller);
        for (key, value) in extra {
            builder = builder.extra(key.as_ref(), value.as_ref());
        }
        let record = builder.build();
        let formatted = self.config.template().format(&record);

        for handler in &state.handlers {
            if let Err(err) = handler.emit(&record, &formatted) {
                self.trap.trap(&err);
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Cut `message` to at most `max` bytes including the truncation marker.
///
/// Messages within `max` bytes are returned unchanged. When `max` is smaller than the marker,
/// only the marker is kept.
pub(crate) fn truncate_message(mut message: String, max: usize) -> String {
    if message.len() <= max {
        return message;
    }

    let marker = format!("{TRUNCATION_MARKER_PREFIX}{} bytes)", message.len());
    let mut end = max.saturating_sub(marker.len());
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    message.truncate(end);
    message.push_str(&marker);
    message
}
