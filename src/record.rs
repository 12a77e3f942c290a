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

//! Log record and caller metadata.

use std::panic::Location;
use std::path::Path;

use crate::Level;

/// Where a log call came from.
///
/// Use the [`caller!`](crate::caller) macro to capture the current call site.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Caller {
    filename: String,
    function: String,
    line: u32,
}

impl Caller {
    /// Create a caller from a source path, a function name and a line.
    ///
    /// Only the final component of `file` is kept.
    pub fn new(file: &str, function: &str, line: u32) -> Caller {
        let filename = Path::new(file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_string());
        Caller {
            filename,
            function: function.to_string(),
            line,
        }
    }

    /// The caller used when the call site cannot be resolved.
    pub fn unknown() -> Caller {
        Caller {
            filename: "unknown".to_string(),
            function: "unknown".to_string(),
            line: 0,
        }
    }

    /// Create a caller from a [`Location`] captured with `#[track_caller]`.
    ///
    /// A location carries no function name, so the function is `unknown`.
    pub fn from_location(location: &Location<'_>) -> Caller {
        Caller::new(location.file(), "unknown", location.line())
    }

    /// The file name, without directories.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The enclosing function.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// The line number.
    pub fn line(&self) -> u32 {
        self.line
    }
}

/// A single log entry.
///
/// Records are created once per log call and never mutated. Only their formatted text is
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    timestamp: String,
    level: Level,
    message: String,
    caller: Caller,
    extra: Vec<(String, String)>,
}

impl LogRecord {
    /// Returns a new builder.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// The `HH:MM:SS` time the record was observed.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The severity level of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The message body.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The call site of the record.
    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    /// The source file name of the call site.
    pub fn filename(&self) -> &str {
        self.caller.filename()
    }

    /// The function name of the call site.
    pub fn function(&self) -> &str {
        self.caller.function()
    }

    /// The line number of the call site.
    pub fn line(&self) -> u32 {
        self.caller.line()
    }

    /// The extra key-values in insertion order.
    pub fn extra(&self) -> &[(String, String)] {
        &self.extra
    }

    /// Look up an extra value by key.
    pub fn extra_value(&self, key: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for [`LogRecord`].
#[derive(Debug)]
pub struct RecordBuilder {
    record: LogRecord,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        RecordBuilder {
            record: LogRecord {
                timestamp: "00:00:00".to_string(),
                level: Level::Info,
                message: String::new(),
                caller: Caller::unknown(),
                extra: vec![],
            },
        }
    }
}

impl RecordBuilder {
    /// Set [`timestamp`](LogRecord::timestamp).
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.record.timestamp = timestamp.into();
        self
    }

    /// Set [`level`](LogRecord::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`message`](LogRecord::message).
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.record.message = message.into();
        self
    }

    /// Set [`caller`](LogRecord::caller).
    pub fn caller(mut self, caller: Caller) -> Self {
        self.record.caller = caller;
        self
    }

    /// Append one extra key-value. A repeated key replaces the earlier value in place.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.record.extra.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.record.extra.push((key, value)),
        }
        self
    }

    /// Invoke the builder and return a `LogRecord`.
    pub fn build(self) -> LogRecord {
        self.record
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __f() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__f);
        let name = name.strip_suffix("::__f").unwrap_or(name);
        name.rsplit("::")
            .find(|segment| *segment != "{{closure}}")
            .unwrap_or(name)
    }};
}

/// Capture the current call site as a [`Caller`].
///
/// # Examples
///
/// ```
/// fn handle_request() -> logges::Caller {
///     logges::caller!()
/// }
///
/// let caller = handle_request();
/// assert_eq!(caller.function(), "handle_request");
/// ```
#[macro_export]
macro_rules! caller {
    () => {
        $crate::Caller::new(::std::file!(), $crate::__function_name!(), ::std::line!())
    };
}
