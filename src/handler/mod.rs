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

//! Output sinks for formatted log records.

use std::fmt;

use crate::Error;
use crate::LogRecord;

mod console;
mod file;
mod testing;

pub use self::console::ConsoleHandler;
pub use self::file::FileHandler;
pub use self::testing::Testing;

/// A handler that receives formatted log records.
///
/// A [`Logger`](crate::Logger) owns its handlers, emits every accepted record to each of them in
/// registration order, and closes each exactly once.
pub trait Handler: fmt::Debug + Send + Sync + 'static {
    /// Write a record to the handler's destination.
    ///
    /// `formatted` is the record rendered with the logger's template, without a trailing newline.
    /// Errors are reported to the logger's trap and never reach the logging call site.
    fn emit(&self, record: &LogRecord, formatted: &str) -> Result<(), Error>;

    /// Release any held resource.
    ///
    /// Must be idempotent. Default to a no-op.
    fn close(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Handler> From<T> for Box<dyn Handler> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
