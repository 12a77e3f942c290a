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

use std::io;
use std::io::Write;

use crate::Error;
use crate::Level;
use crate::LogRecord;
use crate::handler::Handler;

/// A handler that prints records to the console.
///
/// Records at [`Level::Error`] or above go to stderr when `route_errors_to_stderr` is set, and
/// everything else goes to stdout.
#[derive(Debug)]
pub struct ConsoleHandler {
    route_errors_to_stderr: bool,
    #[cfg(feature = "colored")]
    color: bool,
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        ConsoleHandler::new(true)
    }
}

impl ConsoleHandler {
    /// Creates a new `ConsoleHandler`.
    pub fn new(route_errors_to_stderr: bool) -> Self {
        Self {
            route_errors_to_stderr,
            #[cfg(feature = "colored")]
            color: false,
        }
    }

    /// Colors each line by its level.
    #[cfg(feature = "colored")]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Whether a record at `level` is written to stderr.
    pub fn writes_to_stderr(&self, level: Level) -> bool {
        self.route_errors_to_stderr && level.meets_threshold(Level::Error)
    }

    #[cfg(feature = "colored")]
    fn paint(&self, level: Level, formatted: &str) -> String {
        use colored::Colorize;

        if !self.color {
            return formatted.to_string();
        }
        let line = match level {
            Level::Debug => formatted.blue(),
            Level::Info => formatted.green(),
            Level::Warning => formatted.yellow(),
            Level::Error => formatted.red(),
            Level::Critical => formatted.red().bold(),
        };
        line.to_string()
    }

    #[cfg(not(feature = "colored"))]
    fn paint(&self, _: Level, formatted: &str) -> String {
        formatted.to_string()
    }
}

impl Handler for ConsoleHandler {
    fn emit(&self, record: &LogRecord, formatted: &str) -> Result<(), Error> {
        let mut line = self.paint(record.level(), formatted);
        line.push('\n');

        let written = if self.writes_to_stderr(record.level()) {
            io::stderr().write_all(line.as_bytes())
        } else {
            io::stdout().write_all(line.as_bytes())
        };
        if let Err(err) = written {
            // not much left to do if stderr is gone as well
            let _ = writeln!(io::stderr(), "Console logging error: {err}");
        }
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        // the standard streams stay open; only flush them
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        Ok(())
    }
}
