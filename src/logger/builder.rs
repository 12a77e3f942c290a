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

use std::path::PathBuf;

use crate::Error;
use crate::Handler;
use crate::Level;
use crate::LogConfig;
use crate::Logger;
use crate::clock::Clock;
use crate::handler::ConsoleHandler;
use crate::handler::FileHandler;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Create a new [`LoggerBuilder`] for `config`.
///
/// # Examples
///
/// ```
/// use logges::LogConfig;
/// use logges::handler::Testing;
///
/// let dir = std::env::temp_dir().join("logges-doc-builder");
/// let config = LogConfig::builder("doc").directory(&dir).build().unwrap();
/// let testing = Testing::default();
/// let logger = logges::builder(config).handler(testing.clone()).build();
///
/// logger.info("hello");
/// assert_eq!(testing.lines().len(), 1);
/// ```
pub fn builder(config: LogConfig) -> LoggerBuilder {
    LoggerBuilder {
        config,
        handlers: None,
        trap: Box::new(DefaultTrap::default()),
        clock: Clock::default(),
    }
}

/// Create a logger called `name` with the default handlers.
///
/// `directory` defaults to the current working directory.
///
/// # Errors
///
/// Return a [`Configuration`](crate::ErrorKind::Configuration) error if the name or the
/// directory is invalid.
pub fn get_logger(
    name: impl Into<String>,
    level: Level,
    directory: Option<PathBuf>,
) -> Result<Logger, Error> {
    let mut config = LogConfig::builder(name).level(level);
    if let Some(directory) = directory {
        config = config.directory(directory);
    }
    Ok(builder(config.build()?).build())
}

/// A builder for a [`Logger`].
///
/// Without any explicit [`handler`](LoggerBuilder::handler), the logger gets the default
/// handlers: a [`FileHandler`] at the configured log path and, if the configuration prints to
/// console, a [`ConsoleHandler`].
///
/// With daily rotation, the log file is named after the date on which the logger is built. A
/// logger that outlives that day keeps appending to the same file; build a new logger to start
/// the next day's file.
#[must_use = "call `build` to construct a logger or `apply` to set the global logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    config: LogConfig,
    // None means the default handlers
    handlers: Option<Vec<Box<dyn Handler>>>,
    trap: Box<dyn Trap>,
    clock: Clock,
}

impl LoggerBuilder {
    /// Register a handler. Handlers receive records in registration order.
    pub fn handler(mut self, handler: impl Into<Box<dyn Handler>>) -> Self {
        self.handlers
            .get_or_insert_with(Vec::new)
            .push(handler.into());
        self
    }

    /// Set the trap that receives handler failures and setup warnings.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Set the clock for record timestamps and the daily log file date.
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Build the [`Logger`].
    ///
    /// A default file handler that cannot be created is reported to the trap, and the logger
    /// continues with console output only.
    pub fn build(self) -> Logger {
        let LoggerBuilder {
            config,
            handlers,
            trap,
            clock,
        } = self;

        let handlers = match handlers {
            Some(handlers) => handlers,
            None => default_handlers(&config, &clock, trap.as_ref()),
        };
        Logger::new(config, handlers, trap, clock)
    }

    /// Set up the global [`log`] logger with the built [`Logger`].
    ///
    /// Records from the `log` macros are then written through this logger. The global maximum
    /// level follows the configured level.
    ///
    /// # Errors
    ///
    /// Return an error if a global logger has already been set.
    pub fn try_apply(self) -> Result<(), Error> {
        let logger = self.build();
        let max_level = log::Level::from(logger.config().level()).to_level_filter();
        log::set_boxed_logger(Box::new(logger)).map_err(|err| {
            Error::new(crate::ErrorKind::Unexpected, "failed to set the global logger")
                .with_source(err)
        })?;
        log::set_max_level(max_level);
        Ok(())
    }

    /// Set up the global [`log`] logger with the built [`Logger`].
    ///
    /// # Panics
    ///
    /// Panic if the global logger has already been set.
    pub fn apply(self) {
        self.try_apply()
            .expect("LoggerBuilder::apply must be called before the global logger initialized");
    }
}

fn default_handlers(config: &LogConfig, clock: &Clock, trap: &dyn Trap) -> Vec<Box<dyn Handler>> {
    let mut handlers: Vec<Box<dyn Handler>> = vec![];

    match FileHandler::new(config.log_file_path(&clock.date())) {
        Ok(handler) => handlers.push(Box::new(handler)),
        Err(err) => trap.trap(&err.with_context("fallback", "console only")),
    }
    if config.print_to_console() {
        handlers.push(Box::new(ConsoleHandler::new(true)));
    }

    handlers
}
