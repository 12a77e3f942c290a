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

//! Validated logger configuration.

use std::fs;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;
use crate::Level;
use crate::layout::DEFAULT_TEMPLATE;
use crate::layout::Template;

/// The default maximum message size, in bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 10_000;

/// Immutable configuration of a [`Logger`](crate::Logger).
///
/// Build it with [`LogConfig::builder`]. Every constraint is checked once in
/// [`LogConfigBuilder::build`]; a `LogConfig` value is always valid.
///
/// # Examples
///
/// ```
/// use logges::Level;
/// use logges::LogConfig;
///
/// let dir = std::env::temp_dir().join("logges-doc-config");
/// let config = LogConfig::builder("billing")
///     .level(Level::Warning)
///     .directory(&dir)
///     .ignored_files(["Vendor_"])
///     .build()
///     .unwrap();
///
/// assert_eq!(config.name(), "billing");
/// assert!(config.should_ignore("vendor_client.rs"));
/// ```
#[derive(Debug, Clone)]
pub struct LogConfig {
    name: String,
    level: Level,
    directory: PathBuf,
    template: Template,
    print_to_console: bool,
    daily_rotation: bool,
    ignored_files: Vec<String>,
    max_message_size: usize,
}

impl LogConfig {
    /// Create a builder for a logger called `name`.
    pub fn builder(name: impl Into<String>) -> LogConfigBuilder {
        LogConfigBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The minimum level that is recorded.
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn print_to_console(&self) -> bool {
        self.print_to_console
    }

    pub fn daily_rotation(&self) -> bool {
        self.daily_rotation
    }

    /// The ignored file patterns, lowercased.
    pub fn ignored_files(&self) -> &[String] {
        &self.ignored_files
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Whether records from `path` are discarded.
    ///
    /// True if any ignored pattern is a case-insensitive substring of `path`. The logger passes
    /// the call site's file name only, so patterns naming directories never match its records.
    pub fn should_ignore(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.ignored_files
            .iter()
            .any(|pattern| path.contains(pattern.as_str()))
    }

    /// The log file name for `date` (`YYYY-MM-DD`).
    ///
    /// `{date}_{name}.log` with daily rotation, `{name}.log` without.
    pub fn log_file_name(&self, date: &str) -> String {
        if self.daily_rotation {
            format!("{date}_{}.log", self.name)
        } else {
            format!("{}.log", self.name)
        }
    }

    /// The log file path for `date` (`YYYY-MM-DD`).
    pub fn log_file_path(&self, date: &str) -> PathBuf {
        self.directory.join(self.log_file_name(date))
    }
}

/// A builder for [`LogConfig`].
#[must_use = "call `build` to validate the configuration"]
#[derive(Debug)]
pub struct LogConfigBuilder {
    name: String,
    level: Level,
    directory: Option<PathBuf>,
    template: String,
    print_to_console: bool,
    daily_rotation: bool,
    ignored_files: Vec<String>,
    max_message_size: usize,
}

impl LogConfigBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Level::Info,
            directory: None,
            template: DEFAULT_TEMPLATE.to_string(),
            print_to_console: true,
            daily_rotation: true,
            ignored_files: vec![],
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Sets the minimum level. Default to [`Level::Info`].
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the directory of the log files. Default to the current working directory.
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Sets the format template. Default to [`DEFAULT_TEMPLATE`].
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Whether the default handlers include a console handler. Default to `true`.
    pub fn print_to_console(mut self, print_to_console: bool) -> Self {
        self.print_to_console = print_to_console;
        self
    }

    /// Whether the log file name carries the current date. Default to `true`.
    pub fn daily_rotation(mut self, daily_rotation: bool) -> Self {
        self.daily_rotation = daily_rotation;
        self
    }

    /// Adds file name patterns whose records are discarded.
    ///
    /// Patterns are matched against the call site's file name, without its directory.
    pub fn ignored_files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_files
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the maximum message size in bytes. Default to [`DEFAULT_MAX_MESSAGE_SIZE`].
    pub fn max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// Validate the configuration and create the log directory.
    ///
    /// # Errors
    ///
    /// Return a [`Configuration`](crate::ErrorKind::Configuration) error if:
    ///
    /// - the name is empty or has characters other than ASCII letters, digits, `-` and `_`;
    /// - the template is empty or malformed;
    /// - the maximum message size is zero;
    /// - the directory cannot be created or is not writable.
    pub fn build(self) -> Result<LogConfig, Error> {
        let LogConfigBuilder {
            name,
            level,
            directory,
            template,
            print_to_console,
            daily_rotation,
            ignored_files,
            max_message_size,
        } = self;

        validate_name(&name)?;
        let template = Template::parse(&template)?;
        if max_message_size == 0 {
            return Err(Error::configuration("max_message_size must be positive"));
        }

        let directory = match directory {
            Some(directory) => directory,
            None => std::env::current_dir().map_err(|err| {
                Error::configuration("cannot resolve the current directory").with_source(err)
            })?,
        };
        prepare_directory(&directory, &name)?;

        Ok(LogConfig {
            name,
            level,
            directory,
            template,
            print_to_console,
            daily_rotation,
            ignored_files: ignored_files.iter().map(|f| f.to_lowercase()).collect(),
            max_message_size,
        })
    }
}

fn validate_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::configuration("logger name cannot be empty"));
    }

    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(Error::configuration(format!(
            "logger name {name:?} contains invalid characters; \
             only ASCII letters, digits, hyphens and underscores are allowed"
        )));
    }

    Ok(())
}

fn prepare_directory(directory: &Path, name: &str) -> Result<(), Error> {
    fs::create_dir_all(directory).map_err(|err| {
        Error::configuration("cannot create log directory")
            .with_context("directory", directory.display())
            .with_source(err)
    })?;

    let probe = directory.join(format!(".{name}.{}.probe", std::process::id()));
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&probe)
        .map_err(|err| {
            Error::configuration("log directory is not writable")
                .with_context("directory", directory.display())
                .with_source(err)
        })?;
    // a leftover probe file is harmless
    let _ = fs::remove_file(&probe);

    Ok(())
}
