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

//! Parse persisted log text back into structured fields.
//!
//! A record starts at a line beginning with `[`. The line is split on `:` into at most five
//! parts: the first four carry the metadata (time, level, filename, `function:line`) and the
//! rest is the message. Lines that do not begin with `[` continue the previous message.
//!
//! The rule assumes file and function names contain no `:`.

use std::fs;
use std::path::Path;

use crate::Error;
use crate::report::LevelCounts;

/// One record reconstructed from log text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRecord {
    /// The `HH:MM:SS` time.
    pub time: String,
    /// The level name, without padding.
    pub level: String,
    /// The file name of the call site.
    pub filename: String,
    /// The call site as `function:line`.
    pub function: String,
    /// The message, with continuation lines joined by `\n`.
    pub message: String,
}

/// Parse log text into records.
///
/// Malformed record lines are skipped together with their continuation lines.
///
/// # Examples
///
/// ```
/// let text = "[10:00:00] [   INFO   ] [main.rs] [main:3]: ready: 3 workers\n\
///             [10:00:01] [  ERROR   ] [db.rs] [connect:40]: refused\n\
///             retrying in 5s\n";
/// let records = logges::parse::parse(text);
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].message, "ready: 3 workers");
/// assert_eq!(records[1].level, "ERROR");
/// assert_eq!(records[1].message, "refused\nretrying in 5s");
/// ```
pub fn parse(text: &str) -> Vec<ParsedRecord> {
    let mut records = vec![];
    // whether continuation lines belong to the last pushed record
    let mut open = false;

    // only `\n` separates lines; a `\r` belongs to the message
    let text = text.strip_suffix('\n').unwrap_or(text);
    for line in text.split('\n') {
        if line.starts_with('[') {
            match parse_record_line(line) {
                Some(record) => {
                    records.push(record);
                    open = true;
                }
                None => open = false,
            }
        } else if open {
            if let Some(last) = records.last_mut() {
                last.message.push('\n');
                last.message.push_str(line);
            }
        }
    }

    records
}

fn parse_record_line(line: &str) -> Option<ParsedRecord> {
    let parts = line.splitn(5, ':').collect::<Vec<_>>();
    if parts.len() < 4 {
        return None;
    }

    let metadata = parts[..4].join(":");
    let message = parts
        .get(4)
        .copied()
        .map(|message| message.strip_prefix(' ').unwrap_or(message))
        .unwrap_or_default();

    let [time, level, filename, function] = bracket_groups(&metadata)?;
    Some(ParsedRecord {
        time: time.to_string(),
        level: level.trim().to_string(),
        filename: filename.to_string(),
        function: function.to_string(),
        message: message.to_string(),
    })
}

// exactly four whitespace-separated `[...]` groups
fn bracket_groups(metadata: &str) -> Option<[&str; 4]> {
    let mut groups = [""; 4];
    let mut rest = metadata;
    for group in groups.iter_mut() {
        rest = rest.trim_start().strip_prefix('[')?;
        let end = rest.find(']')?;
        *group = &rest[..end];
        rest = &rest[end + 1..];
    }
    rest.trim().is_empty().then_some(groups)
}

/// Index-aligned field lists extracted from log text.
///
/// All lists always have the same length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedLogs {
    dates: Vec<String>,
    statuses: Vec<String>,
    filenames: Vec<String>,
    functions: Vec<String>,
    messages: Vec<String>,
}

/// A borrowed view of one entry of [`ExtractedLogs`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<'a> {
    pub date: &'a str,
    pub status: &'a str,
    pub filename: &'a str,
    pub function: &'a str,
    pub message: &'a str,
}

impl ExtractedLogs {
    /// Read and extract a log file.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`; the rest of the file is still
    /// extracted.
    ///
    /// # Errors
    ///
    /// Return a [`LogFile`](crate::ErrorKind::LogFile) error if the file cannot be read.
    pub fn read(path: impl AsRef<Path>) -> Result<ExtractedLogs, Error> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| {
            Error::log_file("failed to read log file")
                .with_context("path", path.display())
                .with_source(err)
        })?;
        Ok(extract_logs(&String::from_utf8_lossy(&bytes)))
    }

    /// The extracted entries as owned records.
    pub fn records(&self) -> Vec<ParsedRecord> {
        self.iter()
            .map(|entry| ParsedRecord {
                time: entry.date.to_string(),
                level: entry.status.to_string(),
                filename: entry.filename.to_string(),
                function: entry.function.to_string(),
                message: entry.message.to_string(),
            })
            .collect()
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Entry<'_>> {
        Some(Entry {
            date: self.dates.get(index)?,
            status: self.statuses.get(index)?,
            filename: self.filenames.get(index)?,
            function: self.functions.get(index)?,
            message: self.messages.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Entry<'_>> {
        (0..self.len()).filter_map(|index| self.get(index))
    }

    /// Tally the statuses by level. Unrecognized statuses are not counted.
    pub fn level_counts(&self) -> LevelCounts {
        self.statuses
            .iter()
            .filter_map(|status| status.parse().ok())
            .collect()
    }

    fn push(&mut self, record: ParsedRecord) {
        self.dates.push(record.time);
        self.statuses.push(record.level);
        self.filenames.push(record.filename);
        self.functions.push(record.function);
        self.messages.push(record.message);
    }
}

impl FromIterator<ParsedRecord> for ExtractedLogs {
    fn from_iter<I: IntoIterator<Item = ParsedRecord>>(iter: I) -> Self {
        let mut logs = ExtractedLogs::default();
        for record in iter {
            logs.push(record);
        }
        logs
    }
}

/// Extract aligned field lists from log text.
pub fn extract_logs(text: &str) -> ExtractedLogs {
    parse(text).into_iter().collect()
}
