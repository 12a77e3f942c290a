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

//! Inputs for report renderers: level tallies, Markdown reports and log file listings.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use jiff::civil::Date;

use crate::Error;
use crate::Level;
use crate::parse::ExtractedLogs;

/// Number of records per level. Every level is present, possibly with zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts {
    counts: [usize; 5],
}

impl LevelCounts {
    fn slot(level: Level) -> usize {
        match level {
            Level::Debug => 0,
            Level::Info => 1,
            Level::Warning => 2,
            Level::Error => 3,
            Level::Critical => 4,
        }
    }

    pub fn increment(&mut self, level: Level) {
        self.counts[Self::slot(level)] += 1;
    }

    pub fn get(&self, level: Level) -> usize {
        self.counts[Self::slot(level)]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// The share of `level` in percent, or zero when nothing was counted.
    pub fn percentage(&self, level: Level) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(level) as f64 * 100.0 / total as f64,
        }
    }

    /// Levels and their counts in ascending rank order.
    pub fn iter(&self) -> impl Iterator<Item = (Level, usize)> + '_ {
        Level::ALL.into_iter().map(|level| (level, self.get(level)))
    }
}

impl FromIterator<Level> for LevelCounts {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        let mut counts = LevelCounts::default();
        for level in iter {
            counts.increment(level);
        }
        counts
    }
}

/// Render extracted logs as a Markdown report.
///
/// The report has a header, an optional chart image reference, a table of records with the
/// newest first, and the level tally.
pub fn markdown(title: &str, logs: &ExtractedLogs, chart: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {title} Logs");
    let _ = writeln!(out);
    if let Some(chart) = chart {
        let _ = writeln!(out, "![]({chart})");
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "|TYPE|TIME|FILE|FUNCTION|MESSAGE|");
    let _ = writeln!(out, "| :--: | :--: | :--: | :--: | :-- |");
    let entries = logs.iter().collect::<Vec<_>>();
    for entry in entries.iter().rev() {
        let icon = entry
            .status
            .parse::<Level>()
            .map(|level| level.icon())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "|{icon} {}|{}|{}|{}|{}|",
            escape_cell(entry.status),
            escape_cell(entry.date),
            escape_cell(entry.filename),
            escape_cell(entry.function),
            escape_cell(entry.message),
        );
    }

    let counts = logs.level_counts();
    let _ = writeln!(out);
    let _ = writeln!(out, "|LEVEL|COUNT|SHARE|");
    let _ = writeln!(out, "| :-- | --: | --: |");
    for (level, count) in counts.iter() {
        let share = counts.percentage(level);
        let _ = writeln!(out, "|{level}|{count}|{share:.2}%|");
    }

    out
}

fn escape_cell(text: &str) -> String {
    text.trim_end_matches('\n')
        .replace('|', "\\|")
        .replace('\n', "<br>")
}

/// List the `.log` files in `directory`, sorted by name.
///
/// With a `min` or `max` bound, only daily files (`YYYY-MM-DD_name.log`) dated inside the
/// inclusive range are listed.
///
/// # Errors
///
/// Return a [`LogFile`](crate::ErrorKind::LogFile) error if the directory cannot be read.
pub fn list_log_files(
    directory: impl AsRef<Path>,
    min: Option<Date>,
    max: Option<Date>,
) -> Result<Vec<PathBuf>, Error> {
    let directory = directory.as_ref();
    let entries = fs::read_dir(directory).map_err(|err| {
        Error::log_file("failed to read log directory")
            .with_context("directory", directory.display())
            .with_source(err)
    })?;

    let bounded = min.is_some() || max.is_some();
    let mut files = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let filename = entry.file_name().to_str()?.to_string();
            if !filename.ends_with(".log") {
                return None;
            }
            if bounded {
                let date = file_date(&filename)?;
                if min.is_some_and(|min| date < min) || max.is_some_and(|max| date > max) {
                    return None;
                }
            }
            Some(entry.path())
        })
        .collect::<Vec<_>>();
    files.sort();
    Ok(files)
}

fn file_date(filename: &str) -> Option<Date> {
    let (date, _) = filename.split_once('_')?;
    date.parse().ok()
}
