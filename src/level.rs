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

//! Severity levels and their ordering.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An enum representing the available severity levels of the logger.
///
/// Levels are ordered by [`rank`](Level::rank): `Debug < Info < Warning < Error < Critical`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Designates lower priority information.
    Debug = 10,
    /// Designates useful information.
    Info = 20,
    /// Designates hazardous situations.
    Warning = 30,
    /// Designates very serious errors.
    Error = 40,
    /// Designates critical errors.
    Critical = 50,
}

impl Level {
    /// All levels in ascending rank order.
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// The numeric rank of the level. Higher is more severe.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Whether a record at this level passes a `threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logges::Level;
    ///
    /// assert!(Level::Error.meets_threshold(Level::Info));
    /// assert!(Level::Info.meets_threshold(Level::Info));
    /// assert!(!Level::Debug.meets_threshold(Level::Info));
    /// ```
    pub fn meets_threshold(&self, threshold: Level) -> bool {
        self.rank() >= threshold.rank()
    }

    /// The emoji shortcode that report renderers show next to a level.
    pub fn icon(&self) -> &'static str {
        match self {
            Level::Debug => ":mag:",
            Level::Info => ":passport_control:",
            Level::Warning => ":vs:",
            Level::Error => ":sos:",
            Level::Critical => ":rotating_light:",
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for (name, level) in [
            ("debug", Level::Debug),
            ("info", Level::Info),
            ("warning", Level::Warning),
            ("warn", Level::Warning),
            ("error", Level::Error),
            ("critical", Level::Critical),
            ("crit", Level::Critical),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(level);
            }
        }

        Err(Error::configuration(format!("malformed level: {s:?}")))
    }
}

impl From<Level> for log::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => log::Level::Debug,
            Level::Info => log::Level::Info,
            Level::Warning => log::Level::Warn,
            Level::Error | Level::Critical => log::Level::Error,
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    #[test]
    fn test_ranks_strictly_increase() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
            assert_eq!(pair[0].cmp(&pair[1]), Ordering::Less);
        }
        assert_eq!(Level::Warning.cmp(&Level::Warning), Ordering::Equal);
        assert_eq!(Level::Critical.cmp(&Level::Debug), Ordering::Greater);
    }

    #[test]
    fn test_meets_threshold_is_monotonic() {
        for threshold in Level::ALL {
            let passed = Level::ALL
                .iter()
                .map(|level| level.meets_threshold(threshold))
                .collect::<Vec<_>>();
            // once a level passes, every more severe level passes too
            let first = passed.iter().position(|p| *p).unwrap();
            assert!(passed[first..].iter().all(|p| *p));
            assert!(passed[..first].iter().all(|p| !*p));
            assert_eq!(Level::ALL[first], threshold);
        }
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("info".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("Critical".parse::<Level>().unwrap(), Level::Critical);
        let err = "verbose".parse::<Level>().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(format!("[{:^10}]", Level::Info), "[   INFO   ]");
        assert_eq!(format!("[{:^10}]", Level::Error), "[  ERROR   ]");
    }
}
