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

/// Log a formatted message through a [`Logger`](crate::Logger) at a level, recording the call
/// site's file, function and line.
///
/// # Examples
///
/// ```
/// use logges::Level;
///
/// # let dir = std::env::temp_dir().join("logges-doc-macros");
/// # let config = logges::LogConfig::builder("doc").directory(&dir).build().unwrap();
/// # let logger = logges::builder(config).handler(logges::handler::Testing::default()).build();
/// logges::log_at!(logger, Level::Warning, "retrying in {}s", 5);
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at($crate::caller!(), ::std::format_args!($($arg)+), $level, &[])
    };
}

/// Log a formatted message at [`Level::Debug`](crate::Level::Debug).
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log a formatted message at [`Level::Info`](crate::Level::Info).
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a formatted message at [`Level::Warning`](crate::Level::Warning).
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Log a formatted message at [`Level::Error`](crate::Level::Error).
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a formatted message at [`Level::Critical`](crate::Level::Critical).
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Critical, $($arg)+)
    };
}
