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

//! Logges is a file-based structured logger whose log files can be parsed back into records.
//!
//! # Overview
//!
//! A [`Logger`] owns an immutable [`LogConfig`] and a list of [`Handler`]s. Each accepted record
//! is stamped with the time and its call site, rendered with the configured template, and handed
//! to every handler in turn. By default, records are appended to `{YYYY-MM-DD}_{name}.log` in the
//! configured directory and echoed to the console.
//!
//! The persisted line looks like:
//!
//! ```text
//! [14:03:27] [   INFO   ] [main.rs] [main:12]: service started
//! ```
//!
//! and [`parse::extract_logs`] turns such text back into index-aligned field lists for search,
//! export and reporting.
//!
//! # Examples
//!
//! ```
//! use logges::Level;
//! use logges::LogConfig;
//!
//! let dir = std::env::temp_dir().join("logges-doc-lib");
//! let config = LogConfig::builder("svc")
//!     .directory(&dir)
//!     .level(Level::Info)
//!     .print_to_console(false)
//!     .build()
//!     .unwrap();
//! let logger = logges::builder(config).build();
//!
//! logges::info!(logger, "started with {} workers", 4);
//! logger.error_with("connection refused", &[("peer", "10.0.0.7")]);
//! logger.close();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod clock;
pub mod handler;
pub mod layout;
pub mod parse;
pub mod report;
pub mod trap;

mod bridge;
mod config;
mod error;
mod level;
mod logger;
mod macros;
mod record;

pub use self::config::DEFAULT_MAX_MESSAGE_SIZE;
pub use self::config::LogConfig;
pub use self::config::LogConfigBuilder;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::handler::Handler;
pub use self::level::Level;
pub use self::logger::*;
pub use self::record::Caller;
pub use self::record::LogRecord;
pub use self::record::RecordBuilder;
