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

use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::LogRecord;
use crate::handler::Handler;

/// The file that receives diagnostics when neither the log file nor stderr can be written.
pub fn fallback_path() -> PathBuf {
    std::env::temp_dir().join("logges_errors.log")
}

/// A handler that appends records to a file.
///
/// The file is opened, appended and closed on every emit, so no descriptor is held between
/// calls. Processes appending to the same file interleave at line granularity.
///
/// # Examples
///
/// ```
/// use logges::handler::FileHandler;
///
/// let path = std::env::temp_dir().join("logges-doc-file-handler.log");
/// let handler = FileHandler::new(&path).unwrap();
/// assert_eq!(handler.path(), path);
/// ```
#[derive(Debug)]
pub struct FileHandler {
    path: PathBuf,
    closed: AtomicBool,
    // the fallback file is tried at most once
    stderr_failed: AtomicBool,
}

impl FileHandler {
    /// Creates a handler appending to `path`.
    ///
    /// The parent directory is created if missing, and the file is opened for append once to
    /// verify it is writable.
    ///
    /// # Errors
    ///
    /// Return a [`LogFile`](crate::ErrorKind::LogFile) error if the file cannot be opened for
    /// append.
    pub fn new(path: impl Into<PathBuf>) -> Result<FileHandler, Error> {
        let path = path.into();
        let failed = |message: &str, err: io::Error| {
            Error::log_file(message)
                .with_context("path", path.display())
                .with_source(err)
        };

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| failed("failed to create log directory", err))?;
        }
        open_append(&path).map_err(|err| failed("cannot write to log file", err))?;

        Ok(FileHandler {
            path,
            closed: AtomicBool::new(false),
            stderr_failed: AtomicBool::new(false),
        })
    }

    /// The path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn report(&self, err: &io::Error, formatted: &str) {
        self.report_to(io::stderr(), &fallback_path(), err, formatted);
    }

    fn report_to(
        &self,
        mut diagnostics: impl Write,
        fallback: &Path,
        err: &io::Error,
        formatted: &str,
    ) {
        let reported = writeln!(diagnostics, "Logging error: {err}")
            .and_then(|()| writeln!(diagnostics, "Failed to log: {formatted}"));
        if reported.is_ok() || self.stderr_failed.swap(true, Ordering::Relaxed) {
            return;
        }

        // give up silently if the fallback file fails too
        let _ = open_append(fallback).and_then(|mut file| {
            writeln!(file, "[CRITICAL] Logging system failure: {err}")?;
            writeln!(file, "Failed message: {formatted}")
        });
    }
}

impl Handler for FileHandler {
    fn emit(&self, _: &LogRecord, formatted: &str) -> Result<(), Error> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::handler("file handler is closed")
                .with_context("path", self.path.display()));
        }

        let written = open_append(&self.path).and_then(|mut file| {
            let mut bytes = Vec::with_capacity(formatted.len() + 1);
            bytes.extend_from_slice(formatted.as_bytes());
            bytes.push(b'\n');
            file.write_all(&bytes)
        });
        if let Err(err) = written {
            self.report(&err, formatted);
        }
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<fs::File> {
    OpenOptions::new().append(true).create(true).open(path)
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::distr::Alphanumeric;
    use tempfile::TempDir;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_file_handler_appends_lines() {
        let dir = TempDir::new().expect("failed to create a temporary directory");
        let path = dir.path().join("nested").join("svc.log");
        let handler = FileHandler::new(&path).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        let record = LogRecord::builder().build();
        let first = generate_random_string();
        let second = generate_random_string();
        handler.emit(&record, &first).unwrap();
        handler.emit(&record, &second).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{first}\n{second}\n"));
    }

    #[test]
    fn test_file_handler_rejects_unwritable_path() {
        let dir = TempDir::new().unwrap();
        // a directory cannot be opened for append
        let err = FileHandler::new(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LogFile);
    }

    #[test]
    fn test_file_handler_close_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let handler = FileHandler::new(dir.path().join("svc.log")).unwrap();
        handler.close().unwrap();
        handler.close().unwrap();

        let err = handler.emit(&LogRecord::builder().build(), "late").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Handler);
    }

    #[test]
    fn test_file_handler_swallows_write_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc.log");
        let handler = FileHandler::new(&path).unwrap();

        // replace the file with a directory so the append fails
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        handler
            .emit(&LogRecord::builder().build(), "lost")
            .expect("write failures are downgraded");
    }

    #[derive(Debug)]
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_file_handler_reports_to_diagnostics_first() {
        let dir = TempDir::new().unwrap();
        let handler = FileHandler::new(dir.path().join("svc.log")).unwrap();
        let fallback = dir.path().join("errors.log");
        let err = io::Error::from(io::ErrorKind::PermissionDenied);

        let mut diagnostics = vec![];
        handler.report_to(&mut diagnostics, &fallback, &err, "lost line");
        let diagnostics = String::from_utf8(diagnostics).unwrap();
        assert!(diagnostics.starts_with("Logging error: "));
        assert!(diagnostics.ends_with("Failed to log: lost line\n"));
        assert!(!fallback.exists());
    }

    #[test]
    fn test_file_handler_tries_fallback_file_once() {
        let dir = TempDir::new().unwrap();
        let handler = FileHandler::new(dir.path().join("svc.log")).unwrap();
        let fallback = dir.path().join("errors.log");
        let err = io::Error::from(io::ErrorKind::PermissionDenied);

        handler.report_to(BrokenPipe, &fallback, &err, "first");
        handler.report_to(BrokenPipe, &fallback, &err, "second");

        let content = fs::read_to_string(&fallback).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.starts_with("[CRITICAL] Logging system failure: "));
        assert!(content.ends_with("Failed message: first\n"));
    }

    fn generate_random_string() -> String {
        let mut rng = rand::rng();
        let len = rng.random_range(50..=100);
        let random_string: String = std::iter::repeat(())
            .map(|()| rng.sample(Alphanumeric))
            .map(char::from)
            .take(len)
            .collect();

        random_string
    }
}
