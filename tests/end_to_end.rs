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
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use logges::Error;
use logges::Handler;
use logges::Level;
use logges::LogConfig;
use logges::LogRecord;
use logges::Logger;
use logges::clock::Clock;
use logges::handler::Testing;
use logges::parse::ExtractedLogs;
use logges::parse::extract_logs;
use logges::trap::Trap;
use tempfile::TempDir;

#[derive(Debug, Clone, Default)]
struct RecordingTrap(Arc<Mutex<Vec<String>>>);

impl RecordingTrap {
    fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Trap for RecordingTrap {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.to_string());
    }
}

#[derive(Debug)]
struct FailingHandler;

impl Handler for FailingHandler {
    fn emit(&self, _: &LogRecord, _: &str) -> Result<(), Error> {
        Err(Error::handler("emit always fails"))
    }

    fn close(&self) -> Result<(), Error> {
        Err(Error::handler("close always fails"))
    }
}

fn fixed_clock() -> Clock {
    Clock::manual("2024-03-05T08:30:00[UTC]".parse().unwrap())
}

fn file_logger(dir: &TempDir, level: Level) -> (Logger, PathBuf) {
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .level(level)
        .print_to_console(false)
        .build()
        .unwrap();
    let path = dir.path().join("2024-03-05_svc.log");
    let logger = logges::builder(config).clock(fixed_clock()).build();
    (logger, path)
}

#[test]
fn test_end_to_end_scenario() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let (logger, path) = file_logger(&dir, Level::Info);

    logger.info("started");
    logger.debug("ignored");
    logger.error("boom");
    logger.close();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("started"));
    assert!(content.contains("boom"));
    assert!(!content.contains("ignored"));

    let logs = ExtractedLogs::read(&path).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs.dates(), ["08:30:00", "08:30:00"]);
    assert_eq!(logs.statuses(), ["INFO", "ERROR"]);
    assert_eq!(logs.filenames(), ["end_to_end.rs", "end_to_end.rs"]);
    assert_eq!(logs.functions().len(), 2);
    assert_eq!(logs.messages(), ["started", "boom"]);
}

#[test]
fn test_below_threshold_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let (logger, path) = file_logger(&dir, Level::Warning);
    let before = fs::read(&path).unwrap();

    logger.debug("nope");
    logger.info("nope either");
    logger.log("still nope", Level::Info, &[("k", "v")]);

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_daily_file_name_and_format() {
    let dir = TempDir::new().unwrap();
    let (logger, path) = file_logger(&dir, Level::Debug);

    logger.log_at(
        logges::Caller::new("src/jobs/sync.rs", "run_batch", 17),
        "synced 3 rows",
        Level::Warning,
        &[],
    );

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "[08:30:00] [ WARNING  ] [sync.rs] [run_batch:17]: synced 3 rows\n"
    );

    let single = LogConfig::builder("svc")
        .directory(dir.path())
        .daily_rotation(false)
        .print_to_console(false)
        .build()
        .unwrap();
    let logger = logges::builder(single).build();
    logger.info("no date in the name");
    assert!(dir.path().join("svc.log").exists());
}

#[test]
fn test_truncated_message_is_persisted_with_marker() {
    let dir = TempDir::new().unwrap();
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .max_message_size(64)
        .print_to_console(false)
        .build()
        .unwrap();
    let logger = logges::builder(config).clock(fixed_clock()).build();

    for extra in [1, 10, 500] {
        logger.info("a".repeat(64 + extra));
    }
    logger.info("b".repeat(64));

    let logs = ExtractedLogs::read(dir.path().join("2024-03-05_svc.log")).unwrap();
    assert_eq!(logs.len(), 4);
    for (message, extra) in logs.messages().iter().zip([1, 10, 500]) {
        let marker = format!("... (truncated from {} bytes)", 64 + extra);
        assert!(message.ends_with(&marker), "{message}");
        assert!(message.len() <= 64);
    }
    assert_eq!(logs.messages()[3], "b".repeat(64));
}

#[test]
fn test_ignored_files_are_not_recorded() {
    let dir = TempDir::new().unwrap();
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .ignored_files(["worker.rs"])
        .build()
        .unwrap();
    let testing = Testing::default();
    let logger = logges::builder(config).handler(testing.clone()).build();

    logger.log_at(logges::Caller::new("src/worker.rs", "poll", 3), "x", Level::Error, &[]);
    logger.log_at(logges::Caller::new("src/Worker.RS", "poll", 3), "x", Level::Error, &[]);
    logger.log_at(logges::Caller::new("src/main.rs", "main", 9), "kept", Level::Error, &[]);
    logger.error("kept too");

    let messages = testing
        .records()
        .iter()
        .map(|r| r.message().to_string())
        .collect::<Vec<_>>();
    assert_eq!(messages, ["kept", "kept too"]);

    // this very file is resolved as the caller of a plain method call
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .ignored_files(["end_to_end.rs"])
        .build()
        .unwrap();
    let testing = Testing::default();
    let logger = logges::builder(config).handler(testing.clone()).build();
    logger.critical("from an ignored file");
    assert!(testing.records().is_empty());

    // patterns see the file name only, never its directory
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .ignored_files(["src/"])
        .build()
        .unwrap();
    let testing = Testing::default();
    let logger = logges::builder(config).handler(testing.clone()).build();
    logger.log_at(logges::Caller::new("src/main.rs", "main", 9), "kept", Level::Error, &[]);
    assert_eq!(testing.records().len(), 1);
}

#[test]
fn test_log_file_is_named_after_build_date() {
    let dir = TempDir::new().unwrap();
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .print_to_console(false)
        .build()
        .unwrap();

    let evening = Clock::manual("2024-03-05T23:59:59[UTC]".parse().unwrap());
    let logger = logges::builder(config.clone()).clock(evening).build();
    logger.info("last of the day");
    logger.info("still the same file");

    let morning = Clock::manual("2024-03-06T00:00:01[UTC]".parse().unwrap());
    let next = logges::builder(config).clock(morning).build();
    next.info("first of the day");

    let first = ExtractedLogs::read(dir.path().join("2024-03-05_svc.log")).unwrap();
    assert_eq!(first.messages(), ["last of the day", "still the same file"]);
    let second = ExtractedLogs::read(dir.path().join("2024-03-06_svc.log")).unwrap();
    assert_eq!(second.dates(), ["00:00:01"]);
}

#[test]
fn test_fan_out_survives_failing_handler() {
    let dir = TempDir::new().unwrap();
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .build()
        .unwrap();
    let testing = Testing::default();
    let trap = RecordingTrap::default();
    let logger = logges::builder(config)
        .handler(FailingHandler)
        .handler(testing.clone())
        .trap(trap.clone())
        .build();

    logger.info("delivered");
    assert_eq!(testing.lines().len(), 1);
    assert!(testing.lines()[0].ends_with("]: delivered"));
    assert_eq!(trap.messages().len(), 1);
    assert!(trap.messages()[0].contains("emit always fails"));

    logger.close();
    assert_eq!(testing.close_calls(), 1);
    assert_eq!(trap.messages().len(), 2);
    assert!(trap.messages()[1].contains("close always fails"));
}

#[test]
fn test_closed_logger_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .build()
        .unwrap();
    let testing = Testing::default();
    let logger = logges::builder(config).handler(testing.clone()).build();

    logger.info("before");
    logger.close();
    assert!(logger.is_closed());
    logger.info("after");
    logger.close();
    drop(logger);

    assert_eq!(testing.lines().len(), 1);
    assert_eq!(testing.close_calls(), 1);
}

#[test]
fn test_drop_closes_handlers() {
    let dir = TempDir::new().unwrap();
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .build()
        .unwrap();
    let testing = Testing::default();
    {
        let logger = logges::builder(config).handler(testing.clone()).build();
        logger.info("scoped");
    }
    assert_eq!(testing.close_calls(), 1);
}

#[test]
fn test_unwritable_default_file_falls_back_to_console() {
    let dir = TempDir::new().unwrap();
    // occupy the log file path with a directory
    fs::create_dir(dir.path().join("2024-03-05_svc.log")).unwrap();
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .build()
        .unwrap();
    let trap = RecordingTrap::default();
    let logger = logges::builder(config)
        .clock(fixed_clock())
        .trap(trap.clone())
        .build();

    assert_eq!(trap.messages().len(), 1);
    assert!(trap.messages()[0].starts_with("LogFileError"));
    logger.info("console only");
    assert_eq!(trap.messages().len(), 1);
}

#[test]
fn test_macros_record_function_names() {
    let dir = TempDir::new().unwrap();
    let config = LogConfig::builder("svc")
        .directory(dir.path())
        .level(Level::Debug)
        .build()
        .unwrap();
    let testing = Testing::default();
    let logger = logges::builder(config).handler(testing.clone()).build();

    fn handle_request(logger: &Logger, id: u32) {
        logges::info!(logger, "handling request {id}");
    }
    handle_request(&logger, 7);
    logges::warning!(logger, "{} retries left", 2);
    logges::critical!(logger, "giving up");

    let records = testing.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].function(), "handle_request");
    assert_eq!(records[0].message(), "handling request 7");
    assert_eq!(records[0].filename(), "end_to_end.rs");
    assert_eq!(records[1].function(), "test_macros_record_function_names");
    assert_eq!(records[1].level(), Level::Warning);
    assert_eq!(records[2].level(), Level::Critical);
    assert!(testing.lines()[0].contains("[handle_request:"));
}

#[test]
fn test_multi_line_messages_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let (logger, path) = file_logger(&dir, Level::Debug);

    let trace = "panicked at src/main.rs:10:5:\n  0: std::panicking\n  1: main";
    logger.error(trace);
    logger.info("key: value: more");
    logger.warning_with("with extras", &[("ignored", "not in template")]);

    let logs = extract_logs(&fs::read_to_string(&path).unwrap());
    assert_eq!(logs.messages(), [trace, "key: value: more", "with extras"]);
    assert_eq!(logs.statuses(), ["ERROR", "INFO", "WARNING"]);
    let counts = logs.level_counts();
    assert_eq!(counts.get(Level::Error), 1);
    assert_eq!(counts.total(), 3);
}

#[test]
fn test_shared_logger_across_threads() {
    let dir = TempDir::new().unwrap();
    let (logger, path) = file_logger(&dir, Level::Info);
    let logger = Arc::new(logger);

    let workers = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..50 {
                    logger.info_with(format!("worker {worker} step {i}"), &[("worker", "x")]);
                }
            })
        })
        .collect::<Vec<_>>();
    for worker in workers {
        worker.join().unwrap();
    }
    logger.close();

    let logs = ExtractedLogs::read(&path).unwrap();
    assert_eq!(logs.len(), 200);
    assert!(logs.statuses().iter().all(|status| status == "INFO"));
}

#[test]
fn test_get_logger() {
    let dir = TempDir::new().unwrap();
    let logger = logges::get_logger("quick", Level::Debug, Some(dir.path().to_path_buf())).unwrap();
    assert_eq!(logger.config().name(), "quick");
    assert_eq!(logger.config().level(), Level::Debug);

    let err = logges::get_logger("../../etc/passwd", Level::Info, Some(dir.path().to_path_buf()))
        .unwrap_err();
    assert_eq!(err.kind(), logges::ErrorKind::Configuration);
}
