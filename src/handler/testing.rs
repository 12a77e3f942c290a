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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::Error;
use crate::LogRecord;
use crate::handler::Handler;

/// A handler that keeps records in memory, for assertions in tests.
///
/// Clones share the same buffer, so keep a clone to inspect what a logger emitted.
///
/// # Examples
///
/// ```
/// use logges::handler::Testing;
///
/// let testing = Testing::default();
/// let inspect = testing.clone();
/// assert!(inspect.lines().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Testing {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    records: Vec<(LogRecord, String)>,
    close_calls: usize,
}

impl Testing {
    /// The formatted lines emitted so far.
    pub fn lines(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.records.iter().map(|(_, line)| line.clone()).collect()
    }

    /// The records emitted so far.
    pub fn records(&self) -> Vec<LogRecord> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.records.iter().map(|(record, _)| record.clone()).collect()
    }

    /// How many times [`Handler::close`] was called.
    pub fn close_calls(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.close_calls
    }
}

impl Handler for Testing {
    fn emit(&self, record: &LogRecord, formatted: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.records.push((record.clone(), formatted.to_string()));
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.close_calls += 1;
        Ok(())
    }
}
