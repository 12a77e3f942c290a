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

use crate::Caller;
use crate::Level;
use crate::Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let mut kvs = Vec::new();
        struct KeyValueVisitor<'b> {
            kvs: &'b mut Vec<(String, String)>,
        }

        impl<'kvs> log::kv::VisitSource<'kvs> for KeyValueVisitor<'_> {
            fn visit_pair(
                &mut self,
                key: log::kv::Key<'kvs>,
                value: log::kv::Value<'kvs>,
            ) -> Result<(), log::kv::Error> {
                self.kvs.push((key.to_string(), value.to_string()));
                Ok(())
            }
        }

        let mut visitor = KeyValueVisitor { kvs: &mut kvs };
        // a failing source only loses its key-values
        let _ = record.key_values().visit(&mut visitor);

        self.log_impl(
            caller_of(record),
            record.args(),
            Level::from(record.level()),
            &kvs,
        );
    }

    fn flush(&self) {}
}

// `log` records carry no function name; the last module path segment stands in for it.
fn caller_of(record: &log::Record) -> Caller {
    let function = record
        .module_path()
        .and_then(|path| path.rsplit("::").next())
        .unwrap_or("unknown");
    match (record.file(), record.line()) {
        (Some(file), Some(line)) => Caller::new(file, function, line),
        _ => Caller::unknown(),
    }
}
