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

//! Layouts for formatting log records into text lines.

pub use template::DEFAULT_TEMPLATE;
pub use template::Template;

mod template;

use crate::LogRecord;

/// Render `record` with `template`.
///
/// A pure function of its inputs. See [`Template`] for the placeholders.
pub fn format(record: &LogRecord, template: &Template) -> String {
    template.format(record)
}
