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

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::LogRecord;

/// The template used when none is configured.
///
/// Renders as `[12:00:00] [   INFO   ] [main.rs] [main:10]: started`.
pub const DEFAULT_TEMPLATE: &str = "[{time}] [{level:^10}] [{filename}] [{function}]: {message}";

/// A compiled format template.
///
/// Recognized placeholders:
///
/// - `{time}`: the `HH:MM:SS` timestamp.
/// - `{level}`: the level name.
/// - `{filename}`: the file name of the call site.
/// - `{function}`: the function and line of the call site, as `function:line`.
/// - `{line}`: the line of the call site.
/// - `{message}`: the message body.
///
/// Any other name is looked up in the record's extra key-values. A placeholder without a
/// matching extra value renders verbatim.
///
/// A placeholder may carry a format spec `:[[fill]align][width]`, where `align` is one of `<`,
/// `^` or `>`. Write `{{` and `}}` for literal braces.
///
/// # Examples
///
/// ```
/// use logges::LogRecord;
/// use logges::layout::Template;
///
/// let template = Template::parse("{level:>8} | {message} | {user}").unwrap();
/// let record = LogRecord::builder()
///     .message("signed in")
///     .extra("user", "alice")
///     .build();
/// assert_eq!(template.format(&record), "    INFO | signed in | alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder {
        field: Field,
        spec: Spec,
        raw: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Field {
    Time,
    Level,
    Filename,
    Function,
    Line,
    Message,
    Extra(String),
}

impl Field {
    fn from_name(name: &str) -> Field {
        match name {
            "time" => Field::Time,
            "level" => Field::Level,
            "filename" => Field::Filename,
            "function" => Field::Function,
            "line" => Field::Line,
            "message" => Field::Message,
            other => Field::Extra(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spec {
    fill: char,
    align: Align,
    width: usize,
}

impl Default for Spec {
    fn default() -> Self {
        Spec {
            fill: ' ',
            align: Align::Left,
            width: 0,
        }
    }
}

impl Spec {
    fn parse(spec: &str) -> Option<Spec> {
        fn align_of(c: char) -> Option<Align> {
            match c {
                '<' => Some(Align::Left),
                '^' => Some(Align::Center),
                '>' => Some(Align::Right),
                _ => None,
            }
        }

        let mut result = Spec::default();
        let chars = spec.chars().collect::<Vec<_>>();
        let rest = match chars.as_slice() {
            [fill, align, rest @ ..] if align_of(*align).is_some() => {
                result.fill = *fill;
                result.align = align_of(*align)?;
                rest
            }
            [align, rest @ ..] if align_of(*align).is_some() => {
                result.align = align_of(*align)?;
                rest
            }
            rest => rest,
        };

        if !rest.iter().all(char::is_ascii_digit) {
            return None;
        }
        if !rest.is_empty() {
            result.width = rest.iter().collect::<String>().parse().ok()?;
        }
        Some(result)
    }

    fn apply<'a>(&self, value: Cow<'a, str>) -> Cow<'a, str> {
        let len = value.chars().count();
        if len >= self.width {
            return value;
        }

        let pad = self.width - len;
        let (left, right) = match self.align {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };
        let mut padded = String::with_capacity(value.len() + pad * self.fill.len_utf8());
        padded.extend(std::iter::repeat_n(self.fill, left));
        padded.push_str(&value);
        padded.extend(std::iter::repeat_n(self.fill, right));
        Cow::Owned(padded)
    }
}

impl Template {
    /// Compile a template.
    ///
    /// # Errors
    ///
    /// Return a [`Configuration`](crate::ErrorKind::Configuration) error if the template is
    /// empty, has an unclosed or unmatched brace, an empty placeholder or a malformed format
    /// spec.
    pub fn parse(source: &str) -> Result<Template, Error> {
        if source.is_empty() {
            return Err(Error::configuration("format template cannot be empty"));
        }

        let malformed = |reason: &str, offset: usize| {
            Error::configuration(format!("malformed format template: {reason}"))
                .with_context("template", source)
                .with_context("offset", offset)
        };

        let mut segments = vec![];
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();
        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if chars.next_if(|(_, c)| *c == '{').is_some() => literal.push('{'),
                '}' if chars.next_if(|(_, c)| *c == '}').is_some() => literal.push('}'),
                '}' => return Err(malformed("unmatched '}'", offset)),
                '{' => {
                    let mut inner = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, '{')) | None => {
                                return Err(malformed("unclosed placeholder", offset));
                            }
                            Some((_, c)) => inner.push(c),
                        }
                    }

                    let (name, spec) = match inner.split_once(':') {
                        Some((name, spec)) => (name, Some(spec)),
                        None => (inner.as_str(), None),
                    };
                    if name.is_empty() {
                        return Err(malformed("empty placeholder", offset));
                    }
                    let spec = match spec {
                        Some(spec) => Spec::parse(spec)
                            .ok_or_else(|| malformed("invalid format spec", offset))?,
                        None => Spec::default(),
                    };

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder {
                        field: Field::from_name(name),
                        spec,
                        raw: format!("{{{inner}}}"),
                    });
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render a record. The same record and template always render the same string.
    pub fn format(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(self.source.len() + record.message().len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { field, spec, raw } => {
                    let value = match field {
                        Field::Time => Cow::Borrowed(record.timestamp()),
                        Field::Level => Cow::Borrowed(record.level().as_str()),
                        Field::Filename => Cow::Borrowed(record.filename()),
                        Field::Function => {
                            Cow::Owned(format!("{}:{}", record.function(), record.line()))
                        }
                        Field::Line => Cow::Owned(record.line().to_string()),
                        Field::Message => Cow::Borrowed(record.message()),
                        Field::Extra(key) => match record.extra_value(key) {
                            Some(value) => Cow::Borrowed(value),
                            None => {
                                out.push_str(raw);
                                continue;
                            }
                        },
                    };
                    out.push_str(&spec.apply(value));
                }
            }
        }
        out
    }
}

impl Default for Template {
    fn default() -> Self {
        Template::parse(DEFAULT_TEMPLATE).expect("default template must be valid")
    }
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Caller;
    use crate::ErrorKind;
    use crate::Level;

    fn record() -> LogRecord {
        LogRecord::builder()
            .timestamp("09:15:00")
            .level(Level::Warning)
            .message("disk at 91%")
            .caller(Caller::new("src/monitor.rs", "check_disk", 77))
            .build()
    }

    #[test]
    fn test_default_template() {
        assert_eq!(
            Template::default().format(&record()),
            "[09:15:00] [ WARNING  ] [monitor.rs] [check_disk:77]: disk at 91%"
        );
    }

    #[test]
    fn test_format_specs() {
        let template = Template::parse("{level:*^9}|{level:>9}|{level:<9}|{line:03}").unwrap();
        assert_eq!(
            template.format(&record()),
            "*WARNING*|  WARNING|WARNING  |77 "
        );
    }

    #[test]
    fn test_escaped_braces_and_extras() {
        let template = Template::parse("{{{message}}} {request_id} {missing:>5}").unwrap();
        let record = LogRecord::builder()
            .message(record().message())
            .extra("request_id", "r-17")
            .build();
        assert_eq!(template.format(&record), "{disk at 91%} r-17 {missing:>5}");
    }

    #[test]
    fn test_malformed_templates() {
        for source in ["", "[{time]", "{time", "time}", "{}", "{level:^x}", "{a{b}}"] {
            let err = Template::parse(source).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration, "{source:?}");
        }
    }
}
