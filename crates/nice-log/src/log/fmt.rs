use core::{
    fmt::{self, Display, Formatter, Write},
    ops::Range,
};

use std::thread::{self, ThreadId};

use chrono::{DateTime, SecondsFormat, Utc};

use compact_str::CompactString;

use super::Level;

/// Source location of a log call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CallSite<'a> {
    pub file: &'a str,
    pub function: &'a str,
    pub line: u32,
    pub module: &'a str,
}

impl<'a> CallSite<'a> {

    #[inline(always)]
    pub const fn new(file: &'a str, function: &'a str, line: u32, module: &'a str) -> Self {
        Self {
            file,
            function,
            line,
            module,
        }
    }
}

/// Captures the [`CallSite`] of the macro invocation.
#[macro_export]
macro_rules! site {
    () => {
        $crate::fmt::CallSite::new(
            file!(),
            $crate::function_name!(),
            line!(),
            module_path!(),
        )
    };
}

/// Name of the enclosing function.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        $crate::fmt::function_name(core::any::type_name_of_val(&f))
    }};
}

#[doc(hidden)]
pub fn function_name(path: &'static str) -> &'static str {
    path.strip_suffix("::f")
        .unwrap_or(path)
        .rsplit("::")
        .find(|segment| *segment != "{{closure}}")
        .unwrap_or("?")
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ThreadInfo {
    pub id: ThreadId,
    pub name: Option<CompactString>,
}

impl ThreadInfo {

    pub fn current() -> Self {
        let current = thread::current();
        Self {
            id: current.id(),
            name: current.name().map(CompactString::new),
        }
    }
}

impl Display for ThreadInfo {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<Thread: {:?}>{{name = {}}}", self.id, self.name.as_deref().unwrap_or("(null)"))
    }
}

/// Values that replace what the logging macros capture on their own.
#[derive(Default, Clone, Debug)]
pub struct Overrides<'a> {
    pub timestamp: Option<DateTime<Utc>>,
    pub file: Option<&'a str>,
    pub function: Option<&'a str>,
    pub line: Option<u32>,
    pub thread: Option<ThreadInfo>,
}

impl<'a> Overrides<'a> {

    #[inline(always)]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[inline(always)]
    pub fn file(mut self, file: &'a str) -> Self {
        self.file = Some(file);
        self
    }

    #[inline(always)]
    pub fn function(mut self, function: &'a str) -> Self {
        self.function = Some(function);
        self
    }

    #[inline(always)]
    pub fn line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    #[inline(always)]
    pub fn thread(mut self, thread: ThreadInfo) -> Self {
        self.thread = Some(thread);
        self
    }

    /// Merges with the captured site, overridden fields winning.
    pub fn site(&self, captured: CallSite<'a>) -> CallSite<'a> {
        CallSite {
            file: self.file.unwrap_or(captured.file),
            function: self.function.unwrap_or(captured.function),
            line: self.line.unwrap_or(captured.line),
            module: captured.module,
        }
    }
}

/// Last `/` separated segment of `path`, or `?` if there is none.
pub fn basename(path: &str) -> &str {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .unwrap_or("?")
}

/// ISO-8601 with milliseconds and an explicit offset, e.g. `2020-07-21T10:15:00.250+00:00`.
///
/// The zero offset is spelled `+00:00`, never `Z`; both forms parse back with
/// [`DateTime::parse_from_rfc3339`].
pub fn timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// A formatted log line.
///
/// `code` is the byte range of the level code inside `text`, kept so that sinks
/// can colour it without reformatting.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    pub text: String,
    pub code: Range<usize>,
}

impl Line {

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline(always)]
    pub fn split(&self) -> (&str, &str, &str) {
        (
            &self.text[..self.code.start],
            &self.text[self.code.clone()],
            &self.text[self.code.end..],
        )
    }
}

impl Display for Line {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Builds `<thread>[<basename>#<function>#<line>]<tag>-<code>: <message>`.
pub fn format_line(
    level: Level,
    msg: fmt::Arguments,
    site: &CallSite,
    thread: Option<&ThreadInfo>,
    tag: Option<&str>,
) -> Line
{
    let mut text = String::new();
    // writing into a String is infallible
    if let Some(thread) = thread {
        let _ = write!(text, "{}", thread);
    }
    let _ = write!(text, "[{}#{}#{}]{}-",
        basename(site.file), site.function, site.line, tag.unwrap_or(""),
    );
    let start = text.len();
    text.push_str(level.code());
    let code = start..text.len();
    let _ = write!(text, ": {}", msg);
    Line {
        text,
        code,
    }
}
