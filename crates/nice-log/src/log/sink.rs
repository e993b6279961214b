use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Local, Utc};

use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::{Level, fmt::{self, Line}};

use crate::Result;

/// Where formatted lines go.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Sink {
    /// Standard output, each line prefixed with the call's timestamp.
    #[default]
    DirectConsole,
    /// The host's diagnostic channel, see [`PlatformConsole`].
    PlatformConsole,
}

impl core::fmt::Display for Sink {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DirectConsole => write!(f, "direct console"),
            Self::PlatformConsole => write!(f, "platform console"),
        }
    }
}

/// The host's diagnostic logging channel.
///
/// Implementations receive the line without a timestamp and are expected to add
/// their own.
pub trait PlatformConsole: Send {

    fn write_line(&mut self, line: &Line) -> Result<()>;
}

/// Default [`PlatformConsole`] writing `<local time> <process>[<pid>] <line>`, to stderr
/// unless built [`with_writer`](Self::with_writer).
pub struct StderrConsole<W: Write + Send = StandardStream> {
    out: W,
    process: String,
}

impl StderrConsole {

    pub fn new() -> Self {
        let process = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "?".to_owned());
        Self::with_writer(StandardStream::stderr(ColorChoice::Never), process)
    }
}

impl Default for StderrConsole {

    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> StderrConsole<W> {

    pub fn with_writer(out: W, process: impl Into<String>) -> Self {
        Self {
            out,
            process: process.into(),
        }
    }

    #[inline(always)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    #[inline(always)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> PlatformConsole for StderrConsole<W> {

    fn write_line(&mut self, line: &Line) -> Result<()> {
        writeln!(self.out, "{} {}[{}] {}",
            Local::now().format(CONSOLE_TIME_FORMAT),
            self.process,
            std::process::id(),
            line,
        )?;
        self.out.flush()?;
        Ok(())
    }
}

const CONSOLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub(crate) fn stdout() -> StandardStream {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Writes `<timestamp> <line>\n` and flushes.
///
/// With `color` set the level code is coloured, if `out` supports it.
pub fn write_direct(
    out: &mut dyn WriteColor,
    level: Level,
    line: &Line,
    time: &DateTime<Utc>,
    color: bool,
) -> Result<()>
{
    write!(out, "{} ", fmt::timestamp(time))?;
    match level.color() {
        Some(c) if color => {
            let (head, code, tail) = line.split();
            out.write_all(head.as_bytes())?;
            out.set_color(ColorSpec::new().set_fg(Some(c)).set_bold(true))?;
            out.write_all(code.as_bytes())?;
            out.reset()?;
            out.write_all(tail.as_bytes())?;
        },
        _ => {
            out.write_all(line.as_str().as_bytes())?;
        },
    }
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
