use std::{
    borrow::Cow,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use core::str::FromStr;

use termcolor::WriteColor;

use rustc_hash::FxHashMap;

use compact_str::CompactString;

pub use chrono::{DateTime, Utc};

mod error;
mod level;
mod sink;
pub mod fmt;

pub use error::LogError;
pub use level::{Level, should_log};
pub use sink::{Sink, PlatformConsole, StderrConsole, write_direct};
pub use fmt::{CallSite, ThreadInfo, Overrides, Line};

use crate::Result;

/// Environment variable read by [`Config::from_env`].
pub const ENV_VAR: &str = "NICE_LOG";

/// Logger settings.
///
/// `level` is the base threshold; `target_levels` overrides it for a module path
/// and everything below it.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub tag: Option<CompactString>,
    pub level: Level,
    pub sink: Sink,
    pub show_thread: bool,
    pub color: bool,
    pub target_levels: FxHashMap<CompactString, Level>,
}

impl Config {

    /// Defaults, with thresholds taken from [`ENV_VAR`] if set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(env) = std::env::var(ENV_VAR) {
            config.parse_filters(&env);
        }
        config
    }

    /// Applies a comma separated list of `level` or `module::path=level` entries.
    ///
    /// Entries with an unknown level are skipped.
    pub fn parse_filters(&mut self, filters: &str) {
        for arg in filters.split(',') {
            let (module, level) = match arg.find('=') {
                Some(i) => (Some(arg[..i].trim()), arg[i + 1..].trim()),
                None => (None, arg.trim()),
            };
            let Ok(level) = Level::from_str(level) else {
                continue
            };
            match module {
                Some(module) if !module.is_empty() => {
                    self.target_levels.insert(CompactString::new(module), level);
                },
                _ => self.level = level,
            }
        }
    }

    /// Threshold for `target`, falling back through its parent modules to `level`.
    pub fn threshold(&self, target: &str) -> Level {
        if self.target_levels.is_empty() {
            return self.level
        }
        let mut substr = target;
        if let Some(&level) = self.target_levels.get(substr) {
            return level
        }
        while let Some(i) = substr.rfind("::") {
            substr = &substr[0..i];
            if let Some(&level) = self.target_levels.get(substr) {
                return level
            }
        }
        self.level
    }
}

pub struct Logger {
    config: Config,
    direct: Box<dyn WriteColor + Send>,
    platform: Box<dyn PlatformConsole>,
}

impl Logger {

    /// Logger writing to stdout and [`StderrConsole`].
    pub fn new(config: Config) -> Self {
        Self::with_outputs(config, sink::stdout(), StderrConsole::new())
    }

    pub fn with_outputs(
        config: Config,
        direct: impl WriteColor + Send + 'static,
        platform: impl PlatformConsole + 'static,
    ) -> Self
    {
        Self {
            config,
            direct: Box::new(direct),
            platform: Box::new(platform),
        }
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline(always)]
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn set_direct_console(&mut self, direct: impl WriteColor + Send + 'static) {
        self.direct = Box::new(direct);
    }

    pub fn set_platform_console(&mut self, platform: impl PlatformConsole + 'static) {
        self.platform = Box::new(platform);
    }

    /// Gates, formats and writes one call.
    ///
    /// `thread` of `None` describes the current thread. Returns whether the line was
    /// written.
    pub fn log(
        &mut self,
        level: Level,
        msg: core::fmt::Arguments,
        timestamp: &DateTime<Utc>,
        site: &CallSite,
        thread: Option<&ThreadInfo>,
    ) -> Result<bool>
    {
        if !self.enabled(level, site.module) {
            return Ok(false)
        }
        let current;
        let thread = match thread {
            _ if !self.config.show_thread => None,
            Some(thread) => Some(thread),
            None => {
                current = ThreadInfo::current();
                Some(&current)
            },
        };
        let line = fmt::format_line(level, msg, site, thread, self.config.tag.as_deref());
        let sink = self.config.sink;
        let written = match sink {
            Sink::PlatformConsole => self.platform.write_line(&line),
            Sink::DirectConsole => {
                write_direct(&mut *self.direct, level, &line, timestamp, self.config.color)
            },
        };
        written.map_err(|err| err.in_sink(sink))?;
        Ok(true)
    }

    /// Whether a call at `level` from `target` would pass the gate.
    #[inline(always)]
    pub fn enabled(&self, level: Level, target: &str) -> bool {
        level != Level::None && should_log(level, self.config.threshold(target))
    }
}

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

#[inline(always)]
fn logger() -> MutexGuard<'static, Logger> {
    LOGGER
        .get_or_init(|| Mutex::new(Logger::new(Config::from_env())))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Initializes the process-wide logger, reading [`ENV_VAR`].
///
/// Happens implicitly on first use otherwise.
pub fn init() {
    drop(logger());
}

/// Snapshot of the process-wide configuration.
pub fn config() -> Config {
    logger().config.clone()
}

/// Edits a copy of the configuration and stores it back.
///
/// `f` runs without the logger locked, so it may log. Changes made by other
/// threads while `f` runs are overwritten.
pub fn configure(f: impl FnOnce(&mut Config)) {
    let mut config = config();
    f(&mut config);
    logger().config = config;
}

#[inline(always)]
pub fn set_tag(tag: Option<&str>) {
    logger().config.tag = tag.map(CompactString::new);
}

#[inline(always)]
pub fn set_level(level: Level) {
    logger().config.level = level;
}

#[inline(always)]
pub fn set_target_level(target: &str, level: Level) {
    logger().config.target_levels.insert(CompactString::new(target), level);
}

#[inline(always)]
pub fn set_sink(sink: Sink) {
    logger().config.sink = sink;
}

#[inline(always)]
pub fn set_show_thread(show_thread: bool) {
    logger().config.show_thread = show_thread;
}

#[inline(always)]
pub fn set_color(color: bool) {
    logger().config.color = color;
}

pub fn set_direct_console(direct: impl WriteColor + Send + 'static) {
    logger().set_direct_console(direct);
}

pub fn set_platform_console(platform: impl PlatformConsole + 'static) {
    logger().set_platform_console(platform);
}

/// Logs through the process-wide logger. See [`Logger::log`].
///
/// The message is rendered before the logger is locked, so arguments whose
/// `Display` logs again do not deadlock. The lock is held while writing, so lines
/// from different threads never interleave.
pub fn log(
    level: Level,
    msg: core::fmt::Arguments,
    timestamp: &DateTime<Utc>,
    site: &CallSite,
    thread: Option<&ThreadInfo>,
) -> Result<bool>
{
    if !logger().enabled(level, site.module) {
        return Ok(false)
    }
    let msg = match msg.as_str() {
        Some(msg) => Cow::Borrowed(msg),
        None => Cow::Owned(msg.to_string()),
    };
    logger().log(level, format_args!("{}", msg), timestamp, site, thread)
}

/// Logs at an explicit [`Level`], capturing the call site, time and thread.
///
/// A leading `with: overrides;` replaces captured values with those set in an
/// [`Overrides`].
#[macro_export]
macro_rules! log_at {
    ($level:expr, with: $overrides:expr; $fmt:expr $(, $arg:expr)* $(,)?) => {{
        let overrides: $crate::Overrides = $overrides;
        $crate::log(
            $level,
            format_args!($fmt, $($arg),*),
            &overrides.timestamp.unwrap_or_else($crate::Utc::now),
            &overrides.site($crate::site!()),
            overrides.thread.as_ref(),
        ).unwrap_or(false)
    }};
    ($level:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(
            $level,
            format_args!($fmt, $($arg),*),
            &$crate::Utc::now(),
            &$crate::site!(),
            None,
        ).unwrap_or(false)
    };
}

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        $crate::log_at!($crate::Level::Info, $($t)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        $crate::log_at!($crate::Level::Debug, $($t)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        $crate::log_at!($crate::Level::Warning, $($t)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        $crate::log_at!($crate::Level::Error, $($t)*)
    };
}
