use core::str::FromStr;

use termcolor::Color;

/// Severity of a log call, ranked low to high.
///
/// [`Level::None`] only makes sense as a threshold: nothing is ranked at or above it,
/// so a logger configured with it suppresses every call.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Level {
    #[default]
    Info = 1,
    Debug = 2,
    Warning = 3,
    Error = 4,
    None = 5,
}

impl Level {

    #[inline(always)]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// One character display code.
    #[inline(always)]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Info => "I",
            Self::Debug => "D",
            Self::Warning => "W",
            Self::Error => "E",
            Self::None => "N",
        }
    }

    #[inline(always)]
    pub(crate) const fn color(self) -> Option<Color> {
        match self {
            Self::Info => Some(Color::Green),
            Self::Debug => Some(Color::Blue),
            Self::Warning => Some(Color::Yellow),
            Self::Error => Some(Color::Red),
            Self::None => None,
        }
    }
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("warning") || s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warning)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("none") {
            Ok(Self::None)
        } else {
            Err(())
        }
    }
}

/// Returns whether a call at `requested` passes a `threshold`.
#[inline(always)]
pub const fn should_log(requested: Level, threshold: Level) -> bool {
    requested.rank() >= threshold.rank()
}

#[cfg(test)]
mod tests {

    use super::*;

    const ALL: [Level; 5] = [
        Level::Info, Level::Debug, Level::Warning, Level::Error, Level::None,
    ];

    #[test]
    fn gate_matches_rank_order() {
        for s in ALL {
            for t in ALL {
                assert_eq!(should_log(s, t), s.rank() >= t.rank(), "{s:?} vs {t:?}");
            }
        }
    }

    #[test]
    fn warning_threshold() {
        assert!(!should_log(Level::Info, Level::Warning));
        assert!(!should_log(Level::Debug, Level::Warning));
        assert!(should_log(Level::Warning, Level::Warning));
        assert!(should_log(Level::Error, Level::Warning));
    }

    #[test]
    fn none_threshold_suppresses_real_levels() {
        for s in &ALL[..4] {
            assert!(!should_log(*s, Level::None));
        }
    }

    #[test]
    fn codes() {
        let codes: Vec<_> = ALL.iter().map(|l| l.code()).collect();
        assert_eq!(codes, ["I", "D", "W", "E", "N"]);
    }

    #[test]
    fn parse_names() {
        assert_eq!("INFO".parse::<Level>(), Ok(Level::Info));
        assert_eq!("warn".parse::<Level>(), Ok(Level::Warning));
        assert_eq!("Warning".parse::<Level>(), Ok(Level::Warning));
        assert_eq!("none".parse::<Level>(), Ok(Level::None));
        assert_eq!("trace".parse::<Level>(), Err(()));
    }
}
