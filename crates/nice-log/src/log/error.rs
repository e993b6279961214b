use super::Sink;

#[derive(Debug)]
pub enum LogError {
    /// Raw write failure, as returned by a [`PlatformConsole`](super::PlatformConsole).
    IoError(std::io::Error),
    /// A formatted line could not be written to `sink`.
    Write {
        sink: Sink,
        source: std::io::Error,
    },
}

impl LogError {

    pub(crate) fn in_sink(self, sink: Sink) -> Self {
        match self {
            Self::IoError(source) => Self::Write { sink, source },
            err => err,
        }
    }
}

impl core::fmt::Display for LogError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IoError(_) => write!(f, "failed to write log output"),
            Self::Write { sink, .. } => write!(f, "failed to write log line to {}", sink),
        }
    }
}

impl core::error::Error for LogError {

    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for LogError {

    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}
