use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::io;

/// Error type for schedule operations.
#[derive(Debug)]
pub enum ScheduleError {
    /// The schedule file does not exist yet.
    Missing,
    /// The requested week offset cannot be represented as a date.
    InvalidOffset(i64),
    /// The schedule file could not be read or written.
    Io(io::Error),
    /// The schedule file is not valid JSON.
    Malformed(serde_json::Error),
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::Missing => {
                write!(f, "the schedule file does not exist")
            }
            ScheduleError::InvalidOffset(offset) => {
                write!(f, "week offset {offset} is out of range")
            }
            ScheduleError::Io(err) => write!(f, "io error: {err}"),
            ScheduleError::Malformed(err) => {
                write!(f, "malformed schedule file: {err}")
            }
        }
    }
}

impl StdError for ScheduleError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ScheduleError::Missing => None,
            ScheduleError::InvalidOffset(_) => None,
            ScheduleError::Io(err) => Some(err),
            ScheduleError::Malformed(err) => Some(err),
        }
    }
}

impl From<io::Error> for ScheduleError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            ScheduleError::Missing
        } else {
            ScheduleError::Io(err)
        }
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        ScheduleError::Malformed(err)
    }
}
