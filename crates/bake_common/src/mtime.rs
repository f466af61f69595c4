//! File modification times as persisted in the dependency store.

use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// A file modification time in floating-point seconds since the Unix epoch.
///
/// The textual form is the shortest decimal that parses back to the same
/// value, so a time survives a save/load cycle of the dependency store
/// bit-for-bit and unchanged files compare equal on the next run.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct ModTime(f64);

/// Error returned when a stored modification time cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid modification time '{0}'")]
pub struct ParseModTimeError(pub String);

impl ModTime {
    /// Creates a modification time from seconds since the Unix epoch.
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Returns the time as seconds since the Unix epoch.
    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Converts a [`SystemTime`]; times before the epoch become negative.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => Self(d.as_secs_f64()),
            Err(e) => Self(-e.duration().as_secs_f64()),
        }
    }

    /// Reads the modification time of the file at `path`.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let modified = std::fs::metadata(path)?.modified()?;
        Ok(Self::from_system_time(modified))
    }

    /// Returns `true` if `self` is strictly later than `other`.
    pub fn is_newer_than(self, other: ModTime) -> bool {
        self.0 > other.0
    }
}

impl fmt::Display for ModTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModTime {
    type Err = ParseModTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Self(v)),
            _ => Err(ParseModTimeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn display_roundtrips_exactly() {
        let t = ModTime::from_secs(1_700_000_000.123_456_7);
        let back: ModTime = t.to_string().parse().unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn parses_python_style_floats() {
        let t: ModTime = "1700000000.0".parse().unwrap();
        assert_eq!(t.as_secs(), 1_700_000_000.0);
        let t: ModTime = "1.7e9".parse().unwrap();
        assert_eq!(t.as_secs(), 1_700_000_000.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!("abc".parse::<ModTime>().is_err());
        assert!("inf".parse::<ModTime>().is_err());
        assert!("NaN".parse::<ModTime>().is_err());
    }

    #[test]
    fn newer_than() {
        let a = ModTime::from_secs(10.0);
        let b = ModTime::from_secs(10.5);
        assert!(b.is_newer_than(a));
        assert!(!a.is_newer_than(b));
        assert!(!a.is_newer_than(a));
    }

    #[test]
    fn from_system_time_before_epoch() {
        let t = UNIX_EPOCH - Duration::from_secs(5);
        assert_eq!(ModTime::from_system_time(t).as_secs(), -5.0);
    }

    #[test]
    fn of_file_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        std::fs::write(&path, "int x;").unwrap();
        let t = ModTime::of_file(&path).unwrap();
        assert!(t.as_secs() > 0.0);
    }

    #[test]
    fn of_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ModTime::of_file(&dir.path().join("gone.c")).is_err());
    }
}
