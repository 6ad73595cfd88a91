//! Encoding modes.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Identifies the encoding format a converter reads and writes.
///
/// ```rust
/// use serde_fluent::Mode;
///
/// assert_eq!("yaml".parse::<Mode>().unwrap(), Mode::Yaml);
/// assert_eq!(Mode::Json.to_string(), "json");
/// assert!("toml".parse::<Mode>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Mode {
    /// Structured text: JSON.
    #[default]
    Json,
    /// Human-readable text: YAML.
    Yaml,
}

impl Mode {
    /// Every supported mode.
    pub const ALL: [Mode; 2] = [Mode::Json, Mode::Yaml];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Mode::Json => "json",
            Mode::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Mode::Json),
            "yaml" | "yml" => Ok(Mode::Yaml),
            other => Err(Error::configuration(format!("unknown mode `{}`", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("JSON".parse::<Mode>().unwrap(), Mode::Json);
        assert_eq!(" yml ".parse::<Mode>().unwrap(), Mode::Yaml);
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "xml".parse::<Mode>().unwrap_err();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("`xml`")));
    }
}
