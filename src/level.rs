use log::Level;

use crate::error::ConfigError;

/// Logging verbs understood by [`crate::Logger::log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Debug,
    Info,
    /// Deprecated spelling of [`Method::Warning`].
    Warn,
    Warning,
    Error,
}

impl Method {
    /// `Warn` resolves to `Warning`; every other method is already canonical.
    pub fn canonical(self) -> Self {
        match self {
            Method::Warn => Method::Warning,
            other => other,
        }
    }

    pub fn level(self) -> Level {
        match self.canonical() {
            Method::Debug => Level::Debug,
            Method::Info => Level::Info,
            Method::Warn | Method::Warning => Level::Warn,
            Method::Error => Level::Error,
        }
    }

    pub fn tag(self) -> &'static str {
        match self.canonical() {
            Method::Debug => "DEBUG",
            Method::Info => "INFO",
            Method::Warn | Method::Warning => "WARN",
            Method::Error => "ERROR",
        }
    }
}

/// Whether a record at `level` reaches a scope whose minimum severity is
/// `threshold`. `log::Level` orders the most severe level first.
pub fn passes(level: Level, threshold: Level) -> bool {
    level <= threshold
}

pub fn parse_level(raw: &str) -> Result<Level, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("warning") {
        return Ok(Level::Warn);
    }
    trimmed
        .parse::<Level>()
        .map_err(|_| ConfigError::InvalidLevel(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_is_an_alias_of_warning() {
        assert_eq!(Method::Warn.canonical(), Method::Warning);
        assert_eq!(Method::Warn.level(), Method::Warning.level());
        assert_eq!(Method::Warn.tag(), "WARN");
        assert_eq!(Method::Warning.tag(), "WARN");
    }

    #[test]
    fn method_table_matches_severity_and_tag() {
        let table = [
            (Method::Debug, Level::Debug, "DEBUG"),
            (Method::Info, Level::Info, "INFO"),
            (Method::Warning, Level::Warn, "WARN"),
            (Method::Error, Level::Error, "ERROR"),
        ];
        for (method, level, tag) in table {
            assert_eq!(method.level(), level);
            assert_eq!(method.tag(), tag);
        }
    }

    #[test]
    fn passes_compares_by_severity() {
        assert!(passes(Level::Error, Level::Info));
        assert!(passes(Level::Info, Level::Info));
        assert!(!passes(Level::Debug, Level::Info));
        assert!(passes(Level::Debug, Level::Trace));
    }

    #[test]
    fn parse_level_accepts_common_spellings() {
        assert_eq!(parse_level("DEBUG").unwrap(), Level::Debug);
        assert_eq!(parse_level("info").unwrap(), Level::Info);
        assert_eq!(parse_level("Warning").unwrap(), Level::Warn);
        assert_eq!(parse_level(" warn ").unwrap(), Level::Warn);
        assert!(matches!(
            parse_level("loud"),
            Err(ConfigError::InvalidLevel(value)) if value == "loud"
        ));
    }
}
