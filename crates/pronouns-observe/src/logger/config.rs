use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::logger::{
    LoggerResult,
    object::{LoggerFormat, LoggerLevel, LoggerTimeZone},
};

/// Environment variable holding an `EnvFilter` expression.
pub const ENV_LEVEL: &str = "PRONOUNS_LOG";
/// Environment variable holding the output format.
pub const ENV_FORMAT: &str = "PRONOUNS_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: LoggerLevel,
    pub tz: LoggerTimeZone,
    /// Print the event target (module path).
    pub with_targets: bool,
    /// ANSI colors in text output; only honored on a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Overlay [`ENV_LEVEL`] and [`ENV_FORMAT`] on top of `self`.
    ///
    /// Unset variables keep the current value; malformed ones are errors.
    pub fn with_env(self) -> LoggerResult<Self> {
        self.with_vars(
            std::env::var(ENV_LEVEL).ok(),
            std::env::var(ENV_FORMAT).ok(),
        )
    }

    fn with_vars(mut self, level: Option<String>, format: Option<String>) -> LoggerResult<Self> {
        if let Some(level) = level {
            self.level = LoggerLevel::new(level)?;
        }
        if let Some(format) = format {
            self.format = format.parse()?;
        }
        Ok(self)
    }

    /// Colors are used only when enabled and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LoggerConfig::default();
        assert_eq!(cfg.format, LoggerFormat::Text);
        assert_eq!(cfg.tz, LoggerTimeZone::Utc);
        assert_eq!(cfg.level.as_str(), "info");
        assert!(cfg.with_targets);
    }

    #[test]
    fn kebab_case_partial_document() {
        let cfg: LoggerConfig =
            serde_json::from_str(r#"{"format":"json","with-targets":false}"#).unwrap();
        assert_eq!(cfg.format, LoggerFormat::Json);
        assert!(!cfg.with_targets);
        assert!(cfg.use_color);
        assert_eq!(cfg.level.as_str(), "info");
    }

    #[test]
    fn vars_override_fields() {
        let cfg = LoggerConfig::default()
            .with_vars(Some("pronouns_core=trace".into()), Some("json".into()))
            .unwrap();
        assert_eq!(cfg.level.as_str(), "pronouns_core=trace");
        assert_eq!(cfg.format, LoggerFormat::Json);

        let unchanged = LoggerConfig::default().with_vars(None, None).unwrap();
        assert_eq!(unchanged, LoggerConfig::default());
    }

    #[test]
    fn malformed_vars_are_errors() {
        assert!(LoggerConfig::default()
            .with_vars(Some("x=nope".into()), None)
            .is_err());
        assert!(LoggerConfig::default()
            .with_vars(None, Some("xml".into()))
            .is_err());
    }
}
