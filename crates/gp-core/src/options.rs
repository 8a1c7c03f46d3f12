//! Planner options and configuration file loading
//!
//! The config file uses `OPTIONS=` lines with comma-separated entries:
//!
//! ```text
//! # growthrc
//! OPTIONS=data_dir:/home/me/fates,max_level:40
//! OPTIONS=avatar:Corrin,theme:light,!unchecked_damage
//! ```
//!
//! `!avatars` clears the default avatar list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::consts::{DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_LEVEL};

/// Avatar units recognised when no `avatar:` option is given
pub const DEFAULT_AVATARS: [&str; 4] = ["カムイ", "Corrin", "カンナ", "Kana"];

/// Options parsing error
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value '{1}' for option '{0}'")]
    InvalidValue(String, String),

    #[error("Missing value for option '{0}'")]
    MissingValue(String),
}

/// Terminal color preference
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ThemePreference {
    /// Detect from the terminal
    #[default]
    Auto,
    Dark,
    Light,
}

/// User-configurable planner options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerOptions {
    /// Directory with the CSV sheets; bundled tables are used when unset
    pub data_dir: Option<PathBuf>,
    /// Units allowed a boon and a bane
    pub avatars: Vec<String>,
    /// Highest level accepted in a route interval
    pub max_level: u32,
    /// Saved projections kept per session
    pub history_limit: usize,
    pub theme: ThemePreference,
    /// Skip input-domain checks in the damage calculator
    pub unchecked_damage: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            data_dir: None,
            avatars: DEFAULT_AVATARS.iter().map(|s| s.to_string()).collect(),
            max_level: DEFAULT_MAX_LEVEL,
            history_limit: DEFAULT_HISTORY_LIMIT,
            theme: ThemePreference::Auto,
            unchecked_damage: false,
        }
    }
}

impl PlannerOptions {
    /// Default config file location (`<config dir>/growth-planner/growthrc`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("growth-planner").join("growthrc"))
    }

    /// Load options from a file
    pub fn load_from_file(path: &Path) -> Result<Self, OptionsError> {
        let contents = std::fs::read_to_string(path)?;
        let options = Self::parse_config(&contents)?;
        tracing::debug!(path = %path.display(), "loaded options");
        Ok(options)
    }

    /// Parse options from a config string
    pub fn parse_config(contents: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();
        let mut custom_avatars = false;

        for line in contents.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                    // The first avatar entry, or !avatars, replaces the defaults
                    let key = split_value(opt).map(|(key, _)| key);
                    if (key == Some("avatar") || opt == "!avatars") && !custom_avatars {
                        options.avatars.clear();
                        custom_avatars = true;
                    }
                    options.parse_option(opt)?;
                }
            } else {
                tracing::warn!(line, "ignoring config line without OPTIONS=");
            }
        }

        Ok(options)
    }

    /// Whether the unit may pick a boon and a bane
    pub fn is_avatar(&self, name: &str) -> bool {
        self.avatars.iter().any(|avatar| avatar == name)
    }

    /// Parse a single option
    fn parse_option(&mut self, opt: &str) -> Result<(), OptionsError> {
        if let Some((key, value)) = split_value(opt) {
            return self.set_option(key, value);
        }

        let (negated, name) = match opt.strip_prefix('!') {
            Some(name) => (true, name),
            None => (false, opt),
        };
        self.set_bool_option(name, !negated)
    }

    fn set_bool_option(&mut self, name: &str, value: bool) -> Result<(), OptionsError> {
        match name {
            "unchecked_damage" => self.unchecked_damage = value,
            // Only the negated form: an empty avatar list
            "avatars" if !value => self.avatars.clear(),
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionsError> {
        if value.is_empty() {
            return Err(OptionsError::MissingValue(name.to_string()));
        }
        let invalid = || OptionsError::InvalidValue(name.to_string(), value.to_string());

        match name {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "avatar" => {
                if !self.is_avatar(value) {
                    self.avatars.push(value.to_string());
                }
            }
            "max_level" => {
                self.max_level = value.parse().map_err(|_| invalid())?;
                if self.max_level == 0 {
                    return Err(invalid());
                }
            }
            "history_limit" => self.history_limit = value.parse().map_err(|_| invalid())?,
            "theme" => self.theme = value.parse().map_err(|_| invalid())?,
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Convert options to config file format
    pub fn to_config_string(&self) -> String {
        let mut lines = vec!["# growth-planner configuration".to_string(), String::new()];

        if let Some(dir) = &self.data_dir {
            lines.push(format!("OPTIONS=data_dir:{}", dir.display()));
        }
        if self.avatars.is_empty() {
            lines.push("OPTIONS=!avatars".to_string());
        }
        for avatar in &self.avatars {
            lines.push(format!("OPTIONS=avatar:{avatar}"));
        }
        lines.push(format!(
            "OPTIONS=max_level:{},history_limit:{}",
            self.max_level, self.history_limit
        ));
        lines.push(format!("OPTIONS=theme:{}", self.theme));
        lines.push(format!(
            "OPTIONS={}",
            if self.unchecked_damage {
                "unchecked_damage"
            } else {
                "!unchecked_damage"
            }
        ));

        lines.join("\n") + "\n"
    }
}

/// Split `key:value` or `key=value`
fn split_value(opt: &str) -> Option<(&str, &str)> {
    opt.split_once(':')
        .or_else(|| opt.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = PlannerOptions::default();
        assert!(opts.is_avatar("カムイ"));
        assert!(!opts.is_avatar("ジョーカー"));
        assert_eq!(opts.max_level, DEFAULT_MAX_LEVEL);
        assert_eq!(opts.theme, ThemePreference::Auto);
    }

    #[test]
    fn test_parse_value_options() {
        let config = "# comment\nOPTIONS=data_dir:/tmp/fates,max_level:20,theme:Light";
        let opts = PlannerOptions::parse_config(config).unwrap();
        assert_eq!(opts.data_dir, Some(PathBuf::from("/tmp/fates")));
        assert_eq!(opts.max_level, 20);
        assert_eq!(opts.theme, ThemePreference::Light);
    }

    #[test]
    fn test_avatar_option_replaces_defaults() {
        let opts = PlannerOptions::parse_config("OPTIONS=avatar:Robin,avatar:Byleth").unwrap();
        assert_eq!(opts.avatars, vec!["Robin", "Byleth"]);
        let opts = PlannerOptions::parse_config("OPTIONS=avatar=Robin").unwrap();
        assert_eq!(opts.avatars, vec!["Robin"]);
    }

    #[test]
    fn test_empty_avatar_list() {
        let opts = PlannerOptions::parse_config("OPTIONS=!avatars").unwrap();
        assert!(opts.avatars.is_empty());
        let config = "OPTIONS=!avatars\nOPTIONS=avatar:Robin";
        let opts = PlannerOptions::parse_config(config).unwrap();
        assert_eq!(opts.avatars, vec!["Robin"]);
        assert!(matches!(
            PlannerOptions::parse_config("OPTIONS=avatars"),
            Err(OptionsError::UnknownOption(_))
        ));

        let mut opts = PlannerOptions::default();
        opts.avatars.clear();
        let parsed = PlannerOptions::parse_config(&opts.to_config_string()).unwrap();
        assert_eq!(parsed, opts);
    }

    #[test]
    fn test_bool_option() {
        let opts = PlannerOptions::parse_config("OPTIONS=unchecked_damage").unwrap();
        assert!(opts.unchecked_damage);
        let opts = PlannerOptions::parse_config("OPTIONS=!unchecked_damage").unwrap();
        assert!(!opts.unchecked_damage);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            PlannerOptions::parse_config("OPTIONS=colour"),
            Err(OptionsError::UnknownOption(_))
        ));
        assert!(matches!(
            PlannerOptions::parse_config("OPTIONS=max_level:lots"),
            Err(OptionsError::InvalidValue(..))
        ));
        assert!(matches!(
            PlannerOptions::parse_config("OPTIONS=max_level:0"),
            Err(OptionsError::InvalidValue(..))
        ));
        assert!(matches!(
            PlannerOptions::parse_config("OPTIONS=data_dir:"),
            Err(OptionsError::MissingValue(_))
        ));
    }

    #[test]
    fn test_roundtrip() {
        let mut opts = PlannerOptions::default();
        opts.data_dir = Some(PathBuf::from("data"));
        opts.max_level = 30;
        opts.theme = ThemePreference::Dark;
        opts.unchecked_damage = true;

        let parsed = PlannerOptions::parse_config(&opts.to_config_string()).unwrap();
        assert_eq!(parsed, opts);
    }
}
