// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::model::{CalendarMeta, MarkupDialect};
use crate::storage::LocalStorage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};

pub const YEAR_PLACEHOLDER: &str = "%YEAR%";

fn default_input_pattern() -> String {
    "m21-termine%YEAR%.csv".to_string()
}
fn default_output() -> String {
    "m21-termine.ics".to_string()
}
fn default_html_pattern() -> String {
    "m21-termine%YEAR%.html".to_string()
}
fn default_true() -> bool {
    true
}

fn default_first_year() -> i32 {
    2009
}
fn default_last_year() -> i32 {
    2016
}

fn default_base_url() -> String {
    "http://www.darc.de/".to_string()
}

fn default_calendar_name() -> String {
    "M21-Termine".to_string()
}
fn default_calendar_description() -> String {
    "Terminkalender des Ortsverbands Uetersen (M21) des Deutschen Amateur Radio Clubs (DARC)"
        .to_string()
}

fn default_header_date() -> String {
    "Datum".to_string()
}
fn default_header_time() -> String {
    "Uhrzeit".to_string()
}

/// What to do when a date names a month that is not in the month table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum UnknownMonthPolicy {
    /// Stop the whole run; nothing is written.
    #[default]
    Abort,
    /// Log a warning and drop the row.
    Skip,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_input_pattern")]
    pub input_pattern: String,
    #[serde(default = "default_output")]
    pub output: String,
    /// Write one HTML table per year next to the calendar.
    #[serde(default = "default_true")]
    pub html: bool,
    #[serde(default = "default_html_pattern")]
    pub html_pattern: String,

    #[serde(default = "default_first_year")]
    pub first_year: i32,
    #[serde(default = "default_last_year")]
    pub last_year: i32,

    #[serde(default)]
    pub dialect: MarkupDialect,
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,
    #[serde(default = "default_calendar_description")]
    pub calendar_description: String,

    // Constant for every event of a run; each run replaces the whole feed.
    #[serde(default)]
    pub sequence: u32,

    #[serde(default)]
    pub unknown_month: UnknownMonthPolicy,

    #[serde(default = "default_header_date")]
    pub header_date: String,
    #[serde(default = "default_header_time")]
    pub header_time: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_pattern: default_input_pattern(),
            output: default_output(),
            html: true,
            html_pattern: default_html_pattern(),
            first_year: default_first_year(),
            last_year: default_last_year(),
            dialect: MarkupDialect::default(),
            base_url: default_base_url(),
            calendar_name: default_calendar_name(),
            calendar_description: default_calendar_description(),
            sequence: 0,
            unknown_month: UnknownMonthPolicy::default(),
            header_date: default_header_date(),
            header_time: default_header_time(),
        }
    }
}

impl Config {
    /// Load the configuration using an explicit context.
    /// A missing file yields the defaults; a broken one is an error.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. Unlike [`Config::load`], the file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.first_year > self.last_year {
            anyhow::bail!(
                "first_year ({}) is after last_year ({})",
                self.first_year,
                self.last_year
            );
        }
        if !self.input_pattern.contains(YEAR_PLACEHOLDER) {
            anyhow::bail!(
                "input_pattern '{}' lacks the {} placeholder",
                self.input_pattern,
                YEAR_PLACEHOLDER
            );
        }
        Ok(())
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(path)
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.first_year..=self.last_year
    }

    pub fn input_file_for(&self, year: i32) -> String {
        self.input_pattern
            .replace(YEAR_PLACEHOLDER, &year.to_string())
    }

    pub fn html_file_for(&self, year: i32) -> Option<String> {
        self.html
            .then(|| self.html_pattern.replace(YEAR_PLACEHOLDER, &year.to_string()))
    }

    pub fn calendar_meta(&self) -> CalendarMeta {
        CalendarMeta {
            name: self.calendar_name.clone(),
            description: self.calendar_description.clone(),
        }
    }

    pub fn is_header(&self, date: Option<&str>, time: Option<&str>) -> bool {
        date == Some(self.header_date.as_str()) && time == Some(self.header_time.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            dialect = "link-tag"
            first_year = 2015
            unknown_month = "skip"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.dialect, MarkupDialect::LinkTag);
        assert_eq!(cfg.unknown_month, UnknownMonthPolicy::Skip);
        assert_eq!(cfg.years(), 2015..=2016);
        assert_eq!(cfg.output, "m21-termine.ics");
        assert_eq!(cfg.sequence, 0);
    }

    #[test]
    fn test_file_name_patterns() {
        let cfg = Config::default();
        assert_eq!(cfg.input_file_for(2014), "m21-termine2014.csv");
        assert_eq!(
            cfg.html_file_for(2014),
            Some("m21-termine2014.html".to_string())
        );
    }

    #[test]
    fn test_disabled_html_is_written_explicitly() {
        let cfg = Config {
            html: false,
            ..Config::default()
        };
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        assert!(toml_str.contains("html = false"));
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.html_file_for(2014), None);
    }

    #[test]
    fn test_validate_rejects_inverted_years() {
        let cfg = Config {
            first_year: 2016,
            last_year: 2010,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_header_detection() {
        let cfg = Config::default();
        assert!(cfg.is_header(Some("Datum"), Some("Uhrzeit")));
        assert!(!cfg.is_header(Some("3. Januar"), Some("Uhrzeit")));
        assert!(!cfg.is_header(Some("Datum"), None));
    }
}
