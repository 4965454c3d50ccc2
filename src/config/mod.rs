use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::utils::{app_data_dir, config_dir_in, config_file_in, ensure_dir};
use crate::domain::PeriodWindow;
use crate::errors::BudgetError;

const TMP_SUFFIX: &str = "tmp";
const DEFAULT_DECIMAL_PLACES: usize = 2;

/// User preferences that shape a fresh budget and how it is rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    #[serde(default)]
    pub income_categories: Vec<String>,
    #[serde(default)]
    pub expense_categories: Vec<String>,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: usize,
}

fn default_decimal_places() -> usize {
    DEFAULT_DECIMAL_PLACES
}

impl Default for Config {
    fn default() -> Self {
        let window = PeriodWindow::default();
        Self {
            window_start: window.start(),
            window_end: window.end(),
            income_categories: vec!["General Income".into(), "Other Income".into()],
            expense_categories: vec!["Operational Expenses".into(), "Salaries & Wages".into()],
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl Config {
    /// Window described by the configured bounds, clamped if inverted.
    pub fn window(&self) -> PeriodWindow {
        PeriodWindow::new(self.window_start, self.window_end)
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BudgetError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BudgetError> {
        ensure_dir(&base)?;
        ensure_dir(&config_dir_in(&base))?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, BudgetError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), BudgetError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), BudgetError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix_to_extension() {
        let tmp = tmp_path(Path::new("/x/config.json"));
        assert_eq!(tmp, PathBuf::from("/x/config.json.tmp"));
    }

    #[test]
    fn inverted_config_window_is_clamped() {
        let config = Config {
            window_start: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            window_end: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            ..Config::default()
        };
        assert_eq!(config.window().month_count(), 1);
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let json = r#"{"window_start":"2025-01-01","window_end":"2025-06-01"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.income_categories.is_empty());
        assert_eq!(config.decimal_places, 2);
        assert_eq!(config.window().month_count(), 6);
    }
}
