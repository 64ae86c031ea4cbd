/**
 * User preferences, persisted as a JSON file.
 */
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coordinate::CoordinateFormat;
use crate::telemetry::{Celsius, Language};

pub const SETTINGS_FILE_NAME: &str = "settings.json";
const SETTINGS_DIR_NAME: &str = "compass-rust";
const FALLBACK_SETTINGS_PATH: &str = "compass-settings.json";


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeMode {
    Dark,
    Light,
    Night,
}


impl ThemeMode {
    /// The mode the theme switcher moves to next.
    pub fn next(self) -> ThemeMode {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Night,
            ThemeMode::Night => ThemeMode::Dark,
        }
    }
}


impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<ThemeMode, String> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            "night" => Ok(ThemeMode::Night),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}


impl TemperatureUnit {
    pub fn convert(self, celsius: Celsius) -> f32 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}


impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<TemperatureUnit, String> {
        match s.to_ascii_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(format!("Unknown temperature unit: {}", s)),
        }
    }
}


#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Json(serde_json::Error),
    UnknownKey(String),
    InvalidValue { key: String, message: String },
}


impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "Unable to access settings: {}", e),
            SettingsError::Json(e) => write!(f, "Malformed settings: {}", e),
            SettingsError::UnknownKey(key) => write!(f, "Unknown setting: {}", key),
            SettingsError::InvalidValue { key, message } => {
                write!(f, "Invalid value for {}: {}", key, message)
            }
        }
    }
}


impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Json(e) => Some(e),
            _ => None,
        }
    }
}


impl From<io::Error> for SettingsError {
    fn from(e: io::Error) -> SettingsError {
        SettingsError::Io(e)
    }
}


impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> SettingsError {
        SettingsError::Json(e)
    }
}


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme_mode: ThemeMode,
    pub temperature_unit: TemperatureUnit,
    pub coordinate_format: CoordinateFormat,
    /// Language tag, or "system" to follow the environment.
    pub language: String,
    /// None until the user has answered the consent prompt.
    pub consent: Option<bool>,
}


impl Default for Settings {
    fn default() -> Settings {
        Settings {
            theme_mode: ThemeMode::Dark,
            temperature_unit: TemperatureUnit::Celsius,
            coordinate_format: CoordinateFormat::Decimal,
            language: "system".to_string(),
            consent: None,
        }
    }
}


impl Settings {
    /**
     * Loads settings from a file. A missing file is not an error; defaults
     * are returned instead.
     */
    pub fn load(path: &Path) -> Result<Settings, SettingsError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No settings at {}, using defaults", path.display());
                return Ok(Settings::default());
            }
            Err(e) => return Err(SettingsError::Io(e)),
        };
        let settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /**
     * Updates one setting from its textual form, as given on the command
     * line.
     */
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = |message: String| SettingsError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "theme" => self.theme_mode = value.parse().map_err(invalid)?,
            "temperature_unit" => self.temperature_unit = value.parse().map_err(invalid)?,
            "coordinate_format" => self.coordinate_format = value.parse().map_err(invalid)?,
            "language" => {
                if value.trim().is_empty() {
                    return Err(invalid("language must not be empty".to_string()));
                }
                self.language = value.trim().to_string();
            }
            "consent" => {
                self.consent = Some(value.parse::<bool>().map_err(|e| invalid(e.to_string()))?)
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /**
     * Resolves the configured language against a system locale such as
     * `de_DE.UTF-8`. Without one, "system" means English.
     */
    pub fn language_for(&self, system_locale: Option<&str>) -> Language {
        if self.language == "system" {
            match system_locale {
                Some(locale) => Language::from_tag(locale),
                None => Language::English,
            }
        } else {
            Language::from_tag(&self.language)
        }
    }

    /// Like `language_for`, with the locale taken from LANG.
    pub fn resolved_language(&self) -> Language {
        self.language_for(std::env::var("LANG").ok().as_deref())
    }
}


/**
 * Where settings live when no path is given: the platform's config directory,
 * or the working directory if there isn't one.
 */
pub fn default_settings_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME),
        None => PathBuf::from(FALLBACK_SETTINGS_PATH),
    }
}
