#![forbid(unsafe_code)]

//! Locale settings: unit systems, currency, separators and engine limits.
//!
//! Settings load from TOML or JSON. Every field has a default, so an empty
//! document is a valid configuration.
//!
//! ```toml
//! language = "german.lng.toml"
//! currency = "EUR"
//! max_nesting = 16
//!
//! [units]
//! velocity = "metric"
//! weight = "si"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::currency::{CurrencySpec, builtin_currency};

/// Default limit on nested sub-string expansion.
pub const DEFAULT_MAX_NESTING: usize = 16;

/// A family of display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
    Si,
}

impl UnitSystem {
    pub const ALL: [Self; 3] = [Self::Imperial, Self::Metric, Self::Si];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Imperial => 0,
            Self::Metric => 1,
            Self::Si => 2,
        }
    }
}

/// Unit system per physical quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSettings {
    pub velocity: UnitSystem,
    pub power: UnitSystem,
    pub weight: UnitSystem,
    pub volume: UnitSystem,
    pub force: UnitSystem,
    pub height: UnitSystem,
}

impl Default for UnitSettings {
    fn default() -> Self {
        Self {
            velocity: UnitSystem::Imperial,
            power: UnitSystem::Imperial,
            weight: UnitSystem::Metric,
            volume: UnitSystem::Metric,
            force: UnitSystem::Si,
            height: UnitSystem::Imperial,
        }
    }
}

/// Currency choice: a built-in code or a fully custom specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrencySetting {
    Code(String),
    Custom(CurrencySpec),
}

impl Default for CurrencySetting {
    fn default() -> Self {
        Self::Code("GBP".into())
    }
}

impl CurrencySetting {
    /// The effective specification; unknown codes read as the default.
    #[must_use]
    pub fn spec(&self) -> CurrencySpec {
        match self {
            Self::Code(code) => builtin_currency(code).unwrap_or_default(),
            Self::Custom(spec) => spec.clone(),
        }
    }
}

/// A screen resolution, listed by generated resolution strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Everything a user can tune about how text is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleSettings {
    /// Preferred language file name, e.g. `"german.lng.toml"`.
    pub language: Option<String>,
    /// ISO code of the pack used for missing translations.
    pub base_language: String,
    /// Directories searched for language files.
    pub search_paths: Vec<PathBuf>,
    pub units: UnitSettings,
    pub currency: CurrencySetting,
    /// Overrides of the language's separators.
    pub digit_group_separator: Option<String>,
    pub digit_group_separator_currency: Option<String>,
    pub digit_decimal_separator: Option<String>,
    /// Nested sub-string limit; deeper expansions render a placeholder.
    pub max_nesting: usize,
    /// Text rendered by `{REV}`.
    pub revision: String,
    /// Use the silly surname list for generated names.
    pub toyland_names: bool,
    pub resolutions: Vec<Resolution>,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            language: None,
            base_language: "en_GB".into(),
            search_paths: vec![PathBuf::from("lang")],
            units: UnitSettings::default(),
            currency: CurrencySetting::default(),
            digit_group_separator: None,
            digit_group_separator_currency: None,
            digit_decimal_separator: None,
            max_nesting: DEFAULT_MAX_NESTING,
            revision: concat!("lingo ", env!("CARGO_PKG_VERSION")).into(),
            toyland_names: false,
            resolutions: vec![
                Resolution { width: 640, height: 480 },
                Resolution { width: 1280, height: 720 },
                Resolution { width: 1920, height: 1080 },
            ],
        }
    }
}

impl LocaleSettings {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load a file by extension (`.json` or TOML otherwise) and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = if path.extension().is_some_and(|e| e == "json") {
            Self::from_json_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        let errors = settings.validate();
        if errors.is_empty() {
            Ok(settings)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Check every setting. An empty list means the settings are usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_nesting == 0 {
            errors.push("max_nesting must be > 0".into());
        }
        if self.base_language.trim().is_empty() {
            errors.push("base_language must not be empty".into());
        }
        match &self.currency {
            CurrencySetting::Code(code) if builtin_currency(code).is_none() => {
                errors.push(format!("unknown currency code '{code}'"));
            }
            CurrencySetting::Custom(spec) if spec.rate == 0 => {
                errors.push("currency.rate must be > 0".into());
            }
            _ => {}
        }
        for (i, r) in self.resolutions.iter().enumerate() {
            if r.width == 0 || r.height == 0 {
                errors.push(format!("resolutions[{i}] must have non-zero dimensions"));
            }
        }

        errors
    }

    /// The effective currency.
    #[must_use]
    pub fn currency_spec(&self) -> CurrencySpec {
        self.currency.spec()
    }
}

/// Errors from loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[source] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[source] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::SymbolPosition;

    #[test]
    fn defaults_are_valid() {
        let settings = LocaleSettings::default();
        assert!(settings.validate().is_empty());
        assert_eq!(settings.max_nesting, DEFAULT_MAX_NESTING);
        assert_eq!(settings.currency_spec().code, "GBP");
    }

    #[test]
    fn empty_toml_is_default() {
        let settings = LocaleSettings::from_toml_str("").expect("empty document");
        assert_eq!(settings, LocaleSettings::default());
    }

    #[test]
    fn partial_toml() {
        let settings = LocaleSettings::from_toml_str(
            r#"
            language = "german.lng.toml"
            currency = "eur"
            max_nesting = 4

            [units]
            velocity = "si"
            "#,
        )
        .expect("valid toml");
        assert_eq!(settings.language.as_deref(), Some("german.lng.toml"));
        assert_eq!(settings.units.velocity, UnitSystem::Si);
        assert_eq!(settings.units.weight, UnitSystem::Metric);
        assert_eq!(settings.currency_spec().prefix, "\u{20AC}");
        assert_eq!(settings.max_nesting, 4);
    }

    #[test]
    fn custom_currency_from_json() {
        let settings = LocaleSettings::from_json_str(
            r#"{"currency": {"code": "XTS", "rate": 7, "suffix": " zorks", "symbol_pos": "suffix"}}"#,
        )
        .expect("valid json");
        let spec = settings.currency_spec();
        assert_eq!(spec.rate, 7);
        assert_eq!(spec.symbol_pos, SymbolPosition::Suffix);
        assert!(settings.validate().is_empty());
    }

    #[test]
    fn validation_collects_errors() {
        let settings = LocaleSettings {
            max_nesting: 0,
            currency: CurrencySetting::Code("XYZ".into()),
            resolutions: vec![Resolution { width: 0, height: 10 }],
            ..LocaleSettings::default()
        };
        assert_eq!(settings.validate().len(), 3);
    }

    #[test]
    fn bad_syntax_is_reported() {
        assert!(matches!(
            LocaleSettings::from_toml_str("max_nesting = ["),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            LocaleSettings::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json = dir.path().join("locale.json");
        std::fs::write(&json, r#"{"max_nesting": 3}"#).expect("write");
        assert_eq!(LocaleSettings::load(&json).expect("load").max_nesting, 3);

        let toml_path = dir.path().join("locale.toml");
        std::fs::write(&toml_path, "max_nesting = 0").expect("write");
        assert!(matches!(
            LocaleSettings::load(&toml_path),
            Err(ConfigError::Validation(_))
        ));
    }
}
