#![forbid(unsafe_code)]

//! Languages, templates and string resolution for lingo.
//!
//! # Role in lingo
//! `lingo-i18n` owns everything that is data rather than rendering: plural
//! rules, language metadata and packs, the template parser that turns
//! directive text into an instruction stream, the [`TemplateStore`] that
//! maps identifiers to templates, generated names, language discovery and
//! locale settings.
//!
//! # How it fits in the system
//! `lingo-format` walks the [`Template`] instructions produced here and
//! reads the locale's separators, calendar and unit templates from the
//! active [`LanguagePack`]. `lingo-glyph` enumerates pack templates to probe
//! font coverage. Nothing in this crate formats a number or touches a font.

pub mod catalog;
pub mod config;
pub mod currency;
pub mod generator;
pub mod language;
pub mod loader;
pub mod plural;
pub mod template;

pub use catalog::{Lookup, Resolved, TemplateStore};
pub use config::{
    ConfigError, CurrencySetting, DEFAULT_MAX_NESTING, LocaleSettings, Resolution, UnitSettings,
    UnitSystem,
};
pub use currency::{CurrencySpec, SymbolPosition, builtin_currency};
pub use generator::{Generated, SpecialNames, StringGenerator};
pub use language::{
    Calendar, LanguageMetadata, LanguagePack, Quantity, UNDEFINED_STRING, UnitTemplates,
};
pub use loader::{
    LanguagePackError, LoadedLanguages, choose_language, discover_languages,
    initialize_language_packs, parse_language_pack, read_language_pack,
};
pub use plural::PluralRule;
pub use template::{ArgRef, Command, Instruction, Template};
