#![forbid(unsafe_code)]

//! Rendering for lingo.
//!
//! # Role in lingo
//! `lingo-format` turns a string identifier and a parameter stack into
//! text. [`FormatInterpreter`] walks the instruction stream of a template,
//! formatting numbers, money, dates and physical quantities for the active
//! locale and expanding nested strings. [`StringEngine`] wraps it with the
//! global parameter stack and an atomically swappable language state.
//!
//! # How it fits in the system
//! Templates and language data come from `lingo-i18n`; parameters and
//! control codes from `lingo-core`. `lingo-glyph` renders through this
//! crate when it probes fonts with fully expanded strings.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lingo_core::{ParameterStack, StringId};
//! use lingo_format::StringEngine;
//! use lingo_i18n::{LanguageMetadata, LanguagePack, LocaleSettings, TemplateStore};
//!
//! let mut pack = LanguagePack::new(LanguageMetadata::default());
//! pack.insert(StringId::from_raw(1), "{COUNT} train{P s} waiting").unwrap();
//! let mut engine = StringEngine::new(
//!     TemplateStore::new(Arc::new(pack)),
//!     LocaleSettings::default(),
//! );
//!
//! engine.set_param(0, 3u64);
//! assert_eq!(engine.get_string(StringId::from_raw(1)).text, "3 trains waiting");
//! ```

pub mod currency;
pub mod date;
pub mod encoded;
pub mod engine;
pub mod interpreter;
pub mod issue;
pub mod number;
pub mod units;
pub mod writer;

pub use currency::format_currency;
pub use date::{DateStyle, YearMonthDay};
pub use encoded::{EncodedError, EncodedParam, EncodedString};
pub use engine::{LocaleState, StringEngine};
pub use interpreter::{DEFAULT_OUTPUT_LIMIT, FormatInterpreter, MAX_EXPANSIONS, Rendered};
pub use issue::RenderIssue;
pub use number::Separators;
pub use units::UnitConversion;
pub use writer::{BoundedWriter, write_terminated};
