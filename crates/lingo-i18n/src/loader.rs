#![forbid(unsafe_code)]

//! Language file discovery and loading.
//!
//! Language files are TOML documents named `*.lng.toml`:
//!
//! ```toml
//! [header]
//! name = "German"
//! own_name = "Deutsch"
//! isocode = "de_DE"
//! newgrflangid = 2
//! genders = ["m", "w", "n"]
//! cases = ["nom", "gen"]
//!
//! [calendar]
//! months = ["Januar", "Februar", ...]
//!
//! [units]
//! velocity = ["{COMMA} mph", "{COMMA} km/h", "{COMMA} m/s"]
//!
//! [strings]
//! 0x0001 = "Hallo"
//! 0x0002 = { text = "die Stadt", cases = { gen = "der Stadt" } }
//! ```
//!
//! Discovery reads every file's header, skips invalid ones and picks the
//! language to activate. Only the chosen pack (and the base language) is
//! loaded in full.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashSet;
use lingo_core::StringId;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{LocaleSettings, UnitSystem};
use crate::language::{LanguageMetadata, LanguagePack, Quantity};
use crate::template::Template;

/// File-name suffix of language files.
pub const LANGUAGE_FILE_SUFFIX: &str = ".lng.toml";

/// ISO code used when neither settings nor environment pick a language.
pub const FALLBACK_ISOCODE: &str = "en_GB";

/// Errors from discovering or loading language packs.
#[derive(Debug, thiserror::Error)]
pub enum LanguagePackError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid language header in {path}: {}", .errors.join("; "))]
    InvalidHeader { path: PathBuf, errors: Vec<String> },
    #[error("invalid string key '{key}'")]
    InvalidStringKey { key: String },
    #[error("string id {id} is not in a language-pack table")]
    ReservedStringId { id: StringId },
    #[error("language {isocode} has no case named '{case}'")]
    UnknownCase { isocode: String, case: String },
    #[error("no usable language packs found in {}", display_paths(.searched))]
    NoLanguagePacks { searched: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct HeaderOnly {
    #[serde(default)]
    header: LanguageMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CalendarFile {
    months: Option<Vec<String>>,
    months_short: Option<Vec<String>>,
    day_ordinals: Option<Vec<String>>,
    long: Option<String>,
    short: Option<String>,
    tiny: Option<String>,
    iso: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entry {
    Text(String),
    WithCases {
        text: String,
        #[serde(default)]
        cases: BTreeMap<String, String>,
    },
}

#[derive(Debug, Deserialize)]
struct LanguageFile {
    #[serde(default)]
    header: LanguageMetadata,
    #[serde(default)]
    undefined: Option<String>,
    #[serde(default)]
    calendar: CalendarFile,
    #[serde(default)]
    units: BTreeMap<String, [String; 3]>,
    #[serde(default)]
    strings: BTreeMap<String, Entry>,
}

fn toml_error(path: &Path, source: toml::de::Error) -> LanguagePackError {
    LanguagePackError::Toml {
        path: path.to_path_buf(),
        source,
    }
}

fn read_file(path: &Path) -> Result<String, LanguagePackError> {
    std::fs::read_to_string(path).map_err(|source| LanguagePackError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn check_header(meta: &LanguageMetadata, path: &Path) -> Result<(), LanguagePackError> {
    let errors = meta.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LanguagePackError::InvalidHeader {
            path: path.to_path_buf(),
            errors,
        })
    }
}

/// Read and validate only the header of a language file.
pub fn read_language_header(path: &Path) -> Result<LanguageMetadata, LanguagePackError> {
    let text = read_file(path)?;
    let file: HeaderOnly = toml::from_str(&text).map_err(|e| toml_error(path, e))?;
    let mut meta = file.header;
    check_header(&meta, path)?;
    meta.file = Some(path.to_path_buf());
    Ok(meta)
}

/// Read a language file in full.
pub fn read_language_pack(path: &Path) -> Result<LanguagePack, LanguagePackError> {
    let text = read_file(path)?;
    parse_language_pack(&text, path)
}

/// Parse language-file text. `path` is recorded in the metadata and used in
/// error messages.
pub fn parse_language_pack(text: &str, path: &Path) -> Result<LanguagePack, LanguagePackError> {
    let file: LanguageFile = toml::from_str(text).map_err(|e| toml_error(path, e))?;
    let mut meta = file.header;
    check_header(&meta, path)?;
    meta.file = Some(path.to_path_buf());

    let mut pack = LanguagePack::new(meta);
    apply_calendar(&mut pack, file.calendar, path)?;
    apply_units(&mut pack, file.units);
    if let Some(undefined) = file.undefined {
        pack.set_undefined(&undefined);
    }

    for (key, entry) in file.strings {
        let id = key
            .parse::<StringId>()
            .map_err(|_| LanguagePackError::InvalidStringKey { key: key.clone() })?;
        match entry {
            Entry::Text(text) => pack.insert(id, &text)?,
            Entry::WithCases { text, cases } => pack.insert_with_cases(
                id,
                &text,
                cases.iter().map(|(c, v)| (c.as_str(), v.as_str())),
            )?,
        }
    }

    info!(
        isocode = %pack.isocode(),
        strings = pack.len(),
        path = %path.display(),
        "loaded language pack"
    );
    Ok(pack)
}

fn apply_calendar(
    pack: &mut LanguagePack,
    file: CalendarFile,
    path: &Path,
) -> Result<(), LanguagePackError> {
    let mut errors = Vec::new();
    let mut check = |name: &str, list: &Option<Vec<String>>, len: usize| {
        if let Some(list) = list
            && list.len() != len
        {
            errors.push(format!("calendar.{name} needs {len} entries, got {}", list.len()));
        }
    };
    check("months", &file.months, 12);
    check("months_short", &file.months_short, 12);
    check("day_ordinals", &file.day_ordinals, 31);
    if !errors.is_empty() {
        return Err(LanguagePackError::InvalidHeader {
            path: path.to_path_buf(),
            errors,
        });
    }

    let meta = pack.meta().clone();
    let parse = |text: &str| Arc::new(Template::parse(text, &meta));
    let calendar = pack.calendar_mut();
    if let Some(months) = file.months {
        calendar.months = months;
    }
    if let Some(months_short) = file.months_short {
        calendar.months_short = months_short;
    }
    if let Some(day_ordinals) = file.day_ordinals {
        calendar.day_ordinals = day_ordinals;
    }
    if let Some(long) = file.long {
        calendar.long = parse(&long);
    }
    if let Some(short) = file.short {
        calendar.short = parse(&short);
    }
    if let Some(tiny) = file.tiny {
        calendar.tiny = parse(&tiny);
    }
    if let Some(iso) = file.iso {
        calendar.iso = parse(&iso);
    }
    Ok(())
}

fn apply_units(pack: &mut LanguagePack, units: BTreeMap<String, [String; 3]>) {
    let meta = pack.meta().clone();
    for (key, texts) in units {
        let Some(quantity) = Quantity::ALL.into_iter().find(|q| q.key() == key) else {
            warn!(isocode = %meta.isocode, key = %key, "ignoring unknown unit key");
            continue;
        };
        for (system, text) in UnitSystem::ALL.into_iter().zip(texts) {
            pack.units_mut()
                .set(quantity, system, Template::parse(&text, &meta));
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Headers of every usable language file under `paths`, in directory order
/// then file-name order.
///
/// Files with invalid headers, unreadable files and files reusing another
/// language's data-pack id are skipped with a warning.
#[must_use]
pub fn discover_languages(paths: &[PathBuf]) -> Vec<LanguageMetadata> {
    let mut languages: Vec<LanguageMetadata> = Vec::new();
    let mut seen_ids = AHashSet::new();

    for dir in paths {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(path = %dir.display(), error = %err, "skipping language directory");
                continue;
            }
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(LANGUAGE_FILE_SUFFIX))
            })
            .collect();
        files.sort();

        for path in files {
            let meta = match read_language_header(&path) {
                Ok(meta) => meta,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping language file");
                    continue;
                }
            };
            if !seen_ids.insert(meta.newgrflangid) {
                warn!(
                    path = %path.display(),
                    newgrflangid = meta.newgrflangid,
                    "skipping language file with duplicate data-pack language id"
                );
                continue;
            }
            debug!(isocode = %meta.isocode, path = %path.display(), "found language");
            languages.push(meta);
        }
    }
    languages
}

/// The process locale from `LC_ALL`, `LC_MESSAGES` or `LANG`, ignoring the
/// `C` and `POSIX` locales.
#[must_use]
pub fn current_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .filter(|value| value != "C" && value != "POSIX")
}

/// Compare at most `n` leading bytes, the way `strncmp` does.
fn prefix_eq(a: &str, b: &str, n: usize) -> bool {
    a.bytes().take(n).eq(b.bytes().take(n))
}

/// Pick the language to activate.
///
/// A file-name match with `preferred_file` wins outright. Otherwise the
/// last language matching the locale's first five bytes (`de_DE`), then
/// the last matching its first two (`de`), then `en_GB`, then the first
/// language.
#[must_use]
pub fn choose_language(
    languages: &[LanguageMetadata],
    preferred_file: Option<&str>,
    locale: Option<&str>,
) -> Option<usize> {
    let locale = locale.unwrap_or(FALLBACK_ISOCODE);
    let mut full = None;
    let mut language = None;
    let mut english = None;

    for (i, meta) in languages.iter().enumerate() {
        if preferred_file.is_some() && meta.file_name() == preferred_file {
            return Some(i);
        }
        if meta.isocode == FALLBACK_ISOCODE {
            english = Some(i);
        }
        if prefix_eq(&meta.isocode, locale, 5) {
            full = Some(i);
        }
        if prefix_eq(&meta.isocode, locale, 2) {
            language = Some(i);
        }
    }
    full.or(language)
        .or(english)
        .or_else(|| (!languages.is_empty()).then_some(0))
}

/// Result of [`initialize_language_packs`].
#[derive(Debug, Clone)]
pub struct LoadedLanguages {
    /// Every usable language, in discovery order.
    pub languages: Vec<LanguageMetadata>,
    /// Index of the active language in `languages`.
    pub current: usize,
    pub active: Arc<LanguagePack>,
    /// The base language, when it differs from the active one and loads.
    pub base: Option<Arc<LanguagePack>>,
}

/// Discover languages, pick one and load it together with the base
/// language.
///
/// # Errors
///
/// [`LanguagePackError::NoLanguagePacks`] when nothing usable was found,
/// or the error from loading the chosen pack. A base language that fails
/// to load is logged and dropped.
pub fn initialize_language_packs(
    settings: &LocaleSettings,
) -> Result<LoadedLanguages, LanguagePackError> {
    let languages = discover_languages(&settings.search_paths);
    let locale = current_locale();
    let current = choose_language(&languages, settings.language.as_deref(), locale.as_deref())
        .ok_or_else(|| LanguagePackError::NoLanguagePacks {
            searched: settings.search_paths.clone(),
        })?;
    load_languages(languages, current, settings)
}

/// Load `languages[current]` and the base language.
///
/// # Errors
///
/// The error from loading the chosen pack.
pub fn load_languages(
    languages: Vec<LanguageMetadata>,
    current: usize,
    settings: &LocaleSettings,
) -> Result<LoadedLanguages, LanguagePackError> {
    let load = |meta: &LanguageMetadata| -> Result<LanguagePack, LanguagePackError> {
        match &meta.file {
            Some(path) => read_language_pack(path),
            None => Ok(LanguagePack::new(meta.clone())),
        }
    };

    let Some(chosen) = languages.get(current) else {
        return Err(LanguagePackError::NoLanguagePacks {
            searched: settings.search_paths.clone(),
        });
    };
    let active = Arc::new(load(chosen)?);
    info!(isocode = %active.isocode(), "activated language");

    let base = languages
        .iter()
        .enumerate()
        .find(|(i, meta)| *i != current && meta.isocode == settings.base_language)
        .and_then(|(_, meta)| match load(meta) {
            Ok(pack) => Some(Arc::new(pack)),
            Err(err) => {
                warn!(isocode = %meta.isocode, error = %err, "base language failed to load");
                None
            }
        });

    Ok(LoadedLanguages {
        languages,
        current,
        active,
        base,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(isocode: &str, file: &str) -> LanguageMetadata {
        LanguageMetadata {
            isocode: isocode.into(),
            file: Some(PathBuf::from("lang").join(file)),
            ..LanguageMetadata::default()
        }
    }

    fn installed() -> Vec<LanguageMetadata> {
        vec![
            meta("de_AT", "austrian.lng.toml"),
            meta("de_DE", "german.lng.toml"),
            meta("en_GB", "english.lng.toml"),
            meta("en_US", "american.lng.toml"),
        ]
    }

    #[test]
    fn preferred_file_wins() {
        let langs = installed();
        assert_eq!(choose_language(&langs, Some("american.lng.toml"), Some("de_DE")), Some(3));
    }

    #[test]
    fn full_locale_then_language_then_english() {
        let langs = installed();
        assert_eq!(choose_language(&langs, None, Some("de_DE.UTF-8")), Some(1));
        assert_eq!(choose_language(&langs, None, Some("de_CH")), Some(1));
        assert_eq!(choose_language(&langs, None, Some("fr_FR")), Some(2));
        assert_eq!(choose_language(&langs, None, None), Some(2));
        assert_eq!(choose_language(&langs, Some("missing.lng.toml"), Some("en_US")), Some(3));
    }

    #[test]
    fn first_language_as_last_resort() {
        let langs = vec![meta("fr_FR", "french.lng.toml"), meta("it_IT", "italian.lng.toml")];
        assert_eq!(choose_language(&langs, None, Some("ja_JP")), Some(0));
        assert_eq!(choose_language(&[], None, None), None);
    }

    #[test]
    fn parse_full_file() {
        let text = r#"
            undefined = "(fehlt)"

            [header]
            name = "German"
            own_name = "Deutsch"
            isocode = "de_DE"
            newgrflangid = 2
            digit_group_separator = "."
            digit_decimal_separator = ","
            genders = ["m", "w", "n"]
            cases = ["nom", "gen"]

            [calendar]
            long = "{RAW_STRING}. {RAW_STRING} {NUM}"

            [units]
            velocity = ["{COMMA} mph", "{COMMA} km/h", "{COMMA} m/s"]

            [strings]
            0x0001 = "Hallo"
            0x0002 = { text = "die Stadt", cases = { gen = "der Stadt" } }
        "#;
        let pack = parse_language_pack(text, Path::new("german.lng.toml")).expect("valid file");
        assert_eq!(pack.isocode(), "de_DE");
        assert_eq!(pack.len(), 2);
        assert_eq!(pack.meta().file_name(), Some("german.lng.toml"));
        assert_eq!(pack.get(StringId::from_raw(2)).map(|t| t.case_count()), Some(1));
        assert_eq!(pack.calendar().months.len(), 12);
    }

    #[test]
    fn bad_files_are_rejected() {
        let path = Path::new("x.lng.toml");
        assert!(matches!(
            parse_language_pack("[header]\nplural_form = 20", path),
            Err(LanguagePackError::InvalidHeader { .. })
        ));
        assert!(matches!(
            parse_language_pack("[strings]\nhello = \"x\"", path),
            Err(LanguagePackError::InvalidStringKey { .. })
        ));
        assert!(matches!(
            parse_language_pack("[strings]\n0x7100 = \"x\"", path),
            Err(LanguagePackError::ReservedStringId { .. })
        ));
        assert!(matches!(
            parse_language_pack("[calendar]\nmonths = [\"a\"]", path),
            Err(LanguagePackError::InvalidHeader { .. })
        ));
        assert!(matches!(
            parse_language_pack("[header", path),
            Err(LanguagePackError::Toml { .. })
        ));
    }

    #[test]
    fn prefix_compare_like_strncmp() {
        assert!(prefix_eq("de_DE", "de_DE.UTF-8", 5));
        assert!(prefix_eq("de", "de", 5));
        assert!(!prefix_eq("de", "de_DE", 5));
        assert!(prefix_eq("de_AT", "de_DE", 2));
    }
}
