#![forbid(unsafe_code)]

//! Language metadata and loaded language packs.
//!
//! # Invariants
//!
//! 1. **Validated headers only**: a [`LanguagePack`] is only built from
//!    metadata whose [`LanguageMetadata::validate`] returned no errors, so
//!    the plural rule, direction, genders and cases are always in range.
//!
//! 2. **Pack tables only**: entries can only be inserted for identifiers
//!    whose [`StringSource`] is a language-pack table. Generated,
//!    game-script and data-pack ranges are rejected.
//!
//! 3. **Read-only once shared**: packs are handed out as `Arc<LanguagePack>`
//!    and never mutated afterwards; a language switch replaces the whole
//!    pack.

use std::path::PathBuf;
use std::sync::Arc;

use ahash::AHashMap;
use lingo_core::{StringId, StringSource, TextDirection};
use serde::{Deserialize, Serialize};

use crate::config::UnitSystem;
use crate::loader::LanguagePackError;
use crate::plural::{MAX_PLURAL_FORMS, PluralRule};
use crate::template::Template;

/// Maximum number of genders a language may declare.
pub const MAX_NUM_GENDERS: usize = 8;
/// Maximum number of grammatical cases a language may declare.
pub const MAX_NUM_CASES: usize = 16;
/// Upper bound (exclusive) on data-pack language ids.
pub const MAX_LANG: u8 = 0x80;

/// Header data of a language file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageMetadata {
    /// International name, e.g. `"German"`.
    pub name: String,
    /// Name in the language itself, e.g. `"Deutsch"`.
    pub own_name: String,
    /// ISO code such as `"de_DE"`.
    pub isocode: String,
    /// Plural rule index, see [`PluralRule`].
    pub plural_form: u8,
    /// 0 for left-to-right, 1 for right-to-left.
    pub text_dir: u8,
    /// Windows locale id, passed to fallback-font lookups.
    pub winlangid: u16,
    /// Data-pack language id.
    pub newgrflangid: u8,
    pub digit_group_separator: String,
    pub digit_group_separator_currency: String,
    pub digit_decimal_separator: String,
    pub genders: Vec<String>,
    pub cases: Vec<String>,
    /// File the metadata was read from.
    #[serde(skip)]
    pub file: Option<PathBuf>,
}

impl Default for LanguageMetadata {
    fn default() -> Self {
        Self {
            name: "English (UK)".into(),
            own_name: "English (UK)".into(),
            isocode: "en_GB".into(),
            plural_form: 0,
            text_dir: 0,
            winlangid: 0x0809,
            newgrflangid: 0x01,
            digit_group_separator: ",".into(),
            digit_group_separator_currency: ",".into(),
            digit_decimal_separator: ".".into(),
            genders: Vec::new(),
            cases: Vec::new(),
            file: None,
        }
    }
}

impl LanguageMetadata {
    /// Check every header field. An empty list means the header is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.plural_form >= MAX_PLURAL_FORMS {
            errors.push(format!(
                "plural_form must be < {MAX_PLURAL_FORMS}, got {}",
                self.plural_form
            ));
        }
        if TextDirection::from_header(self.text_dir).is_none() {
            errors.push(format!("text_dir must be 0 or 1, got {}", self.text_dir));
        }
        if self.newgrflangid >= MAX_LANG {
            errors.push(format!(
                "newgrflangid must be < 0x{MAX_LANG:02X}, got 0x{:02X}",
                self.newgrflangid
            ));
        }
        if self.genders.len() >= MAX_NUM_GENDERS {
            errors.push(format!(
                "at most {} genders allowed, got {}",
                MAX_NUM_GENDERS - 1,
                self.genders.len()
            ));
        }
        if self.cases.len() >= MAX_NUM_CASES {
            errors.push(format!(
                "at most {} cases allowed, got {}",
                MAX_NUM_CASES - 1,
                self.cases.len()
            ));
        }
        if self.isocode.trim().is_empty() {
            errors.push("isocode must not be empty".into());
        }

        errors
    }

    /// Whether [`validate`](Self::validate) finds nothing to complain about.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// The plural rule; out-of-range headers read as the default rule.
    #[must_use]
    pub fn plural_rule(&self) -> PluralRule {
        PluralRule::from_index(self.plural_form).unwrap_or_default()
    }

    /// The base text direction.
    #[must_use]
    pub fn text_direction(&self) -> TextDirection {
        TextDirection::from_header(self.text_dir).unwrap_or_default()
    }

    /// Index of a gender name, ignoring case.
    #[must_use]
    pub fn gender_index(&self, gender: &str) -> Option<u8> {
        position_ignore_case(&self.genders, gender)
    }

    /// Index of a case name, ignoring case. Index 0 is the default case, so
    /// named cases start at 1.
    #[must_use]
    pub fn case_index(&self, case: &str) -> Option<u8> {
        position_ignore_case(&self.cases, case).map(|i| i + 1)
    }

    /// File name (without directories) this language was read from.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file.as_deref()?.file_name()?.to_str()
    }
}

fn position_ignore_case(names: &[String], wanted: &str) -> Option<u8> {
    let wanted = wanted.to_lowercase();
    names
        .iter()
        .position(|n| n.to_lowercase() == wanted)
        .and_then(|i| u8::try_from(i).ok())
}

// ---------------------------------------------------------------------------
// Calendar and unit templates
// ---------------------------------------------------------------------------

/// Month names, day ordinals and date layouts of a language.
///
/// Date templates receive text parameters (the ordinal or padded day, the
/// month name or padded month number) and the year as an integer.
#[derive(Debug, Clone)]
pub struct Calendar {
    pub months: Vec<String>,
    pub months_short: Vec<String>,
    pub day_ordinals: Vec<String>,
    /// Day ordinal, short month, year.
    pub long: Arc<Template>,
    /// Full month, year.
    pub short: Arc<Template>,
    /// Padded day, padded month, year.
    pub tiny: Arc<Template>,
    /// Padded day, padded month, year.
    pub iso: Arc<Template>,
}

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

impl Calendar {
    /// English month names and layouts.
    #[must_use]
    pub fn english(meta: &LanguageMetadata) -> Self {
        let day_ordinals = (1..=31u32)
            .map(|d| {
                let suffix = match (d % 10, d % 100) {
                    (_, 11..=13) => "th",
                    (1, _) => "st",
                    (2, _) => "nd",
                    (3, _) => "rd",
                    _ => "th",
                };
                format!("{d}{suffix}")
            })
            .collect();
        Self {
            months: MONTHS.iter().map(|m| (*m).to_string()).collect(),
            months_short: MONTHS.iter().map(|m| m[..3].to_string()).collect(),
            day_ordinals,
            long: Arc::new(Template::parse("{RAW_STRING} {RAW_STRING} {NUM}", meta)),
            short: Arc::new(Template::parse("{RAW_STRING} {NUM}", meta)),
            tiny: Arc::new(Template::parse("{RAW_STRING}-{RAW_STRING}-{NUM}", meta)),
            iso: Arc::new(Template::parse("{2:NUM}-{1:RAW_STRING}-{0:RAW_STRING}", meta)),
        }
    }

    /// Month name for a zero-based month, or an empty string.
    #[must_use]
    pub fn month(&self, month: usize) -> &str {
        self.months.get(month).map_or("", String::as_str)
    }

    /// Abbreviated month name for a zero-based month, or an empty string.
    #[must_use]
    pub fn month_short(&self, month: usize) -> &str {
        self.months_short.get(month).map_or("", String::as_str)
    }

    /// Ordinal for a one-based day of month, or an empty string.
    #[must_use]
    pub fn day_ordinal(&self, day: usize) -> &str {
        day.checked_sub(1)
            .and_then(|d| self.day_ordinals.get(d))
            .map_or("", String::as_str)
    }
}

/// A physical quantity with locale-dependent units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Velocity,
    Power,
    WeightShort,
    WeightLong,
    VolumeShort,
    VolumeLong,
    Force,
    Height,
}

impl Quantity {
    pub const ALL: [Self; 8] = [
        Self::Velocity,
        Self::Power,
        Self::WeightShort,
        Self::WeightLong,
        Self::VolumeShort,
        Self::VolumeLong,
        Self::Force,
        Self::Height,
    ];

    /// Key used in language files.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Velocity => "velocity",
            Self::Power => "power",
            Self::WeightShort => "weight_short",
            Self::WeightLong => "weight_long",
            Self::VolumeShort => "volume_short",
            Self::VolumeLong => "volume_long",
            Self::Force => "force",
            Self::Height => "height",
        }
    }

    fn english(self) -> [&'static str; 3] {
        match self {
            Self::Velocity => ["{COMMA} mph", "{COMMA} km/h", "{COMMA} m/s"],
            Self::Power => ["{COMMA}hp", "{COMMA}hp", "{COMMA}kW"],
            Self::WeightShort => ["{COMMA}t", "{COMMA}t", "{COMMA}kg"],
            Self::WeightLong => [
                "{COMMA} ton{P \"\" s}",
                "{COMMA} tonne{P \"\" s}",
                "{COMMA} kg",
            ],
            Self::VolumeShort => ["{COMMA}gal", "{COMMA}l", "{COMMA}m³"],
            Self::VolumeLong => [
                "{COMMA} gallon{P \"\" s}",
                "{COMMA} litre{P \"\" s}",
                "{COMMA} m³",
            ],
            Self::Force => ["{COMMA} lbf", "{COMMA} kgf", "{COMMA} kN"],
            Self::Height => ["{COMMA} ft", "{COMMA} m", "{COMMA} m"],
        }
    }
}

/// Display templates for every [`Quantity`] in every [`UnitSystem`]. Each
/// template receives the converted value as its only parameter.
#[derive(Debug, Clone)]
pub struct UnitTemplates {
    table: AHashMap<(Quantity, UnitSystem), Arc<Template>>,
    fallback: Arc<Template>,
}

impl UnitTemplates {
    /// English unit names.
    #[must_use]
    pub fn english(meta: &LanguageMetadata) -> Self {
        let mut table = AHashMap::new();
        for quantity in Quantity::ALL {
            for (system, text) in UnitSystem::ALL.into_iter().zip(quantity.english()) {
                table.insert((quantity, system), Arc::new(Template::parse(text, meta)));
            }
        }
        Self {
            table,
            fallback: Arc::new(Template::parse("{COMMA}", meta)),
        }
    }

    /// Replace one template.
    pub fn set(&mut self, quantity: Quantity, system: UnitSystem, template: Template) {
        self.table.insert((quantity, system), Arc::new(template));
    }

    #[must_use]
    pub fn get(&self, quantity: Quantity, system: UnitSystem) -> &Arc<Template> {
        self.table.get(&(quantity, system)).unwrap_or(&self.fallback)
    }
}

// ---------------------------------------------------------------------------
// LanguagePack
// ---------------------------------------------------------------------------

/// Text rendered for identifiers that resolve to nothing.
pub const UNDEFINED_STRING: &str = "(undefined string)";

/// The loaded template table of one language.
#[derive(Debug, Clone)]
pub struct LanguagePack {
    meta: LanguageMetadata,
    strings: AHashMap<StringId, Arc<Template>>,
    calendar: Calendar,
    units: UnitTemplates,
    undefined: Arc<Template>,
}

impl LanguagePack {
    /// An empty pack with English calendar and unit templates.
    #[must_use]
    pub fn new(meta: LanguageMetadata) -> Self {
        let calendar = Calendar::english(&meta);
        let units = UnitTemplates::english(&meta);
        Self {
            meta,
            strings: AHashMap::new(),
            calendar,
            units,
            undefined: Arc::new(Template::literal(UNDEFINED_STRING)),
        }
    }

    /// Parse and store the template for `id`.
    pub fn insert(&mut self, id: StringId, text: &str) -> Result<(), LanguagePackError> {
        self.insert_with_cases(id, text, std::iter::empty::<(&str, &str)>())
    }

    /// Parse and store the template for `id` together with named case
    /// variants.
    pub fn insert_with_cases<'a>(
        &mut self,
        id: StringId,
        text: &str,
        cases: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), LanguagePackError> {
        if !matches!(id.source(), StringSource::LanguagePack { .. }) || id.is_null() {
            return Err(LanguagePackError::ReservedStringId { id });
        }
        let template = self.parse_with_cases(text, cases)?;
        self.strings.insert(id, Arc::new(template));
        Ok(())
    }

    /// Parse a template with case variants against this pack's metadata.
    pub fn parse_with_cases<'a>(
        &self,
        text: &str,
        cases: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Template, LanguagePackError> {
        let mut template = Template::parse(text, &self.meta);
        for (case, variant) in cases {
            let index = self
                .meta
                .case_index(case)
                .ok_or_else(|| LanguagePackError::UnknownCase {
                    isocode: self.meta.isocode.clone(),
                    case: case.to_string(),
                })?;
            template = template.with_case(index, variant, &self.meta);
        }
        Ok(template)
    }

    /// Replace the undefined-string placeholder.
    pub fn set_undefined(&mut self, text: &str) {
        self.undefined = Arc::new(Template::literal(text));
    }

    pub fn calendar_mut(&mut self) -> &mut Calendar {
        &mut self.calendar
    }

    pub fn units_mut(&mut self) -> &mut UnitTemplates {
        &mut self.units
    }

    #[must_use]
    pub fn get(&self, id: StringId) -> Option<&Arc<Template>> {
        self.strings.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: StringId) -> bool {
        self.strings.contains_key(&id)
    }

    #[must_use]
    pub fn meta(&self) -> &LanguageMetadata {
        &self.meta
    }

    #[must_use]
    pub fn isocode(&self) -> &str {
        &self.meta.isocode
    }

    #[must_use]
    pub fn text_direction(&self) -> TextDirection {
        self.meta.text_direction()
    }

    #[must_use]
    pub fn plural_rule(&self) -> PluralRule {
        self.meta.plural_rule()
    }

    #[must_use]
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    #[must_use]
    pub fn units(&self) -> &UnitTemplates {
        &self.units
    }

    #[must_use]
    pub fn undefined(&self) -> &Arc<Template> {
        &self.undefined
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// All identifiers with a template, in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<StringId> {
        let mut ids: Vec<StringId> = self.strings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn german() -> LanguageMetadata {
        LanguageMetadata {
            name: "German".into(),
            own_name: "Deutsch".into(),
            isocode: "de_DE".into(),
            newgrflangid: 0x02,
            genders: vec!["m".into(), "w".into(), "n".into()],
            cases: vec!["nom".into(), "gen".into()],
            ..LanguageMetadata::default()
        }
    }

    #[test]
    fn default_metadata_is_valid() {
        assert!(LanguageMetadata::default().is_valid());
    }

    #[test]
    fn validation_reports_every_problem() {
        let meta = LanguageMetadata {
            plural_form: 14,
            text_dir: 2,
            newgrflangid: 0x80,
            genders: vec!["g".into(); MAX_NUM_GENDERS],
            cases: vec!["c".into(); MAX_NUM_CASES],
            ..LanguageMetadata::default()
        };
        assert_eq!(meta.validate().len(), 5);
    }

    #[test]
    fn gender_and_case_lookup_ignore_case() {
        let meta = german();
        assert_eq!(meta.gender_index("W"), Some(1));
        assert_eq!(meta.gender_index("x"), None);
        assert_eq!(meta.case_index("GEN"), Some(2));
        assert_eq!(meta.case_index("dat"), None);
    }

    #[test]
    fn english_ordinals() {
        let cal = Calendar::english(&LanguageMetadata::default());
        assert_eq!(cal.day_ordinal(1), "1st");
        assert_eq!(cal.day_ordinal(2), "2nd");
        assert_eq!(cal.day_ordinal(11), "11th");
        assert_eq!(cal.day_ordinal(22), "22nd");
        assert_eq!(cal.day_ordinal(0), "");
        assert_eq!(cal.month_short(8), "Sep");
    }

    #[test]
    fn insert_rejects_reserved_ranges() {
        let mut pack = LanguagePack::new(german());
        assert!(pack.insert(StringId::new(1, 5), "Hallo").is_ok());
        for id in [
            StringId::NULL,
            StringId::from_raw(0x20C0),
            StringId::from_raw(0x70E5),
            StringId::game_script(1),
            StringId::new(28, 1),
            StringId::new(15, 1),
        ] {
            assert!(
                matches!(pack.insert(id, "x"), Err(LanguagePackError::ReservedStringId { .. })),
                "{id}"
            );
        }
        assert_eq!(pack.len(), 1);
    }

    #[test]
    fn unknown_case_is_an_error() {
        let mut pack = LanguagePack::new(german());
        let err = pack
            .insert_with_cases(StringId::new(1, 1), "Stadt", [("dat", "Stadt")])
            .unwrap_err();
        assert!(matches!(err, LanguagePackError::UnknownCase { .. }));
        assert!(pack
            .insert_with_cases(StringId::new(1, 1), "die Stadt", [("gen", "der Stadt")])
            .is_ok());
    }

    #[test]
    fn ids_are_sorted() {
        let mut pack = LanguagePack::new(LanguageMetadata::default());
        pack.insert(StringId::new(2, 1), "b").unwrap();
        pack.insert(StringId::new(0, 7), "a").unwrap();
        assert_eq!(pack.ids(), vec![StringId::new(0, 7), StringId::new(2, 1)]);
    }
}
