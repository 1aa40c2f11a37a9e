#![forbid(unsafe_code)]

//! Identifier resolution.
//!
//! [`TemplateStore`] maps every [`StringId`] to a template. The identifier's
//! [`StringSource`] decides where to look: the active language pack (with
//! the base language as fallback), a generator callback, the game-script
//! table or the data-pack table. Resolution is total: anything that cannot
//! be found resolves to the language's undefined-string placeholder.
//!
//! A store is immutable once built. Switching language builds a new store
//! with [`TemplateStore::with_active`]; the render engine swaps it in whole.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use lingo_core::{ParameterStack, StringId, StringSource};

use crate::generator::{Generated, SpecialNames, StringGenerator};
use crate::language::{LanguageMetadata, LanguagePack};
use crate::template::Template;

/// How an identifier was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// Found in the active pack, a script table, or produced by a generator.
    Found,
    /// Missing from the active pack; taken from the base language.
    BaseLanguage,
    /// The null identifier; rendered as the undefined-string text.
    Undefined,
    /// No template anywhere; rendered as the undefined-string text.
    Unknown,
}

/// A resolved template together with the parameters it should see.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub template: Arc<Template>,
    /// Replacement parameters when a generator injected values.
    pub params: Option<ParameterStack>,
    pub lookup: Lookup,
}

impl Resolved {
    fn plain(template: &Arc<Template>, lookup: Lookup) -> Self {
        Self {
            template: Arc::clone(template),
            params: None,
            lookup,
        }
    }
}

/// Text supplied at runtime, kept raw so it can be re-parsed against a
/// new language's genders and cases.
#[derive(Debug, Clone)]
struct DynamicString {
    text: String,
    template: Arc<Template>,
}

/// Resolves identifiers against the active language and the dynamic tables.
#[derive(Clone)]
pub struct TemplateStore {
    active: Arc<LanguagePack>,
    base: Option<Arc<LanguagePack>>,
    game_strings: AHashMap<u16, DynamicString>,
    newgrf_strings: AHashMap<u16, DynamicString>,
    town_names: Option<Arc<dyn StringGenerator>>,
    special_names: Arc<dyn StringGenerator>,
    languages: Arc<[LanguageMetadata]>,
}

impl fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateStore")
            .field("active", &self.active.isocode())
            .field("base", &self.base.as_ref().map(|b| b.isocode().to_string()))
            .field("game_strings", &self.game_strings.len())
            .field("newgrf_strings", &self.newgrf_strings.len())
            .field("town_names", &self.town_names.is_some())
            .field("languages", &self.languages.len())
            .finish()
    }
}

impl TemplateStore {
    /// A store over a single pack with the default special names.
    #[must_use]
    pub fn new(active: Arc<LanguagePack>) -> Self {
        Self {
            active,
            base: None,
            game_strings: AHashMap::new(),
            newgrf_strings: AHashMap::new(),
            town_names: None,
            special_names: Arc::new(SpecialNames::default()),
            languages: Arc::from(Vec::new()),
        }
    }

    /// Fall back to `base` for identifiers missing from the active pack.
    /// A base pack with the same ISO code as the active one is ignored.
    #[must_use]
    pub fn with_base(mut self, base: Arc<LanguagePack>) -> Self {
        self.base = (base.isocode() != self.active.isocode()).then_some(base);
        self
    }

    #[must_use]
    pub fn with_town_names(mut self, generator: Arc<dyn StringGenerator>) -> Self {
        self.town_names = Some(generator);
        self
    }

    #[must_use]
    pub fn with_special_names(mut self, generator: Arc<dyn StringGenerator>) -> Self {
        self.special_names = generator;
        self
    }

    /// Record the installed languages, in discovery order.
    #[must_use]
    pub fn with_languages(mut self, languages: Vec<LanguageMetadata>) -> Self {
        self.languages = Arc::from(languages);
        self
    }

    /// The same tables over a different active language. Game-script and
    /// data-pack strings are re-parsed against the new language.
    #[must_use]
    pub fn with_active(&self, active: Arc<LanguagePack>, base: Option<Arc<LanguagePack>>) -> Self {
        let reparse = |table: &AHashMap<u16, DynamicString>| -> AHashMap<u16, DynamicString> {
            table
                .iter()
                .map(|(index, s)| (*index, dynamic(&s.text, active.meta())))
                .collect()
        };
        let mut store = Self {
            game_strings: reparse(&self.game_strings),
            newgrf_strings: reparse(&self.newgrf_strings),
            active,
            base: None,
            town_names: self.town_names.clone(),
            special_names: Arc::clone(&self.special_names),
            languages: Arc::clone(&self.languages),
        };
        if let Some(base) = base {
            store = store.with_base(base);
        }
        store
    }

    /// Add or replace a game-script string.
    pub fn insert_game_string(&mut self, index: u16, text: &str) {
        let s = dynamic(text, self.active.meta());
        self.game_strings.insert(index, s);
    }

    /// Add or replace a data-pack string. `index` spans all data-pack tables.
    pub fn insert_newgrf_string(&mut self, index: u16, text: &str) {
        let s = dynamic(text, self.active.meta());
        self.newgrf_strings.insert(index, s);
    }

    /// Resolve `id`. Generators see `params` and may inject replacements.
    ///
    /// With `game_script` set, generator ranges are not consulted and the
    /// identifier is looked up like any pack string.
    #[must_use]
    pub fn resolve(&self, id: StringId, params: &ParameterStack, game_script: bool) -> Resolved {
        if id.is_null() {
            return Resolved::plain(self.active.undefined(), Lookup::Undefined);
        }
        match id.source() {
            StringSource::TownName(style) if !game_script => {
                let generated = self
                    .town_names
                    .as_ref()
                    .and_then(|g| g.generate(style, params));
                self.generated(generated, params)
            }
            StringSource::SpecialName(index) if !game_script => {
                self.generated(self.special_names.generate(index, params), params)
            }
            StringSource::GameScript(index) => self.dynamic(&self.game_strings, index),
            StringSource::NewGrf(index) => self.dynamic(&self.newgrf_strings, index),
            StringSource::Obsolete => self.unknown(),
            _ => self.from_packs(id),
        }
    }

    fn generated(
        &self,
        generated: Option<Generated>,
        params: &ParameterStack,
    ) -> Resolved {
        match generated {
            Some(g) => {
                let params = (!g.injected.is_empty()).then(|| g.apply(params));
                Resolved {
                    template: g.template,
                    params,
                    lookup: Lookup::Found,
                }
            }
            None => self.unknown(),
        }
    }

    fn dynamic(&self, table: &AHashMap<u16, DynamicString>, index: u16) -> Resolved {
        match table.get(&index) {
            Some(s) => Resolved::plain(&s.template, Lookup::Found),
            None => self.unknown(),
        }
    }

    fn from_packs(&self, id: StringId) -> Resolved {
        if let Some(template) = self.active.get(id) {
            return Resolved::plain(template, Lookup::Found);
        }
        if let Some(template) = self.base.as_ref().and_then(|b| b.get(id)) {
            return Resolved::plain(template, Lookup::BaseLanguage);
        }
        self.unknown()
    }

    fn unknown(&self) -> Resolved {
        Resolved::plain(self.active.undefined(), Lookup::Unknown)
    }

    /// Whether `id` resolves to something other than the placeholder
    /// without consulting generators.
    #[must_use]
    pub fn contains(&self, id: StringId) -> bool {
        match id.source() {
            StringSource::GameScript(index) => self.game_strings.contains_key(&index),
            StringSource::NewGrf(index) => self.newgrf_strings.contains_key(&index),
            StringSource::LanguagePack { .. } => {
                self.active.contains(id) || self.base.as_ref().is_some_and(|b| b.contains(id))
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn active(&self) -> &Arc<LanguagePack> {
        &self.active
    }

    #[must_use]
    pub fn base(&self) -> Option<&Arc<LanguagePack>> {
        self.base.as_ref()
    }

    #[must_use]
    pub fn languages(&self) -> &[LanguageMetadata] {
        &self.languages
    }

    /// Game-script and data-pack templates, for glyph scans.
    pub fn dynamic_templates(&self) -> impl Iterator<Item = &Arc<Template>> {
        self.game_strings
            .values()
            .chain(self.newgrf_strings.values())
            .map(|s| &s.template)
    }
}

fn dynamic(text: &str, meta: &LanguageMetadata) -> DynamicString {
    DynamicString {
        text: text.to_string(),
        template: Arc::new(Template::parse(text, meta)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::special;
    use crate::template::Instruction;
    use lingo_core::Parameter;

    fn pack(isocode: &str, entries: &[(StringId, &str)]) -> Arc<LanguagePack> {
        let mut pack = LanguagePack::new(LanguageMetadata {
            isocode: isocode.into(),
            ..LanguageMetadata::default()
        });
        for (id, text) in entries {
            pack.insert(*id, text).expect("pack string");
        }
        Arc::new(pack)
    }

    fn literal(resolved: &Resolved) -> String {
        match resolved.template.instructions(0) {
            [Instruction::Literal(s)] => s.clone(),
            other => format!("{other:?}"),
        }
    }

    const HELLO: StringId = StringId::new(0, 1);
    const ONLY_BASE: StringId = StringId::new(0, 2);

    fn store() -> TemplateStore {
        TemplateStore::new(pack("de_DE", &[(HELLO, "Hallo")]))
            .with_base(pack("en_GB", &[(HELLO, "Hello"), (ONLY_BASE, "Base only")]))
    }

    #[test]
    fn active_then_base_then_placeholder() {
        let store = store();
        let params = ParameterStack::new(0);

        let r = store.resolve(HELLO, &params, false);
        assert_eq!((literal(&r), r.lookup), ("Hallo".into(), Lookup::Found));

        let r = store.resolve(ONLY_BASE, &params, false);
        assert_eq!((literal(&r), r.lookup), ("Base only".into(), Lookup::BaseLanguage));

        let r = store.resolve(StringId::new(3, 3), &params, false);
        assert_eq!(r.lookup, Lookup::Unknown);
        assert_eq!(literal(&r), crate::language::UNDEFINED_STRING);
    }

    #[test]
    fn null_and_obsolete() {
        let store = store();
        let params = ParameterStack::new(0);
        assert_eq!(store.resolve(StringId::NULL, &params, false).lookup, Lookup::Undefined);
        assert_eq!(store.resolve(StringId::INVALID, &params, false).lookup, Lookup::Undefined);
        assert_eq!(store.resolve(StringId::new(15, 1), &params, false).lookup, Lookup::Unknown);
    }

    #[test]
    fn base_with_same_isocode_is_dropped() {
        let store = TemplateStore::new(pack("en_GB", &[])).with_base(pack("en_GB", &[]));
        assert!(store.base().is_none());
    }

    #[test]
    fn generators_and_game_script_bypass() {
        let towns = |style: u16, params: &ParameterStack| {
            Some(Generated::literal(format!("Town{style}#{}", params.unsigned(0).ok()?)))
        };
        let store = store().with_town_names(Arc::new(towns));
        let params = ParameterStack::from_params([Parameter::Unsigned(5)]);
        let town = StringId::from_raw(0x20C1);

        let r = store.resolve(town, &params, false);
        assert_eq!(literal(&r), "Town1#5");
        assert_eq!(store.resolve(town, &params, true).lookup, Lookup::Unknown);

        let and_co = StringId::from_raw(0x70E4 + special::AND_CO_NAME);
        assert_eq!(literal(&store.resolve(and_co, &params, false)), "Adams & Co.");
    }

    #[test]
    fn missing_town_generator_is_unknown() {
        let r = store().resolve(StringId::from_raw(0x20C0), &ParameterStack::new(1), false);
        assert_eq!(r.lookup, Lookup::Unknown);
    }

    #[test]
    fn injected_parameters_replace_callers() {
        let store = store();
        let params = ParameterStack::from_params([Parameter::Unsigned(42)]);
        let company = StringId::from_raw(0x70E4 + special::COMPANY_NAME_START);
        let r = store.resolve(company, &params, false);
        let injected = r.params.expect("injected parameters");
        assert_eq!(injected.string_id(0), Ok(StringId::from_raw(0x20C0)));
        assert_eq!(injected.unsigned(1), Ok(42));
    }

    #[test]
    fn dynamic_tables_survive_language_switch() {
        let mut store = store();
        store.insert_game_string(7, "Script text");
        store.insert_newgrf_string(2048 + 3, "Vehicle");
        let params = ParameterStack::new(0);

        let switched = store.with_active(pack("fr_FR", &[]), None);
        assert_eq!(literal(&switched.resolve(StringId::game_script(7), &params, true)), "Script text");
        assert_eq!(literal(&switched.resolve(StringId::new(29, 3), &params, false)), "Vehicle");
        assert!(switched.contains(StringId::game_script(7)));
        assert!(!switched.contains(HELLO));
        assert_eq!(switched.dynamic_templates().count(), 2);
    }
}
