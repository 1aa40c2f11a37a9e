#![forbid(unsafe_code)]

//! Generated strings: town names and the built-in special names.
//!
//! Identifiers in the generator ranges have no template in any language
//! pack. A [`StringGenerator`] produces a template on request, plus any
//! parameters it injects. Injected parameters overwrite the caller's
//! values at the same positions.

use std::sync::Arc;

use lingo_core::{Parameter, ParameterStack, StringId};
use lingo_core::string_id::{TOWN_NAME_FIRST_INDEX, TOWN_NAME_TAB};

use crate::config::Resolution;
use crate::language::{LanguageMetadata, MAX_LANG};
use crate::template::Template;

/// Number of town-name styles.
pub const TOWN_NAME_STYLES: u16 = 21;

/// Special-name offsets relative to the first special-name index.
pub mod special {
    pub const SILLY_NAME: u16 = 1;
    pub const AND_CO_NAME: u16 = 2;
    pub const PRESIDENT_NAME: u16 = 3;
    /// "`<town>` Transport", one per town-name style.
    pub const COMPANY_NAME_START: u16 = 6;
    pub const LANGUAGE_START: u16 = 0x1C;
    pub const RESOLUTION_START: u16 = LANGUAGE_START + super::MAX_LANG as u16;
    pub const RESOLUTION_COUNT: u16 = 0x20;
}

/// Output of a generator.
#[derive(Debug, Clone)]
pub struct Generated {
    pub template: Arc<Template>,
    /// `(slot, value)` pairs that take priority over the caller's slots.
    pub injected: Vec<(usize, Parameter)>,
}

impl Generated {
    /// Plain text with no directives and no injected parameters.
    #[must_use]
    pub fn literal(text: impl AsRef<str>) -> Self {
        Self {
            template: Arc::new(Template::literal(text.as_ref())),
            injected: Vec::new(),
        }
    }

    /// The caller's parameters with the injected ones written over them.
    #[must_use]
    pub fn apply(&self, params: &ParameterStack) -> ParameterStack {
        if self.injected.is_empty() {
            params.clone()
        } else {
            params.with_overrides(&self.injected)
        }
    }
}

/// Produces text for identifiers in a generator range.
///
/// `index` is relative to the start of the range. Returning `None` makes
/// the identifier render as the unknown-string placeholder.
pub trait StringGenerator: Send + Sync {
    fn generate(&self, index: u16, params: &ParameterStack) -> Option<Generated>;
}

impl<F> StringGenerator for F
where
    F: Fn(u16, &ParameterStack) -> Option<Generated> + Send + Sync,
{
    fn generate(&self, index: u16, params: &ParameterStack) -> Option<Generated> {
        self(index, params)
    }
}

const SILLY_COMPANY_NAMES: [&str; 13] = [
    "Bloggs Brothers",
    "Tiny Transport Ltd.",
    "Express Travel",
    "Comfy-Coach & Co.",
    "Crush & Bump Ltd.",
    "Broken & Late Ltd.",
    "Sam Speedy & Son",
    "Supersonic Travel",
    "Mike's Motors",
    "Lightning International",
    "Pannik & Loozit Ltd.",
    "Inter-City Transport",
    "Getout & Pushit Ltd.",
];

const SURNAMES: [&str; 29] = [
    "Adams", "Allan", "Baker", "Bigwig", "Black", "Bloggs", "Brown", "Campbell", "Gordon",
    "Hamilton", "Hawthorn", "Higgins", "Green", "Gribble", "Jones", "McAlpine", "MacDonald",
    "McIntosh", "Muir", "Murphy", "Nelson", "O'Donnell", "Parker", "Phillips", "Pilkington",
    "Quigley", "Sharkey", "Thomson", "Watkins",
];

const SILLY_SURNAMES: [&str; 12] = [
    "Grumpy", "Dozy", "Speedy", "Nosey", "Dribble", "Mushroom", "Cabbage", "Sniffle", "Fishy",
    "Swindle", "Sneaky", "Nutkins",
];

const INITIALS: [char; 19] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'P', 'R', 'S', 'T', 'W',
];

/// Byte `n` of a seed.
fn seed_byte(seed: u64, n: u32) -> usize {
    ((seed >> (8 * n)) & 0xFF) as usize
}

/// Scale a seed byte onto `0..len`.
fn pick(len: usize, byte: usize) -> usize {
    (len * byte) >> 8
}

/// The built-in special names: company names, president names, language
/// names and screen resolutions.
#[derive(Debug, Clone, Default)]
pub struct SpecialNames {
    toyland: bool,
    /// `(name, own_name)` per installed language, by discovery order.
    languages: Vec<(String, String)>,
    current_language: Option<usize>,
    resolutions: Vec<Resolution>,
}

impl SpecialNames {
    #[must_use]
    pub fn new(toyland: bool) -> Self {
        Self {
            toyland,
            ..Self::default()
        }
    }

    /// Installed languages; `current` is rendered with its own name.
    #[must_use]
    pub fn with_languages(mut self, languages: &[LanguageMetadata], current: Option<usize>) -> Self {
        self.languages = languages
            .iter()
            .map(|m| (m.name.clone(), m.own_name.clone()))
            .collect();
        self.current_language = current;
        self
    }

    #[must_use]
    pub fn with_resolutions(mut self, resolutions: &[Resolution]) -> Self {
        self.resolutions = resolutions.to_vec();
        self
    }

    fn surnames(&self) -> &'static [&'static str] {
        if self.toyland { &SILLY_SURNAMES } else { &SURNAMES }
    }

    /// "Surname & Co." from byte 2 of the seed.
    #[must_use]
    pub fn and_co_name(&self, seed: u64) -> String {
        let list = self.surnames();
        format!("{} & Co.", list[pick(list.len(), seed_byte(seed, 2))])
    }

    /// "A. B. Surname"; the second initial is present for most seeds.
    #[must_use]
    pub fn president_name(&self, seed: u64) -> String {
        let mut name = String::new();
        name.push(INITIALS[pick(INITIALS.len(), seed_byte(seed, 0))]);
        name.push_str(". ");
        let second = pick(INITIALS.len() + 35, seed_byte(seed, 1));
        if let Some(initial) = INITIALS.get(second) {
            name.push(*initial);
            name.push_str(". ");
        }
        let list = self.surnames();
        name.push_str(list[pick(list.len(), seed_byte(seed, 2))]);
        name
    }

    #[must_use]
    pub fn silly_company_name(seed: u64) -> &'static str {
        let i = ((seed & 0xFFFF) as usize).min(SILLY_COMPANY_NAMES.len() - 1);
        SILLY_COMPANY_NAMES[i]
    }
}

impl StringGenerator for SpecialNames {
    fn generate(&self, index: u16, params: &ParameterStack) -> Option<Generated> {
        use special::*;

        let seed = || params.unsigned(0).unwrap_or(0);
        match index {
            SILLY_NAME => Some(Generated::literal(Self::silly_company_name(seed()))),
            AND_CO_NAME => Some(Generated::literal(self.and_co_name(seed()))),
            PRESIDENT_NAME => Some(Generated::literal(self.president_name(seed()))),
            i if (COMPANY_NAME_START..COMPANY_NAME_START + TOWN_NAME_STYLES).contains(&i) => {
                let style = i - COMPANY_NAME_START;
                let town = StringId::new(TOWN_NAME_TAB, TOWN_NAME_FIRST_INDEX + style);
                Some(Generated {
                    template: Arc::new(Template::parse(
                        "{STRING1} Transport",
                        &LanguageMetadata::default(),
                    )),
                    injected: vec![(0, Parameter::StringRef(town)), (1, Parameter::Unsigned(seed()))],
                })
            }
            i if (LANGUAGE_START..RESOLUTION_START).contains(&i) => {
                let lang = usize::from(i - LANGUAGE_START);
                let (name, own_name) = self.languages.get(lang)?;
                let text = if self.current_language == Some(lang) { own_name } else { name };
                Some(Generated::literal(text))
            }
            i if (RESOLUTION_START..RESOLUTION_START + RESOLUTION_COUNT).contains(&i) => {
                let r = self.resolutions.get(usize::from(i - RESOLUTION_START))?;
                Some(Generated::literal(format!("{}x{}", r.width, r.height)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Instruction;

    fn seeded(seed: u64) -> ParameterStack {
        ParameterStack::from_params([Parameter::Unsigned(seed)])
    }

    fn text(generated: &Generated) -> String {
        generated
            .template
            .instructions(0)
            .iter()
            .map(|i| match i {
                Instruction::Literal(s) => s.clone(),
                other => format!("{other:?}"),
            })
            .collect()
    }

    #[test]
    fn silly_names_clamp() {
        let names = SpecialNames::default();
        let g = names.generate(special::SILLY_NAME, &seeded(0)).expect("generated");
        assert_eq!(text(&g), "Bloggs Brothers");
        let g = names.generate(special::SILLY_NAME, &seeded(0xFFFF)).expect("generated");
        assert_eq!(text(&g), "Getout & Pushit Ltd.");
    }

    #[test]
    fn and_co_uses_third_byte() {
        let names = SpecialNames::default();
        assert_eq!(names.and_co_name(0), "Adams & Co.");
        assert_eq!(names.and_co_name(0x00FF_0000), "Watkins & Co.");
        assert_eq!(SpecialNames::new(true).and_co_name(0), "Grumpy & Co.");
    }

    #[test]
    fn president_second_initial_is_optional() {
        let names = SpecialNames::default();
        assert_eq!(names.president_name(0), "A. A. Adams");
        // (19 + 35) * 0xFF >> 8 = 53, past the initials.
        assert_eq!(names.president_name(0xFF00), "A. Adams");
    }

    #[test]
    fn company_name_injects_town() {
        let g = SpecialNames::default()
            .generate(special::COMPANY_NAME_START + 2, &seeded(77))
            .expect("generated");
        let params = g.apply(&seeded(77));
        assert_eq!(params.string_id(0), Ok(StringId::from_raw(0x20C2)));
        assert_eq!(params.unsigned(1), Ok(77));
    }

    #[test]
    fn languages_and_resolutions() {
        let german = LanguageMetadata {
            name: "German".into(),
            own_name: "Deutsch".into(),
            isocode: "de_DE".into(),
            ..LanguageMetadata::default()
        };
        let names = SpecialNames::default()
            .with_languages(&[LanguageMetadata::default(), german], Some(1))
            .with_resolutions(&[Resolution { width: 800, height: 600 }]);
        let params = ParameterStack::new(0);

        let g = names.generate(special::LANGUAGE_START, &params).expect("english");
        assert_eq!(text(&g), "English (UK)");
        let g = names.generate(special::LANGUAGE_START + 1, &params).expect("german");
        assert_eq!(text(&g), "Deutsch");
        assert!(names.generate(special::LANGUAGE_START + 2, &params).is_none());

        let g = names.generate(special::RESOLUTION_START, &params).expect("resolution");
        assert_eq!(text(&g), "800x600");
        assert!(names.generate(special::RESOLUTION_START + 1, &params).is_none());
        assert!(names.generate(0, &params).is_none());
    }

    #[test]
    fn closures_are_generators() {
        let towns = |style: u16, params: &ParameterStack| {
            Some(Generated::literal(format!("Town{style}-{}", params.unsigned(0).ok()?)))
        };
        let g = towns.generate(3, &seeded(9)).expect("generated");
        assert_eq!(text(&g), "Town3-9");
    }
}
