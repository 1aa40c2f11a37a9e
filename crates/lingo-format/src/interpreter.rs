#![forbid(unsafe_code)]

//! The template interpreter.
//!
//! [`FormatInterpreter`] walks a parsed [`Template`] against a
//! [`ParameterStack`] and writes into a [`BoundedWriter`].
//!
//! # Invariants
//!
//! 1. **Bounded output**: the rendered text never exceeds `limit - 1`
//!    bytes; once the bound is hit the walk stops and the prefix rendered
//!    so far is returned.
//! 2. **Left-to-right consumption**: implicit directives read the slot at
//!    the cursor and advance it by the number of slots they consume;
//!    positional directives (`{N:CMD}`) never move the cursor.
//! 3. **Bounded nesting**: sub-strings nest at most `max_nesting` levels
//!    and a single render expands at most [`MAX_EXPANSIONS`] sub-strings,
//!    so cyclic template data terminates with a marker.
//! 4. **Text stays text**: `Text` parameters are inserted verbatim and
//!    never parsed as templates. In game-script mode control characters
//!    are stripped from them and only script strings may be expanded.
//! 5. **Total**: every failure is recovered into a [`RenderIssue`] and a
//!    marker; rendering always produces a result.

use std::sync::Arc;

use lingo_core::{Parameter, ParamKind, ParameterStack, StringId, strip_controls};
use lingo_i18n::{
    ArgRef, Command, CurrencySpec, Instruction, LocaleSettings, Lookup, PluralRule, Quantity,
    Template, TemplateStore,
};
use tracing::{debug, warn};

use crate::currency::format_currency;
use crate::date::{DateStyle, YearMonthDay};
use crate::encoded::{decode, is_encoded};
use crate::issue::{INVALID_COMMAND, RenderIssue, TOO_MANY_PARAMETERS};
use crate::number::{
    MAX_FRACTIONAL_DIGITS, MAX_ZEROFILL, Separators, format_bytes, format_hex, format_number,
};
use crate::units::{system_for, to_display};
use crate::writer::BoundedWriter;

/// Output bound used when the caller does not pick one.
pub const DEFAULT_OUTPUT_LIMIT: usize = 8192;

/// Upper bound on sub-string expansions in one render.
pub const MAX_EXPANSIONS: usize = 1 << 14;

/// The result of a render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rendered {
    pub text: String,
    /// The output hit its bound.
    pub truncated: bool,
    pub issues: Vec<RenderIssue>,
}

impl Rendered {
    /// Rendered without any recovered issue.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Renders templates against one language state.
///
/// Separators and the currency are resolved once, from the settings first
/// and the active language second.
#[derive(Debug)]
pub struct FormatInterpreter<'a> {
    store: &'a TemplateStore,
    settings: &'a LocaleSettings,
    currency: CurrencySpec,
    group: String,
    group_currency: String,
    decimal: String,
}

impl<'a> FormatInterpreter<'a> {
    #[must_use]
    pub fn new(store: &'a TemplateStore, settings: &'a LocaleSettings) -> Self {
        let meta = store.active().meta();
        let currency = settings.currency_spec();
        let group = settings
            .digit_group_separator
            .clone()
            .unwrap_or_else(|| meta.digit_group_separator.clone());
        let group_currency = settings
            .digit_group_separator_currency
            .clone()
            .or_else(|| (!currency.separator.is_empty()).then(|| currency.separator.clone()))
            .unwrap_or_else(|| meta.digit_group_separator_currency.clone());
        let decimal = settings
            .digit_decimal_separator
            .clone()
            .unwrap_or_else(|| meta.digit_decimal_separator.clone());
        Self {
            store,
            settings,
            currency,
            group,
            group_currency,
            decimal,
        }
    }

    /// Render string `id`.
    #[must_use]
    pub fn render_id(
        &self,
        id: StringId,
        params: &ParameterStack,
        case: u8,
        game_script: bool,
        limit: usize,
    ) -> Rendered {
        let mut session = Session::new(self, game_script, limit);
        session.string(id, params, case, 0);
        session.finish()
    }

    /// Render an already resolved template. Plural choices use the active
    /// language's rule.
    #[must_use]
    pub fn render(
        &self,
        template: &Template,
        params: &ParameterStack,
        case: u8,
        game_script: bool,
        limit: usize,
    ) -> Rendered {
        let mut session = Session::new(self, game_script, limit);
        let rule = self.store.active().plural_rule();
        session.template(template, params, case, 0, rule);
        session.finish()
    }

    /// Render script-supplied text. Encoded strings are decoded and
    /// rendered as script strings; anything else is shown with control
    /// characters removed.
    #[must_use]
    pub fn render_encoded(&self, text: &str, limit: usize) -> Rendered {
        let mut session = Session::new(self, true, limit);
        if let Err(issue) = session.raw_text(text, 0) {
            session.report(issue);
        }
        session.finish()
    }

    fn separators(&self) -> Separators<'_> {
        Separators {
            group: &self.group,
            decimal: &self.decimal,
        }
    }
}

/// Per-template walking state.
struct Frame<'p> {
    params: &'p ParameterStack,
    cursor: usize,
    /// Value slot of the most recent parameter directive.
    previous: Option<usize>,
    depth: usize,
    rule: PluralRule,
}

/// Per-render state.
struct Session<'i, 'a> {
    interp: &'i FormatInterpreter<'a>,
    out: BoundedWriter,
    limit: usize,
    issues: Vec<RenderIssue>,
    game_script: bool,
    expansions: usize,
    exhausted: bool,
}

impl<'i, 'a> Session<'i, 'a> {
    fn new(interp: &'i FormatInterpreter<'a>, game_script: bool, limit: usize) -> Self {
        Self {
            interp,
            out: BoundedWriter::new(limit),
            limit,
            issues: Vec::new(),
            game_script,
            expansions: 0,
            exhausted: false,
        }
    }

    fn finish(mut self) -> Rendered {
        let truncated = self.out.is_truncated();
        if truncated {
            self.report(RenderIssue::BufferTruncated { limit: self.limit });
        }
        Rendered {
            text: self.out.into_string(),
            truncated,
            issues: self.issues,
        }
    }

    fn halted(&self) -> bool {
        self.exhausted || self.out.is_truncated()
    }

    fn report(&mut self, issue: RenderIssue) {
        match &issue {
            RenderIssue::UnknownStringIdentifier { id } => {
                warn!(string_id = %id, "unknown string identifier");
            }
            RenderIssue::RecursionLimitExceeded { id, depth } => {
                warn!(string_id = %id, depth, "sub-string nesting limit exceeded");
            }
            RenderIssue::MalformedDirective { directive, .. } => {
                warn!(directive = %directive, "malformed directive");
            }
            RenderIssue::ScriptRestricted { id } => {
                warn!(string_id = %id, "string is not available to scripts");
            }
            RenderIssue::MissingTranslation { id, isocode } => {
                debug!(string_id = %id, isocode = %isocode, "using base language");
            }
            RenderIssue::ParameterTagMismatch {
                index,
                expected,
                found,
            } => {
                debug!(index, %expected, %found, "parameter tag mismatch");
            }
            RenderIssue::ParameterMissing { index } => debug!(index, "parameter missing"),
            RenderIssue::ValueOutOfRange { index } => debug!(index, "value out of range"),
            RenderIssue::BufferTruncated { limit } => debug!(limit, "output truncated"),
        }
        if let Some(marker) = issue.marker() {
            self.out.push_str(marker);
        }
        self.issues.push(issue);
    }

    /// Resolve and render string `id` at nesting `depth`.
    fn string(&mut self, id: StringId, params: &ParameterStack, case: u8, depth: usize) {
        if self.halted() {
            return;
        }
        if depth > self.interp.settings.max_nesting {
            self.report(RenderIssue::RecursionLimitExceeded { id, depth });
            return;
        }
        if depth > 0 {
            self.expansions += 1;
            if self.expansions > MAX_EXPANSIONS {
                self.report(RenderIssue::RecursionLimitExceeded { id, depth });
                self.exhausted = true;
                return;
            }
        }

        let store = self.interp.store;
        let resolved = store.resolve(id, params, self.game_script);
        let mut rule = store.active().plural_rule();
        match resolved.lookup {
            Lookup::BaseLanguage => {
                if let Some(base) = store.base() {
                    rule = base.plural_rule();
                }
                self.report(RenderIssue::MissingTranslation {
                    id,
                    isocode: store.active().isocode().to_string(),
                });
            }
            Lookup::Unknown => self.report(RenderIssue::UnknownStringIdentifier { id }),
            Lookup::Found | Lookup::Undefined => {}
        }
        let params = resolved.params.as_ref().unwrap_or(params);
        self.template(&resolved.template, params, case, depth, rule);
    }

    fn template(
        &mut self,
        template: &Template,
        params: &ParameterStack,
        case: u8,
        depth: usize,
        rule: PluralRule,
    ) {
        let mut frame = Frame {
            params,
            cursor: 0,
            previous: None,
            depth,
            rule,
        };
        for instruction in template.instructions(case) {
            if self.halted() {
                break;
            }
            self.step(instruction, &mut frame);
        }
    }

    fn step(&mut self, instruction: &Instruction, frame: &mut Frame<'_>) {
        match instruction {
            Instruction::Literal(text) => {
                self.out.push_str(text);
            }
            Instruction::Control(code) => {
                self.out.push(code.to_char());
            }
            Instruction::Revision => {
                self.out.push_str(&self.interp.settings.revision);
            }
            Instruction::Format { command, arg, case } => {
                let slot = match *arg {
                    ArgRef::Next => {
                        let slot = frame.cursor;
                        frame.cursor = slot.saturating_add(command.params_consumed());
                        slot
                    }
                    ArgRef::Index(n) => usize::from(n),
                    ArgRef::Previous => frame.previous.unwrap_or(frame.cursor),
                };
                frame.previous = Some(slot);
                let case = case.unwrap_or(0);
                if let Err(issue) = self.format(*command, slot, case, frame.params, frame.depth) {
                    self.report(issue);
                }
            }
            Instruction::Inline(id) => {
                let rest = frame
                    .params
                    .sub_stack(frame.cursor, frame.params.capacity());
                self.string(*id, &rest, 0, frame.depth + 1);
            }
            Instruction::Plural { arg, forms } => {
                let slot = match *arg {
                    ArgRef::Index(n) => Some(usize::from(n)),
                    ArgRef::Previous => frame.previous,
                    ArgRef::Next => Some(frame.cursor),
                };
                let Some(slot) = slot else {
                    self.report(RenderIssue::ParameterMissing {
                        index: frame.cursor,
                    });
                    return;
                };
                match frame.params.integer(slot) {
                    Ok(count) => {
                        if let Some(text) = forms.get(frame.rule.select(count)) {
                            self.out.push_str(text);
                        }
                    }
                    Err(err) => self.report(err.into()),
                }
            }
            Instruction::GenderList { arg, forms } => {
                let slot = match *arg {
                    ArgRef::Index(n) => usize::from(n),
                    ArgRef::Next | ArgRef::Previous => frame.cursor,
                };
                match self.gender_of(frame.params, slot) {
                    Ok(gender) => {
                        if let Some(text) = forms.get(gender).or_else(|| forms.first()) {
                            self.out.push_str(text);
                        }
                    }
                    Err(issue) => self.report(issue),
                }
            }
            Instruction::Invalid(raw) => self.report(RenderIssue::MalformedDirective {
                directive: raw.clone(),
                marker: INVALID_COMMAND,
            }),
        }
    }

    /// Declared gender of the string in `slot`. Plain text has gender 0.
    fn gender_of(&self, params: &ParameterStack, slot: usize) -> Result<usize, RenderIssue> {
        match params.get(slot)? {
            Parameter::StringRef(id) => {
                let rest = params.sub_stack(slot + 1, params.capacity());
                let resolved = self.interp.store.resolve(*id, &rest, self.game_script);
                Ok(usize::from(resolved.template.gender().unwrap_or(0)))
            }
            Parameter::Text(_) => Ok(0),
            other => Err(RenderIssue::ParameterTagMismatch {
                index: slot,
                expected: ParamKind::StringRef,
                found: other.kind(),
            }),
        }
    }

    fn format(
        &mut self,
        command: Command,
        slot: usize,
        case: u8,
        params: &ParameterStack,
        depth: usize,
    ) -> Result<(), RenderIssue> {
        let interp = self.interp;
        match command {
            Command::Num => {
                let value = params.integer(slot)?;
                let seps = Separators {
                    group: "",
                    decimal: &interp.decimal,
                };
                self.out.push_str(&format_number(value, 1, 0, seps));
            }
            Command::Comma => {
                let value = params.integer(slot)?;
                self.out
                    .push_str(&format_number(value, 1, 0, interp.separators()));
            }
            Command::Decimal => {
                let value = params.integer(slot)?;
                let digits = params.unsigned(slot + 1)?;
                let digits = u32::try_from(digits)
                    .ok()
                    .filter(|d| *d <= MAX_FRACTIONAL_DIGITS)
                    .ok_or(RenderIssue::ValueOutOfRange { index: slot + 1 })?;
                self.out
                    .push_str(&format_number(value, 1, digits, interp.separators()));
            }
            Command::ZerofillNum => {
                let value = params.integer(slot)?;
                let width = params.unsigned(slot + 1)?.min(u64::from(MAX_ZEROFILL));
                let width = u32::try_from(width).unwrap_or(MAX_ZEROFILL);
                self.out
                    .push_str(&format_number(value, width, 0, Separators::PLAIN));
            }
            Command::Hex => {
                let value = params.unsigned(slot)?;
                self.out.push_str(&format_hex(value));
            }
            Command::Bytes => {
                let value = params.unsigned(slot)?;
                self.out.push_str(&format_bytes(value, &interp.decimal));
            }
            Command::CurrencyLong | Command::CurrencyShort => {
                let value = params.integer(slot)?;
                let compact = command == Command::CurrencyShort;
                self.out.push_str(&format_currency(
                    value,
                    &interp.currency,
                    &interp.group_currency,
                    compact,
                ));
            }
            Command::DateLong | Command::DateShort | Command::DateTiny | Command::DateIso => {
                let style = match command {
                    Command::DateLong => DateStyle::Long,
                    Command::DateShort => DateStyle::Short,
                    Command::DateTiny => DateStyle::Tiny,
                    _ => DateStyle::Iso,
                };
                let date = params.date(slot)?;
                let ymd = YearMonthDay::from_date(date)
                    .ok_or(RenderIssue::ValueOutOfRange { index: slot })?;
                let active = interp.store.active();
                let (template, sub) = style.layout(active.calendar(), ymd);
                self.template(&template, &sub, case, depth + 1, active.plural_rule());
            }
            Command::Velocity
            | Command::Power
            | Command::WeightShort
            | Command::WeightLong
            | Command::VolumeShort
            | Command::VolumeLong
            | Command::Force
            | Command::Height => {
                let quantity = quantity_of(command);
                let value = params.integer(slot)?;
                let system = system_for(&interp.settings.units, quantity);
                let shown = to_display(quantity, system, value);
                let active = interp.store.active();
                let template = Arc::clone(active.units().get(quantity, system));
                let sub = ParameterStack::from_params([Parameter::Signed(shown)]);
                self.template(&template, &sub, 0, depth + 1, active.plural_rule());
            }
            Command::String => {
                let id = params.string_id(slot)?;
                let rest = params.sub_stack(slot + 1, params.capacity());
                self.sub_string(id, &rest, case, depth)?;
            }
            Command::StringN(n) => {
                let id = params.string_id(slot)?;
                let n = usize::from(n);
                if self.game_script && (1..=n).any(|k| !params.is_set(slot + k)) {
                    return Err(RenderIssue::MalformedDirective {
                        directive: format!("STRING{n}"),
                        marker: TOO_MANY_PARAMETERS,
                    });
                }
                let sub = params.sub_stack(slot + 1, n);
                self.sub_string(id, &sub, case, depth)?;
            }
            Command::RawString => match params.get(slot)? {
                Parameter::Text(text) => self.raw_text(text, depth)?,
                other => {
                    return Err(RenderIssue::ParameterTagMismatch {
                        index: slot,
                        expected: ParamKind::Text,
                        found: other.kind(),
                    });
                }
            },
        }
        Ok(())
    }

    fn sub_string(
        &mut self,
        id: StringId,
        params: &ParameterStack,
        case: u8,
        depth: usize,
    ) -> Result<(), RenderIssue> {
        if self.game_script && !id.is_game_script() {
            return Err(RenderIssue::ScriptRestricted { id });
        }
        self.string(id, params, case, depth + 1);
        Ok(())
    }

    fn raw_text(&mut self, text: &str, depth: usize) -> Result<(), RenderIssue> {
        if is_encoded(text) {
            let encoded = decode(text).map_err(|err| RenderIssue::MalformedDirective {
                directive: err.to_string(),
                marker: err.marker(),
            })?;
            let outer = std::mem::replace(&mut self.game_script, true);
            self.string(encoded.id, &encoded.params, 0, depth + 1);
            self.game_script = outer;
        } else if self.game_script {
            self.out.push_str(&strip_controls(text));
        } else {
            self.out.push_str(text);
        }
        Ok(())
    }
}

fn quantity_of(command: Command) -> Quantity {
    match command {
        Command::Power => Quantity::Power,
        Command::WeightShort => Quantity::WeightShort,
        Command::WeightLong => Quantity::WeightLong,
        Command::VolumeShort => Quantity::VolumeShort,
        Command::VolumeLong => Quantity::VolumeLong,
        Command::Force => Quantity::Force,
        Command::Height => Quantity::Height,
        _ => Quantity::Velocity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoded::{EncodedParam, encode};
    use crate::issue::{INVALID_PARAMETER, MISSING_PARAMETER, RECURSION_LIMIT};
    use lingo_core::string_id::{SPECIAL_NAME_FIRST_INDEX, SPECIAL_NAME_TAB};
    use lingo_core::{Colour, ControlCode, GameDate};
    use lingo_i18n::generator::special::COMPANY_NAME_START;
    use lingo_i18n::{Generated, LanguageMetadata, LanguagePack};

    fn id(raw: u16) -> StringId {
        StringId::from_raw(raw)
    }

    fn pack(meta: LanguageMetadata, strings: &[(u16, &str)]) -> LanguagePack {
        let mut pack = LanguagePack::new(meta);
        for (raw, text) in strings {
            pack.insert(id(*raw), text).expect("insert template");
        }
        pack
    }

    fn store(strings: &[(u16, &str)]) -> TemplateStore {
        TemplateStore::new(Arc::new(pack(LanguageMetadata::default(), strings)))
    }

    fn german() -> LanguageMetadata {
        LanguageMetadata {
            isocode: "de_DE".into(),
            genders: vec!["m".into(), "w".into(), "n".into()],
            cases: vec!["nom".into(), "gen".into()],
            digit_group_separator: ".".into(),
            digit_decimal_separator: ",".into(),
            ..LanguageMetadata::default()
        }
    }

    fn params(values: impl IntoIterator<Item = Parameter>) -> ParameterStack {
        ParameterStack::from_params(values)
    }

    fn render(store: &TemplateStore, raw: u16, p: &ParameterStack) -> Rendered {
        let settings = LocaleSettings::default();
        FormatInterpreter::new(store, &settings).render_id(id(raw), p, 0, false, DEFAULT_OUTPUT_LIMIT)
    }

    #[test]
    fn plural_item_count() {
        let s = store(&[(1, "{COUNT} item{PLURAL s}")]);
        assert_eq!(render(&s, 1, &params([1u64.into()])).text, "1 item");
        assert_eq!(render(&s, 1, &params([5u64.into()])).text, "5 items");
        assert_eq!(render(&s, 1, &params([0u64.into()])).text, "0 items");
    }

    #[test]
    fn irish_zero_takes_the_few_form() {
        let meta = LanguageMetadata {
            isocode: "ga_IE".into(),
            plural_form: 4,
            ..LanguageMetadata::default()
        };
        let s = TemplateStore::new(Arc::new(pack(meta, &[(1, "{COMMA} {P a b c d e}")])));
        let rendered = |n: u64| render(&s, 1, &params([n.into()])).text;
        assert_eq!(rendered(0), "0 c");
        assert_eq!(rendered(5), "5 c");
        assert_eq!(rendered(8), "8 d");
        assert_eq!(rendered(11), "11 e");
    }

    #[test]
    fn self_cycle_stops_at_the_nesting_limit() {
        let s = store(&[(1, "a{STRINL 0x0001}")]);
        let out = render(&s, 1, &ParameterStack::default());
        assert_eq!(out.text, format!("{}{RECURSION_LIMIT}", "a".repeat(17)));
        assert!(matches!(
            out.issues.as_slice(),
            [RenderIssue::RecursionLimitExceeded { depth: 17, .. }]
        ));
    }

    #[test]
    fn two_cycle_stops_at_the_nesting_limit() {
        let s = store(&[(1, "x{STRINL 0x0002}"), (2, "y{STRINL 0x0001}")]);
        let out = render(&s, 1, &ParameterStack::default());
        assert!(out.text.starts_with("xyxy"));
        assert!(out.text.ends_with(RECURSION_LIMIT));
        assert!(!out.truncated);
    }

    #[test]
    fn branching_cycles_are_bounded() {
        let s = store(&[(1, "{STRINL 0x0001}{STRINL 0x0001}{STRINL 0x0001}")]);
        let out = render(&s, 1, &ParameterStack::default());
        assert!(out.issues.iter().all(|i| matches!(
            i,
            RenderIssue::RecursionLimitExceeded { .. } | RenderIssue::BufferTruncated { .. }
        )));
        assert!(out.text.starts_with(RECURSION_LIMIT));
    }

    #[test]
    fn expansion_budget_stops_wide_cycles() {
        let s = store(&[(1, "{STRINL 0x0001}{STRINL 0x0001}{STRINL 0x0001}{STRINL 0x0001}")]);
        let settings = LocaleSettings::default();
        let out = FormatInterpreter::new(&s, &settings).render_id(
            id(1),
            &ParameterStack::default(),
            0,
            false,
            usize::MAX,
        );
        assert!(!out.truncated);
        let last = out.issues.last().expect("issues recorded");
        assert!(matches!(last, RenderIssue::RecursionLimitExceeded { depth, .. } if *depth <= 17));
    }

    #[test]
    fn implicit_and_positional_arguments() {
        let s = store(&[(1, "{1:COMMA} {0:COMMA} {COMMA} {COMMA}")]);
        let out = render(&s, 1, &params([1u64.into(), 2u64.into()]));
        assert_eq!(out.text, "2 1 1 2");
    }

    #[test]
    fn numbers_use_locale_separators() {
        let s = TemplateStore::new(Arc::new(pack(
            german(),
            &[(1, "{COMMA} {NUM} {DECIMAL} {ZEROFILL_NUM} {HEX} {BYTES}")],
        )));
        let p = params([
            Parameter::Signed(-1_234_567),
            Parameter::Unsigned(1_234_567),
            Parameter::Signed(12_345),
            Parameter::Unsigned(2),
            Parameter::Unsigned(7),
            Parameter::Unsigned(3),
            Parameter::Unsigned(255),
            Parameter::Unsigned(1536),
        ]);
        let out = render(&s, 1, &p);
        assert_eq!(out.text, "-1.234.567 1234567 123,45 007 0xFF 1,50\u{A0}KiB");
        assert!(out.is_clean());
    }

    #[test]
    fn settings_override_separators() {
        let s = store(&[(1, "{COMMA}")]);
        let settings = LocaleSettings {
            digit_group_separator: Some("'".into()),
            ..LocaleSettings::default()
        };
        let out = FormatInterpreter::new(&s, &settings).render_id(
            id(1),
            &params([1_000_000u64.into()]),
            0,
            false,
            DEFAULT_OUTPUT_LIMIT,
        );
        assert_eq!(out.text, "1'000'000");
    }

    #[test]
    fn velocity_rounds_half_away_from_zero() {
        let s = store(&[(1, "{VELOCITY}")]);
        assert_eq!(render(&s, 1, &params([7u64.into()])).text, "4 mph");
        assert_eq!(render(&s, 1, &params([4u64.into()])).text, "3 mph");
    }

    #[test]
    fn unit_templates_pluralise() {
        let s = store(&[(1, "{WEIGHT_LONG}")]);
        assert_eq!(render(&s, 1, &params([1u64.into()])).text, "1 tonne");
        assert_eq!(render(&s, 1, &params([4u64.into()])).text, "4 tonnes");
    }

    #[test]
    fn currency_in_red_when_negative() {
        let s = store(&[(1, "{CURRENCY_LONG} / {CURRENCY_SHORT}")]);
        let out = render(&s, 1, &params([1234u64.into(), 2_000_000u64.into()]));
        assert_eq!(out.text, "\u{A3}1,234 / \u{A3}2,000\u{A0}k");

        let out = render(&s, 1, &params([Parameter::Signed(-5), Parameter::Signed(0)]));
        let red = ControlCode::Colour(Colour::Red).to_char();
        assert!(out.text.starts_with(&format!("{red}-\u{A3}5")));
    }

    #[test]
    fn dates_use_the_calendar() {
        let s = store(&[(1, "{DATE_LONG}|{DATE_SHORT}|{DATE_TINY}|{DATE_ISO}")]);
        let date = YearMonthDay::to_date(1950, 0, 2).expect("valid date");
        let p = params(std::iter::repeat_n(Parameter::Date(date), 4));
        assert_eq!(
            render(&s, 1, &p).text,
            "2nd Jan 1950|January 1950|02-01-1950|1950-01-02"
        );
    }

    #[test]
    fn out_of_range_dates_are_marked() {
        let s = store(&[(1, "{DATE_ISO}")]);
        let out = render(&s, 1, &params([Parameter::Date(GameDate(i32::MAX))]));
        assert_eq!(out.text, crate::issue::INVALID_VALUE);
    }

    #[test]
    fn string_forwards_remaining_parameters() {
        let s = store(&[(1, "{STRING} done"), (2, "{COMMA} trains")]);
        let out = render(&s, 1, &params([id(2).into(), 5u64.into()]));
        assert_eq!(out.text, "5 trains done");
    }

    #[test]
    fn string_n_consumes_its_parameters() {
        let s = store(&[(1, "{STRING1} and {COMMA}"), (2, "{COMMA} x")]);
        let out = render(&s, 1, &params([id(2).into(), 3u64.into(), 4u64.into()]));
        assert_eq!(out.text, "3 x and 4");
    }

    #[test]
    fn bad_parameters_render_markers_and_continue() {
        let s = store(&[(1, "[{COMMA}] [{COMMA}] [{BOGUS}] [{STRING}]")]);
        let out = render(&s, 1, &params(["text".into()]));
        assert_eq!(
            out.text,
            format!("[{INVALID_PARAMETER}] [{MISSING_PARAMETER}] [{INVALID_COMMAND}] [{MISSING_PARAMETER}]")
        );
        assert_eq!(out.issues.len(), 4);
    }

    #[test]
    fn raw_text_is_never_parsed() {
        let s = store(&[(1, "<{RAW_STRING}>")]);
        let out = render(&s, 1, &params(["{COMMA}{{".into()]));
        assert_eq!(out.text, "<{COMMA}{{>");
    }

    #[test]
    fn script_mode_restricts_strings() {
        let mut s = store(&[(1, "pack text")]);
        s.insert_game_string(0, "[{STRING}] [{RAW_STRING}]");
        let settings = LocaleSettings::default();
        let red = ControlCode::Colour(Colour::Red).to_char();
        let out = FormatInterpreter::new(&s, &settings).render_id(
            StringId::game_script(0),
            &params([id(1).into(), format!("{red}hi").into()]),
            0,
            true,
            DEFAULT_OUTPUT_LIMIT,
        );
        assert_eq!(out.text, "[] [hi]");
        assert_eq!(out.issues, vec![RenderIssue::ScriptRestricted { id: id(1) }]);
    }

    #[test]
    fn script_string_n_requires_parameters() {
        let mut s = store(&[]);
        s.insert_game_string(0, "{STRING2}");
        s.insert_game_string(1, "{COMMA}{COMMA}");
        let settings = LocaleSettings::default();
        let out = FormatInterpreter::new(&s, &settings).render_id(
            StringId::game_script(0),
            &params([StringId::game_script(1).into(), 1u64.into()]),
            0,
            true,
            DEFAULT_OUTPUT_LIMIT,
        );
        assert_eq!(out.text, TOO_MANY_PARAMETERS);
    }

    #[test]
    fn encoded_strings_render_as_script_text() {
        let mut s = store(&[(1, "{RAW_STRING}")]);
        s.insert_game_string(3, "Hi {RAW_STRING}, {COMMA}");
        let text = encode(3, &[EncodedParam::Text("{BOGUS}".into()), EncodedParam::Integer(0x10)]);
        let out = render(&s, 1, &params([text.into()]));
        assert_eq!(out.text, "Hi {BOGUS}, 16");

        let out = render(&s, 1, &params(["\u{E000}900".into()]));
        assert_eq!(out.text, "(invalid StringID)");
    }

    #[test]
    fn gender_and_case_choices() {
        let mut de = LanguagePack::new(german());
        de.insert(id(1), "{GENDER w}Bahn").expect("insert");
        de.insert_with_cases(id(2), "Stadt", [("gen", "Stadts")]).expect("insert");
        de.insert(id(3), "{G der die das} {STRING}").expect("insert");
        de.insert(id(4), "des {STRING.gen}").expect("insert");
        let s = TemplateStore::new(Arc::new(de));

        assert_eq!(render(&s, 3, &params([id(1).into()])).text, "die Bahn");
        assert_eq!(render(&s, 4, &params([id(2).into()])).text, "des Stadts");
    }

    #[test]
    fn missing_translation_uses_base_language() {
        let base = Arc::new(pack(LanguageMetadata::default(), &[(5, "Hello")]));
        let active = Arc::new(pack(german(), &[(1, "Hallo")]));
        let s = TemplateStore::new(active).with_base(base);
        let out = render(&s, 5, &ParameterStack::default());
        assert_eq!(out.text, "Hello");
        assert!(matches!(
            out.issues.as_slice(),
            [RenderIssue::MissingTranslation { isocode, .. }] if isocode == "de_DE"
        ));
    }

    #[test]
    fn unknown_identifiers_render_the_placeholder() {
        let s = store(&[]);
        let out = render(&s, 9, &ParameterStack::default());
        assert_eq!(out.text, lingo_i18n::UNDEFINED_STRING);
        assert_eq!(out.issues, vec![RenderIssue::UnknownStringIdentifier { id: id(9) }]);
    }

    #[test]
    fn generated_names_take_injected_parameters() {
        let towns = |_: u16, p: &ParameterStack| {
            Some(Generated::literal(format!("Town{}", p.unsigned(0).unwrap_or(0))))
        };
        let s = store(&[]).with_town_names(Arc::new(towns));
        let company = SPECIAL_NAME_FIRST_INDEX + COMPANY_NAME_START;
        let raw = StringId::new(SPECIAL_NAME_TAB, company).raw();
        assert_eq!(render(&s, raw, &params([7u64.into()])).text, "Town7 Transport");
    }

    #[test]
    fn revision_and_truncation() {
        let s = store(&[(1, "rev {REV}"), (2, "hello world")]);
        let settings = LocaleSettings {
            revision: "1.2.3".into(),
            ..LocaleSettings::default()
        };
        let interp = FormatInterpreter::new(&s, &settings);
        let empty = ParameterStack::default();
        assert_eq!(interp.render_id(id(1), &empty, 0, false, 64).text, "rev 1.2.3");

        let out = interp.render_id(id(2), &empty, 0, false, 5);
        assert_eq!(out.text, "hell");
        assert!(out.truncated);
        assert_eq!(out.issues, vec![RenderIssue::BufferTruncated { limit: 5 }]);
    }
}
