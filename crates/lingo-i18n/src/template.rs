#![forbid(unsafe_code)]

//! Template parsing into an instruction stream.
//!
//! Templates are parsed once, when a language pack is loaded, and cached
//! behind `Arc<Template>`. The interpreter walks the instruction list and
//! never sees raw directive syntax.
//!
//! # Syntax
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{{` | A literal `{` |
//! | `{CMD}` | Format the next unconsumed parameter(s) |
//! | `{N:CMD}` | Format parameter `N` without moving the cursor |
//! | `{CMD.case}` | Render a sub-string or date in a grammatical case |
//! | `{P a b}` / `{PLURAL a b}` | Plural choice on the last formatted value |
//! | `{G a b}` | Gender choice on the next string parameter |
//! | `{GENDER name}` | Declare this string's gender |
//! | `{STRINL 0xID}` | Inline another string with the same parameters |
//! | `{RED}`, `{TINY_FONT}`, ... | Drawing-layer control codes |
//!
//! # Failure Modes
//!
//! Parsing never fails. Unknown commands, bad positional indices, unknown
//! case or gender names and unterminated directives become
//! [`Instruction::Invalid`], which the interpreter renders as a visible
//! marker.

use lingo_core::{Colour, ControlCode, StringId};
use smallvec::SmallVec;

use crate::language::LanguageMetadata;

/// Alternatives of a plural or gender choice.
pub type Choices = SmallVec<[String; 4]>;

/// Which parameter slot a directive reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgRef {
    /// The next unconsumed slot; advances the cursor.
    Next,
    /// The value slot of the most recent parameter directive.
    Previous,
    /// A fixed slot; leaves the cursor alone.
    Index(u8),
}

/// A parameter-consuming formatting command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Num,
    Comma,
    Decimal,
    ZerofillNum,
    Hex,
    Bytes,
    CurrencyLong,
    CurrencyShort,
    DateLong,
    DateShort,
    DateTiny,
    DateIso,
    Velocity,
    Power,
    WeightShort,
    WeightLong,
    VolumeShort,
    VolumeLong,
    Force,
    Height,
    /// A string reference rendered with the remaining parameters.
    String,
    /// A string reference that consumes the following `n` parameters.
    StringN(u8),
    RawString,
}

impl Command {
    /// Look up a command by directive name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "NUM" => Self::Num,
            "COMMA" | "COUNT" => Self::Comma,
            "DECIMAL" => Self::Decimal,
            "ZEROFILL_NUM" => Self::ZerofillNum,
            "HEX" => Self::Hex,
            "BYTES" => Self::Bytes,
            "CURRENCY_LONG" | "CURRENCY" => Self::CurrencyLong,
            "CURRENCY_SHORT" => Self::CurrencyShort,
            "DATE_LONG" => Self::DateLong,
            "DATE_SHORT" => Self::DateShort,
            "DATE_TINY" => Self::DateTiny,
            "DATE_ISO" => Self::DateIso,
            "VELOCITY" => Self::Velocity,
            "POWER" => Self::Power,
            "WEIGHT_SHORT" => Self::WeightShort,
            "WEIGHT_LONG" | "WEIGHT" => Self::WeightLong,
            "VOLUME_SHORT" => Self::VolumeShort,
            "VOLUME_LONG" | "VOLUME" => Self::VolumeLong,
            "FORCE" => Self::Force,
            "HEIGHT" => Self::Height,
            "STRING" => Self::String,
            "RAW_STRING" => Self::RawString,
            _ => {
                let n = name.strip_prefix("STRING")?.parse::<u8>().ok()?;
                if !(1..=7).contains(&n) {
                    return None;
                }
                Self::StringN(n)
            }
        })
    }

    /// Number of parameter slots the command reads.
    #[must_use]
    pub const fn params_consumed(self) -> usize {
        match self {
            Self::Decimal | Self::ZerofillNum => 2,
            Self::StringN(n) => 1 + n as usize,
            _ => 1,
        }
    }

    /// Whether a `.case` suffix is meaningful.
    #[must_use]
    pub const fn accepts_case(self) -> bool {
        matches!(
            self,
            Self::String | Self::StringN(_) | Self::DateLong | Self::DateShort
        )
    }
}

/// One step of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Text copied verbatim.
    Literal(String),
    /// A drawing-layer control character.
    Control(ControlCode),
    /// The engine revision string.
    Revision,
    /// Format one or more parameters.
    Format {
        command: Command,
        arg: ArgRef,
        case: Option<u8>,
    },
    /// Render another string in place with the current parameters.
    Inline(StringId),
    /// Pick an alternative by plural form. Always holds exactly
    /// `rule.form_count()` alternatives.
    Plural { arg: ArgRef, forms: Choices },
    /// Pick an alternative by the gender of a string parameter.
    GenderList { arg: ArgRef, forms: Choices },
    /// A directive that could not be parsed; holds the raw source.
    Invalid(String),
}

/// A parsed template: the default text, optional case variants, and the
/// declared gender.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    gender: Option<u8>,
    body: Vec<Instruction>,
    cases: Vec<(u8, Vec<Instruction>)>,
}

impl Template {
    /// Parse template text against a language's genders, cases and plural
    /// rule.
    #[must_use]
    pub fn parse(text: &str, meta: &LanguageMetadata) -> Self {
        let (body, gender) = parse_body(text, meta);
        Self {
            gender,
            body,
            cases: Vec::new(),
        }
    }

    /// A template that renders `text` verbatim; braces are not special.
    #[must_use]
    pub fn literal(text: &str) -> Self {
        let body = if text.is_empty() {
            Vec::new()
        } else {
            vec![Instruction::Literal(text.to_string())]
        };
        Self {
            gender: None,
            body,
            cases: Vec::new(),
        }
    }

    /// Attach a variant for `case_index` (1-based; 0 is the default text).
    #[must_use]
    pub fn with_case(mut self, case_index: u8, text: &str, meta: &LanguageMetadata) -> Self {
        let (body, _) = parse_body(text, meta);
        self.cases.retain(|(c, _)| *c != case_index);
        self.cases.push((case_index, body));
        self
    }

    /// Gender declared with `{GENDER ...}`.
    #[must_use]
    pub fn gender(&self) -> Option<u8> {
        self.gender
    }

    /// Instructions for `case_index`, falling back to the default text.
    #[must_use]
    pub fn instructions(&self, case_index: u8) -> &[Instruction] {
        if case_index == 0 {
            return &self.body;
        }
        self.cases
            .iter()
            .find(|(c, _)| *c == case_index)
            .map_or(&self.body, |(_, body)| body)
    }

    /// Number of case variants besides the default text.
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Whether any instruction failed to parse.
    #[must_use]
    pub fn has_invalid(&self) -> bool {
        self.all_instructions()
            .any(|i| matches!(i, Instruction::Invalid(_)))
    }

    /// Every character this template can emit by itself: literal text,
    /// choice alternatives and control codes from all case variants.
    ///
    /// Parameters and nested strings are not expanded.
    #[must_use]
    pub fn glyph_text(&self) -> String {
        let mut out = String::new();
        for instruction in self.all_instructions() {
            match instruction {
                Instruction::Literal(text) => out.push_str(text),
                Instruction::Control(code) => out.push(code.to_char()),
                Instruction::Plural { forms, .. } | Instruction::GenderList { forms, .. } => {
                    for form in forms {
                        out.push_str(form);
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn all_instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.body
            .iter()
            .chain(self.cases.iter().flat_map(|(_, body)| body.iter()))
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

enum Parsed {
    Text(&'static str),
    Gender(u8),
    Instruction(Instruction),
}

fn parse_body(text: &str, meta: &LanguageMetadata) -> (Vec<Instruction>, Option<u8>) {
    let mut out = Vec::new();
    let mut literal = String::new();
    let mut gender = None;
    let mut rest = text;

    while let Some(pos) = rest.find('{') {
        literal.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];

        if let Some(after) = rest.strip_prefix('{') {
            literal.push('{');
            rest = after;
            continue;
        }

        let Some(end) = find_close(rest) else {
            flush(&mut literal, &mut out);
            out.push(Instruction::Invalid(format!("{{{rest}")));
            rest = "";
            break;
        };
        let directive = &rest[..end];
        rest = &rest[end + 1..];

        match parse_directive(directive, meta) {
            Parsed::Text(s) => literal.push_str(s),
            Parsed::Gender(g) => gender = Some(g),
            Parsed::Instruction(instruction) => {
                flush(&mut literal, &mut out);
                out.push(instruction);
            }
        }
    }
    literal.push_str(rest);
    flush(&mut literal, &mut out);
    (out, gender)
}

fn flush(literal: &mut String, out: &mut Vec<Instruction>) {
    if !literal.is_empty() {
        out.push(Instruction::Literal(std::mem::take(literal)));
    }
}

/// Byte offset of the `}` closing a directive, skipping quoted text.
fn find_close(s: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '}' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

fn invalid(directive: &str) -> Parsed {
    Parsed::Instruction(Instruction::Invalid(format!("{{{directive}}}")))
}

fn parse_directive(directive: &str, meta: &LanguageMetadata) -> Parsed {
    let (position, body) = match split_position(directive) {
        Ok(split) => split,
        Err(()) => return invalid(directive),
    };
    let (head, args) = match body.find(char::is_whitespace) {
        Some(i) => (&body[..i], body[i..].trim()),
        None => (body, ""),
    };
    let (name, case) = match head.split_once('.') {
        Some((name, case)) => (name, Some(case)),
        None => (head, None),
    };

    match name {
        "P" | "PLURAL" => {
            if case.is_some() {
                return invalid(directive);
            }
            let forms = split_choices(args);
            if forms.is_empty() {
                return invalid(directive);
            }
            let arg = position.map_or(ArgRef::Previous, ArgRef::Index);
            let forms = align_plural(forms, meta.plural_rule().form_count());
            Parsed::Instruction(Instruction::Plural { arg, forms })
        }
        "G" => {
            if case.is_some() {
                return invalid(directive);
            }
            let forms = split_choices(args);
            if forms.is_empty() {
                return invalid(directive);
            }
            let arg = position.map_or(ArgRef::Next, ArgRef::Index);
            Parsed::Instruction(Instruction::GenderList { arg, forms })
        }
        _ if position.is_some() => match Command::from_name(name) {
            Some(command) => format_instruction(directive, command, position, case, args, meta),
            None => invalid(directive),
        },
        "GENDER" => match meta.gender_index(args) {
            Some(g) if case.is_none() => Parsed::Gender(g),
            _ => invalid(directive),
        },
        "STRINL" => match args.parse::<StringId>() {
            Ok(id) if case.is_none() => Parsed::Instruction(Instruction::Inline(id)),
            _ => invalid(directive),
        },
        _ if case.is_some() || !args.is_empty() => match Command::from_name(name) {
            Some(command) => format_instruction(directive, command, None, case, args, meta),
            None => invalid(directive),
        },
        "REV" => Parsed::Instruction(Instruction::Revision),
        "LRM" => Parsed::Text("\u{200E}"),
        "RLM" => Parsed::Text("\u{200F}"),
        "NBSP" => Parsed::Text("\u{A0}"),
        "COPYRIGHT" => Parsed::Text("\u{A9}"),
        "TINY_FONT" => control(ControlCode::TinyFont),
        "BIG_FONT" => control(ControlCode::BigFont),
        "NORMAL_FONT" => control(ControlCode::NormalFont),
        "MONO_FONT" => control(ControlCode::MonoFont),
        "PUSH_COLOUR" => control(ControlCode::PushColour),
        "POP_COLOUR" => control(ControlCode::PopColour),
        _ => {
            if let Some(colour) = Colour::from_name(name) {
                return control(ControlCode::Colour(colour));
            }
            match Command::from_name(name) {
                Some(command) => format_instruction(directive, command, None, None, args, meta),
                None => invalid(directive),
            }
        }
    }
}

fn control(code: ControlCode) -> Parsed {
    Parsed::Instruction(Instruction::Control(code))
}

fn format_instruction(
    directive: &str,
    command: Command,
    position: Option<u8>,
    case: Option<&str>,
    args: &str,
    meta: &LanguageMetadata,
) -> Parsed {
    if !args.is_empty() {
        return invalid(directive);
    }
    let case = match case {
        None => None,
        Some(name) if command.accepts_case() => match meta.case_index(name) {
            Some(index) => Some(index),
            None => return invalid(directive),
        },
        Some(_) => return invalid(directive),
    };
    let arg = position.map_or(ArgRef::Next, ArgRef::Index);
    Parsed::Instruction(Instruction::Format { command, arg, case })
}

/// Split an optional `N:` prefix off a directive.
fn split_position(directive: &str) -> Result<(Option<u8>, &str), ()> {
    let digits = directive
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return Ok((None, directive));
    }
    match directive[digits..].strip_prefix(':') {
        Some(rest) => directive[..digits]
            .parse::<u8>()
            .map(|n| (Some(n), rest))
            .map_err(|_| ()),
        None => Err(()),
    }
}

/// Split whitespace-separated alternatives. `"..."` quotes an alternative,
/// with `\"` and `\\` as escapes.
fn split_choices(args: &str) -> Choices {
    let mut out = Choices::new();
    let mut chars = args.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(first) = chars.next() else { break };
        let mut word = String::new();
        if first == '"' {
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            word.push(escaped);
                        }
                    }
                    '"' => break,
                    _ => word.push(c),
                }
            }
        } else {
            word.push(first);
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                word.push(c);
            }
        }
        out.push(word);
    }
    out
}

/// Fit alternatives to a rule's form count. Short lists align to the last
/// forms, so `{P s}` reads as "no suffix, then `s`".
fn align_plural(mut forms: Choices, count: usize) -> Choices {
    if forms.len() >= count {
        forms.truncate(count);
        return forms;
    }
    let mut aligned = Choices::with_capacity(count);
    aligned.extend(std::iter::repeat_n(String::new(), count - forms.len()));
    aligned.extend(forms);
    aligned
}
