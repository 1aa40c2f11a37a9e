//! Property-based invariant tests for the renderer.
//!
//! 1. Output never exceeds the bound (limit - 1 bytes of text)
//! 2. A truncated render is a prefix of the unbounded render
//! 3. Rendering is deterministic
//! 4. Every render terminates, whatever the template and parameters
//! 5. Text parameters are inserted verbatim outside script mode
//! 6. Script mode never lets control characters through raw text
//! 7. render_into always NUL-terminates inside the buffer
//! 8. Local parameter sets never leak into each other

use std::sync::Arc;

use lingo_core::{GameDate, Parameter, ParameterStack, StringId, is_control_char};
use lingo_format::{FormatInterpreter, StringEngine};
use lingo_i18n::{LanguageMetadata, LanguagePack, LocaleSettings, TemplateStore};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

const FRAGMENTS: &[&str] = &[
    "abc",
    " ",
    "\u{E9}",
    "\u{1F686}",
    "e\u{301}",
    "{{",
    "{COMMA}",
    "{NUM}",
    "{1:COMMA}",
    "{DECIMAL}",
    "{ZEROFILL_NUM}",
    "{HEX}",
    "{BYTES}",
    "{CURRENCY_LONG}",
    "{CURRENCY_SHORT}",
    "{DATE_LONG}",
    "{DATE_ISO}",
    "{VELOCITY}",
    "{WEIGHT_LONG}",
    "{P a b}",
    "{PLURAL s}",
    "{G x y}",
    "{STRING}",
    "{STRING2}",
    "{RAW_STRING}",
    "{STRINL 0x0001}",
    "{STRINL 0x0002}",
    "{RED}",
    "{BIG_FONT}",
    "{REV}",
    "{BOGUS}",
    "{unterminated",
    "}",
];

fn template_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..12).prop_map(|parts| parts.concat())
}

fn any_param() -> impl Strategy<Value = Parameter> {
    prop_oneof![
        any::<u64>().prop_map(Parameter::Unsigned),
        any::<i64>().prop_map(Parameter::Signed),
        "[a-z{}\u{E010}-\u{E014}]{0,8}".prop_map(Parameter::Text),
        (0u16..4).prop_map(|i| Parameter::StringRef(StringId::from_raw(i))),
        any::<i32>().prop_map(|d| Parameter::Date(GameDate(d))),
    ]
}

fn params() -> impl Strategy<Value = ParameterStack> {
    prop::collection::vec(any_param(), 0..8).prop_map(ParameterStack::from_params)
}

/// Strings 1..=3 hold the generated templates; 1 and 2 may reference each
/// other through `STRINL`.
fn store(templates: &[String]) -> TemplateStore {
    let mut pack = LanguagePack::new(LanguageMetadata::default());
    for (i, text) in templates.iter().enumerate() {
        let raw = u16::try_from(i + 1).expect("few templates");
        pack.insert(StringId::from_raw(raw), text).expect("insert template");
    }
    TemplateStore::new(Arc::new(pack))
}

fn templates() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(template_text(), 3)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Output never exceeds the bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn output_within_bound(t in templates(), p in params(), limit in 0usize..64) {
        let store = store(&t);
        let settings = LocaleSettings::default();
        let out = FormatInterpreter::new(&store, &settings)
            .render_id(StringId::from_raw(1), &p, 0, false, limit);
        prop_assert!(
            out.text.len() < limit.max(1),
            "rendered {} bytes into a limit of {}",
            out.text.len(), limit
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Truncated output is a prefix
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn truncation_is_a_prefix(t in templates(), p in params(), limit in 1usize..48) {
        let store = store(&t);
        let settings = LocaleSettings::default();
        let interp = FormatInterpreter::new(&store, &settings);
        let id = StringId::from_raw(1);
        let full = interp.render_id(id, &p, 0, false, usize::MAX);
        let short = interp.render_id(id, &p, 0, false, limit);
        prop_assert!(full.text.starts_with(&short.text));
        prop_assert_eq!(short.truncated, full.text.len() > short.text.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn render_deterministic(t in templates(), p in params(), case in 0u8..3) {
        let store = store(&t);
        let settings = LocaleSettings::default();
        let interp = FormatInterpreter::new(&store, &settings);
        let id = StringId::from_raw(1);
        let a = interp.render_id(id, &p, case, false, 4096);
        let b = interp.render_id(id, &p, case, false, 4096);
        prop_assert_eq!(a, b);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Every render terminates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn render_terminates(t in templates(), p in params(), game_script in any::<bool>()) {
        let store = store(&t);
        let settings = LocaleSettings::default();
        let interp = FormatInterpreter::new(&store, &settings);
        for raw in 0..4 {
            let _ = interp.render_id(StringId::from_raw(raw), &p, 0, game_script, 1024);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Text parameters are verbatim
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn text_is_verbatim(text in "[^\u{E000}]{0,32}") {
        let store = store(&["{RAW_STRING}".to_string()]);
        let settings = LocaleSettings::default();
        let p = ParameterStack::from_params([Parameter::Text(text.clone())]);
        let out = FormatInterpreter::new(&store, &settings)
            .render_id(StringId::from_raw(1), &p, 0, false, usize::MAX);
        prop_assert_eq!(out.text, text);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Script mode strips control characters from raw text
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn script_text_has_no_controls(text in "[a-z\u{E001}-\u{E020}]{0,32}") {
        let mut store = store(&[]);
        store.insert_game_string(0, "{RAW_STRING}");
        let settings = LocaleSettings::default();
        let p = ParameterStack::from_params([Parameter::Text(text)]);
        let out = FormatInterpreter::new(&store, &settings)
            .render_id(StringId::game_script(0), &p, 0, true, usize::MAX);
        prop_assert!(!out.text.chars().any(is_control_char));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. render_into terminates inside the buffer
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn render_into_terminated(t in templates(), p in params(), len in 1usize..40) {
        let engine = StringEngine::new(store(&t), LocaleSettings::default());
        let mut buf = vec![0xAAu8; len];
        let out = engine.render_into(StringId::from_raw(1), &p, 0, false, &mut buf);
        let nul = buf.iter().position(|&b| b == 0);
        prop_assert_eq!(nul, Some(out.text.len()));
        prop_assert_eq!(&buf[..out.text.len()], out.text.as_bytes());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Local parameter sets are isolated
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn local_params_isolated(a in any::<u32>(), b in any::<u32>()) {
        let engine = StringEngine::new(
            store(&["{COMMA}|{1:COMMA}".to_string()]),
            LocaleSettings::default(),
        );
        let id = StringId::from_raw(1);
        let first = ParameterStack::from_params([Parameter::from(a), Parameter::from(b)]);
        let second = ParameterStack::from_params([Parameter::from(b)]);

        let _ = engine.get_string_with_args(id, &first, 0, false);
        let out = engine.get_string_with_args(id, &second, 0, false);
        prop_assert!(out.text.ends_with("|(missing parameter)"), "got {}", out.text);
    }
}
