#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lingo_core::{GameDate, Parameter, ParameterStack, StringId};
use lingo_format::{FormatInterpreter, write_terminated};
use lingo_i18n::{LanguageMetadata, LanguagePack, LocaleSettings, TemplateStore};

#[derive(Debug, Arbitrary)]
enum FuzzParam {
    Unsigned(u64),
    Signed(i64),
    Text(String),
    StringRef(u16),
    Date(i32),
}

impl From<FuzzParam> for Parameter {
    fn from(p: FuzzParam) -> Self {
        match p {
            FuzzParam::Unsigned(n) => Self::Unsigned(n),
            FuzzParam::Signed(n) => Self::Signed(n),
            FuzzParam::Text(s) => Self::Text(s),
            FuzzParam::StringRef(raw) => Self::StringRef(StringId::from_raw(raw % 8)),
            FuzzParam::Date(d) => Self::Date(GameDate(d)),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    templates: Vec<String>,
    params: Vec<FuzzParam>,
    case: u8,
    game_script: bool,
    limit: u16,
}

fuzz_target!(|input: Input| {
    // Ids 1..=7 hold the templates; they may name each other via STRINL.
    let mut pack = LanguagePack::new(LanguageMetadata::default());
    for (i, text) in input.templates.iter().take(7).enumerate() {
        if text.len() > 512 {
            return;
        }
        let _ = pack.insert(StringId::from_raw(i as u16 + 1), text);
    }
    let store = TemplateStore::new(Arc::new(pack));
    let settings = LocaleSettings::default();
    let interp = FormatInterpreter::new(&store, &settings);

    let params: Vec<Parameter> = input.params.into_iter().take(20).map(Into::into).collect();
    let params = ParameterStack::from_params(params);
    let limit = usize::from(input.limit);

    let out = interp.render_id(StringId::from_raw(1), &params, input.case, input.game_script, limit);

    // Output never reaches the bound.
    assert!(out.text.len() < limit.max(1));

    // A bounded render is a prefix of the unbounded one.
    let full = interp.render_id(StringId::from_raw(1), &params, input.case, input.game_script, usize::MAX);
    assert!(full.text.starts_with(&out.text));

    // Terminated copies stay inside the buffer.
    let mut buf = vec![0xFFu8; limit];
    let written = write_terminated(&full.text, &mut buf);
    if limit > 0 {
        assert!(written < limit);
        assert_eq!(buf[written], 0);
    }
});
