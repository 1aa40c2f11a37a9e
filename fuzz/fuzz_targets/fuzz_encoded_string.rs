#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use lingo_core::is_control_char;
use lingo_format::{FormatInterpreter, encoded};
use lingo_i18n::{LanguageMetadata, LanguagePack, LocaleSettings, TemplateStore};

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };
    if body.len() > 1024 {
        return;
    }
    let text = format!("\u{E000}{body}");

    // Decoding must never panic.
    let _ = encoded::decode(&text);

    let mut store = TemplateStore::new(Arc::new(LanguagePack::new(LanguageMetadata::default())));
    store.insert_game_string(0, "{RAW_STRING}|{STRING}");
    store.insert_game_string(1, "{COMMA} {STRING1}");
    let settings = LocaleSettings::default();
    let out = FormatInterpreter::new(&store, &settings).render_encoded(&text, 1024);

    // Script text never smuggles control codes through raw parameters.
    assert!(out.text.len() < 1024);
    assert!(!out.text.chars().any(is_control_char));
});
