#![forbid(unsafe_code)]

//! The string engine: a global parameter stack plus the active locale.
//!
//! # Concurrency
//!
//! The locale lives behind an [`ArcSwap`]. Every render loads one snapshot
//! and uses it to the end, so a language switch never tears a render in
//! half: renders already running finish against the old language and the
//! next one sees the new language. Switching builds the new state off to
//! the side and publishes it with a single atomic store.
//!
//! The global parameter stack is owned by the engine value and mutated
//! through `&mut self`, so two renders can never share it. Independent
//! callers use [`StringEngine::get_string_with_args`] with their own
//! stacks, or clone the engine: clones share the locale and own separate
//! stacks.
//!
//! # Request scoping
//!
//! [`StringEngine::get_string`] drains the global stack. Values set before
//! the call are consumed by it and every slot reads as unset afterwards,
//! so nothing leaks into the next request.

use std::sync::Arc;

use arc_swap::ArcSwap;
use lingo_core::{DEFAULT_CAPACITY, Parameter, ParameterStack, StringId, TextDirection};
use lingo_i18n::{
    LanguageMetadata, LanguagePack, LanguagePackError, LocaleSettings, SpecialNames,
    StringGenerator, TemplateStore, initialize_language_packs, loader::load_languages,
};
use tracing::info;

use crate::interpreter::{DEFAULT_OUTPUT_LIMIT, FormatInterpreter, Rendered};
use crate::writer::write_terminated;

/// One published language state.
#[derive(Debug, Clone)]
pub struct LocaleState {
    pub store: TemplateStore,
    pub settings: LocaleSettings,
    /// Index of the active language in `store.languages()`, when the
    /// state came from discovery.
    pub current: Option<usize>,
}

impl LocaleState {
    #[must_use]
    pub fn interpreter(&self) -> FormatInterpreter<'_> {
        FormatInterpreter::new(&self.store, &self.settings)
    }
}

/// Renders strings against an atomically swappable locale.
#[derive(Debug, Clone)]
pub struct StringEngine {
    state: Arc<ArcSwap<LocaleState>>,
    globals: ParameterStack,
    output_limit: usize,
}

fn special_names(
    settings: &LocaleSettings,
    languages: &[LanguageMetadata],
    current: Option<usize>,
) -> SpecialNames {
    SpecialNames::new(settings.toyland_names)
        .with_languages(languages, current)
        .with_resolutions(&settings.resolutions)
}

impl StringEngine {
    /// An engine over an already built store.
    #[must_use]
    pub fn new(store: TemplateStore, settings: LocaleSettings) -> Self {
        Self::from_state(LocaleState {
            store,
            settings,
            current: None,
        })
    }

    fn from_state(state: LocaleState) -> Self {
        Self {
            state: Arc::new(ArcSwap::from_pointee(state)),
            globals: ParameterStack::new(DEFAULT_CAPACITY),
            output_limit: DEFAULT_OUTPUT_LIMIT,
        }
    }

    /// Discover language packs, load the preferred one and its base
    /// language, and build an engine over them.
    ///
    /// # Errors
    ///
    /// [`LanguagePackError`] when no pack is usable or the chosen one fails
    /// to load.
    pub fn initialize(settings: LocaleSettings) -> Result<Self, LanguagePackError> {
        let loaded = initialize_language_packs(&settings)?;
        let names = special_names(&settings, &loaded.languages, Some(loaded.current));
        let mut store = TemplateStore::new(loaded.active)
            .with_special_names(Arc::new(names))
            .with_languages(loaded.languages);
        if let Some(base) = loaded.base {
            store = store.with_base(base);
        }
        Ok(Self::from_state(LocaleState {
            store,
            settings,
            current: Some(loaded.current),
        }))
    }

    /// Bound rendered text to `limit` bytes including a terminator.
    #[must_use]
    pub fn with_output_limit(mut self, limit: usize) -> Self {
        self.output_limit = limit;
        self
    }

    #[must_use]
    pub fn output_limit(&self) -> usize {
        self.output_limit
    }

    // -- Global parameters ----------------------------------------------

    /// Store a value in the global stack.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`DEFAULT_CAPACITY`].
    pub fn set_param(&mut self, index: usize, value: impl Into<Parameter>) {
        self.globals.set(index, value);
    }

    /// Store owned text in the global stack.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`DEFAULT_CAPACITY`].
    pub fn set_param_text(&mut self, index: usize, text: impl Into<String>) {
        self.globals.set_text(index, text);
    }

    /// Copy `src` into the global stack starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range does not fit in the stack.
    pub fn copy_in_params(&mut self, offset: usize, src: &[Parameter]) {
        self.globals.copy_in(offset, src);
    }

    /// Copy `dest.len()` global slots starting at `offset` into `dest`.
    ///
    /// # Panics
    ///
    /// Panics if the range does not fit in the stack.
    pub fn copy_out_params(&self, dest: &mut [Option<Parameter>], offset: usize) {
        self.globals.copy_out(dest, offset);
    }

    /// Unset every global slot.
    pub fn reset_params(&mut self) {
        self.globals.reset();
    }

    #[must_use]
    pub fn params(&self) -> &ParameterStack {
        &self.globals
    }

    pub fn params_mut(&mut self) -> &mut ParameterStack {
        &mut self.globals
    }

    // -- Rendering --------------------------------------------------------

    /// Render `id` with the global stack in the default case. The stack
    /// is drained by the call.
    pub fn get_string(&mut self, id: StringId) -> Rendered {
        let params = self.globals.take();
        self.get_string_with_args(id, &params, 0, false)
    }

    /// Render `id` with an explicit parameter set.
    #[must_use]
    pub fn get_string_with_args(
        &self,
        id: StringId,
        params: &ParameterStack,
        case: u8,
        game_script: bool,
    ) -> Rendered {
        let state = self.state.load();
        state
            .interpreter()
            .render_id(id, params, case, game_script, self.output_limit)
    }

    /// Render `id` into `dest`, NUL terminated. The text never exceeds
    /// `dest.len() - 1` bytes.
    pub fn render_into(
        &self,
        id: StringId,
        params: &ParameterStack,
        case: u8,
        game_script: bool,
        dest: &mut [u8],
    ) -> Rendered {
        let state = self.state.load();
        let rendered = state
            .interpreter()
            .render_id(id, params, case, game_script, dest.len());
        write_terminated(&rendered.text, dest);
        rendered
    }

    /// Render text supplied by a game script.
    #[must_use]
    pub fn render_encoded(&self, text: &str) -> Rendered {
        let state = self.state.load();
        state.interpreter().render_encoded(text, self.output_limit)
    }

    // -- Locale -----------------------------------------------------------

    /// The published state. Holding it keeps that language alive.
    #[must_use]
    pub fn snapshot(&self) -> Arc<LocaleState> {
        self.state.load_full()
    }

    #[must_use]
    pub fn current_language_iso_code(&self) -> String {
        self.state.load().store.active().isocode().to_string()
    }

    #[must_use]
    pub fn text_direction(&self) -> TextDirection {
        self.state.load().store.active().text_direction()
    }

    /// Installed languages, in discovery order.
    #[must_use]
    pub fn languages(&self) -> Vec<LanguageMetadata> {
        self.state.load().store.languages().to_vec()
    }

    /// Switch to the installed language at `index`.
    ///
    /// # Errors
    ///
    /// The error from loading the pack; the current language stays active.
    pub fn switch_language(&self, index: usize) -> Result<(), LanguagePackError> {
        let current = self.state.load();
        let languages = current.store.languages().to_vec();
        let loaded = load_languages(languages, index, &current.settings)?;
        drop(current);
        // Packs load outside the swap; runtime strings inserted meanwhile survive.
        self.state.rcu(|state| {
            let names = special_names(&state.settings, &loaded.languages, Some(index));
            LocaleState {
                store: state
                    .store
                    .with_active(Arc::clone(&loaded.active), loaded.base.clone())
                    .with_special_names(Arc::new(names)),
                settings: state.settings.clone(),
                current: Some(index),
            }
        });
        info!(isocode = %loaded.active.isocode(), index, "switched language");
        Ok(())
    }

    /// Replace the active language with an already loaded pack.
    pub fn switch_language_pack(&self, active: Arc<LanguagePack>, base: Option<Arc<LanguagePack>>) {
        let isocode = active.isocode().to_string();
        self.state.rcu(|state| LocaleState {
            store: state.store.with_active(Arc::clone(&active), base.clone()),
            settings: state.settings.clone(),
            current: None,
        });
        info!(isocode = %isocode, "switched language pack");
    }

    /// Replace the settings; the active language is kept.
    pub fn update_settings(&self, settings: LocaleSettings) {
        self.state.rcu(|state| LocaleState {
            settings: settings.clone(),
            ..LocaleState::clone(state)
        });
    }

    /// Install the town-name generator.
    pub fn set_town_names(&self, generator: Arc<dyn StringGenerator>) {
        self.state.rcu(|state| LocaleState {
            store: state.store.clone().with_town_names(Arc::clone(&generator)),
            ..LocaleState::clone(state)
        });
    }

    /// Add or replace a game-script string.
    pub fn insert_game_string(&self, index: u16, text: &str) {
        self.state.rcu(|state| {
            let mut next = LocaleState::clone(state);
            next.store.insert_game_string(index, text);
            next
        });
    }

    /// Add or replace a data-pack string.
    pub fn insert_newgrf_string(&self, index: u16, text: &str) {
        self.state.rcu(|state| {
            let mut next = LocaleState::clone(state);
            next.store.insert_newgrf_string(index, text);
            next
        });
    }
}
