#![forbid(unsafe_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use lingo_core::{ParameterStack, StringId};
use lingo_format::StringEngine;
use lingo_glyph::{
    CandidateFonts, FontGlyphSet, FontOutcome, FontSettings, GlyphCoverageChecker,
    LanguagePackSearcher, check_for_missing_glyphs,
};
use lingo_i18n::LocaleSettings;
use tracing::debug;

use crate::error::{CliError, Result};
use crate::params::parse_param;

#[derive(Debug, Parser)]
#[command(
    name = "lingo",
    about = "Inspect language packs and render localized strings",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Settings file (TOML, or JSON with a .json extension).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory to search for *.lng.toml files. Replaces the configured
    /// search paths; may be repeated.
    #[arg(long = "lang-dir", global = true)]
    pub lang_dirs: Vec<PathBuf>,

    /// Preferred language file name, e.g. german.lng.toml.
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List discovered language packs.
    Langs(LangsArgs),

    /// Render one string.
    Render(RenderArgs),

    /// Scan the active language against a font.
    Glyphs(GlyphsArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct LangsArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    /// String id, decimal or 0x-prefixed hex.
    pub id: String,

    /// Parameter, in slot order: u:N, i:N, s:TEXT, id:ID, date:YYYY-MM-DD,
    /// or a bare value.
    #[arg(long = "param", short = 'p')]
    pub params: Vec<String>,

    /// Grammatical case index.
    #[arg(long, default_value_t = 0)]
    pub case: u8,

    /// Render as script-supplied text.
    #[arg(long)]
    pub script: bool,

    /// Output bound in bytes, terminator included.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Fail when rendering reports any issue.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlyphsArgs {
    /// File whose characters make up the font's coverage.
    #[arg(long)]
    pub font: PathBuf,

    /// Fallback font as NAME=FILE, tried in order; may be repeated.
    #[arg(long = "fallback")]
    pub fallbacks: Vec<String>,

    /// List at most this many flagged strings.
    #[arg(long, default_value_t = 10)]
    pub show: usize,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.global.log_json);
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Langs(args) => run_langs(&cli.global, &args, out),
        Commands::Render(args) => run_render(&cli.global, &args, out),
        Commands::Glyphs(args) => run_glyphs(&cli.global, &args, out),
    }
}

/// Settings from `--config` (or defaults) with command-line overrides.
pub fn settings(global: &GlobalArgs) -> Result<LocaleSettings> {
    let mut settings = match &global.config {
        Some(path) if path.extension().is_some_and(|e| e == "json") => {
            LocaleSettings::from_json_file(path)?
        }
        Some(path) => LocaleSettings::from_toml_file(path)?,
        None => LocaleSettings::default(),
    };
    if !global.lang_dirs.is_empty() {
        settings.search_paths.clone_from(&global.lang_dirs);
    }
    if let Some(language) = &global.language {
        settings.language = Some(language.clone());
    }
    let errors = settings.validate();
    if !errors.is_empty() {
        return Err(lingo_i18n::ConfigError::Validation(errors).into());
    }
    Ok(settings)
}

fn engine(global: &GlobalArgs) -> Result<StringEngine> {
    let settings = settings(global)?;
    debug!(paths = ?settings.search_paths, "starting engine");
    Ok(StringEngine::initialize(settings)?)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// langs
// ---------------------------------------------------------------------------

fn run_langs(global: &GlobalArgs, args: &LangsArgs, out: &mut dyn Write) -> Result<()> {
    let engine = engine(global)?;
    let current = engine.snapshot().current;
    let languages = engine.languages();

    if args.json {
        let list: Vec<serde_json::Value> = languages
            .iter()
            .enumerate()
            .map(|(i, meta)| {
                serde_json::json!({
                    "index": i,
                    "current": current == Some(i),
                    "isocode": meta.isocode,
                    "name": meta.name,
                    "own_name": meta.own_name,
                    "file": meta.file_name(),
                })
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &list)?;
        writeln!(out)?;
        return Ok(());
    }

    for (i, meta) in languages.iter().enumerate() {
        let mark = if current == Some(i) { '*' } else { ' ' };
        writeln!(
            out,
            "{mark} {i:>2}  {:<6} {} ({})",
            meta.isocode, meta.name, meta.own_name
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

fn run_render(global: &GlobalArgs, args: &RenderArgs, out: &mut dyn Write) -> Result<()> {
    let id: StringId = args
        .id
        .parse()
        .map_err(|err: lingo_core::ParseStringIdError| CliError::invalid(err.to_string()))?;
    let params = args
        .params
        .iter()
        .map(|p| parse_param(p))
        .collect::<Result<Vec<_>>>()?;

    let mut engine = engine(global)?;
    if let Some(limit) = args.limit {
        engine = engine.with_output_limit(limit);
    }
    let rendered = engine.get_string_with_args(
        id,
        &ParameterStack::from_params(params),
        args.case,
        args.script,
    );
    writeln!(out, "{}", rendered.text)?;

    for issue in &rendered.issues {
        eprintln!("lingo: {issue}");
    }
    if args.strict && !rendered.is_clean() {
        return Err(CliError::RenderIssues {
            count: rendered.issues.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// glyphs
// ---------------------------------------------------------------------------

fn run_glyphs(global: &GlobalArgs, args: &GlyphsArgs, out: &mut dyn Write) -> Result<()> {
    let font = FontGlyphSet::covering(&read(&args.font)?);
    let mut provider = CandidateFonts::new();
    for spec in &args.fallbacks {
        let (name, path) = spec
            .split_once('=')
            .ok_or_else(|| CliError::invalid(format!("fallback '{spec}': expected NAME=FILE")))?;
        let glyphs = FontGlyphSet::covering(&read(Path::new(path))?);
        provider = provider.with_font(name, glyphs);
    }

    let engine = engine(global)?;
    let state = engine.snapshot();
    let mut searcher = LanguagePackSearcher::new(&state.store);
    let report = GlyphCoverageChecker::new(&font).run(&mut searcher).clone();

    writeln!(
        out,
        "{}: probed {} strings, {} with missing glyphs",
        state.store.active().isocode(),
        report.strings,
        report.flagged.len()
    )?;
    for coverage in report.flagged.iter().take(args.show) {
        let chars: String = coverage.missing.iter().map(|&(_, c)| c).collect();
        writeln!(out, "  #{:<5} missing {:?} in {:?}", coverage.index, chars, coverage.text)?;
    }
    if report.is_complete() {
        return Ok(());
    }

    let check = check_for_missing_glyphs(
        true,
        &font,
        &mut FontSettings::default(),
        state.store.active().meta(),
        &mut searcher,
        &mut provider,
    );
    match check.outcome {
        FontOutcome::Fallback => {
            writeln!(out, "fallback font: {}", provider.loaded().unwrap_or_default())?;
            Ok(())
        }
        _ => {
            if let Some(warning) = &check.warning {
                writeln!(out, "{}", lingo_core::strip_controls(warning))?;
            }
            Err(CliError::MissingGlyphs {
                count: report.missing_chars().len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGLISH: &str = "[header]\nname = \"English (UK)\"\nown_name = \"English (UK)\"\n\
        isocode = \"en_GB\"\nnewgrflangid = 1\n\n[strings]\n\
        0x0001 = \"{COMMA} crate{P \\\"\\\" s} of {RAW_STRING}\"\n";
    const FRENCH: &str = "[header]\nname = \"French\"\nown_name = \"Français\"\n\
        isocode = \"fr_FR\"\nnewgrflangid = 3\nplural_form = 2\n\n[strings]\n\
        0x0001 = \"{COMMA} caisse{P \\\"\\\" s} de {RAW_STRING}\"\n\
        0x0002 = \"Reçu\"\n";

    fn lang_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("english.lng.toml"), ENGLISH).expect("write");
        std::fs::write(dir.path().join("french.lng.toml"), FRENCH).expect("write");
        dir
    }

    fn global(dir: &Path, language: &str) -> GlobalArgs {
        GlobalArgs {
            lang_dirs: vec![dir.to_path_buf()],
            language: Some(language.into()),
            ..GlobalArgs::default()
        }
    }

    fn run_to_string(global: GlobalArgs, command: Commands) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = run(Cli { global, command }, &mut out);
        (result, String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn langs_marks_current() {
        let dir = lang_dir();
        let (result, out) = run_to_string(
            global(dir.path(), "french.lng.toml"),
            Commands::Langs(LangsArgs::default()),
        );
        assert!(result.is_ok());
        assert!(out.contains("   0  en_GB  English (UK) (English (UK))"), "{out}");
        assert!(out.contains("*  1  fr_FR  French (Français)"), "{out}");
    }

    #[test]
    fn langs_as_json() {
        let dir = lang_dir();
        let (result, out) = run_to_string(
            global(dir.path(), "english.lng.toml"),
            Commands::Langs(LangsArgs { json: true }),
        );
        assert!(result.is_ok());
        let list: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(list[0]["current"], true);
        assert_eq!(list[1]["isocode"], "fr_FR");
        assert_eq!(list[1]["file"], "french.lng.toml");
    }

    #[test]
    fn render_uses_language_plural_rule() {
        let dir = lang_dir();
        let args = RenderArgs {
            id: "1".into(),
            params: vec!["0".into(), "s:pommes".into()],
            ..RenderArgs::default()
        };
        let (result, out) = run_to_string(
            global(dir.path(), "french.lng.toml"),
            Commands::Render(args.clone()),
        );
        assert!(result.is_ok());
        assert_eq!(out, "0 caisse de pommes\n");

        let (_, out) = run_to_string(
            global(dir.path(), "english.lng.toml"),
            Commands::Render(RenderArgs {
                params: vec!["0".into(), "s:apples".into()],
                ..args
            }),
        );
        assert_eq!(out, "0 crates of apples\n");
    }

    #[test]
    fn strict_render_fails_on_issues() {
        let dir = lang_dir();
        let (result, out) = run_to_string(
            global(dir.path(), "english.lng.toml"),
            Commands::Render(RenderArgs {
                id: "0x0001".into(),
                strict: true,
                ..RenderArgs::default()
            }),
        );
        assert!(out.contains("(missing parameter)"));
        assert_eq!(result.map_err(|e| e.exit_code()).err(), Some(3));
    }

    #[test]
    fn bad_id_is_an_invalid_argument() {
        let dir = lang_dir();
        let (result, _) = run_to_string(
            global(dir.path(), "english.lng.toml"),
            Commands::Render(RenderArgs {
                id: "0x1FFFF".into(),
                ..RenderArgs::default()
            }),
        );
        assert_eq!(result.map_err(|e| e.exit_code()).err(), Some(2));
    }

    #[test]
    fn glyph_scan_picks_fallback() {
        let dir = lang_dir();
        let basic = dir.path().join("basic.txt");
        let wide = dir.path().join("wide.txt");
        let everything: String = (' '..='~').chain("çÇéèàäöüßœ³".chars()).collect();
        std::fs::write(&basic, everything.replace('ç', "")).expect("write");
        std::fs::write(&wide, &everything).expect("write");

        let (result, out) = run_to_string(
            global(dir.path(), "french.lng.toml"),
            Commands::Glyphs(GlyphsArgs {
                font: basic.clone(),
                fallbacks: vec![format!("Wide={}", wide.display())],
                show: 10,
            }),
        );
        assert!(result.is_ok(), "{out}");
        assert!(out.starts_with("fr_FR: probed"), "{out}");
        assert!(out.contains("fallback font: Wide"), "{out}");

        let (result, out) = run_to_string(
            global(dir.path(), "french.lng.toml"),
            Commands::Glyphs(GlyphsArgs {
                font: basic,
                fallbacks: Vec::new(),
                show: 10,
            }),
        );
        assert_eq!(result.map_err(|e| e.exit_code()).err(), Some(4));
        assert!(out.contains("The current font is missing some of the characters"));
    }
}
