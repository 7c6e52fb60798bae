use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use mdink::{
    CodeTokenizer, HiliteMode, RenderConfig, ThemeCatalog, ThemeChoice, ThemeRequest, code_hilite,
    display_from, render_markdown,
};
use mdink_core::ansi;
use mdink_syntax::SyntectTokenizer;

#[derive(Debug, Parser)]
#[command(name = "mdink", version, about = "Render markdown as ANSI-colored text")]
struct Cli {
    /// Markdown file; `-` reads stdin, nothing renders a sample.
    file: Option<PathBuf>,

    /// Theme key from the catalog; `random` accepted.
    #[arg(short = 't', long)]
    theme: Option<String>,

    /// Theme for code highlighting. If not set: using --theme.
    #[arg(short = 'T', long)]
    code_theme: Option<String>,

    /// Fix columns to this width instead of the terminal's.
    #[arg(short = 'c', long)]
    cols: Option<usize>,

    /// Do not try to guess the code lexer (guessing is a bit slow).
    #[arg(short = 'x', long)]
    no_guess: bool,

    /// Default lexer name when resolution fails.
    #[arg(short = 'X', long, default_value = "python")]
    lexer: String,

    /// Display links.
    #[arg(short = 'L', long)]
    links: bool,

    /// Strip all ANSI (no colors then).
    #[arg(short = 'A', long)]
    no_color: bool,

    /// Tab length.
    #[arg(short = 'b', long)]
    tab_length: Option<usize>,

    /// Source-code highlighting mode: all, code, doc, mod, off.
    #[arg(short = 'C', long)]
    hilite: Option<String>,

    /// Display from the given substring; `SUBSTRING:N` caps the lines.
    #[arg(short = 'f', long = "from")]
    from: Option<String>,

    /// Show theme infos with the output.
    #[arg(short = 'i', long)]
    theme_info: bool,

    /// Monitor the file for changes and re-render.
    #[arg(short = 'm', long)]
    monitor: bool,
}

/// Optional user defaults; command-line flags win.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    theme: Option<String>,
    code_theme: Option<String>,
    cols: Option<usize>,
    tab_length: Option<usize>,
}

fn load_file_config() -> FileConfig {
    let Some(path) = dirs::config_dir().map(|dir| dir.join("mdink.toml")) else {
        return FileConfig::default();
    };
    let Ok(raw) = fs::read_to_string(&path) else {
        return FileConfig::default();
    };
    toml::from_str(&raw).unwrap_or_else(|err| {
        log::warn!("ignoring malformed {}: {err}", path.display());
        FileConfig::default()
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let file_cfg = load_file_config();
    let tokenizer: Arc<dyn CodeTokenizer + Send + Sync> = Arc::new(
        SyntectTokenizer::with_options(!cli.no_guess, &cli.lexer),
    );

    if cli.monitor {
        monitor(&cli, &file_cfg, tokenizer)
    } else {
        print!("{}", render_input(&cli, &file_cfg, tokenizer)?);
        Ok(())
    }
}

fn render_input(
    cli: &Cli,
    file_cfg: &FileConfig,
    tokenizer: Arc<dyn CodeTokenizer + Send + Sync>,
) -> Result<String> {
    let source = read_source(cli.file.as_deref())?;
    let source = match &cli.hilite {
        Some(mode) => code_hilite(&source, HiliteMode::from_arg(mode)),
        None => source,
    };

    let (columns, rows) = geometry(cli, file_cfg);
    let mut config = RenderConfig {
        columns,
        show_links: cli.links,
        no_color: cli.no_color,
        tab_width: cli.tab_length.or(file_cfg.tab_length).unwrap_or(4),
        tokenizer: Some(tokenizer),
        ..RenderConfig::default()
    };

    let theme_arg = cli.theme.as_deref().or(file_cfg.theme.as_deref());
    let text_request = ThemeRequest::from_arg(theme_arg);
    // the code slot falls back to the requested text theme name
    let code_request = ThemeRequest::from_arg(
        cli.code_theme
            .as_deref()
            .or(file_cfg.code_theme.as_deref())
            .or(theme_arg),
    );

    let catalog = ThemeCatalog::builtin();
    let (text_choice, code_choice) = config.resolve_themes(&catalog, &text_request, &code_request);

    let mut out = String::new();
    if cli.theme_info {
        push_theme_info(&mut out, &config, "theme", &text_choice);
        push_theme_info(&mut out, &config, "theme (code)", &code_choice);
    }

    let rendered = render_markdown(&source, &config);
    match &cli.from {
        Some(from) => out.push_str(&display_from(&rendered, from, rows)),
        None => out.push_str(&rendered),
    }
    Ok(out)
}

fn push_theme_info(out: &mut String, config: &RenderConfig, label: &str, choice: &Option<ThemeChoice>) {
    let Some(choice) = choice else { return };
    let line = format!("{label}: {} ({})", choice.key, choice.name);
    if config.no_color {
        out.push_str(&line);
    } else {
        out.push_str(&ansi::low(&line, &config.palette));
    }
    out.push('\n');
}

fn geometry(cli: &Cli, file_cfg: &FileConfig) -> (usize, usize) {
    let size = terminal_size::terminal_size();
    let columns = cli
        .cols
        .or(file_cfg.cols)
        .or(size.map(|(w, _)| w.0 as usize))
        .unwrap_or(80);
    let rows = size.map(|(_, h)| h.0 as usize).unwrap_or(200);
    (columns, rows)
}

fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        Some(_) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
        None => Ok(sample_markdown()),
    }
}

/// A short sample exercising most of the renderer, shown when no file is
/// given.
fn sample_markdown() -> String {
    let mut md: Vec<String> = (1..=6).map(|l| format!("{} Header {l}", "#".repeat(l))).collect();
    md.push("```python\ndef check(x):\n    return x == 1\n```".to_string());
    md.push("| Tables | Fmt |\n| -- | -- |\n| !!! hint: wrapped | 0.1 **strong** |".to_string());
    md.push("!!! note: title\n    this is a Note".to_string());
    md.push("----\n!!! question: Like the theme?".to_string());
    md.join("\n\n")
}

/// Re-render the file whenever its mtime changes; one poll per second.
fn monitor(
    cli: &Cli,
    file_cfg: &FileConfig,
    tokenizer: Arc<dyn CodeTokenizer + Send + Sync>,
) -> Result<()> {
    let path = cli
        .file
        .as_deref()
        .filter(|p| *p != Path::new("-"))
        .context("--monitor needs a file argument")?;

    let mut last: Option<SystemTime> = None;
    loop {
        match fs::metadata(path).and_then(|meta| meta.modified()) {
            Ok(modified) => {
                if last != Some(modified) {
                    match render_input(cli, file_cfg, tokenizer.clone()) {
                        Ok(out) => print!("{out}"),
                        Err(err) => eprintln!("error: {err}"),
                    }
                    last = Some(modified);
                }
            }
            Err(err) => {
                eprintln!("{}: {err}. Will continue trying.", path.display());
            }
        }
        thread::sleep(Duration::from_secs(1));
    }
}
