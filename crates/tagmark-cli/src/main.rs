//! tagmark - convert between tagged markup and document state.
//!
//! # Usage
//!
//! ```bash
//! tagmark import notes.html > notes.json
//! tagmark import README.md --format markdown
//! tagmark format notes.json --toggle bold --range 0:0-0:7
//! tagmark export notes.json --line-break '\n'
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tagmark_config::Config;
use tagmark_engine::{Document, DocumentState, FormatRegistry, InlineClass, Position, Range};

#[derive(Parser, Debug)]
#[command(name = "tagmark", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/tagmark/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read markup and print document state as JSON
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long, value_enum, default_value = "html")]
        format: InputFormat,
    },
    /// Read document state and print tagged markup
    Export {
        #[arg(value_name = "STATE")]
        state: PathBuf,

        /// Token placed between lines, overriding the config
        #[arg(long, value_name = "TOKEN")]
        line_break: Option<String>,
    },
    /// Toggle an inline style over a range and print the new state
    Format {
        #[arg(value_name = "STATE")]
        state: PathBuf,

        /// bold, italic, underline, strikethrough or annotation
        #[arg(long, value_name = "CLASS")]
        toggle: InlineClass,

        /// Range as LINE:CH-LINE:CH
        #[arg(long, value_name = "RANGE", value_parser = parse_range)]
        range: Range,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Html,
    Markdown,
}

impl InputFormat {
    fn name(self) -> &'static str {
        match self {
            InputFormat::Html => "html",
            InputFormat::Markdown => "markdown",
        }
    }
}

fn parse_position(text: &str) -> Result<Position> {
    let (line, ch) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("expected LINE:CH, got `{text}`"))?;
    let line = line
        .trim()
        .parse()
        .with_context(|| format!("bad line in `{text}`"))?;
    let ch = ch
        .trim()
        .parse()
        .with_context(|| format!("bad column in `{text}`"))?;
    Ok(Position::new(line, ch))
}

fn parse_range(text: &str) -> Result<Range> {
    let (from, to) = text
        .split_once('-')
        .ok_or_else(|| anyhow!("expected LINE:CH-LINE:CH, got `{text}`"))?;
    Ok(Range::new(parse_position(from)?, parse_position(to)?))
}

/// `\n` and `\t` escapes typed on the command line become real characters.
fn unescape(token: &str) -> String {
    token.replace("\\n", "\n").replace("\\t", "\t")
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.map_or_else(Config::config_path, Path::to_path_buf);
    log::debug!("Config path: {}", path.display());
    let config = Config::load_from_path(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;
    Ok(config.unwrap_or_default())
}

fn read_state(path: &Path) -> Result<DocumentState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    DocumentState::from_json(&json).with_context(|| format!("parsing state in {}", path.display()))
}

fn document(config: &Config, state: &DocumentState) -> Result<Document> {
    let mut doc = Document::with_tags(config.tag_map()?).with_bullet(config.bullet.clone());
    doc.set_state(state).context("applying document state")?;
    Ok(doc)
}

/// Run one command and return what it prints.
fn run(command: Commands, config: &Config) -> Result<String> {
    match command {
        Commands::Import { file, format } => {
            let input = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let state = FormatRegistry::default()
                .import(format.name(), &input, &config.tag_map()?)
                .with_context(|| format!("importing {} as {}", file.display(), format.name()))?;
            log::info!(
                "Imported {} with {} markers and {} blocks",
                file.display(),
                state.markers.len(),
                state.blocks.len()
            );
            Ok(state.to_json()?)
        }
        Commands::Export { state, line_break } => {
            let doc = document(config, &read_state(&state)?)?;
            let line_break = line_break.map_or_else(|| config.line_break.clone(), |t| unescape(&t));
            Ok(doc.export(Some(&line_break)))
        }
        Commands::Format {
            state,
            toggle,
            range,
        } => {
            let mut doc = document(config, &read_state(&state)?)?;
            let changed = doc
                .toggle_inline(toggle, Some(range))
                .with_context(|| format!("toggling {toggle} over {range:?}"))?;
            log::info!("Toggled {toggle}, {} marks added", changed.len());
            Ok(doc.to_state().to_json()?)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let output = run(cli.command, &config)?;
    println!("{output}");
    Ok(())
}
