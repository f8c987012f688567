use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use krasnyy::context::Context;
use krasnyy::export::{ExportFormat, export_to_dir, materialize};
use krasnyy::locale::{ResolvedLocale, Text, is_valid_language};
use krasnyy::render::{Pacing, RenderSequencer, TerminalSink};
use krasnyy::source::FsSource;
use krasnyy::utils::{AppConfig, get_config_path};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "krasnyy")]
#[command(about = "Generate categorized search-engine dorks for a target")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search query (when no subcommand is given). A query that starts with
    /// a subcommand name must go through `search`, e.g. `krasnyy search config leak`
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,

    /// Interface language (overrides config)
    #[arg(short, long, global = true)]
    lang: Option<String>,

    /// Directory holding dorks.json and locales/ (overrides config)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Config file to use instead of the one in the app data directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results without the typing effect
    #[arg(long, global = true)]
    instant: bool,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    /// Log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate dorks for a target
    Search {
        /// Target, e.g. a username or a full name
        query: Vec<String>,
    },
    /// Write the dorks for a target to a document
    Export {
        /// Target, e.g. a username or a full name
        query: Vec<String>,

        /// Document format: text, markdown or json
        #[arg(short, long)]
        format: Option<String>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List dork categories in render order
    Categories,
    /// List locale documents in the data directory
    Languages,
    /// Show or edit the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init,
    /// Set the startup language
    SetLanguage {
        lang: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

/// Settings shared by every command after config and flags are merged
struct Session {
    config: AppConfig,
    config_path: PathBuf,
    data_dir: PathBuf,
    lang: String,
    pacing: Pacing,
    color: ColorChoice,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => get_config_path()?,
    };
    let config = AppConfig::load_from(&config_path)?;

    let session = Session {
        data_dir: cli.data.clone().unwrap_or_else(|| config.data_dir()),
        lang: cli.lang.clone().unwrap_or_else(|| config.language.clone()),
        pacing: if cli.instant {
            Pacing::instant()
        } else {
            config.pacing()
        },
        color: cli.color.into(),
        config,
        config_path,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    runtime.block_on(run(cli.command, cli.query, session))
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

async fn run(command: Option<Commands>, query: Vec<String>, session: Session) -> Result<()> {
    match command {
        Some(Commands::Search { query }) => {
            let ctx = load_context(&session).await;
            let sequencer = terminal_sequencer(&ctx, &session);
            search(&sequencer, &query.join(" "), session.color).await;
        }
        Some(Commands::Export { query, format, out }) => {
            let ctx = load_context(&session).await;
            let format = format.unwrap_or_else(|| session.config.export_format.clone());
            let dir = out.unwrap_or_else(|| session.config.export_dir());
            if !export(&ctx, &session, &query.join(" "), &format, dir) {
                std::process::exit(1);
            }
        }
        Some(Commands::Categories) => {
            let ctx = load_context(&session).await;
            list_categories(&ctx, session.color)?;
        }
        Some(Commands::Languages) => {
            let source = FsSource::new(&session.data_dir);
            let langs = source
                .available_languages()
                .with_context(|| format!("Failed to list {}", source.root().join("locales").display()))?;
            if langs.is_empty() {
                println!("No locale documents in {}", source.root().join("locales").display());
            }
            for lang in langs {
                println!("{}", lang);
            }
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, session)?;
        }
        None => {
            let ctx = load_context(&session).await;
            let sequencer = terminal_sequencer(&ctx, &session);
            if query.is_empty() {
                interactive(&ctx, &sequencer, &session).await?;
            } else {
                search(&sequencer, &query.join(" "), session.color).await;
            }
        }
    }

    Ok(())
}

async fn load_context(session: &Session) -> Arc<Context> {
    let source = Arc::new(FsSource::new(&session.data_dir));
    Context::init(source, &session.lang).await
}

fn terminal_sequencer(ctx: &Arc<Context>, session: &Session) -> RenderSequencer<TerminalSink> {
    let sink = Arc::new(Mutex::new(TerminalSink::new(session.color)));
    RenderSequencer::new(Arc::clone(ctx), sink, session.pacing)
}

/// Run one search; failures are logged and reported, never propagated
async fn search(sequencer: &RenderSequencer<TerminalSink>, query: &str, color: ColorChoice) {
    if let Err(e) = sequencer.run(query).await {
        error!(error = %e, "search failed");
        alert(color, "Search error: check log.");
    }
}

/// Export one query; returns whether a document was written
fn export(ctx: &Context, session: &Session, query: &str, format: &str, dir: PathBuf) -> bool {
    let locale = ctx.locale();

    if query.trim().is_empty() {
        alert(session.color, locale.text(Text::ConsoleWarnNoInput));
        return false;
    }

    let format = match ExportFormat::parse(format) {
        Ok(format) => format,
        Err(e) => {
            alert(session.color, &e.to_string());
            return false;
        }
    };

    let doc = materialize(ctx.dictionary(), &locale, query);
    match export_to_dir(&dir, format.exporter().as_ref(), &doc) {
        Ok(path) => {
            println!("{} {} -> {}", doc.total(), locale.text(Text::ResultsFound), path.display());
            true
        }
        Err(e) => {
            error!(error = %e, "export failed");
            alert(session.color, "Export failed: check log.");
            false
        }
    }
}

async fn interactive(
    ctx: &Arc<Context>,
    sequencer: &RenderSequencer<TerminalSink>,
    session: &Session,
) -> Result<()> {
    print_header(&ctx.locale(), session.color)?;
    println!("Commands: :lang <code>, :export [format], :help, :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_query: Option<String> = None;

    loop {
        let locale = ctx.locale();
        print!("{} ({}) > ", locale.text(Text::SearchPlaceholder), locale.lang());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        if let Some(command) = line.strip_prefix(':') {
            let mut parts = command.split_whitespace();
            match parts.next() {
                Some("q") | Some("quit") => break,
                Some("lang") => match parts.next() {
                    Some(code) => {
                        let resolved = ctx.set_language(code).await;
                        print_header(&resolved, session.color)?;
                    }
                    None => println!("{}", locale.lang()),
                },
                Some("export") => {
                    let format = parts
                        .next()
                        .map(str::to_string)
                        .unwrap_or_else(|| session.config.export_format.clone());
                    let query = last_query.as_deref().unwrap_or("");
                    export(ctx, session, query, &format, session.config.export_dir());
                }
                Some("help") => {
                    println!("Commands: :lang <code>, :export [format], :help, :quit");
                }
                _ => alert(session.color, &format!("Unknown command: {}", line)),
            }
            continue;
        }

        search(sequencer, line, session.color).await;
        if !line.is_empty() {
            last_query = Some(line.to_string());
        }
    }

    Ok(())
}

fn print_header(locale: &ResolvedLocale, color: ColorChoice) -> Result<()> {
    let mut stdout = StandardStream::stdout(color);
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    writeln!(stdout, "{}", locale.text(Text::Title))?;
    stdout.reset()?;
    writeln!(stdout, "{}", locale.text(Text::Subtitle))?;
    if locale.is_fallback() {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    }
    writeln!(stdout, "{}", locale.text(Text::Description))?;
    stdout.reset()?;
    Ok(())
}

fn list_categories(ctx: &Context, color: ColorChoice) -> Result<()> {
    let dictionary = ctx.dictionary();
    let locale = ctx.locale();
    let mut stdout = StandardStream::stdout(color);

    if dictionary.is_empty() {
        writeln!(stdout, "{}", locale.text(Text::ConsoleDorksMissing))?;
        return Ok(());
    }

    let ordered = dictionary.ordered_categories();
    for category in &ordered {
        let count = dictionary.templates_for(category).len();
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(stdout, "{}", locale.section_label(category))?;
        stdout.reset()?;
        if count == 0 {
            writeln!(stdout, " ({}, no templates)", category)?;
        } else {
            writeln!(stdout, " ({}, {} templates)", category, count)?;
        }
    }

    for category in dictionary.categories().filter(|c| !ordered.contains(c)) {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(stdout, "{} (not in priority_order, skipped)", category)?;
        stdout.reset()?;
    }
    Ok(())
}

fn handle_config_command(action: ConfigAction, session: Session) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&session.config)?);
        }
        ConfigAction::Path => {
            println!("{}", session.config_path.display());
        }
        ConfigAction::Init => {
            if session.config_path.exists() {
                println!("Config already exists: {}", session.config_path.display());
            } else {
                AppConfig::default().save_to(&session.config_path)?;
                println!("Wrote {}", session.config_path.display());
            }
        }
        ConfigAction::SetLanguage { lang } => {
            if !is_valid_language(&lang) {
                bail!("Invalid language code: {:?}", lang);
            }
            let mut config = session.config;
            config.language = lang;
            config.save_to(&session.config_path)?;
            println!("Language set to {}", config.language);
        }
    }

    Ok(())
}

/// User-visible error line on stderr
fn alert(color: ColorChoice, message: &str) {
    let mut stderr = StandardStream::stderr(color);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = writeln!(stderr, "{}", message);
    let _ = stderr.reset();
}
