use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};

use ollama_translate::chat::OllamaClient;
use ollama_translate::config::{
    default_log_path, init_default_config, Overrides, Settings, DEFAULT_LOG_LEVEL,
};
use ollama_translate::direction::Direction;
use ollama_translate::launcher::LauncherItem;
use ollama_translate::logging;
use ollama_translate::preview::PreviewWriter;
use ollama_translate::translate::Translator;

#[derive(Parser, Debug)]
#[command(name = "ollama-translate")]
#[command(about = "Chinese/English translation via a local Ollama model, with a side-by-side preview", long_about = None)]
struct Args {
    /// Translation direction: en (Chinese to English) or cn (English to Chinese)
    #[arg(value_enum, default_value = "en")]
    direction: Direction,

    /// Text to translate (default: read from stdin)
    #[arg(value_name = "TEXT", trailing_var_arg = true, allow_hyphen_values = true)]
    query: Vec<String>,

    /// Config file path (default: search for ollama-translate.toml upwards)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chat endpoint URL (overrides [endpoint] url)
    #[arg(long)]
    endpoint: Option<String>,

    /// Model name (overrides [endpoint] model)
    #[arg(long)]
    model: Option<String>,

    /// Preview document path (overrides [preview] path)
    #[arg(long, value_name = "HTML")]
    preview_path: Option<PathBuf>,

    /// Generate default config + prompt files, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write config/prompt files (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite existing config/prompt files when used with --init-config
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init_config {
        let dir = args
            .init_config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let cfg_path = init_default_config(&dir, args.force).context("init default config")?;
        eprintln!("Wrote config: {}", cfg_path.display());
        return Ok(());
    }

    let settings = match Settings::resolve(Overrides {
        config: args.config.clone(),
        endpoint: args.endpoint.clone(),
        model: args.model.clone(),
        preview_path: args.preview_path.clone(),
    }) {
        Ok(s) => s,
        Err(e) => {
            logging::init(&default_log_path(), DEFAULT_LOG_LEVEL);
            error!(error = %format!("{e:#}"), "load settings");
            return emit(LauncherItem::failed(&e));
        }
    };
    logging::init(&settings.log_path, &settings.log_level);
    debug!(argv = ?std::env::args().collect::<Vec<_>>(), config = %settings.config_path.display(), "start");

    let query = match read_query(&args.query) {
        Ok(q) => q,
        Err(e) => {
            error!(error = %format!("{e:#}"), "read query");
            return emit(LauncherItem::failed(&e));
        }
    };
    debug!(direction = ?args.direction, query = %query, "request");

    let item = if query.is_empty() {
        LauncherItem::empty_query()
    } else {
        match run(&settings, &query, args.direction) {
            Ok(item) => item,
            Err(e) => {
                error!(error = %format!("{e:#}"), "translation failed");
                LauncherItem::failed(&e)
            }
        }
    };
    emit(item)
}

fn emit(item: LauncherItem) -> anyhow::Result<()> {
    println!("{}", item.into_filter().to_json()?);
    Ok(())
}

fn run(settings: &Settings, query: &str, direction: Direction) -> anyhow::Result<LauncherItem> {
    let client = OllamaClient::new(settings.ollama.clone())?;
    let translator = Translator::new(
        client,
        settings.prompts.clone(),
        PreviewWriter::new(settings.preview_path.clone()),
    );
    let t = translator.translate(query, direction)?;
    Ok(LauncherItem::translated(&t.text, direction, &t.preview_path))
}

/// Query words from the command line, else stdin when it is piped.
fn read_query(words: &[String]) -> anyhow::Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf).context("read stdin")?;
    Ok(buf.trim().to_string())
}
