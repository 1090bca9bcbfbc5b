use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "glyphcard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render word cards: one PNG + caption TXT per word x font x scheme.
    Cards(CardsArgs),
    /// Generate a txt2img prompt via a local Ollama endpoint and print it.
    Prompt(PromptArgs),
}

#[derive(Parser, Debug)]
struct CardsArgs {
    /// Word list: UTF-8, one word or phrase per line.
    #[arg(long)]
    words: PathBuf,

    /// Directory of .ttf/.otf font files.
    #[arg(long)]
    fonts: PathBuf,

    /// Output directory (created if absent).
    #[arg(long)]
    out: PathBuf,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 360)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 640)]
    height: u32,

    /// Output stem prefix.
    #[arg(long, default_value = "ru")]
    prefix: String,

    /// Map uppercase Cyrillic letters in captions to Latin look-alikes.
    #[arg(long)]
    transliterate: bool,

    /// Fixed RNG seed for reproducible rotation angles.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct PromptArgs {
    /// Pipeline config JSON; defaults apply for absent fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ollama base URL (overrides config).
    #[arg(long)]
    url: Option<String>,

    /// Ollama model id (overrides config).
    #[arg(long)]
    model: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Cards(args) => cmd_cards(args),
        Command::Prompt(args) => cmd_prompt(args),
    }
}

fn cmd_cards(args: CardsArgs) -> anyhow::Result<()> {
    let mut opts = glyphcard::BatchOptions::new(args.words, args.fonts, args.out.clone());
    opts.canvas = glyphcard::Canvas {
        width: args.width,
        height: args.height,
    };
    opts.stem_prefix = args.prefix;
    opts.seed = args.seed;
    if args.transliterate {
        opts.caption_style = glyphcard::CaptionStyle::Transliterate;
    }

    let summary = glyphcard::run_batch(&opts).context("render word cards")?;
    eprintln!(
        "wrote {} cards ({} words x {} fonts x 3 schemes) to {}",
        summary.cards,
        summary.words,
        summary.fonts,
        args.out.display()
    );
    Ok(())
}

fn cmd_prompt(args: PromptArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let f = std::fs::File::open(path)
                .with_context(|| format!("open pipeline config '{}'", path.display()))?;
            let r = std::io::BufReader::new(f);
            serde_json::from_reader::<_, glyphcard::Txt2ImgConfig>(r)
                .context("parse pipeline config JSON")?
        }
        None => glyphcard::Txt2ImgConfig::default(),
    };
    config.validate()?;

    if let Some(url) = args.url {
        config.prompt.ollama.url = url;
    }
    if let Some(model) = args.model {
        config.prompt.ollama.model = model;
    }

    let client = glyphcard::OllamaClient::new(config.prompt.ollama.clone());
    let prompt = glyphcard::PromptSource::generate(&client, &config.prompt.system, &config.prompt.user)
        .context("generate prompt")?;
    println!("{prompt}");
    Ok(())
}
