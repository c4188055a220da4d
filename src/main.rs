use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use songs2slides::{
    api::HttpLyricsClient,
    cache::LyricsCache,
    config::{ApiConfig, Settings},
    draft::Draft,
    fetch::{self, FetchOptions},
    messages::FetchEvent,
    render::{self, OutputFormat},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "songs2slides", version, about = "Turn song lyrics into presentation slides")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up lyrics for a song list and save an editable draft
    Fetch {
        /// Song list (`Title | Artist` per line) or an existing draft (.json)
        songs: PathBuf,

        /// Where to save the draft [default: the input path with a .json extension]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Lines per slide for the review split (a number or "unbounded") [default: from settings, 4]
        #[arg(long, value_parser = parse_lines_per_slide)]
        lines_per_slide: Option<LinesPerSlide>,

        /// Don't read or write the lookup cache
        #[arg(long)]
        no_cache: bool,

        /// Ignore cached answers and ask the API again
        #[arg(long)]
        refresh: bool,

        /// Settings file [default: ~/.local/share/songs2slides/settings.json]
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Build slides from a draft
    Build {
        /// Draft saved by `fetch` (every song needs lyrics)
        draft: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,

        /// Output file, or "-" for stdout [default: the draft path with the format's extension]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Re-split slides to at most this many lines [default: keep the draft's slides]
        #[arg(long, value_parser = parse_lines_per_slide)]
        lines_per_slide: Option<LinesPerSlide>,

        #[arg(long)]
        no_title_slides: bool,

        #[arg(long)]
        no_blank_slides: bool,

        /// Keep the lyrics' and titles' original case
        #[arg(long)]
        no_uppercase: bool,

        /// Show the artist on title slides
        #[arg(long)]
        title_artist: bool,

        /// Settings file [default: ~/.local/share/songs2slides/settings.json]
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

/// `None` is unbounded
#[derive(Debug, Clone, Copy)]
struct LinesPerSlide(Option<usize>);

fn parse_lines_per_slide(value: &str) -> std::result::Result<LinesPerSlide, String> {
    match value.trim().to_lowercase().as_str() {
        "unbounded" | "none" => Ok(LinesPerSlide(None)),
        number => match number.parse::<usize>() {
            Ok(0) => Err("lines per slide must be at least 1".to_string()),
            Ok(n) => Ok(LinesPerSlide(Some(n))),
            Err(_) => Err(format!("expected a number or \"unbounded\", got \"{}\"", value)),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Read API_URL / API_AUTH from .env if present
    dotenv::dotenv().ok();

    // File-based logging keeps stdout free for rendered output
    let log_dir = songs2slides::paths::get_log_dir()?;
    let file_appender = tracing_appender::rolling::never(&log_dir, "songs2slides.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songs2slides=debug,reqwest=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    match cli.command {
        Command::Fetch {
            songs,
            output,
            lines_per_slide,
            no_cache,
            refresh,
            settings,
        } => {
            let settings = Settings::load(settings.as_deref())?;
            let options = FetchOptions {
                review_lines_per_slide: lines_per_slide
                    .map_or(settings.slideshow.lines_per_slide, |l| l.0),
                refresh,
                ..FetchOptions::default()
            };
            let output = output.unwrap_or_else(|| songs.with_extension("json"));
            run_fetch(&songs, &output, no_cache, &options).await
        }
        Command::Build {
            draft,
            format,
            output,
            lines_per_slide,
            no_title_slides,
            no_blank_slides,
            no_uppercase,
            title_artist,
            settings,
        } => {
            let settings = Settings::load(settings.as_deref())?;
            let mut config = settings.slideshow.clone();
            // The draft's blank lines already carry the slide breaks
            config.lines_per_slide = lines_per_slide.and_then(|l| l.0);
            config.include_title_slides &= !no_title_slides;
            config.include_blank_slides &= !no_blank_slides;
            config.uppercase_lyrics &= !no_uppercase;
            config.uppercase_titles &= !no_uppercase;
            config.title_includes_artist |= title_artist;

            let output = output.unwrap_or_else(|| draft.with_extension(format.extension()));
            run_build(&draft, &output, format, &config, &settings)
        }
    }
}

async fn run_fetch(
    songs_path: &Path,
    output: &Path,
    no_cache: bool,
    options: &FetchOptions,
) -> Result<()> {
    tracing::info!("Starting fetch for {}", songs_path.display());

    let draft = Draft::load(songs_path)?;
    if draft.songs.is_empty() {
        anyhow::bail!("No songs found in {}", songs_path.display());
    }

    let client = HttpLyricsClient::new(ApiConfig::from_env()?)?;

    let cache = if no_cache {
        None
    } else {
        let cache_path = songs2slides::paths::get_cache_db_path()?;
        tracing::info!("Cache database: {}", cache_path.display());
        Some(LyricsCache::open(&cache_path)?)
    };

    // Print progress as lookups finish
    let (tx, rx) = mpsc::unbounded_channel::<FetchEvent>();
    let printer = spawn_progress_printer(rx);

    let report = fetch::run(draft.songs, Arc::new(client), cache, options, tx).await?;
    printer.await?;

    let draft = Draft::new(report.songs);
    draft.save(output)?;
    println!("\nDraft saved to {}", output.display());

    if report.api_error {
        println!("⚠️  Every lookup failed; check API_URL and your connection (see the log for details).");
    }

    if report.missing > 0 {
        println!(
            "⚠️  {} song(s) still need lyrics. Fill in their \"lyrics\" in the draft:",
            report.missing
        );
        for song in draft.missing() {
            println!("    {}", song.display_name());
        }
    }

    Ok(())
}

/// Print progress lines until every sender is gone; yields how many were printed
fn spawn_progress_printer(mut rx: mpsc::UnboundedReceiver<FetchEvent>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut printed = 0;
        while let Some(event) = rx.recv().await {
            println!("{}", event.to_log_line());
            printed += 1;
        }
        printed
    })
}

fn run_build(
    draft_path: &Path,
    output: &Path,
    format: OutputFormat,
    config: &songs2slides::SlideshowConfig,
    settings: &Settings,
) -> Result<()> {
    let draft = Draft::load(draft_path)?;

    let missing = draft.missing();
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(|song| song.display_name()).collect();
        anyhow::bail!(
            "{} song(s) have no lyrics yet: {}. Fill them in in {}",
            names.len(),
            names.join(", "),
            draft_path.display()
        );
    }

    let slides = songs2slides::assemble(&draft.songs, config)?;
    tracing::info!("Assembled {} slides from {} songs", slides.len(), draft.songs.len());

    let title = draft_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Slides");
    let rendered = render::render(&slides, format, title, &settings.html)?;

    if output == Path::new("-") {
        println!("{}", rendered);
    } else {
        std::fs::write(output, rendered)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("✓ {} slides written to {}", slides.len(), output.display());
    }

    Ok(())
}
