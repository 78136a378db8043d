//! Command-line front end for trackcut.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use trackcut_core::api::{ErrorBody, SplitResponse};
use trackcut_core::config::{ConfigManager, Settings};
use trackcut_core::fetch::{HttpFetcher, LocalFileFetcher, MediaFetcher, YtDlpFetcher};
use trackcut_core::pipeline::{SplitOutcome, SplitRequest, Splitter};
use trackcut_core::timeline::{format_offset, RawTimestamp};

const CLI_AFTER_HELP: &str = "\
Examples:
  trackcut https://www.youtube.com/watch?v=abc123 -t 0:00,3:41,7:05
  trackcut https://cdn.example.com/mix.mp3 -t 90 -t 1:30 --json
  trackcut ./recording.m4a -t 10,95,230 --work-dir ./cuts
";

/// Cut the audio track of a media source into per-timestamp segments.
#[derive(Debug, Parser)]
#[command(name = "trackcut", version, about, after_help = CLI_AFTER_HELP)]
struct Cli {
    /// Media source: a streaming-site URL, a direct audio URL, or a
    /// local file path.
    source: String,

    /// Cut points (seconds or clock text); repeatable, commas split.
    #[arg(short = 't', long = "at", required = true)]
    at: Vec<String>,

    /// Config file to load if present.
    #[arg(long, default_value = "trackcut.toml")]
    config: PathBuf,

    /// Override the scratch root from the config.
    #[arg(long)]
    work_dir: Option<String>,

    /// Force a fetch strategy instead of auto-detecting.
    #[arg(long, value_enum, default_value_t = FetchStrategy::Auto)]
    fetcher: FetchStrategy,

    /// Print the result as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Write the effective settings back to the config file.
    #[arg(long)]
    save_config: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FetchStrategy {
    /// Pick based on the source: local path, direct audio URL, or yt-dlp.
    Auto,
    /// Always go through yt-dlp.
    Ytdlp,
    /// Plain HTTP(S) download.
    Http,
    /// Copy a local file in.
    Local,
}

impl FetchStrategy {
    /// Resolves `Auto` by looking at the source itself.
    fn resolve(self, source: &str) -> Self {
        match self {
            FetchStrategy::Auto => {
                if Path::new(source).exists() {
                    FetchStrategy::Local
                } else if has_direct_media_extension(source) {
                    FetchStrategy::Http
                } else {
                    FetchStrategy::Ytdlp
                }
            }
            other => other,
        }
    }
}

const DIRECT_MEDIA_EXTENSIONS: &[&str] = &[
    "mp3", "m4a", "m4b", "aac", "wav", "flac", "ogg", "opus", "mp4", "mkv", "webm", "mov",
];

/// True when the URL path ends in a known media extension, meaning a
/// plain download will do and yt-dlp is unnecessary.
fn has_direct_media_extension(source: &str) -> bool {
    let trimmed = source.split(['?', '#']).next().unwrap_or(source);
    match trimmed.rsplit_once('.') {
        Some((_, ext)) => DIRECT_MEDIA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

fn build_fetcher(
    strategy: FetchStrategy,
    source: &str,
    settings: &Settings,
) -> Arc<dyn MediaFetcher> {
    match strategy.resolve(source) {
        FetchStrategy::Local => Arc::new(LocalFileFetcher),
        FetchStrategy::Http => Arc::new(HttpFetcher::new()),
        // Auto has been resolved away; everything else goes through yt-dlp.
        _ => Arc::new(YtDlpFetcher::new(&settings.tools, &settings.audio)),
    }
}

/// Flattens repeatable `-t` values, splitting comma lists.
fn collect_timestamps(args: &[String]) -> Vec<RawTimestamp> {
    args.iter()
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(RawTimestamp::from)
        .collect()
}

fn print_outcome(outcome: &SplitOutcome) {
    println!("Title: {}", outcome.title);
    println!("Output: {}", outcome.job_dir.display());
    println!("Segments ({}):", outcome.segments.len());
    for segment in &outcome.segments {
        let span = match segment.duration_secs {
            Some(duration) => format!(
                "{} - {}",
                format_offset(segment.start_secs),
                format_offset(segment.start_secs + duration)
            ),
            None => format!("{} - end", format_offset(segment.start_secs)),
        };
        println!("  {}. {}  [{}]", segment.ordinal, segment.file_name, span);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut manager = ConfigManager::new(&cli.config);
    if cli.config.exists() {
        manager
            .load()
            .with_context(|| format!("loading config {}", cli.config.display()))?;
    }
    if let Some(work_dir) = &cli.work_dir {
        manager.settings_mut().paths.work_dir = work_dir.clone();
    }
    if cli.save_config {
        manager
            .save()
            .with_context(|| format!("writing config {}", cli.config.display()))?;
    }

    let level = match cli.verbose {
        0 => manager.settings().logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    trackcut_core::logging::init_tracing(&level);

    manager
        .ensure_dirs_exist()
        .context("creating the work directory")?;

    let settings = manager.settings().clone();
    let fetcher = build_fetcher(cli.fetcher, &cli.source, &settings);
    tracing::debug!("Using {} fetcher", fetcher.name());

    let request = SplitRequest {
        source_url: cli.source.clone(),
        timestamps: collect_timestamps(&cli.at),
    };

    let splitter = Splitter::new(settings, fetcher);
    match splitter.run(&request).await {
        Ok(outcome) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&SplitResponse::from_outcome(&outcome))?
                );
            } else {
                print_outcome(&outcome);
            }
            Ok(())
        }
        Err(e) => {
            if cli.json {
                println!("{}", serde_json::to_string(&ErrorBody::from_error(&e))?);
            } else {
                eprintln!("error: {e}");
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_lists_and_repeats_flatten() {
        let raw = collect_timestamps(&[
            "0:10,1:30".to_string(),
            " 90 ".to_string(),
            "".to_string(),
        ]);
        assert_eq!(
            raw,
            vec![
                RawTimestamp::Text("0:10".to_string()),
                RawTimestamp::Text("1:30".to_string()),
                RawTimestamp::Text("90".to_string()),
            ]
        );
    }

    #[test]
    fn auto_strategy_picks_local_for_existing_paths() {
        let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        assert_eq!(FetchStrategy::Auto.resolve(manifest), FetchStrategy::Local);
    }

    #[test]
    fn auto_strategy_picks_http_for_direct_audio_urls() {
        assert_eq!(
            FetchStrategy::Auto.resolve("https://cdn.example.com/mix.mp3"),
            FetchStrategy::Http
        );
        assert_eq!(
            FetchStrategy::Auto.resolve("https://cdn.example.com/mix.M4A?sig=x"),
            FetchStrategy::Http
        );
    }

    #[test]
    fn auto_strategy_falls_back_to_ytdlp() {
        assert_eq!(
            FetchStrategy::Auto.resolve("https://www.youtube.com/watch?v=abc"),
            FetchStrategy::Ytdlp
        );
        assert_eq!(
            FetchStrategy::Auto.resolve("https://example.com/page.html"),
            FetchStrategy::Ytdlp
        );
    }

    #[test]
    fn explicit_strategy_wins() {
        assert_eq!(
            FetchStrategy::Http.resolve("https://www.youtube.com/watch?v=abc"),
            FetchStrategy::Http
        );
    }

    #[test]
    fn cli_parses_minimal_invocation() {
        let cli = Cli::parse_from(["trackcut", "https://example.com/w", "-t", "0:10,1:30"]);
        assert_eq!(cli.source, "https://example.com/w");
        assert_eq!(cli.at, vec!["0:10,1:30"]);
        assert!(!cli.json);
        assert_eq!(cli.fetcher, FetchStrategy::Auto);
    }
}
