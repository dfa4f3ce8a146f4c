use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commentary_core::{
    Classifier, ClassifierConfig, Comment, DEFAULT_REPORT_FILE, GoogleTranslator,
    IdentityTranslator, RawComment, Translator, YoutubeCommentSource, aggregate,
    classify_comments, fetch_comments, format_analysis_readable, parse_video_id, save_report,
    translate_comments,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

#[derive(Parser)]
#[command(name = "commentary")]
#[command(
    about = "Fetch YouTube comments, classify their sentiment and intent, and export a CSV report"
)]
struct Cli {
    /// Video URL or id
    url: String,

    /// YouTube Data API key
    #[arg(short = 'k', long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum number of comments to analyze
    #[arg(
        short,
        long,
        default_value_t = 100,
        value_parser = clap::value_parser!(u16).range(10..=500)
    )]
    max_comments: u16,

    /// Language comments are translated into before classification
    #[arg(short, long, default_value = "en")]
    lang: String,

    /// Classify comments as written, skipping translation
    #[arg(long)]
    no_translate: bool,

    /// JSON file with keyword rules and the neutral threshold
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Where to write the CSV report. Defaults to the downloads directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of most liked comments to show
    #[arg(short, long, default_value_t = 10)]
    top: usize,

    /// Print the fetched comments as JSON
    #[arg(long)]
    raw: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn create_progress_bar(len: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn exit_with_error(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    std::process::exit(1);
}

async fn translate_step<T: Translator>(
    translator: &T,
    raw: Vec<RawComment>,
    lang: &str,
) -> Vec<Comment> {
    let step_start = Instant::now();
    let pb = create_progress_bar(raw.len() as u64, &format!("Translating to {}...", lang));
    let comments =
        translate_comments(translator, raw, lang, |done| pb.set_position(done as u64)).await;

    let fallbacks = comments.iter().filter(|c| c.is_fallback()).count();
    let note = if fallbacks > 0 {
        format!(" ({} kept original text)", fallbacks)
    } else {
        String::new()
    };
    pb.finish_with_message(format!(
        "{} Translated {} comments{} {}",
        style("✓").green().bold(),
        comments.len(),
        style(note).yellow(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));
    comments
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Validate inputs early
    let video_id = parse_video_id(&cli.url).unwrap_or_else(|e| exit_with_error(e));
    let source = YoutubeCommentSource::new(cli.api_key.unwrap_or_default())
        .unwrap_or_else(|e| exit_with_error(e));

    let classifier = match &cli.rules {
        Some(path) => {
            let json = fs::read_to_string(path)
                .await
                .unwrap_or_else(|e| exit_with_error(format!("{}: {}", path.display(), e)));
            let config = ClassifierConfig::from_json(&json).unwrap_or_else(|e| exit_with_error(e));
            Classifier::new(config).unwrap_or_else(|e| exit_with_error(e))
        }
        None => Classifier::default(),
    };

    let report_path = cli.output.unwrap_or_else(|| {
        dirs::download_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_REPORT_FILE)
    });

    let max_comments = usize::from(cli.max_comments);
    debug!(%video_id, max_comments, lang = %cli.lang, "starting analysis");

    println!(
        "\n{}  {}\n",
        style("commentary").cyan().bold(),
        style("YouTube Comment Analyzer").dim()
    );

    let total_start = Instant::now();

    // Step 1: Fetch comments
    let step_start = Instant::now();
    let pb = create_progress_bar(max_comments as u64, "Fetching comments...");
    let fetched =
        fetch_comments(&source, &video_id, max_comments, |n| pb.set_position(n as u64)).await;
    let raw = match fetched {
        Ok(raw) => raw,
        Err(e) => {
            pb.finish_and_clear();
            exit_with_error(format!("Error fetching comments: {}", e));
        }
    };
    pb.finish_with_message(format!(
        "{} Fetched {} comments {}",
        style("✓").green().bold(),
        raw.len(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    if raw.is_empty() {
        println!(
            "\n{} No comments found for the video.",
            style("!").yellow().bold()
        );
        return Ok(());
    }

    if cli.raw {
        println!("{}", serde_json::to_string_pretty(&raw)?);
    }

    // Step 2: Translate
    let comments = if cli.no_translate {
        translate_step(&IdentityTranslator, raw, &cli.lang).await
    } else {
        translate_step(&GoogleTranslator::new(), raw, &cli.lang).await
    };

    // Step 3: Classify and aggregate
    let step_start = Instant::now();
    let spinner = create_spinner("Classifying comments...");
    let result = aggregate(classify_comments(&classifier, comments));
    spinner.finish_with_message(format!(
        "{} Classified {} comments {}",
        style("✓").green().bold(),
        result.len(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    // Step 4: Export
    let spinner = create_spinner("Writing report...");
    if let Err(e) = save_report(&result, &report_path).await {
        spinner.finish_and_clear();
        exit_with_error(format!("Error writing {}: {}", report_path.display(), e));
    }
    spinner.finish_with_message(format!("{} Report written", style("✓").green().bold()));

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    println!(
        "{} {}\n",
        style("Saved:").dim(),
        style(report_path.display()).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());

    // Human-readable output
    let readable = format_analysis_readable(&result, &video_id, cli.top);
    println!("{}", readable);

    Ok(())
}
