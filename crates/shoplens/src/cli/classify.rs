//! The `shoplens classify` command.

use clap::{Args, ValueEnum};
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use shoplens_core::{
    ChatTransport, ClassificationError, Classifier, Config, FileDiscovery, GuessOutcome,
    HttpTransport, ImageAsset, Label, MediaTypePolicy, OutputFormat as CoreOutputFormat,
    OutputWriter, Segment, SegmentRecord, SegmentTally,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// A JSON object for one image, an array for several
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `classify` command.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Image file (JPG/PNG) or directory of images
    #[arg(required = true)]
    pub input: PathBuf,

    /// OpenRouter API key (overrides the config file)
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Chat-completions endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Your guess for the segment, scored against the model's answer
    #[arg(long, value_parser = parse_segment)]
    pub guess: Option<Segment>,

    /// Output format (defaults to the config file's)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Label the data URL with the detected format instead of image/jpeg
    #[arg(long)]
    pub detected_media_type: bool,

    /// Skip label explanations, guess scoring, and the segment breakdown
    #[arg(long)]
    pub no_engagement: bool,
}

fn parse_segment(s: &str) -> Result<Segment, String> {
    s.parse::<Segment>().map_err(|_| {
        format!(
            "'{s}' is not a segment. Choose one of: {}",
            Segment::taxonomy_list()
        )
    })
}

/// Pick the API key: flag or env var first, then the config file.
pub(crate) fn resolve_api_key(flag: Option<&str>, config: &Config) -> Option<String> {
    flag.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .or_else(|| config.api.resolved_api_key())
}

/// Fold command-line overrides into the loaded config.
fn apply_overrides(mut config: Config, args: &ClassifyArgs) -> Config {
    if let Some(model) = &args.model {
        config.api.model = model.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.api.endpoint = endpoint.clone();
    }
    if let Some(timeout) = args.timeout {
        config.api.timeout_secs = timeout;
    }
    if args.detected_media_type {
        config.image.media_type = MediaTypePolicy::Detected;
    }
    if args.no_engagement {
        config.engagement.enabled = false;
    }
    config
}

/// Segment one file. Read and classification failures become records.
pub(crate) async fn classify_file(
    classifier: &Classifier,
    path: &Path,
    api_key: &str,
    guess: Option<Segment>,
    engagement: bool,
) -> (SegmentRecord, Result<Scored, ClassificationError>) {
    let image = match ImageAsset::from_path(path) {
        Ok(image) => image,
        Err(e) => return (SegmentRecord::failure(path, None, &e), Err(e)),
    };

    match classifier.classify(&image, api_key).await {
        Ok(result) => {
            let mut record = SegmentRecord::success(path, image.format(), &result, engagement);
            let outcome = guess
                .filter(|_| engagement)
                .map(|g| GuessOutcome::score(g, &result.label));
            if let Some(outcome) = &outcome {
                record = record.with_guess(outcome);
            }
            (
                record,
                Ok(Scored {
                    label: result.label,
                    guess: outcome,
                }),
            )
        }
        Err(e) => (
            SegmentRecord::failure(path, Some(image.format()), &e),
            Err(e),
        ),
    }
}

/// What a successful classification contributes to the run tally.
pub(crate) struct Scored {
    pub label: Label,
    pub guess: Option<GuessOutcome>,
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Execute the classify command.
pub async fn execute(args: ClassifyArgs, config: Config) -> anyhow::Result<()> {
    run(args, config, Arc::new(HttpTransport::new())).await
}

async fn run(
    args: ClassifyArgs,
    config: Config,
    transport: Arc<dyn ChatTransport>,
) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args);
    if config.api.timeout_secs == 0 {
        anyhow::bail!("--timeout must be at least 1 second");
    }

    let Some(api_key) = resolve_api_key(args.api_key.as_deref(), &config) else {
        anyhow::bail!("{}", ClassificationError::MissingCredential);
    };

    let files = FileDiscovery::new(&config.image).discover(&args.input);
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.input);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to segment", files.len());

    let classifier = Classifier::with_transport(transport)
        .with_api(&config.api)
        .with_media_type(config.image.media_type);
    let engagement = config.engagement.enabled;

    let format: CoreOutputFormat = match args.format {
        Some(f) => f.into(),
        None => CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Json),
    };
    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = OutputWriter::new(sink, format, config.output.pretty);

    let progress = if files.len() == 1 {
        create_spinner("Segmenting customer...")
    } else {
        create_progress_bar(files.len() as u64)
    };

    let mut tally = SegmentTally::new();
    let mut records = Vec::with_capacity(files.len());
    let mut last_error = None;

    for path in &files {
        if files.len() > 1 {
            progress.set_message(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }

        let (record, outcome) =
            classify_file(&classifier, path, &api_key, args.guess, engagement).await;
        match outcome {
            Ok(ok) => {
                tally.record(&ok.label);
                if let Some(guess) = &ok.guess {
                    tally.record_guess(guess);
                }
            }
            Err(e) => {
                tally.record_failure();
                progress.suspend(|| tracing::error!("Failed: {:?} - {}", path, e));
                last_error = Some(e);
            }
        }

        if engagement && files.len() == 1 {
            progress.suspend(|| print_result(&record));
        }
        if format == CoreOutputFormat::JsonLines {
            writer.write(&record)?;
        } else {
            records.push(record);
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if format == CoreOutputFormat::Json {
        writer.write_all(&records)?;
    }
    writer.flush()?;
    if let Some(path) = &args.output {
        tracing::info!("{} record(s) written to {:?}", writer.items_written(), path);
    }

    if engagement {
        print_summary(&tally, files.len());
    }

    let failed = tally.failed();
    if failed == files.len() {
        match last_error {
            Some(e) if failed == 1 => anyhow::bail!("{e}"),
            _ => anyhow::bail!("All {failed} image(s) failed to segment"),
        }
    }
    if failed > 0 {
        tracing::warn!("{} of {} image(s) failed", failed, files.len());
    }
    Ok(())
}

/// Headline for a single image, on stderr.
pub(crate) fn print_result(record: &SegmentRecord) {
    let Some(label) = &record.label else {
        return;
    };
    let green = Style::new().for_stderr().green();
    let bold = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    if record.known {
        eprintln!("  {} Customer segmented", green.apply_to("✓"));
    } else {
        eprintln!("  {} Model answered outside the known segments", dim.apply_to("?"));
    }
    eprintln!("  {} {}", bold.apply_to("Segment:"), label);
    if let Some(description) = &record.description {
        eprintln!("  {}", dim.apply_to(description));
    }
    eprintln!();
}

/// Human-readable recap on stderr: guess score and, for several images,
/// the per-segment breakdown.
pub(crate) fn print_summary(tally: &SegmentTally, total: usize) {
    let green = Style::new().for_stderr().green();
    let red = Style::new().for_stderr().red();
    let bold = Style::new().for_stderr().bold();

    let (correct, guesses) = tally.guess_score();
    if guesses == 1 {
        if correct == 1 {
            eprintln!("  {} You guessed right!", green.apply_to("✓"));
        } else {
            eprintln!("  {} Not quite. Better luck next time.", red.apply_to("✗"));
        }
    } else if guesses > 1 {
        eprintln!(
            "  {} {correct}/{guesses} guesses matched the model",
            bold.apply_to("Guess score:")
        );
    }

    if total > 1 {
        print_breakdown(tally);
    }
}

/// Text rendering of the segment share breakdown.
pub(crate) fn print_breakdown(tally: &SegmentTally) {
    let shares = tally.shares();
    if shares.is_empty() {
        return;
    }
    let cyan = Style::new().for_stderr().cyan();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    eprintln!("  {}", cyan.apply_to("Segment breakdown:"));
    for share in &shares {
        let width = (share.percent / 5.0).round() as usize;
        eprintln!(
            "    {:<20} {:<20} {:>5.1}% {}",
            share.label,
            "█".repeat(width),
            share.percent,
            dim.apply_to(format!("({})", share.count))
        );
    }
    eprintln!();
}
