use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, ValueEnum};
use srtgen_rs::alignment::report::{build_report, RunInfo};
use srtgen_rs::recognizer::load_tokens;
use srtgen_rs::srt;
use srtgen_rs::timing::{calibrate, parse_timestamp};
use srtgen_rs::{
    AlignerKind, AlignmentInput, Anchors, Calibration, Diagnostics, SrtGenConfig,
    SubtitleAlignerBuilder, Verbosity,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Global alignment unless the grid is too large.
    Auto,
    Global,
    /// Longest-matching-block recursion.
    MatchingBlocks,
}

impl Strategy {
    fn aligner_kind(self) -> AlignerKind {
        match self {
            Self::Auto => AlignerKind::Auto,
            Self::Global => AlignerKind::Global,
            Self::MatchingBlocks => AlignerKind::MatchingBlocks,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "srtgen")]
#[command(about = "Generate SRT subtitles by aligning a script with recognizer output")]
struct Args {
    /// Script text file.
    #[arg(short = 't', long = "text", env = "SRTGEN_TEXT")]
    text: PathBuf,
    /// Recognizer token dump (JSON).
    #[arg(short = 'r', long = "tokens", env = "SRTGEN_TOKENS")]
    tokens: PathBuf,
    /// Recognizer positions per second.
    #[arg(short = 'f', long, env = "SRTGEN_FRAME_RATE")]
    frame_rate: Option<f64>,
    /// Seconds added to every timestamp.
    #[arg(short = 'd', long, env = "SRTGEN_DELAY", allow_negative_numbers = true)]
    delay: Option<f64>,
    /// Real start time of the first sentence, e.g. 00:00:01,250.
    #[arg(
        long,
        env = "SRTGEN_FIRST_ANCHOR",
        value_parser = parse_anchor,
        requires = "last_anchor"
    )]
    first_anchor: Option<f64>,
    /// Real start time of the last sentence.
    #[arg(
        long,
        env = "SRTGEN_LAST_ANCHOR",
        value_parser = parse_anchor,
        requires = "first_anchor"
    )]
    last_anchor: Option<f64>,
    #[arg(long, env = "SRTGEN_STRATEGY", value_enum, default_value_t = Strategy::Auto)]
    strategy: Strategy,
    /// JSON configuration file.
    #[arg(long, env = "SRTGEN_CONFIG")]
    config: Option<PathBuf>,
    /// Output SRT file; stdout when omitted.
    #[arg(short = 'o', long, env = "SRTGEN_OUT")]
    out: Option<PathBuf>,
    /// Write a JSON alignment report here.
    #[arg(long, env = "SRTGEN_REPORT")]
    report: Option<PathBuf>,
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[arg(short = 'q', long, env = "SRTGEN_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_anchor(value: &str) -> Result<f64, String> {
    parse_timestamp(value).map_err(|e| e.to_string())
}

fn main() {
    let args = Args::parse();
    init_logging(&args);
    if let Err(message) = run(args) {
        tracing::error!("{message}");
        std::process::exit(1);
    }
}

fn init_logging(args: &Args) {
    let default_filter = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            _ => "info,srtgen_rs=debug",
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<SrtGenConfig, String> {
    let mut config = match args.config.as_deref() {
        Some(path) => SrtGenConfig::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => SrtGenConfig::default(),
    };
    if let Some(frame_rate) = args.frame_rate {
        config.timing.frame_rate = frame_rate;
    }
    if let Some(delay) = args.delay {
        config.timing.delay = delay;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn run(args: Args) -> Result<(), String> {
    let config = load_config(&args)?;
    let aligner = SubtitleAlignerBuilder::new(config)
        .with_aligner_kind(args.strategy.aligner_kind())
        .build()
        .map_err(|e| e.to_string())?;

    let transcript = fs::read_to_string(&args.text)
        .map_err(|e| format!("failed to read script {}: {e}", args.text.display()))?;
    let tokens =
        load_tokens(&args.tokens).map_err(|e| format!("{}: {e}", args.tokens.display()))?;

    let mut diagnostics = Diagnostics::new(Verbosity::from_flags(args.verbose, args.quiet));
    let output = aligner
        .align(&AlignmentInput { transcript, tokens }, &mut diagnostics)
        .map_err(|e| e.to_string())?;

    let timing = &aligner.config().timing;
    let configured = Calibration::from(timing);
    let anchors = args
        .first_anchor
        .zip(args.last_anchor)
        .map(|(first_seconds, last_seconds)| Anchors {
            first_seconds,
            last_seconds,
        });
    let calibration = match anchors {
        Some(anchors) => calibrate(&output.sentences, anchors).unwrap_or_else(|e| {
            tracing::error!(
                error = %e,
                frame_rate = configured.frame_rate,
                delay = configured.delay,
                "calibration failed; using the configured frame rate and delay"
            );
            configured
        }),
        None => configured,
    };

    let cues = srt::to_cues(&output.sentences, &calibration);
    let rendered = srt::render(&cues, &timing.placeholder);
    match args.out.as_deref() {
        Some(path) => write_file(path, &rendered)?,
        None => std::io::stdout()
            .write_all(rendered.as_bytes())
            .map_err(|e| format!("failed to write SRT to stdout: {e}"))?,
    }

    if let Some(report_path) = args.report.as_deref() {
        let run_info = RunInfo {
            generated_at: Utc::now().to_rfc3339(),
            script_path: args.text.display().to_string(),
            tokens_path: args.tokens.display().to_string(),
            strategy: args.strategy.aligner_kind().label().to_string(),
            anchored: anchors.is_some(),
        };
        let report = build_report(
            run_info,
            &output,
            &calibration,
            &timing.placeholder,
            diagnostics.events(),
        );
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("failed to serialize report: {e}"))?;
        write_file(report_path, &json)?;
    }

    let unknown = output.sentences.iter().filter(|s| !s.is_resolved()).count();
    tracing::info!(
        sentences = output.sentences.len(),
        unknown,
        desyncs = diagnostics.desync_count(),
        frame_rate = calibration.frame_rate,
        delay = calibration.delay,
        "srtgen: done"
    );
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }
    fs::write(path, contents).map_err(|e| format!("failed to write {}: {e}", path.display()))
}
