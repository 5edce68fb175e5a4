use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use clap::{Parser, Subcommand};

use facemood_core::capture::domain::exclusive_camera::ExclusiveCamera;
use facemood_core::capture::infrastructure::default_camera_source;
use facemood_core::detection::infrastructure::build_emotion_detector;
use facemood_core::detection::infrastructure::model_resolver::{self, ModelSpec, EMOTION_MODEL, FACE_MODEL};
use facemood_core::history::domain::history_exporter::HistoryExporter;
use facemood_core::history::domain::history_log::SessionHistory;
use facemood_core::history::infrastructure::csv_history_exporter::CsvHistoryExporter;
use facemood_core::imaging::domain::image_writer::ImageWriter;
use facemood_core::imaging::infrastructure::box_annotator::BoxAnnotator;
use facemood_core::imaging::infrastructure::image_codec::ImageCrateDecoder;
use facemood_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use facemood_core::pipeline::analyze_image_use_case::{Analysis, AnalyzeImageUseCase};
use facemood_core::pipeline::capture_snapshot_use_case::CaptureSnapshotUseCase;
use facemood_core::pipeline::live_session_use_case::{
    LiveFrame, LiveOutcome, LiveSessionUseCase, LiveSettings,
};
use facemood_core::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger, StdoutPipelineLogger};
use facemood_core::pipeline::result_formatter::{FaceCard, ResultFormatter};
use facemood_core::shared::clock::{Clock, SystemClock};
use facemood_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_FACE_CONFIDENCE, DEFAULT_THRESHOLD, HISTORY_EXPORT_FILENAME,
    UPLOAD_EXTENSIONS,
};

const BAR_WIDTH: u32 = 20;

/// Facial emotion detection from images and the webcam.
#[derive(Parser)]
#[command(name = "facemood")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Minimum dominant-emotion confidence to report a face (0-100).
    #[arg(long, global = true, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, global = true, default_value_t = DEFAULT_FACE_CONFIDENCE)]
    face_confidence: f64,

    /// Export the session history as CSV, to emotion_history.csv unless a
    /// path is given.
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        default_missing_value = HISTORY_EXPORT_FILENAME
    )]
    export: Option<PathBuf>,

    /// Camera device index.
    #[arg(long, global = true, default_value_t = DEFAULT_CAMERA_INDEX)]
    camera: u32,

    /// Directory with pre-downloaded models.
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a JPEG or PNG image.
    Analyze {
        image: PathBuf,

        /// Save the image with face boxes drawn.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Take one webcam snapshot and analyze it.
    Capture {
        /// Seconds to let the camera settle before the shot.
        #[arg(long, default_value = "1")]
        warmup: f64,

        /// Save the snapshot with face boxes drawn.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Poll the webcam for a bounded time.
    Live {
        /// Session length in seconds.
        #[arg(long, default_value = "60")]
        duration: f64,

        /// Seconds between frames.
        #[arg(long, default_value = "5")]
        interval: f64,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut history = SessionHistory::new();
    match &cli.command {
        Command::Analyze { image, output } => {
            let mut analyzer = build_analyzer(&cli, Box::new(NullPipelineLogger))?;
            let bytes = std::fs::read(image)
                .map_err(|e| format!("Cannot read {}: {e}", image.display()))?;
            let analysis = analyzer.execute(
                &bytes,
                None,
                &mut history,
                SystemClock::new().timestamp(),
            )?;
            print_cards(&analysis.cards);
            save_annotated(&analysis, output.as_deref())?;
        }
        Command::Capture { warmup, output } => {
            let mut analyzer = build_analyzer(&cli, Box::new(NullPipelineLogger))?;
            let snapshot = CaptureSnapshotUseCase::new(
                open_camera(cli.camera)?,
                Box::new(SystemClock::new()),
                Duration::from_secs_f64(*warmup),
            );
            let analysis = snapshot.execute(&mut analyzer, &mut history)?;
            print_cards(&analysis.cards);
            save_annotated(&analysis, output.as_deref())?;
        }
        Command::Live { duration, interval } => {
            let mut analyzer = build_analyzer(&cli, Box::new(StdoutPipelineLogger::new()))?;
            let settings = LiveSettings {
                budget: Duration::from_secs_f64(*duration),
                interval: Duration::from_secs_f64(*interval),
            };
            let live = LiveSessionUseCase::new(
                open_camera(cli.camera)?,
                Box::new(SystemClock::new()),
                settings,
            );
            log::info!("Live analysis for {duration}s, one frame every {interval}s");

            let outcome = live.run(
                &mut analyzer,
                &mut history,
                &AtomicBool::new(false),
                &mut print_live_frame,
            );
            analyzer.logger().summary();
            export_history(&history, cli.export.as_deref())?;

            match outcome {
                LiveOutcome::Completed { frames } => {
                    println!("Live analysis ended ({frames} frames).");
                }
                LiveOutcome::Cancelled { frames } => {
                    println!("Live analysis stopped ({frames} frames).");
                }
                LiveOutcome::Failed { error, .. } => return Err(error.into()),
            }
            return Ok(());
        }
    }

    export_history(&history, cli.export.as_deref())
}

fn build_analyzer(
    cli: &Cli,
    logger: Box<dyn PipelineLogger>,
) -> Result<AnalyzeImageUseCase, Box<dyn std::error::Error>> {
    let face_model = resolve_model(FACE_MODEL, cli.models_dir.as_deref())?;
    let emotion_model = resolve_model(EMOTION_MODEL, cli.models_dir.as_deref())?;
    let detector = build_emotion_detector(&face_model, &emotion_model, cli.face_confidence)?;

    Ok(AnalyzeImageUseCase::new(
        Box::new(ImageCrateDecoder::new()),
        detector,
        ResultFormatter::new(cli.threshold, Box::new(BoxAnnotator::new())),
        logger,
    ))
}

fn resolve_model(
    model: ModelSpec,
    models_dir: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {}", model.name);
    let name = model.name;
    let path = model_resolver::resolve(
        model,
        models_dir,
        Some(Box::new(move |downloaded, total| {
            download_progress(name, downloaded, total)
        })),
    )?;
    Ok(path)
}

fn open_camera(index: u32) -> Result<ExclusiveCamera, Box<dyn std::error::Error>> {
    Ok(ExclusiveCamera::new(default_camera_source(index)?))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=100.0).contains(&cli.threshold) {
        return Err(format!(
            "Threshold must be between 0 and 100, got {}",
            cli.threshold
        )
        .into());
    }
    if !(0.0..=1.0).contains(&cli.face_confidence) {
        return Err(format!(
            "Face confidence must be between 0.0 and 1.0, got {}",
            cli.face_confidence
        )
        .into());
    }
    match &cli.command {
        Command::Analyze { image, .. } => {
            if !image.exists() {
                return Err(format!("Input file not found: {}", image.display()).into());
            }
            if !is_upload_image(image) {
                return Err(format!(
                    "Unsupported image type: {} (expected {})",
                    image.display(),
                    UPLOAD_EXTENSIONS.join(", ")
                )
                .into());
            }
        }
        Command::Capture { warmup, .. } => {
            if !warmup.is_finite() || *warmup < 0.0 {
                return Err(format!("Warm-up must be zero or more seconds, got {warmup}").into());
            }
        }
        Command::Live { duration, interval } => {
            if !duration.is_finite() || *duration <= 0.0 {
                return Err(format!("Duration must be positive, got {duration}").into());
            }
            if !interval.is_finite() || *interval < 0.0 {
                return Err(format!("Interval must be zero or more seconds, got {interval}").into());
            }
        }
    }
    Ok(())
}

fn is_upload_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| UPLOAD_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn print_live_frame(frame: LiveFrame) {
    println!("\n=== Frame {} (+{}s) ===", frame.index + 1, frame.elapsed.as_secs());
    match frame.analysis {
        Ok(analysis) => print_cards(&analysis.cards),
        Err(e) => println!("Skipped: {e}"),
    }
}

fn print_cards(cards: &[FaceCard]) {
    if cards.is_empty() {
        println!("No faces above the confidence threshold.");
        return;
    }
    for card in cards {
        println!("---");
        println!("{}", card.title());
        println!("Emotion: {}", card.emotion.capitalized());
        println!("[{}] {}", confidence_bar(card), card.confidence_text());
        println!("{}", card.message);
    }
}

fn confidence_bar(card: &FaceCard) -> String {
    let filled = (card.bar_percent() * BAR_WIDTH + 50) / 100;
    let mut bar = "█".repeat(filled as usize);
    bar.push_str(&"░".repeat((BAR_WIDTH - filled) as usize));
    bar
}

fn save_annotated(
    analysis: &Analysis,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        ImageFileWriter::new().write(path, &analysis.frame)?;
        log::info!("Annotated image written to {}", path.display());
    }
    Ok(())
}

fn export_history(
    history: &SessionHistory,
    path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(());
    };
    if history.is_empty() {
        log::info!("No qualifying detections; nothing to export");
        return Ok(());
    }
    let rows = CsvHistoryExporter::new().export(history.entries(), path)?;
    println!("Exported {rows} entries to {}", path.display());
    Ok(())
}

fn download_progress(name: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {name}... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading {name}... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_export_unless_requested() {
        let cli = Cli::try_parse_from(["facemood", "analyze", "face.jpg"]).unwrap();
        assert!(cli.export.is_none());
    }

    #[test]
    fn test_bare_export_flag_uses_default_file() {
        let cli = Cli::try_parse_from(["facemood", "analyze", "face.jpg", "--export"]).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from(HISTORY_EXPORT_FILENAME)));
    }

    #[test]
    fn test_export_flag_accepts_path() {
        let cli =
            Cli::try_parse_from(["facemood", "--export", "out/mood.csv", "live"]).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("out/mood.csv")));
    }

    #[test]
    fn test_export_skipped_without_path() {
        use facemood_core::detection::domain::emotion::Emotion;
        use facemood_core::history::domain::history_entry::HistoryEntry;
        use facemood_core::history::domain::history_log::HistoryLog;

        let mut history = SessionHistory::new();
        history.append(HistoryEntry::new(SystemClock::new().timestamp(), 1, Emotion::Happy, 82.0));
        assert!(export_history(&history, None).is_ok());
    }
}
