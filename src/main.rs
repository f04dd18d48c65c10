// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use scriptreel::app_config::{Config, LogLevel};
use scriptreel::file_utils::FileManager;
use scriptreel::generation::{OrchestratorSettings, SceneBatchRunner, SceneJobOrchestrator};
use scriptreel::providers::ScriptPreferences;
use scriptreel::providers::anthropic::Anthropic;
use scriptreel::providers::runway::Runway;
use scriptreel::script::writer::GENERATED_AUTHOR;
use scriptreel::script::{Scene, ScriptDocument, ScriptDraft, ScriptSegmenter, ScriptWriter, derive_title};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a screenplay file and print its scenes as JSON
    Parse {
        /// Screenplay text file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Script title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,

        /// Script author
        #[arg(short, long)]
        author: Option<String>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a screenplay from a story idea and print it parsed as JSON
    Generate {
        /// Story idea
        #[arg(short, long)]
        prompt: String,

        /// Genre hint
        #[arg(short, long)]
        genre: Option<String>,

        /// Tone hint
        #[arg(long)]
        tone: Option<String>,

        /// Target duration in seconds (30-600)
        #[arg(short, long)]
        duration: Option<u32>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a screenplay and generate one clip per scene
    Render {
        /// Screenplay text file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Script title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,

        /// Directory for clips (overrides the config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Only render these scene indices, e.g. 0,2,5
        #[arg(short, long, value_delimiter = ',')]
        scenes: Option<Vec<usize>>,
    },

    /// Generate shell completions for scriptreel
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// ScriptReel - screenplays to scene clips with AI
///
/// Parses screenplays into scenes, writes screenplays from story ideas and
/// renders each scene into a short video clip.
#[derive(Parser, Debug)]
#[command(name = "scriptreel")]
#[command(version)]
#[command(about = "AI-powered screenplay to video tool")]
#[command(long_about = "ScriptReel turns screenplays into scene-by-scene video clips.

EXAMPLES:
    scriptreel parse script.txt                      # Print scenes as JSON
    scriptreel generate -p \"A lighthouse keeper...\"  # Write and parse a screenplay
    scriptreel render script.txt                     # Render every scene
    scriptreel render script.txt --scenes 0,2        # Render selected scenes only
    scriptreel completions bash > scriptreel.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. Empty API keys are read from
    ANTHROPIC_API_KEY and RUNWAY_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Colour code and emoji for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, emoji) = Self::style_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "scriptreel", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config, cli.log_level.clone())?;

    match cli.command {
        Commands::Parse { file, title, author, output } => {
            let title = title.unwrap_or_else(|| title_from_path(&file));
            let document = parse_file(&file, &title, author.as_deref())?;
            emit_json(&document, output.as_deref())
        }
        Commands::Generate { prompt, genre, tone, duration, output } => {
            let preferences = ScriptPreferences { duration_seconds: duration, genre, tone };
            run_generate(&config, &prompt, &preferences, output.as_deref()).await
        }
        Commands::Render { file, title, output_dir, scenes } => {
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            let title = title.unwrap_or_else(|| title_from_path(&file));
            run_render(&config, &file, &title, &output_dir, scenes.as_deref()).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the config file, apply CLI and environment overrides, then validate
fn load_config(path: &Path, cli_log_level: Option<CliLogLevel>) -> Result<Config> {
    let (mut config, created) = Config::load_or_create(path)?;
    if created {
        warn!("Config file not found at {:?}, created a default one.", path);
    }

    if let Some(level) = cli_log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.apply_env_overrides();
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string())
}

fn parse_file(path: &Path, title: &str, author: Option<&str>) -> Result<ScriptDocument> {
    let text = FileManager::read_to_string(path)?;
    let document = ScriptSegmenter::default().parse(&text, title, author);
    info!("Parsed {:?}: {} scenes", path, document.scene_count());
    Ok(document.with_generated_id())
}

fn emit_json(document: &ScriptDocument, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(document)
        .context("Failed to serialize script document")?;
    match output {
        Some(path) => {
            FileManager::write_to_file(path, &json)?;
            info!("Wrote {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn run_generate(
    config: &Config,
    idea: &str,
    preferences: &ScriptPreferences,
    output: Option<&Path>,
) -> Result<()> {
    let settings = &config.script_writer;
    let oracle = Anthropic::new(&settings.api_key, &settings.endpoint, &settings.model, settings.timeout_secs)
        .with_limits(settings.max_tokens, settings.temperature);
    let writer = ScriptWriter::new(oracle);

    let draft = writer.write(idea, preferences).await;
    if let ScriptDraft::Fallback { reason, .. } = &draft {
        warn!("Using the bundled example script: {}", reason);
    }

    let document = ScriptSegmenter::default()
        .parse(draft.text(), &derive_title(idea), Some(GENERATED_AUTHOR))
        .with_generated_id();
    emit_json(&document, output)
}

async fn run_render(
    config: &Config,
    file: &Path,
    title: &str,
    output_dir: &Path,
    selected: Option<&[usize]>,
) -> Result<()> {
    config.validate_for_render().context("Configuration is not ready for rendering")?;

    let document = parse_file(file, title, None)?;
    let scenes: Vec<Scene> = match selected {
        Some(indices) => {
            for index in indices {
                if document.scene(*index).is_none() {
                    return Err(anyhow!("Scene {} does not exist (script has {} scenes)", index, document.scene_count()));
                }
            }
            document.scenes.iter().filter(|s| indices.contains(&s.index)).cloned().collect()
        }
        None => document.scenes.clone(),
    };

    if scenes.is_empty() {
        warn!("No scenes to render in {:?}", file);
        return Ok(());
    }

    FileManager::ensure_dir(output_dir)?;

    let media = &config.media;
    let service = Runway::new(&media.api_key, &media.endpoint, &media.api_version, media.timeout_secs)
        .with_models(&media.image_model, &media.video_model)
        .with_download_timeout(media.download_timeout_secs);
    let orchestrator = SceneJobOrchestrator::new(
        Arc::new(service),
        OrchestratorSettings::from_config(config),
        output_dir,
    );
    let runner = SceneBatchRunner::new(orchestrator, config.concurrent_scenes);

    let progress_bar = ProgressBar::new(scenes.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} scenes ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar.set_message("Rendering");

    info!("🎬 Rendering {} scenes of '{}'", scenes.len(), document.title);

    let bar = progress_bar.clone();
    let (results, summary) = runner
        .run(&scenes, move |done, _total| bar.set_position(done as u64))
        .await;
    progress_bar.finish_with_message("Done");

    for result in &results {
        match &result.media_path {
            Some(path) if result.is_completed() => {
                info!("Scene {}: {:?} ({}s)", result.scene_index, path, result.duration);
            }
            _ => error!("Scene {}: failed", result.scene_index),
        }
    }
    info!(
        "{} completed, {} failed, {}s of footage",
        summary.completed, summary.failed, summary.total_clip_seconds
    );

    if !summary.all_completed() {
        return Err(anyhow!("{} of {} scenes failed", summary.failed, results.len()));
    }
    Ok(())
}
