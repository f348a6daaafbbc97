// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use mediacademy::app_config::{self, Config};
use mediacademy::app_controller::{render_spans, Controller};
use mediacademy::quiz::QuizMode;
use mediacademy::review::{DailyProgress, ReviewItem, ReviewKind};
use mediacademy::timeline::SentenceTarget;
use mediacademy::tokenizer::Dictionary;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a transcript, highlighting each sentence as it is reached
    Play {
        /// Transcript file (JSON or SRT)
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,

        /// Start from this sentence id
        #[arg(long)]
        from: Option<u32>,

        /// Playback rate (one of the configured rates)
        #[arg(short, long)]
        rate: Option<f64>,
    },

    /// Split text into dictionary words
    Tokenize {
        /// Text to tokenize
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Quiz yourself on bookmarked sentences
    Quiz {
        /// Transcript file (JSON or SRT)
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,

        /// Bookmarked sentence ids (all sentences when omitted)
        #[arg(short, long, value_delimiter = ',')]
        bookmark: Vec<u32>,
    },

    /// Show the words of a transcript due for review today
    Review {
        /// Transcript file (JSON or SRT)
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,
    },

    /// List the lessons in a directory
    Catalog {
        /// Directory to scan for transcripts
        #[arg(value_name = "DIR", default_value = "data/lessons")]
        dir: PathBuf,
    },

    /// Generate shell completions for mediacademy
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Mediacademy - study a language with subtitled media
#[derive(Parser, Debug)]
#[command(name = "mediacademy")]
#[command(version = "0.1.0")]
#[command(about = "Subtitle-synchronized language study")]
#[command(long_about = "Mediacademy plays subtitled lessons, splits sentences into dictionary words, and quizzes you on bookmarked sentences.

EXAMPLES:
    mediacademy play data/lessons/business-meeting.json            # Play a lesson
    mediacademy play --from 2 -r 0.75 data/lessons/business-meeting.json
                                                                    # Start at sentence 2, slower
    mediacademy tokenize '会議の結果'                                # Look up the words of a sentence
    mediacademy quiz -b 1,2,4 data/lessons/business-meeting.json   # Quiz on three sentences
    mediacademy review data/lessons/business-meeting.json          # Today's review list
    mediacademy catalog data/lessons                               # List the lessons
    mediacademy completions bash > mediacademy.bash                # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Dictionary file
    #[arg(short, long, default_value = "data/dictionary.json", global = true)]
    dictionary: PathBuf,

    /// Source language code (e.g., 'ja')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Gloss language code (e.g., 'ko')
    #[arg(short, long, global = true)]
    gloss_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()), now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at trace and narrow with set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "mediacademy", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());
    let controller = Controller::with_config(config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Play { transcript, from, rate } => {
            let mut session = controller.open_content(&transcript, &cli.dictionary)?;
            if let Some(rate) = rate {
                session.set_playback_rate(rate)?;
            }
            let start = from.map(|id| SentenceTarget::new(session.transcript().content.id, id));
            let summary = controller.run_playback(&mut session, start, &mut out).await?;
            info!("Played {} sentences", summary.shown.len());
        }
        Commands::Tokenize { text } => {
            let dictionary = Dictionary::load(&cli.dictionary)?;
            let spans = dictionary.tokenize(&text);
            writeln!(out, "{}", render_spans(&spans))?;
            for entry in spans.iter().filter_map(|span| span.entry.as_ref()) {
                writeln!(out, "  {} ({}, {}): {}", entry.surface_form, entry.romanization, entry.level, entry.gloss_text)?;
            }
        }
        Commands::Quiz { transcript, bookmark } => {
            let mut session = controller.open_content(&transcript, &cli.dictionary)?;
            let ids: Vec<u32> = if bookmark.is_empty() {
                session.transcript().segments().iter().map(|s| s.id).collect()
            } else {
                bookmark
            };
            for id in ids {
                session.toggle_sentence_bookmark(id)?;
            }
            let pool = session.bookmarked_pool();

            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut quiz = controller.new_quiz();

            controller.run_quiz(&mut quiz, &pool, QuizMode::Full, &mut input, &mut out).await?;
            while !quiz.session().wrong_answers().is_empty() && ask_retake(&mut input, &mut out)? {
                controller.run_quiz(&mut quiz, &pool, QuizMode::Retake, &mut input, &mut out).await?;
            }
            quiz.teardown();
        }
        Commands::Review { transcript } => {
            let session = controller.open_content(&transcript, &cli.dictionary)?;
            let now = Utc::now();
            let mut items: Vec<ReviewItem> = Vec::new();
            for segment in session.transcript().segments() {
                for entry in session.dictionary().tokenize(&segment.source_text).into_iter().filter_map(|s| s.entry) {
                    if items.iter().any(|item| item.content == entry.surface_form) {
                        continue;
                    }
                    let id = u32::try_from(items.len()).context("Too many review items")?;
                    items.push(ReviewItem::new(id, ReviewKind::Word, &entry.surface_form, &entry.gloss_text, entry.level, now));
                }
            }
            let progress = DailyProgress::new(controller.config().review.daily_goal);
            controller.print_review_plan(&items, &progress, now, &mut out)?;
        }
        Commands::Catalog { dir } => {
            for (path, content) in controller.catalog(&dir)? {
                writeln!(out, "{:>4}  {:<32} {:<12} {}  {}", content.id, content.title, content.category, content.level, path.display())?;
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load or create the configuration, then apply CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(source_lang) = &cli.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(gloss_lang) = &cli.gloss_language {
        config.gloss_language = gloss_lang.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn ask_retake<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<bool> {
    write!(out, "Retake missed sentences? [y/N] ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
