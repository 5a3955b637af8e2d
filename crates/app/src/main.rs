use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use dictee_core::Clock;
use dictee_core::model::{FeedbackItem, LessonId, MatchPolicy, TrainerSettings};
use services::{Phase, PracticeService, ProgressOverviewService, SessionState};
use storage::catalog::FsLessonCatalog;
use storage::json_store::JsonProgressStore;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidThreshold { raw: String },
    InvalidLesson { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidThreshold { raw } => {
                write!(f, "invalid --threshold value (expected 0 < t <= 1): {raw}")
            }
            ArgsError::InvalidLesson { raw } => write!(f, "invalid --lesson value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    lessons_dir: PathBuf,
    progress_file: PathBuf,
    lesson: Option<LessonId>,
    exact: bool,
    threshold: f64,
    free_listening: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut lessons_dir = std::env::var("DICTEE_LESSONS_DIR")
            .map_or_else(|_| PathBuf::from("lessons"), PathBuf::from);
        let mut progress_file = std::env::var("DICTEE_PROGRESS_FILE")
            .map_or_else(|_| PathBuf::from("progress.json"), PathBuf::from);
        let mut lesson = None;
        let mut exact = false;
        let mut threshold = 0.85;
        let mut free_listening = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--lessons" => {
                    lessons_dir = PathBuf::from(require_value(args, "--lessons")?);
                }
                "--progress" => {
                    progress_file = PathBuf::from(require_value(args, "--progress")?);
                }
                "--lesson" => {
                    let value = require_value(args, "--lesson")?;
                    lesson = Some(
                        value
                            .parse::<LessonId>()
                            .map_err(|_| ArgsError::InvalidLesson { raw: value.clone() })?,
                    );
                }
                "--exact" => exact = true,
                "--threshold" => {
                    let value = require_value(args, "--threshold")?;
                    threshold = value
                        .parse::<f64>()
                        .ok()
                        .filter(|t| t.is_finite() && *t > 0.0 && *t <= 1.0)
                        .ok_or(ArgsError::InvalidThreshold { raw: value })?;
                }
                "--free-listening" => free_listening = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            lessons_dir,
            progress_file,
            lesson,
            exact,
            threshold,
            free_listening,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  dictee [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --lessons <dir>     Lessons root directory (default: lessons)");
    eprintln!("  --progress <file>   Progress file (default: progress.json)");
    eprintln!("  --lesson <name>     Start directly on the named lesson");
    eprintln!("  --exact             Exact word matching instead of fuzzy");
    eprintln!("  --threshold <t>     Fuzzy similarity threshold in (0, 1] (default: 0.85)");
    eprintln!("  --free-listening    Allow replaying audio and typing at any time");
    eprintln!("  -h, --help          Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DICTEE_LESSONS_DIR, DICTEE_PROGRESS_FILE, RUST_LOG");
}

fn read_line(prompt: &str) -> std::io::Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        // EOF: the learner is done.
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}

fn pick_lesson(
    service: &PracticeService,
    overview_service: &ProgressOverviewService,
    preselected: Option<&LessonId>,
) -> Result<Option<LessonId>, Box<dyn std::error::Error>> {
    let lessons = service.list_lessons()?;
    if lessons.is_empty() {
        eprintln!("No lessons found. Run the seed binary or add lesson directories.");
        return Ok(None);
    }

    if let Some(id) = preselected {
        if lessons.contains(id) {
            return Ok(Some(id.clone()));
        }
        eprintln!("Lesson '{id}' not found.");
    }

    let overview = overview_service.overview()?;
    println!();
    println!("Lessons:");
    for (i, id) in lessons.iter().enumerate() {
        let summary = overview
            .lessons
            .iter()
            .find(|lesson| &lesson.id == id)
            .map_or_else(String::new, |lesson| {
                let avg = lesson
                    .average
                    .map_or_else(String::new, |avg| format!(", avg {avg}%"));
                let done = if lesson.completed { ", completed" } else { "" };
                format!("  ({} attempts{avg}{done})", lesson.attempts)
            });
        println!("  {}. {id}{summary}", i + 1);
    }
    if overview.streak.streak > 0 {
        println!("Practice streak: {} day(s)", overview.streak.streak);
    }

    loop {
        let Some(answer) = read_line("Pick a lesson (number or name, empty to quit): ")? else {
            return Ok(None);
        };
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(None);
        }
        if let Ok(number) = answer.parse::<usize>() {
            if (1..=lessons.len()).contains(&number) {
                return Ok(Some(lessons[number - 1].clone()));
            }
        }
        if let Some(id) = lessons.iter().find(|id| id.as_str() == answer) {
            return Ok(Some(id.clone()));
        }
        println!("No such lesson.");
    }
}

fn print_feedback(items: &[FeedbackItem]) {
    for item in items {
        match item {
            FeedbackItem::Match { expected } => println!("  ✓ {expected}"),
            FeedbackItem::Mismatch { expected, actual } => {
                println!("  ✗ {expected} (you wrote: {actual})");
            }
            FeedbackItem::Missing { expected } => println!("  ✗ {expected} (missing)"),
            FeedbackItem::Extra { actual } => println!("  ✗ {actual} (extra)"),
        }
    }
}

fn run_session(
    service: &PracticeService,
    session: &mut SessionState,
) -> Result<(), Box<dyn std::error::Error>> {
    let strict = service.settings().strict_listening();

    while !session.is_complete() {
        let prompt = service.current_prompt(session)?;
        println!();
        println!("Sentence {} of {}", prompt.index, prompt.total);

        match &prompt.audio {
            Some(path) => {
                if strict {
                    if read_line("Press Enter to listen (once!): ")?.is_none() {
                        return Ok(());
                    }
                    session.start_listening()?;
                    println!("▶ {}", path.display());
                    if read_line("Press Enter when you finished listening: ")?.is_none() {
                        return Ok(());
                    }
                    session.finish_listening()?;
                } else {
                    println!("▶ {} (replay as often as you like)", path.display());
                }
            }
            None => {
                println!("⚠ Audio file not found, skipping playback.");
                if strict {
                    // No asset to gate on; walk the gate so typing unlocks.
                    session.start_listening()?;
                    session.finish_listening()?;
                }
            }
        }

        let Some(transcription) = read_line("Type what you hear: ")? else {
            return Ok(());
        };

        let outcome = service.submit_transcription(session, &transcription)?;
        if outcome.reference_problem {
            println!("⚠ This sentence has unusable reference text and was skipped.");
        } else if let Some(record) = &outcome.record {
            println!();
            println!("Accuracy: {}%", record.accuracy());
            print_feedback(record.feedback());
        }

        if service.next_sentence(session)? == Phase::LessonComplete {
            println!();
            println!("You completed all sentences!");
            if let Some(average) = session.average() {
                println!("Session average: {average}%");
            }
        }
    }

    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let policy = if args.exact {
        MatchPolicy::Exact
    } else {
        MatchPolicy::Fuzzy
    };
    let settings = TrainerSettings::new(policy, args.threshold, !args.free_listening)?;
    tracing::debug!(
        lessons = %args.lessons_dir.display(),
        progress = %args.progress_file.display(),
        ?settings,
        "starting dictee"
    );

    let catalog = Arc::new(FsLessonCatalog::new(&args.lessons_dir));
    let store = Arc::new(JsonProgressStore::new(&args.progress_file));
    let service = PracticeService::new(
        Clock::default_clock(),
        catalog,
        Arc::clone(&store) as Arc<dyn storage::repository::ProgressRepository>,
        settings,
    );
    let overview_service =
        ProgressOverviewService::new(store as Arc<dyn storage::repository::ProgressRepository>);

    let mut preselected = args.lesson;
    loop {
        let Some(lesson_id) = pick_lesson(&service, &overview_service, preselected.as_ref())?
        else {
            return Ok(());
        };
        preselected = None;

        let mut session = service.select_lesson(&lesson_id)?;
        run_session(&service, &mut session)?;

        if !session.is_complete() {
            // EOF mid-session: recorded submissions are already persisted.
            return Ok(());
        }

        if let Some(overview) = overview_service.lesson(&lesson_id)? {
            if let Some(average) = overview.average {
                println!("Lesson average: {average}%");
            }
            if !overview.weak_sentences.is_empty() {
                let weak: Vec<String> = overview
                    .weak_sentences
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!("Sentences to revisit: {}", weak.join(", "));
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
