//! Scaffolds a sample lesson directory so the trainer has something to
//! practice against out of the box.

use std::fmt;
use std::path::PathBuf;

use dictee_core::model::LessonId;
use storage::catalog::{FsLessonCatalog, LessonCatalog};

/// Starter lesson: Dutch sentences about the days of the week.
const SAMPLE_LESSON: &str = "dagen";
const SAMPLE_SENTENCES: [&str; 27] = [
    "Welke dag is het vandaag?",
    "Het is vandaag dinsdag.",
    "Gisteren was het maandag.",
    "En morgen is het woensdag.",
    "Na woensdag volgen donderdag en vrijdag.",
    "De laatste twee dagen van de week zijn zaterdag en zondag.",
    "Dan is het weekend.",
    "Wanneer werken de meeste mensen?",
    "Van maandag tot en met vrijdag.",
    "De meeste mensen zijn in het weekend vrij.",
    "We werken dan meestal niet.",
    "We gaan dan naar familie. Of we gaan naar buiten met de kinderen, of met vrienden.",
    "We hebben ook tijd om boodschappen te doen.",
    "Of andere leuke dingen",
    "bijvoorbeeld Nederlands leren.",
    "Op welke dagen zijn de winkels open?",
    "De meeste winkels zijn op maandag tot en met zaterdag open",
    "en veel winkels ook op zondag.",
    "Op maandagmorgen zijn veel winkels dicht.",
    "Mensen die in een winkel werken zijn dus meestal niet in het weekend vrij.",
    "Ze hebben op een andere dag vrij, bijvoorbeeld op maandag.",
    "Zijn scholen in het weekend dicht?",
    "Ja, alle scholen zijn dicht in het weekend.",
    "In het weekend hebben kinderen geen les.",
    "Kinderen tot twaalf jaar hebben meestal ook vrij op woensdagmiddag.",
    "En ze hebben zes weken vrij in de zomer!",
    "Hoe is dat in jullie land?",
];

#[derive(Debug, Clone)]
struct Args {
    lessons_dir: PathBuf,
    lesson_name: String,
    force: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLessonName { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLessonName { raw } => {
                write!(f, "invalid --lesson value: {raw}")
            }
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut lessons_dir = std::env::var("DICTEE_LESSONS_DIR")
            .map_or_else(|_| PathBuf::from("lessons"), PathBuf::from);
        let mut lesson_name = SAMPLE_LESSON.to_owned();
        let mut force = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--lessons" => {
                    lessons_dir = PathBuf::from(require_value(&mut args, "--lessons")?);
                }
                "--lesson" => {
                    let value = require_value(&mut args, "--lesson")?;
                    if value.trim().is_empty() || value.contains(std::path::is_separator) {
                        return Err(ArgsError::InvalidLessonName { raw: value });
                    }
                    lesson_name = value;
                }
                "--force" => force = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            lessons_dir,
            lesson_name,
            force,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --lessons <dir>   Lessons root directory (default: lessons)");
    eprintln!("  --lesson <name>   Lesson directory name (default: {SAMPLE_LESSON})");
    eprintln!("  --force           Overwrite an existing sentences.txt");
    eprintln!("  -h, --help        Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DICTEE_LESSONS_DIR");
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let lesson_dir = args.lessons_dir.join(&args.lesson_name);
    let sentences_file = lesson_dir.join("sentences.txt");
    if sentences_file.exists() && !args.force {
        eprintln!(
            "{} already exists; pass --force to overwrite",
            sentences_file.display()
        );
        return Ok(());
    }

    std::fs::create_dir_all(lesson_dir.join("audio"))?;
    let mut body = SAMPLE_SENTENCES.join("\n");
    body.push('\n');
    std::fs::write(&sentences_file, body)?;

    // Load the lesson back through the catalog so a bad seed fails here,
    // not at practice time.
    let id = args.lesson_name.parse::<LessonId>()?;
    let lesson = FsLessonCatalog::new(&args.lessons_dir).load_lesson(&id)?;

    println!(
        "Seeded lesson '{}' with {} sentences at {} (drop recordings into {})",
        lesson.id(),
        lesson.len(),
        sentences_file.display(),
        lesson_dir.join("audio").display()
    );

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
