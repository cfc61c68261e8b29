use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{ArgAction, ArgGroup, CommandFactory, Parser};
use crossterm::style::Stylize;
use log::{info, warn};

use gre_tutor::config::{self, resolve_path, Mode, TutorConfig, DEFAULT_COVERAGE};
use gre_tutor::speech::DEFAULT_VOICE;
use gre_tutor::{
    DictionaryStore, Result, RunFailure, SaySpeaker, Session, Shutdown, TerminalPrompt,
    TutorError, WeekId, WordIndex,
};

const GUIDE: &str = "\
How to Train?

- Start the tutor with '-t' option
- Tutor will ask a word
- If you know the meaning of the word, just press 'Enter'
  (or type the meaning of the word as it is in dictionary)
- If you do not know the meaning, type anything and press 'Enter'
- If you'd like to see the meaning before deciding, type '?' and press 'Enter' to peek at the answer
- Repeat until the desired coverage (%) is reached

Notes:

--week is used two ways: when inserting words it picks the week to insert into,
and when training it adjusts how likely a word is to come up depending on its week.
Words up to that week are tracked; earlier weeks come up more often.

--voice takes any voice of the macOS 'say' command ('say -v ?' lists them).

Examples:

$ gre-tutor                                    List all words in the default dictionary
$ gre-tutor --open myDict.json --add           Add words to the last week of myDict.json
$ gre-tutor -a -w 3                            Add words to the 3rd week of the default dictionary
$ gre-tutor -t -v Alex -c 75                   Train until 75% coverage with the Alex voice
$ gre-tutor --search -m -o myDict.json         Browse words in myDict.json without pronunciation
$ gre-tutor --backup backup.json -o myDict.json  Copy myDict.json to backup.json
$ gre-tutor --restore backup.json              Overwrite the default dictionary with backup.json";

#[derive(Parser, Debug)]
#[command(
    name = "gre-tutor",
    about = "GRE - Vocabulary Tutor",
    version,
    disable_help_flag = true,
    after_long_help = GUIDE
)]
#[command(group(
    ArgGroup::new("mode").args(["add", "train", "search", "backup", "restore", "help"])
))]
struct Cli {
    /// Dictionary to load and save for this run (default: ~/.words.json)
    #[arg(short, long, value_name = "FILEPATH")]
    open: Option<PathBuf>,

    /// Week to insert into, or to prepare for when training (default: the last week)
    #[arg(short, long, value_name = "NUMBER", value_parser = clap::value_parser!(u32).range(1..))]
    week: Option<u32>,

    /// Coverage (%) at which training is complete
    #[arg(short, long, value_name = "PERCENTAGE", default_value_t = DEFAULT_COVERAGE)]
    coverage: f64,

    /// Do not pronounce words
    #[arg(short, long)]
    mute: bool,

    /// Voice used to pronounce words
    #[arg(short, long, value_name = "VOICE", default_value = DEFAULT_VOICE)]
    voice: String,

    /// Insert words into the dictionary
    #[arg(short, long)]
    add: bool,

    /// Train on the words in the dictionary
    #[arg(short, long)]
    train: bool,

    /// Search words in the dictionary
    #[arg(short, long)]
    search: bool,

    /// Copy the open dictionary to FILEPATH
    #[arg(short, long, value_name = "FILEPATH")]
    backup: Option<PathBuf>,

    /// Overwrite the dictionary with the one at FILEPATH
    #[arg(short, long, value_name = "FILEPATH", num_args = 0..=1)]
    restore: Option<Option<PathBuf>>,

    /// Show this help page
    #[arg(short, long, action = ArgAction::SetTrue)]
    help: bool,
}

impl Cli {
    fn into_config(self, cwd: &Path) -> Result<TutorConfig> {
        let mode = if self.help {
            Mode::Help
        } else if self.add {
            Mode::Add
        } else if self.train {
            Mode::Train
        } else if self.search {
            Mode::Search
        } else if let Some(path) = self.backup {
            Mode::Backup(resolve_path(&path, cwd))
        } else if let Some(path) = self.restore {
            Mode::Restore(path.map(|p| resolve_path(&p, cwd)))
        } else {
            Mode::List
        };

        Ok(TutorConfig {
            dictionary_path: self
                .open
                .map(|p| resolve_path(&p, cwd))
                .unwrap_or_else(config::default_dictionary_path),
            prep_week: self.week.map(WeekId::new).transpose()?,
            desired_coverage: self.coverage,
            mute: self.mute,
            voice: self.voice,
            mode,
        })
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match cli.into_config(&cwd) {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            process::exit(1);
        }
    };

    process::exit(run(config));
}

fn run(config: TutorConfig) -> i32 {
    let store = match DictionaryStore::load(&config.dictionary_path) {
        Ok(store) => store,
        Err(e) => {
            report(&e);
            return 1;
        }
    };
    let prep_week = store.with(|d| config.resolve_prep_week(d));

    println!("{}", banner(prep_week));

    if config.mode == Mode::Help {
        return match Cli::command().print_long_help() {
            Ok(()) => 0,
            Err(_) => 1,
        };
    }

    if let Err(e) = config.validate() {
        report(&e);
        return 1;
    }

    match &config.mode {
        Mode::List => list(&store),
        Mode::Backup(target) => backup(&store, target),
        Mode::Restore(source) => restore(&store, source.as_deref()),
        Mode::Add | Mode::Train | Mode::Search => interactive(&config, store, prep_week),
        Mode::Help => 0,
    }
}

/// Printed on every run, help included
fn banner(prep_week: WeekId) -> String {
    let week_label = format!("week {}", prep_week.number());
    format!(
        "{}\nIt appears we are working on {}",
        "Welcome to GRE - Tutor".bold(),
        week_label.as_str().red()
    )
}

fn list(store: &DictionaryStore) -> i32 {
    let dictionary = store.snapshot();
    let words = WordIndex::build(&dictionary).len();
    match dictionary.to_pretty_json() {
        Ok(json) => {
            println!("There are {} words in dictionary. They are:\n{}", words, json);
            0
        }
        Err(e) => {
            report(&TutorError::json(store.path(), e));
            1
        }
    }
}

fn backup(store: &DictionaryStore, target: &Path) -> i32 {
    match store.save_to(target) {
        Ok(()) => {
            println!("{}{}", "All changes are saved to ".green(), target.display());
            0
        }
        Err(e) => {
            report(&e);
            1
        }
    }
}

fn restore(store: &DictionaryStore, source: Option<&Path>) -> i32 {
    match store.restore(source) {
        Ok(()) => {
            let source = source.map(|p| p.display().to_string()).unwrap_or_default();
            println!("{}{}", "Dictionary is replaced with the file at ".green(), source);
            0
        }
        Err(e) => {
            report(&e);
            1
        }
    }
}

/// Add, train and search all end by persisting through the shutdown guard
fn interactive(config: &TutorConfig, store: DictionaryStore, prep_week: WeekId) -> i32 {
    let shutdown = Arc::new(Shutdown::new(store.clone()));
    register_signal_handler(Arc::clone(&shutdown));

    let mut session = Session::new(store, prep_week);
    let speaker = SaySpeaker::new(config.voice.clone(), config.mute);
    let mut prompt = TerminalPrompt::stdio();

    let finished = shutdown.finish(|| match config.mode {
        Mode::Add => session.insert_words(&mut prompt, &speaker),
        Mode::Search => session.search(&mut prompt, &speaker),
        _ => {
            let mut rng = rand::thread_rng();
            let summary =
                session.train(config.desired_coverage, &mut prompt, &speaker, &mut rng)?;
            info!("Trained: {:?}", summary);
            println!("{}", session.coverage().stats()?);
            Ok(())
        }
    });

    match &finished.failure {
        Some(RunFailure::Error(e)) => report(e),
        Some(RunFailure::Panic) => {
            eprintln!("{}", "Unexpected fault, progress was saved before exiting".red())
        }
        None => {}
    }
    announce(&finished.saved);
    finished.exit_code()
}

fn announce(saved: &Result<()>) {
    match saved {
        Ok(()) => println!("{}", "All changes are saved".green()),
        Err(e) => report(e),
    }
}

fn persist(shutdown: &Shutdown) -> Result<()> {
    let result = shutdown.persist();
    announce(&result);
    result
}

fn register_signal_handler(shutdown: Arc<Shutdown>) {
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        let result = persist(&shutdown);
        process::exit(Shutdown::exit_code(&result));
    }) {
        warn!("Failed to set Ctrl+C handler: {}", e);
    }
}

fn report(error: &TutorError) {
    eprintln!("{} {}", "Error:".red(), error);
}
