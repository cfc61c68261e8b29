use std::collections::VecDeque;
use std::fs;
use std::io::Cursor;

use gre_tutor::dictionary::read_dictionary;
use gre_tutor::{
    DictionaryStore, Feedback, Prompt, Session, Shutdown, Silent, TerminalPrompt, TutorError,
    WeekId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

struct Answers {
    replies: VecDeque<&'static str>,
    shown: Vec<Feedback>,
}

impl Answers {
    fn new(replies: &[&'static str]) -> Self {
        Self {
            replies: replies.iter().copied().collect(),
            shown: Vec::new(),
        }
    }
}

impl Prompt for Answers {
    fn ask(&mut self, _label: &str) -> std::io::Result<Option<String>> {
        Ok(self.replies.pop_front().map(str::to_string))
    }

    fn show(&mut self, feedback: &Feedback) {
        self.shown.push(feedback.clone());
    }
}

const TWO_WEEKS: &str = r#"{
    "week1": {
        "apple": "a fruit"
    },
    "week2": {
        "run": "to move fast"
    }
}"#;

fn week(n: u32) -> WeekId {
    WeekId::new(n).unwrap()
}

#[test]
fn two_correct_answers_reach_full_coverage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.json");
    fs::write(&path, TWO_WEEKS).unwrap();

    let store = DictionaryStore::load(&path).unwrap();
    let mut session = Session::new(store, week(2));
    assert_eq!(session.coverage().total(), 2);
    assert_eq!(session.coverage().coverage(0).unwrap(), 0.0);

    // Extra replies stay unread once coverage hits 100
    let mut prompt = Answers::new(&["", "yes", "", ""]);
    let mut rng = StdRng::seed_from_u64(2024);
    let summary = session.train(100.0, &mut prompt, &Silent, &mut rng).unwrap();

    assert_eq!(summary.asked, 2);
    assert_eq!(summary.coverage, 100.0);
    assert_eq!(prompt.replies.len(), 2);
    assert_eq!(prompt.shown.last(), Some(&Feedback::Finished { words_trained: 2 }));
}

#[test]
fn default_threshold_stops_before_every_word_is_known() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.json");
    fs::write(&path, TWO_WEEKS).unwrap();

    let mut session = Session::new(DictionaryStore::load(&path).unwrap(), week(2));
    let mut prompt = Answers::new(&["", "", ""]);
    let mut rng = StdRng::seed_from_u64(9);

    let summary = session.train(50.0, &mut prompt, &Silent, &mut rng).unwrap();
    assert_eq!(summary.asked, 1);
    assert_eq!(summary.known, 1);
}

#[test]
fn added_words_survive_shutdown() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.json");
    let store = DictionaryStore::load(&path).unwrap();
    let shutdown = Shutdown::new(store.clone());

    let mut session = Session::new(store, week(1));
    let mut prompt = TerminalPrompt::new(Cursor::new("laconic\nusing few words\n"), Vec::new());
    session.insert_words(&mut prompt, &Silent).unwrap();
    shutdown.persist().unwrap();

    let saved = read_dictionary(&path).unwrap();
    assert_eq!(
        saved.week(week(1)).and_then(|w| w.get("laconic")).map(String::as_str),
        Some("using few words")
    );
}

#[test]
fn interrupted_training_keeps_graded_answers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.json");
    fs::write(&path, TWO_WEEKS).unwrap();

    let store = DictionaryStore::load(&path).unwrap();
    let shutdown = Shutdown::new(store.clone());
    let mut session = Session::new(store, week(2));
    let mut prompt = Answers::new(&["y"]);
    let mut rng = StdRng::seed_from_u64(1);

    let result = session.train(100.0, &mut prompt, &Silent, &mut rng);
    assert!(matches!(result, Err(TutorError::Interrupted)));
    assert_eq!(session.coverage().known_count(), 1);

    shutdown.persist().unwrap();
    assert_eq!(read_dictionary(&path).unwrap(), session.store().snapshot());
}

#[test]
fn restore_from_missing_file_leaves_dictionary_alone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.json");
    fs::write(&path, TWO_WEEKS).unwrap();

    let store = DictionaryStore::load(&path).unwrap();
    let err = store.restore(Some(dir.path().join("missing.json").as_path())).unwrap_err();

    assert!(matches!(err, TutorError::Validation(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), TWO_WEEKS);
}
