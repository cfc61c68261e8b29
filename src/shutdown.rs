//! Shutdown coordination - every way out of a run persists through one guard
//!
//! A normal end, closed input, a fault inside a loop and Ctrl+C/SIGTERM all
//! reach [`Shutdown::persist`], which saves the dictionary at most once.

use std::panic::{self, AssertUnwindSafe};

use log::{error, info};
use parking_lot::Mutex;

use crate::dictionary::DictionaryStore;
use crate::error::{Result, TutorError};

/// Persists the dictionary exactly once per run
#[derive(Debug)]
pub struct Shutdown {
    store: DictionaryStore,
    /// `Some(saved)` once persisting has been attempted
    outcome: Mutex<Option<bool>>,
}

impl Shutdown {
    pub fn new(store: DictionaryStore) -> Self {
        Self {
            store,
            outcome: Mutex::new(None),
        }
    }

    /// Save the dictionary if no one has yet.
    ///
    /// A second caller waits for the first to finish and gets its outcome
    /// instead of saving again.
    pub fn persist(&self) -> Result<()> {
        let mut outcome = self.outcome.lock();
        match *outcome {
            Some(true) => return Ok(()),
            Some(false) => return Err(TutorError::ShutdownFailed),
            None => {}
        }

        let result = self.store.save();
        *outcome = Some(result.is_ok());
        match &result {
            Ok(()) => info!("Shutdown: dictionary persisted to {}", self.store.path().display()),
            Err(e) => error!("Shutdown: could not persist dictionary: {}", e),
        }
        result
    }

    /// Run an interactive loop, then persist whatever it recorded.
    ///
    /// A loop that errors or panics still gets its progress saved. Closed
    /// input counts as a normal end.
    pub fn finish<F: FnOnce() -> Result<()>>(&self, run: F) -> Finished {
        let failure = match panic::catch_unwind(AssertUnwindSafe(run)) {
            Ok(Ok(())) | Ok(Err(TutorError::Interrupted)) => None,
            Ok(Err(e)) => {
                error!("Session ended with an error: {}", e);
                Some(RunFailure::Error(e))
            }
            Err(_) => {
                error!("Session panicked, saving progress before exiting");
                Some(RunFailure::Panic)
            }
        };

        Finished {
            failure,
            saved: self.persist(),
        }
    }

    /// Exit code for the process once `persist` has returned
    pub fn exit_code(result: &Result<()>) -> i32 {
        if result.is_ok() {
            0
        } else {
            1
        }
    }
}

/// Why an interactive loop did not end normally
#[derive(Debug)]
pub enum RunFailure {
    Error(TutorError),
    Panic,
}

/// Result of [`Shutdown::finish`]
#[derive(Debug)]
pub struct Finished {
    pub failure: Option<RunFailure>,
    pub saved: Result<()>,
}

impl Finished {
    pub fn exit_code(&self) -> i32 {
        if self.failure.is_some() {
            1
        } else {
            Shutdown::exit_code(&self.saved)
        }
    }
}
