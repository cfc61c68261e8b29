//! Line-based terminal prompt with colored feedback

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;

use crate::session::{Feedback, Prompt};

/// Render one piece of session feedback for the terminal
pub fn render_feedback(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Correct { meaning } => {
            format!("{}{}", "Correct. It's: ".bold(), meaning.as_str().red())
        }
        Feedback::Peek { meaning } => {
            format!("{}{}", "It means ".bold(), meaning.as_str().red())
        }
        Feedback::KnewIt => "Perfect!".grey().to_string(),
        Feedback::Later => "OK, we'll come back to this one later...".grey().to_string(),
        Feedback::Wrong { meaning } => format!(
            "{}{}{}",
            "NOPE! ".bold(),
            "It means ".grey(),
            meaning.as_str().red()
        ),
        Feedback::Added { word, week } => {
            format!("{} {} {}", word.as_str().blue(), "added to".grey(), week)
        }
        Feedback::Rejected(message) => message.as_str().yellow().to_string(),
        Feedback::Found { word, meaning } => {
            format!("{}{}{}", word.as_str().blue(), " => ".bold(), meaning.as_str().red())
        }
        Feedback::Suggestions(words) => {
            let words = words.join(", ");
            format!("{} {}", "Did you mean:".grey(), words.as_str().blue())
        }
        Feedback::NoMatch(query) => format!("{} {}", "No word like".grey(), query.as_str().blue()),
        Feedback::Finished { words_trained } => format!(
            "Congratulations, you have trained on {} different words",
            words_trained.to_string().as_str().red()
        ),
    }
}

/// Prompt reading answers line by line
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        let label = format!("{}:", label.trim_end_matches(':'));
        write!(self.output, "{} ", label.as_str().blue())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\n', '\r']);
        Ok(Some(answer.to_string()))
    }

    fn show(&mut self, feedback: &Feedback) {
        // A broken stdout leaves nothing useful to report to
        let _ = writeln!(self.output, "{}", render_feedback(feedback));
    }
}
