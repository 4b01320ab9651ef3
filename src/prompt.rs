//! Line-oriented interactive prompts.
//!
//! Every prompt writes its message, reads one line and loops until the
//! answer is acceptable. Invalid answers print a short notice and ask
//! again. End of input is reported as [`PromptError::Closed`] so a closed
//! stdin cannot spin a prompt forever.

use std::io::{self, BufRead, Write};
use std::sync::LazyLock;

use regex::Regex;

/// Whitespace-separated ASCII digits, at least one character.
static ORDINALS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s0-9]+$").expect("ordinal pattern is valid"));

/// Notice printed when an answer matches none of the options.
pub const WRONG_OPTION: &str = "\nWrong option\n";
/// Notice printed when ordinal input contains anything but digits and spaces.
pub const WRONG_FORMAT: &str = "\nWrong format\n";

/// Errors raised while prompting.
#[derive(thiserror::Error, Debug)]
pub enum PromptError {
    /// Input ended before an answer was given.
    #[error("input closed while waiting for an answer")]
    Closed,

    /// Reading the answer or writing the prompt failed.
    #[error("prompt I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Asks questions on `output` and reads answers from `input`.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Output stream, for writing listings between prompts.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Give back the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Print `message` and return the next line without its terminator.
    ///
    /// Any answer is accepted, including an empty line.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::Closed` at end of input.
    pub fn ask(&mut self, message: &str) -> Result<String, PromptError> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Ask until the answer is exactly one of the option labels, then
    /// return the value paired with it.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::Closed` at end of input.
    pub fn choose<T: Copy>(&mut self, message: &str, options: &[(&str, T)]) -> Result<T, PromptError> {
        loop {
            let answer = self.ask(message)?;
            if let Some((_, value)) = options.iter().find(|(label, _)| *label == answer) {
                return Ok(*value);
            }

            log::debug!("Rejected answer {:?}", answer);
            writeln!(self.output, "{WRONG_OPTION}")?;
            if let Some(label) = closest_option(&answer, options.iter().map(|(label, _)| *label)) {
                writeln!(self.output, "Did you mean '{label}'?")?;
            }
        }
    }

    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::Closed` at end of input.
    pub fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        self.choose(message, &[("yes", true), ("no", false)])
    }

    /// Ask for whitespace-separated ordinals until the line contains only
    /// digits and whitespace.
    ///
    /// A whitespace-only line yields an empty list. Numbers too large for
    /// `usize` come back as `usize::MAX`, which no listing can reach.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::Closed` at end of input.
    pub fn read_ordinals(&mut self, message: &str) -> Result<Vec<usize>, PromptError> {
        loop {
            let answer = self.ask(message)?;
            if let Some(ordinals) = parse_ordinals(&answer) {
                return Ok(ordinals);
            }
            writeln!(self.output, "{WRONG_FORMAT}")?;
        }
    }

    fn read_line(&mut self) -> Result<String, PromptError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}

/// Parse ordinal input, or `None` if it is not digits and whitespace.
#[must_use]
pub fn parse_ordinals(input: &str) -> Option<Vec<usize>> {
    if !ORDINALS_RE.is_match(input) {
        return None;
    }
    Some(
        input
            .split_whitespace()
            .map(|token| token.parse().unwrap_or(usize::MAX))
            .collect(),
    )
}

/// Suggest an option when the answer is a near miss, like "Yes" or "yse".
fn closest_option<'a>(answer: &str, options: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return None;
    }
    options
        .map(|label| (label, strsim::jaro_winkler(&answer, label)))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(label, _)| label)
}
