//! Yes/no confirmation before a run.

use std::io::{self, BufRead, Write};

/// Asks the operator whether to go ahead.
pub trait Confirmation {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Prompts on a writer and reads one line of answer from a reader.
///
/// Only `y` (any case, surrounding whitespace ignored) counts as yes; end of
/// input counts as no.
pub struct PromptConfirmation<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirmation<R, W> {
    /// Reads answers from `input` and writes the question to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptConfirmation<io::StdinLock<'static>, Box<dyn Write>> {
    /// Answer from stdin; prompt on stdout, or on stderr when stdout is
    /// reserved for machine-readable output.
    pub fn stdio(prompt_on_stderr: bool) -> Self {
        let output: Box<dyn Write> = if prompt_on_stderr {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };
        Self::new(io::stdin().lock(), output)
    }
}

impl<R: BufRead, W: Write> Confirmation for PromptConfirmation<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{} (y/n): ", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

/// Answers yes without asking, for `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&mut self, _question: &str) -> io::Result<bool> {
        Ok(true)
    }
}
