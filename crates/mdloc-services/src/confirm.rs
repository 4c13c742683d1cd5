use crate::Result;
use std::io::{BufRead, Write};

/// Asked once before any write happens. Anything but an explicit yes means no.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// `y` / `yes`, any case, surrounding whitespace ignored.
pub fn is_affirmative(answer: &str) -> bool {
    let a = answer.trim();
    a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")
}

/// Pre-supplied approval for non-interactive runs (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        tracing::debug!(event = "confirm_assumed", prompt = prompt);
        Ok(true)
    }
}

/// Prints the prompt and reads a single line of input. End of input declines.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl PromptConfirm<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr so stdout stays clean for machine-readable reports.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut answer = String::new();
        let read = self.input.read_line(&mut answer)?;
        let yes = read > 0 && is_affirmative(&answer);
        tracing::debug!(event = "confirm_answer", answer = %answer.trim(), accepted = yes);
        Ok(yes)
    }
}
