use std::fmt::Display;
use std::io::{self, BufRead, Write};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

use crate::error::{DescriptorError, Result};

/// Parse a 1-based menu choice.
///
/// Accepts only an unsigned decimal literal in `1..=bound` (surrounding
/// whitespace ignored) and returns it; anything else is `None`.
pub fn validate_choice(input: &str, bound: usize) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: usize = input.parse().ok()?;
    (1..=bound).contains(&value).then_some(value)
}

/// The questions a descriptor session asks.
///
/// Every question blocks until an acceptable answer is given. Invalid
/// answers are re-asked; a question only fails when the input is closed
/// ([`DescriptorError::InputClosed`]) or the terminal breaks.
pub trait Interact {
    /// Print one line of output.
    fn say(&mut self, line: impl Display) -> Result<()>;

    /// Free text with surrounding whitespace trimmed.
    fn text(&mut self, question: &str) -> Result<String>;

    /// Free text exactly as typed, minus the line terminator.
    fn verbatim(&mut self, question: &str) -> Result<String>;

    /// A yes/no question.
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// A 1-based choice in `1..=bound`.
    fn choose(&mut self, question: &str, bound: usize) -> Result<usize>;
}

/// Prompts on the process terminal.
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn input(&self, question: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(question.trim())
            .allow_empty(true)
            .interact_text()
            .map_err(dialog_error)
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Interact for TerminalPrompt {
    fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(io::stdout(), "{line}")?;
        Ok(())
    }

    fn text(&mut self, question: &str) -> Result<String> {
        Ok(self.input(question)?.trim().to_owned())
    }

    fn verbatim(&mut self, question: &str) -> Result<String> {
        self.input(question)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(question.trim())
            .wait_for_newline(true)
            .interact()
            .map_err(dialog_error)
    }

    fn choose(&mut self, question: &str, bound: usize) -> Result<usize> {
        loop {
            let answer = Input::<String>::with_theme(&self.theme)
                .with_prompt(format!("{} [1 - {bound}]", question.trim()))
                .validate_with(move |input: &String| match validate_choice(input, bound) {
                    Some(_) => Ok(()),
                    None => Err(format!("ERROR! The value must be between 1 - {bound}")),
                })
                .interact_text()
                .map_err(dialog_error)?;
            if let Some(choice) = validate_choice(&answer, bound) {
                return Ok(choice);
            }
        }
    }
}

fn dialog_error(err: dialoguer::Error) -> DescriptorError {
    let dialoguer::Error::IO(err) = err;
    if err.kind() == io::ErrorKind::UnexpectedEof {
        DescriptorError::InputClosed
    } else {
        DescriptorError::Terminal(err)
    }
}

/// Line-oriented prompt over any reader/writer pair.
///
/// Used to script sessions; every question and error message is written to
/// the output so a transcript can be inspected afterwards.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompt and return its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "\n{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DescriptorError::InputClosed);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

impl<R: BufRead, W: Write> Interact for Prompt<R, W> {
    fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn text(&mut self, question: &str) -> Result<String> {
        Ok(self.ask(question)?.trim().to_owned())
    }

    fn verbatim(&mut self, question: &str) -> Result<String> {
        self.ask(question)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            match self.ask(&format!("{question} [y/n]: "))?.trim() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => self.say("\nERROR! The value must be 'y' or 'n'")?,
            }
        }
    }

    fn choose(&mut self, question: &str, bound: usize) -> Result<usize> {
        loop {
            let answer = self.ask(&format!("{question} [1 - {bound}]: "))?;
            match validate_choice(&answer, bound) {
                Some(choice) => return Ok(choice),
                None => self.say(format!("\nERROR! The value must be between 1 - {bound}"))?,
            }
        }
    }
}

/// A prompt reading scripted answers, for tests.
#[cfg(test)]
pub(crate) fn scripted(answers: &[&str]) -> Prompt<io::Cursor<Vec<u8>>, Vec<u8>> {
    let mut input = answers.join("\n");
    input.push('\n');
    Prompt::new(io::Cursor::new(input.into_bytes()), Vec::new())
}
