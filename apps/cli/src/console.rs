//! Line-oriented terminal I/O for the interactive flows.
//! Generic over reader and writer so tests can drive it with byte buffers.

use std::io::{BufRead, Write};

use crate::errors::AppError;

const STDIN: &str = "<stdin>";
const STDOUT: &str = "<stdout>";

pub struct Console<R, W> {
    input: R,
    output: W,
}

pub fn stdio() -> Console<std::io::StdinLock<'static>, std::io::Stdout> {
    Console::new(std::io::stdin().lock(), std::io::stdout())
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: impl AsRef<str>) -> Result<(), AppError> {
        writeln!(self.output, "{}", text.as_ref()).map_err(|e| AppError::io(STDOUT, e))
    }

    /// Prints `label: ` and returns the trimmed answer. End of input cancels.
    pub fn ask(&mut self, label: &str) -> Result<String, AppError> {
        write!(self.output, "{label}: ")
            .and_then(|_| self.output.flush())
            .map_err(|e| AppError::io(STDOUT, e))?;
        match self.read_line()? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(AppError::Cancelled("input closed".to_string())),
        }
    }

    /// Yes/no question. An empty answer takes the default; anything
    /// unrecognized is asked again.
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool, AppError> {
        let choices = if default { "Y/n" } else { "y/N" };
        loop {
            let answer = self.ask(&format!("{question} [{choices}]"))?;
            match answer.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer 'y' or 'n'.")?,
            }
        }
    }

    /// Reads a multi-line block ending after `blank_run` consecutive blank
    /// lines or at end of input. Interior single blank lines are kept.
    pub fn read_block(&mut self, blank_run: usize) -> Result<String, AppError> {
        let mut lines: Vec<String> = Vec::new();
        let mut blanks = 0;

        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() {
                blanks += 1;
                if blanks >= blank_run {
                    break;
                }
            } else {
                lines.extend(std::iter::repeat(String::new()).take(blanks));
                blanks = 0;
                lines.push(line.trim_end().to_string());
            }
        }

        Ok(lines.join("\n").trim().to_string())
    }

    fn read_line(&mut self) -> Result<Option<String>, AppError> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| AppError::io(STDIN, e))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
