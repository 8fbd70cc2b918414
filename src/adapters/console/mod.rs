//! Console adapters - terminal and scripted operator input

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::domain::errors::DomainError;
use crate::ports::Console;

/// Interactive console on stdin/stdout
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for TerminalConsole {
    fn print(&mut self, line: &str) {
        println!("{}", line);
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok()?;

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(answer.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// Console answering from a pre-supplied queue, one answer per prompt.
///
/// Everything shown and asked is kept in a transcript.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Load answers from a file, one per line
    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::BadArgs(format!("Cannot read answers file {}: {}", path.display(), e))
        })?;
        Ok(Self::new(content.lines()))
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn print(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        let answer = self.answers.pop_front();
        self.transcript
            .push(format!("{}{}", prompt, answer.as_deref().unwrap_or_default()));
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_console_answers_in_order() {
        let mut console = ScriptedConsole::new(["0:1", ""]);
        assert_eq!(console.ask("first? ").as_deref(), Some("0:1"));
        assert_eq!(console.ask("second? ").as_deref(), Some(""));
        assert_eq!(console.ask("third? "), None);
        assert_eq!(console.transcript(), &["first? 0:1", "second? ", "third? "]);
    }

    #[test]
    fn test_scripted_console_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.txt");
        std::fs::write(&path, "0:0\n\ny\n").unwrap();
        let console = ScriptedConsole::from_file(&path).unwrap();
        assert_eq!(console.remaining(), 3);
    }
}
