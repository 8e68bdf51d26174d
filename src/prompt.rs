//! Console confirmation.

use std::io::{self, BufRead, Write};

use pag_off_lib::{Confirm, Ticket};

use crate::format::format_ticket;

/// `true` for `y`/`yes` in any case.
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prints the pending ticket, asks, and reads one answer line.
///
/// End of input counts as "no".
pub struct ConsoleConfirm<R, W> {
    input: R,
    output: W,
}

impl ConsoleConfirm<io::StdinLock<'static>, io::Stdout> {
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleConfirm<R, W> {
    #[must_use]
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, ticket: &Ticket, prompt: &str) -> io::Result<bool> {
        writeln!(self.output, "{}", format_ticket(ticket))?;
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            writeln!(self.output)?;
            return Ok(false);
        }
        Ok(is_yes(&answer))
    }
}

impl<R: BufRead, W: Write> Confirm for ConsoleConfirm<R, W> {
    fn confirm(&mut self, ticket: &Ticket, prompt: &str) -> pag_off_lib::Result<bool> {
        Ok(self.ask(ticket, prompt)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(input: &str) -> (bool, String) {
        let ticket = Ticket {
            id: 3,
            title: "Typo".to_string(),
            ..Default::default()
        };
        let mut output = Vec::new();
        let answer = ConsoleConfirm::new(input.as_bytes(), &mut output)
            .confirm(&ticket, "Confirm comment [y/N]: ")
            .unwrap();
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_is_yes() {
        for yes in ["y", "Y", "yes", "YES", " yes\n"] {
            assert!(is_yes(yes), "{yes:?}");
        }
        for no in ["", "n", "no", "yep", "y e s"] {
            assert!(!is_yes(no), "{no:?}");
        }
    }

    #[test]
    fn test_confirm_shows_ticket_then_prompt() {
        let (answer, output) = ask("y\n");
        assert!(answer);
        assert!(output.starts_with("#3: Typo\n"));
        assert!(output.ends_with("Confirm comment [y/N]: "));
    }

    #[test]
    fn test_confirm_declines_on_no_and_eof() {
        assert!(!ask("n\n").0);
        assert!(!ask("").0);
    }
}
