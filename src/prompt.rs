//! Terminal prompts for values not given on the command line.

use std::io::{self, BufRead, Write};
use tracing::warn;

use crate::checker::SortMode;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Print `question` and read one trimmed line.
    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// Ask until a non-empty keyword is entered.
    pub fn keyword(&mut self) -> io::Result<String> {
        loop {
            let keyword = self.ask("Search keyword: ")?;
            if !keyword.is_empty() {
                return Ok(keyword);
            }
        }
    }

    pub fn count(&mut self, default: usize) -> io::Result<usize> {
        let answer = self.ask(&format!(
            "Number of repositories to check (default: {}): ",
            default
        ))?;
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<usize>() {
            Ok(count) => Ok(count),
            Err(_) => {
                warn!("'{}' is not a number, using {}", answer, default);
                Ok(default)
            }
        }
    }

    pub fn sort(&mut self) -> io::Result<SortMode> {
        writeln!(self.output, "\nSort results by:")?;
        writeln!(self.output, "1. Stars (default)")?;
        writeln!(self.output, "2. Forks")?;
        writeln!(self.output, "3. Recently updated")?;
        writeln!(self.output, "4. Best match")?;

        let answer = self.ask("Choice (1-4): ")?;
        Ok(SortMode::from_menu_choice(&answer).unwrap_or_default())
    }

    /// Ask whether to run the browser without a window; anything but `n` means yes.
    pub fn headless(&mut self) -> io::Result<bool> {
        let answer = self.ask("\nRun the browser headless? (Y/n): ")?;
        Ok(!answer.eq_ignore_ascii_case("n"))
    }

    /// Ask whether to save the report; anything but `y` means no.
    ///
    /// Closed input also means no, since the results are already shown.
    pub fn confirm_save(&mut self, path: &str) -> io::Result<bool> {
        match self.ask(&format!("\nSave results to {}? (y/N): ", path)) {
            Ok(answer) => Ok(answer.eq_ignore_ascii_case("y")),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn keyword_skips_blank_lines() {
        let mut p = prompter("\n  \nweb scraper\n");
        assert_eq!(p.keyword().unwrap(), "web scraper");
    }

    #[test]
    fn keyword_fails_on_closed_input() {
        let mut p = prompter("");
        let err = p.keyword().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn count_defaults() {
        assert_eq!(prompter("\n").count(10).unwrap(), 10);
        assert_eq!(prompter("25\n").count(10).unwrap(), 25);
        assert_eq!(prompter("many\n").count(10).unwrap(), 10);
    }

    #[test]
    fn sort_menu() {
        assert_eq!(prompter("\n").sort().unwrap(), SortMode::Stars);
        assert_eq!(prompter("3\n").sort().unwrap(), SortMode::Updated);
        assert_eq!(prompter("9\n").sort().unwrap(), SortMode::Stars);

        let mut p = prompter("2\n");
        p.sort().unwrap();
        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("4. Best match"));
    }

    #[test]
    fn save_confirmation() {
        assert!(prompter("y\n").confirm_save("out.json").unwrap());
        assert!(prompter("Y\n").confirm_save("out.json").unwrap());
        assert!(!prompter("\n").confirm_save("out.json").unwrap());
        assert!(!prompter("yes\n").confirm_save("out.json").unwrap());
    }

    #[test]
    fn save_confirmation_on_closed_input_is_no() {
        assert!(!prompter("").confirm_save("out.json").unwrap());
    }

    #[test]
    fn headless_defaults_to_yes() {
        assert!(prompter("\n").headless().unwrap());
        assert!(prompter("y\n").headless().unwrap());
        assert!(!prompter("N\n").headless().unwrap());
    }
}
