//! Line-Oriented Operator Console
//!
//! Wraps an input reader and two writers (normal output and errors) so the
//! session can be driven by a terminal or by a scripted buffer in tests.
//!
//! Prompts are written without a trailing newline and flushed before reading.
//! Numeric fields are parsed once; a bad value is an `InvalidInput` error
//! except at the main menu, where [`Console::read_choice`] re-prompts.

use std::io::{BufRead, Write};

use crate::error::{Result, ShopError};

/// Operator console over arbitrary reader/writers
pub struct Console<R, O, E> {
    input: R,
    out: O,
    err: E,
}

impl<R, O, E> Console<R, O, E>
where
    R: BufRead,
    O: Write,
    E: Write,
{
    /// Create a console from an input reader, an output writer and an error writer
    pub const fn new(input: R, out: O, err: E) -> Self {
        Self { input, out, err }
    }

    /// Split the console back into its parts
    pub fn into_parts(self) -> (R, O, E) {
        (self.input, self.out, self.err)
    }

    /// Mutable access to the output writer
    pub fn out(&mut self) -> &mut O {
        &mut self.out
    }

    /// Write a line to the output
    pub fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.out, "{}", line.as_ref())?;
        self.out.flush()?;
        Ok(())
    }

    /// Write text to the output without a newline
    pub fn print(&mut self, text: impl AsRef<str>) -> Result<()> {
        write!(self.out, "{}", text.as_ref())?;
        self.out.flush()?;
        Ok(())
    }

    /// Write a handler failure to the error stream
    pub fn report_error(&mut self, error: &ShopError) {
        // Nothing sensible to do if stderr itself is gone
        let _ = writeln!(self.err, "Error: {}", error.message());
        let _ = self.err.flush();
    }

    /// Read one line, stripped of its line terminator
    ///
    /// Bytes that are not UTF-8 become U+FFFD instead of failing the read.
    pub fn read_line(&mut self) -> Result<String> {
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Err(ShopError::EndOfInput);
        }

        let mut line = String::from_utf8_lossy(&raw).into_owned();
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Print a prompt and read the answer
    pub fn prompt(&mut self, text: &str) -> Result<String> {
        self.print(text)?;
        self.read_line()
    }

    /// Print a prompt and parse the answer as an integer
    pub fn prompt_int(&mut self, text: &str) -> Result<i32> {
        let answer = self.prompt(text)?;
        parse_int(&answer)
    }

    /// Print a yes/no prompt; only `y` or `Y` counts as yes
    pub fn confirm(&mut self, text: &str) -> Result<bool> {
        let answer = self.prompt(text)?;
        Ok(matches!(answer.trim(), "y" | "Y"))
    }

    /// Read a menu choice, re-prompting until the input is a number
    pub fn read_choice(&mut self) -> Result<i32> {
        loop {
            let answer = self.prompt("Please make your choice: ")?;
            match parse_int(&answer) {
                Ok(choice) => return Ok(choice),
                Err(_) => self.say("Your input is invalid!")?,
            }
        }
    }
}

/// Parse an integer field, ignoring surrounding whitespace
pub fn parse_int(text: &str) -> Result<i32> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| ShopError::invalid_input(format!("'{}' is not a valid number", text.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    type TestConsole = Console<Cursor<Vec<u8>>, Vec<u8>, Vec<u8>>;

    fn console(input: &str) -> TestConsole {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), Vec::new())
    }

    fn output(console: TestConsole) -> (String, String) {
        let (_, out, err) = console.into_parts();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_prompt_strips_line_endings_only() {
        let mut c = console("  Jane Doe \r\n");
        assert_eq!(c.prompt("Name: ").unwrap(), "  Jane Doe ");
        let (out, _) = output(c);
        assert_eq!(out, "Name: ");
    }

    #[test]
    fn test_prompt_int_parses_trimmed_value() {
        let mut c = console(" 42 \n");
        assert_eq!(c.prompt_int("Years: ").unwrap(), 42);
    }

    #[test]
    fn test_prompt_int_rejects_garbage_without_reprompt() {
        let mut c = console("ten\n7\n");
        let err = c.prompt_int("Years: ").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.message().contains("'ten'"));
        // The next line is left for whoever reads next
        assert_eq!(c.read_line().unwrap(), "7");
    }

    #[test]
    fn test_read_choice_reprompts_on_invalid_input() {
        let mut c = console("abc\n\n5\n");
        assert_eq!(c.read_choice().unwrap(), 5);
        let (out, _) = output(c);
        assert_eq!(out.matches("Your input is invalid!").count(), 2);
        assert_eq!(out.matches("Please make your choice: ").count(), 3);
    }

    #[test]
    fn test_read_line_tolerates_invalid_utf8() {
        let mut c = Console::new(Cursor::new(b"Jo\xffe\n".to_vec()), Vec::new(), Vec::new());
        assert_eq!(c.read_line().unwrap(), "Jo\u{FFFD}e");
    }

    #[test]
    fn test_end_of_input() {
        let mut c = console("");
        assert!(matches!(c.read_line(), Err(ShopError::EndOfInput)));
        assert!(matches!(c.read_choice(), Err(ShopError::EndOfInput)));
    }

    #[test]
    fn test_confirm() {
        let mut c = console("Y\nn\nyes\n");
        assert!(c.confirm("Add? ").unwrap());
        assert!(!c.confirm("Add? ").unwrap());
        assert!(!c.confirm("Add? ").unwrap());
    }

    #[test]
    fn test_report_error_goes_to_error_stream() {
        let mut c = console("");
        c.report_error(&ShopError::rejected("Mechanic ID does not exist."));
        let (out, err) = output(c);
        assert!(out.is_empty());
        assert_eq!(err, "Error: Mechanic ID does not exist.\n");
    }
}
