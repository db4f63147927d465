use crate::data::{Error, SIGNIFICANT_DIGITS};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Line-oriented prompts over an input/output pair. Reads never fail on malformed text:
/// the parsing helpers return `None` instead and let the caller ask again. The only
/// errors are I/O failures and the input running dry (`Error::InputClosed`).
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: &str) -> Result<(), Error> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Prints `prompt` and returns the next line, trimmed.
    pub fn line(&mut self, prompt: &str) -> Result<String, Error> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(buf.trim().to_owned())
    }

    pub fn integer(&mut self, prompt: &str) -> Result<Option<i64>, Error> {
        Ok(self.line(prompt)?.parse().ok())
    }

    /// A decimal amount, rounded to cents. Values too large to carry cents are malformed.
    pub fn amount(&mut self, prompt: &str) -> Result<Option<Decimal>, Error> {
        let answer = self.line(prompt)?;
        Ok(Decimal::from_str(&answer)
            .ok()
            .map(|mut amount| {
                amount.rescale(SIGNIFICANT_DIGITS);
                amount
            })
            .filter(|amount| amount.scale() == SIGNIFICANT_DIGITS))
    }

    /// Only a lone `y` or `Y` counts as a yes.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, Error> {
        Ok(self.line(prompt)?.eq_ignore_ascii_case("y"))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
