//! Interactive filter prompts.
//!
//! A thin retry loop over the validation functions in `bikeshare-core`:
//! each question repeats until the answer parses. End of input yields
//! `Ok(None)` so the session can stop instead of spinning.

use std::io::{self, BufRead, Write};

use bikeshare_core::error::Result as CoreResult;
use bikeshare_core::models::{parse_yes_no, City, DayFilter, MonthFilter};

pub const CITY_QUESTION: &str =
    "\nWould you like to see data for Chicago, New York City or Washington?\n";
pub const MONTH_QUESTION: &str =
    "\nWhich month would you like to see: January, February, March, April, May, June or All?\n";
pub const DAY_QUESTION: &str = "\nWhich day would you like to see: Monday, Tuesday, Wednesday, \
     Thursday, Friday, Saturday, Sunday or All?\n";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask `question` until `parse` accepts the answer.
    ///
    /// Rejected answers print the validation message and re-ask.
    pub fn ask<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> CoreResult<T>,
    ) -> io::Result<Option<T>> {
        loop {
            write!(self.output, "{}", question)?;
            self.output.flush()?;

            let mut raw = Vec::new();
            if self.input.read_until(b'\n', &mut raw)? == 0 {
                tracing::debug!("Input closed while prompting");
                return Ok(None);
            }
            let Ok(line) = String::from_utf8(raw) else {
                tracing::debug!("Rejected answer that is not valid UTF-8");
                writeln!(self.output, "Input is not valid text; please try again.")?;
                continue;
            };

            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => {
                    tracing::debug!("Rejected answer {:?}: {}", line.trim(), err);
                    writeln!(self.output, "{}", err)?;
                }
            }
        }
    }

    pub fn ask_city(&mut self) -> io::Result<Option<City>> {
        self.ask(CITY_QUESTION, str::parse::<City>)
    }

    pub fn ask_month(&mut self) -> io::Result<Option<MonthFilter>> {
        self.ask(MONTH_QUESTION, str::parse::<MonthFilter>)
    }

    pub fn ask_day(&mut self) -> io::Result<Option<DayFilter>> {
        self.ask(DAY_QUESTION, str::parse::<DayFilter>)
    }

    /// Yes/no question. Closed input counts as "no".
    pub fn ask_yes_no(&mut self, question: &str) -> io::Result<bool> {
        let question = format!("\n{} Enter yes or no.\n", question);
        Ok(self.ask(&question, parse_yes_no)?.unwrap_or(false))
    }

    /// Output sink shared with the report renderer.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}
