//! The explore loop: select, load, report, page raw rows, restart.

use std::io::{BufRead, Write};

use anyhow::Result;
use bikeshare_core::formatting::DurationFormat;
use bikeshare_core::models::{FilterSelection, TripDataset};
use bikeshare_core::settings::{CityFiles, PresetSelection, Settings};
use bikeshare_data::analysis::load_and_analyze;
use bikeshare_data::pagination::{window_at, DEFAULT_WINDOW_SIZE};

use crate::prompt::Prompter;
use crate::render;

/// Behaviour switches taken from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Answers that skip their prompt on the first pass.
    pub preset: PresetSelection,
    /// One analysis pass, no raw-data or restart prompts.
    pub once: bool,
    pub page_size: usize,
    pub duration_format: DurationFormat,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            preset: PresetSelection::default(),
            once: false,
            page_size: DEFAULT_WINDOW_SIZE,
            duration_format: DurationFormat::default(),
        }
    }
}

impl SessionOptions {
    pub fn from_settings(settings: &Settings) -> bikeshare_core::Result<Self> {
        Ok(Self {
            preset: settings.preset_selection()?,
            once: settings.once,
            page_size: settings.page_size(),
            duration_format: settings.duration_format(),
        })
    }
}

pub struct Session<R, W> {
    prompter: Prompter<R, W>,
    files: CityFiles,
    options: SessionOptions,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(prompter: Prompter<R, W>, files: CityFiles, options: SessionOptions) -> Self {
        Self {
            prompter,
            files,
            options,
        }
    }

    /// Run until the analyst declines to restart or input closes.
    ///
    /// A load failure is shown and the selection asked for again. Under
    /// `once` it is returned instead.
    pub fn run(&mut self) -> Result<()> {
        writeln!(
            self.prompter.output(),
            "Hello! Let's explore some US bikeshare data!"
        )?;

        loop {
            let Some(selection) = self.select()? else {
                tracing::info!("Input closed; ending session");
                return Ok(());
            };
            render::rule(self.prompter.output())?;
            tracing::info!("Selected {}", selection);

            let dataset = match load_and_analyze(&self.files, &selection) {
                Ok((dataset, report)) => {
                    render::render_report(
                        self.prompter.output(),
                        &report,
                        self.options.duration_format,
                    )?;
                    dataset
                }
                Err(err) => {
                    tracing::error!(kind = ?err.kind(), "Failed to load {}: {}", selection, err);
                    if self.options.once {
                        return Err(err.into());
                    }
                    writeln!(self.prompter.output(), "\n{}", err)?;
                    continue;
                }
            };

            if self.options.once {
                return Ok(());
            }

            self.page_raw_data(&dataset)?;
            if !self.prompter.ask_yes_no("Would you like to restart?")? {
                return Ok(());
            }
        }
    }

    /// Resolve city, month and day, from presets first and then prompts.
    /// Presets are consumed on use so a restart asks afresh.
    fn select(&mut self) -> Result<Option<FilterSelection>> {
        let preset = std::mem::take(&mut self.options.preset);

        let city = match preset.city {
            Some(city) => city,
            None => match self.prompter.ask_city()? {
                Some(city) => city,
                None => return Ok(None),
            },
        };
        let month = match preset.month {
            Some(month) => month,
            None => match self.prompter.ask_month()? {
                Some(month) => month,
                None => return Ok(None),
            },
        };
        let day = match preset.day {
            Some(day) => day,
            None => match self.prompter.ask_day()? {
                Some(day) => day,
                None => return Ok(None),
            },
        };

        Ok(Some(FilterSelection { city, month, day }))
    }

    /// Offer raw rows one window at a time until declined or exhausted.
    fn page_raw_data(&mut self, dataset: &TripDataset) -> Result<()> {
        if !self
            .prompter
            .ask_yes_no("Would you like to see raw data?")?
        {
            return Ok(());
        }

        let mut cursor = 0;
        loop {
            let window = window_at(&dataset.trips, cursor, self.options.page_size);
            render::render_raw_window(self.prompter.output(), &window, dataset.columns)?;
            cursor = window.next_cursor;

            if window.is_last() {
                if !window.is_empty() {
                    writeln!(self.prompter.output(), "\nEnd of the selected trips.")?;
                }
                return Ok(());
            }
            if !self
                .prompter
                .ask_yes_no("Would you like to see more raw data?")?
            {
                return Ok(());
            }
        }
    }
}
