mod bootstrap;
mod prompt;
mod render;
mod session;

use std::io;

use anyhow::Result;
use bikeshare_core::settings::Settings;

use crate::prompt::Prompter;
use crate::session::{Session, SessionOptions};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("Bikeshare explorer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Data dir: {}, page size: {}, durations: {}",
        settings.data_dir.display(),
        settings.page_size,
        settings.duration_format
    );

    let options = SessionOptions::from_settings(&settings)?;
    let files = bootstrap::resolve_city_files(&settings)?;

    let prompter = Prompter::new(io::stdin().lock(), io::stdout());
    Session::new(prompter, files, options).run()
}
