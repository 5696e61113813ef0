use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use bikeshare_core::settings::{CityFiles, Settings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a `tracing` filter directive.
///
/// Unrecognised names pass through unchanged so `RUST_LOG`-style directives
/// such as `bikeshare_data=debug` still work.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr, or is appended to `log_file` when one is given so
/// log lines never interleave with the report on stdout.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let (stderr_layer, file_layer) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            (Some(layer), None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialised")?;

    Ok(())
}

// ── City config discovery ──────────────────────────────────────────────────────

/// Look for a city configuration file in the user's home directory.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. `~/.bikeshare/cities.json`
/// 2. `~/.config/bikeshare/cities.json`
pub fn discover_city_config() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let candidates = [
        home.join(".bikeshare").join("cities.json"),
        home.join(".config").join("bikeshare").join("cities.json"),
    ];
    candidates.into_iter().find(|p| p.is_file())
}

/// Build the city-to-file mapping for this run.
///
/// An explicit `--city-config` wins, then a discovered config file, then the
/// default file names under `--data-dir`.
pub fn resolve_city_files(settings: &Settings) -> anyhow::Result<CityFiles> {
    let config = settings.city_config.clone().or_else(discover_city_config);
    match config {
        Some(path) => {
            tracing::info!("Using city config {}", path.display());
            let files = CityFiles::from_json_file(&path, &settings.data_dir)
                .with_context(|| format!("invalid city config {}", path.display()))?;
            let cities: Vec<&str> = files.cities().map(|c| c.key()).collect();
            tracing::debug!("Configured cities: {}", cities.join(", "));
            Ok(files)
        }
        None => {
            tracing::debug!(
                "No city config found; using default files in {}",
                settings.data_dir.display()
            );
            Ok(CityFiles::with_defaults(&settings.data_dir))
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::City;
    use std::sync::Mutex as StdMutex;
    use tempfile::TempDir;

    // HOME is process-wide; tests that override it take this lock.
    static HOME_LOCK: StdMutex<()> = StdMutex::new(());

    fn with_home<T>(home: &Path, f: impl FnOnce() -> T) -> T {
        let _guard = HOME_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", home);

        let result = f();

        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }
        result
    }

    // ── level_directive ───────────────────────────────────────────────────────

    #[test]
    fn test_level_directive_maps_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("bikeshare_data=trace"), "bikeshare_data=trace");
    }

    // ── discover_city_config ──────────────────────────────────────────────────

    #[test]
    fn test_discover_city_config_returns_none_when_absent() {
        let tmp = TempDir::new().expect("tempdir");
        let path = with_home(tmp.path(), discover_city_config);
        assert!(path.is_none(), "should return None when neither file exists");
    }

    #[test]
    fn test_discover_city_config_finds_dot_bikeshare() {
        let tmp = TempDir::new().expect("tempdir");
        let dir = tmp.path().join(".bikeshare");
        std::fs::create_dir_all(&dir).expect("create config dir");
        let config = dir.join("cities.json");
        std::fs::write(&config, "{}").expect("write config");

        let path = with_home(tmp.path(), discover_city_config);
        assert_eq!(path, Some(config));
    }

    #[test]
    fn test_discover_city_config_finds_dot_config_bikeshare() {
        let tmp = TempDir::new().expect("tempdir");
        let dir = tmp.path().join(".config").join("bikeshare");
        std::fs::create_dir_all(&dir).expect("create config dir");
        let config = dir.join("cities.json");
        std::fs::write(&config, "{}").expect("write config");

        let path = with_home(tmp.path(), discover_city_config);
        assert_eq!(path, Some(config));
    }

    // ── resolve_city_files ────────────────────────────────────────────────────

    #[test]
    fn test_resolve_city_files_defaults_to_data_dir() {
        let tmp = TempDir::new().expect("tempdir");
        let data = tmp.path().join("data");
        let settings = Settings::load_from_args([
            "bikeshare",
            "--data-dir",
            data.to_str().unwrap(),
        ]);

        let files = with_home(tmp.path(), || resolve_city_files(&settings)).unwrap();
        assert_eq!(
            files.path_for(City::NewYorkCity).unwrap(),
            data.join("new_york_city.csv")
        );
    }

    #[test]
    fn test_resolve_city_files_explicit_config() {
        let tmp = TempDir::new().expect("tempdir");
        let config = tmp.path().join("mine.json");
        std::fs::write(&config, r#"{"cities": {"washington": "dc.csv"}}"#).expect("write config");
        let settings = Settings::load_from_args([
            "bikeshare",
            "--data-dir",
            "/srv/trips",
            "--city-config",
            config.to_str().unwrap(),
        ]);

        let files = with_home(tmp.path(), || resolve_city_files(&settings)).unwrap();
        assert_eq!(
            files.path_for(City::Washington).unwrap(),
            Path::new("/srv/trips/dc.csv")
        );
        assert!(files.path_for(City::Chicago).is_err());
    }

    #[test]
    fn test_resolve_city_files_invalid_config_is_an_error() {
        let tmp = TempDir::new().expect("tempdir");
        let config = tmp.path().join("broken.json");
        std::fs::write(&config, "not json").expect("write config");
        let settings = Settings::load_from_args([
            "bikeshare",
            "--city-config",
            config.to_str().unwrap(),
        ]);

        let err = with_home(tmp.path(), || resolve_city_files(&settings)).unwrap_err();
        assert!(err.to_string().contains("invalid city config"));
    }
}
