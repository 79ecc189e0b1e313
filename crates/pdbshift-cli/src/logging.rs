use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    fmt::{self},
    prelude::*,
    registry::LookupSpan,
};

/// Crate prefix shared by the library and binary event targets.
const LOG_TARGET: &str = "pdbshift";

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let level = console_level(verbosity, quiet);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(level);

    let subscriber = tracing_subscriber::registry().with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(&path).map_err(CliError::Io)?;
        subscriber.with(file_layer(file, level)).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Level shown on stderr. `--quiet` silences the console entirely; failures still reach
/// the user through the exit message printed by `main`.
fn console_level(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// The log file keeps at least DEBUG detail regardless of console verbosity, and only for
/// pdbshift's own targets so dependency chatter stays out.
fn file_filter(console: LevelFilter) -> Targets {
    Targets::new().with_target(LOG_TARGET, console.max(LevelFilter::DEBUG))
}

fn file_layer<S>(file: File, console: LevelFilter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(file_filter(console))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, error, info, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    fn verbosity_flags_map_to_console_levels() {
        assert_eq!(console_level(0, false), LevelFilter::WARN);
        assert_eq!(console_level(1, false), LevelFilter::INFO);
        assert_eq!(console_level(2, false), LevelFilter::DEBUG);
        assert_eq!(console_level(7, false), LevelFilter::TRACE);
        assert_eq!(console_level(0, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn file_layer_records_level_and_thread() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let file = File::create(&log_path).unwrap();
        let subscriber =
            tracing_subscriber::registry().with(file_layer(file, console_level(0, false)));

        tracing::subscriber::with_default(subscriber, || {
            debug!(target: "pdbshift::core::io::pdb", "Read 12 ATOM records into 1 chains");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Read 12 ATOM records into 1 chains"));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("ThreadId"));
        assert!(content.contains("pdbshift::core::io::pdb"));
    }

    #[test]
    #[serial]
    fn file_layer_drops_foreign_targets_and_keeps_quiet_runs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("quiet.log");

        let file = File::create(&log_path).unwrap();
        let subscriber =
            tracing_subscriber::registry().with(file_layer(file, console_level(0, true)));

        tracing::subscriber::with_default(subscriber, || {
            warn!(target: "rayon_core::registry", "worker thread parked");
            info!(target: "pdbshift::commands::convert", "Converted 2 of 2 file(s)");
            trace!(target: "pdbshift::workflows::convert", "renaming cap hydrogens");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Converted 2 of 2 file(s)"));
        assert!(!content.contains("worker thread parked"));
        assert!(!content.contains("renaming cap hydrogens"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let invalid_path = temp_dir.path().join("missing").join("run.log");

        let result = setup_logging(0, false, Some(invalid_path));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
