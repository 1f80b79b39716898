use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs append to `path`; if it cannot be opened they go to stderr.
/// stdout is never written to, it belongs to the launcher JSON.
pub fn init(path: &Path, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    let file = path
        .parent()
        .map(std::fs::create_dir_all)
        .transpose()
        .and_then(|_| OpenOptions::new().create(true).append(true).open(path));
    // A second init in the same process keeps the first subscriber.
    let _ = match file {
        Ok(f) => builder.with_writer(Mutex::new(f)).try_init(),
        Err(e) => {
            let res = builder.with_writer(std::io::stderr).try_init();
            tracing::warn!(path = %path.display(), error = %e, "log file unavailable, logging to stderr");
            res
        }
    };
}
