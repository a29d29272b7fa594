use std::{fs, path::Path, sync::Mutex};

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE: &str = "tunewire.log";

/// Logs go to a file in the data directory; stdout belongs to the shell.
pub fn initialize_logging(data_dir: &Path, filter: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)?;
    let log_file = fs::File::create(data_dir.join(LOG_FILE))?;

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(log_file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::try_new(filter)?);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}
