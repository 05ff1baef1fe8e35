use std::sync::Once;

/// Settings for the process-wide logger.
///
/// `env_filter` follows `env_logger` filter syntax (e.g. "info",
/// "scrawl_engine=debug,wgpu=warn") and wins over everything else when set.
/// `verbose` raises the default level to debug; `RUST_LOG` still takes
/// precedence so a targeted filter from the environment is not clobbered.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub verbose: bool,
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are no-ops.
///
/// Intended usage is early in `main`, before any window or GPU work that
/// might want to log.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else if config.verbose {
            builder.filter_level(log::LevelFilter::Debug);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();
        log::debug!("logging initialized");
    });
}
