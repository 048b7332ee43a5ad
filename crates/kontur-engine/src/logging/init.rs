use std::sync::Once;

/// Logger configuration.
///
/// `filter` uses the `env_logger` directive syntax (e.g. "warn",
/// "kontur_engine=debug"); when absent, `RUST_LOG` wins, then a warn-level
/// default — the engine reserves `warn` for degradations worth seeing in
/// release tools.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub filter: Option<String>,
}

static INIT: Once = Once::new();

/// Installs the global logger once; later calls are no-ops.
///
/// Call early in `main`, before the first context is created, so broker and
/// contour degradation messages are not lost.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }

        builder.init();
        log::debug!("logging initialized");
    });
}
