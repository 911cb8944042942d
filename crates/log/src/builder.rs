//! Subscriber construction

use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the logger alive
///
/// For a thread-scoped logger the subscriber is uninstalled when the guard
/// drops. The global logger stays installed for the life of the process.
#[derive(Debug)]
pub struct LoggerGuard {
    scoped: Option<tracing::dispatcher::DefaultGuard>,
}

impl LoggerGuard {
    /// Whether this guard uninstalls its subscriber on drop.
    pub fn is_scoped(&self) -> bool {
        self.scoped.is_some()
    }
}

/// Build the fmt layer for one format with the shared display options.
macro_rules! fmt_layer {
    ($display:expr, $($format:tt)+) => {{
        let display = $display;
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(display.colors)
            .with_target(display.target)
            .with_file(display.source)
            .with_line_number(display.source)
            .$($format)+;
        if display.time {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        }
    }};
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// The configuration this builder will install.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build and install the logger as the global default.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the filter string cannot be parsed
    /// - a global subscriber is already installed
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = self.filter()?;
        Registry::default()
            .with(self.fmt_layer())
            .with(filter)
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

        Ok(LoggerGuard { scoped: None })
    }

    /// Build the logger and install it for the current thread only.
    ///
    /// # Errors
    ///
    /// Returns error if the filter string cannot be parsed.
    pub fn build_scoped(self) -> LogResult<LoggerGuard> {
        let filter = self.filter()?;
        let subscriber = Registry::default().with(self.fmt_layer()).with(filter);
        let guard = tracing::subscriber::set_default(subscriber);

        Ok(LoggerGuard {
            scoped: Some(guard),
        })
    }

    fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level).map_err(|e| LogError::Filter {
            filter: self.config.level.clone(),
            reason: e.to_string(),
        })
    }

    fn fmt_layer(&self) -> BoxedLayer {
        let display = &self.config.display;
        match self.config.format {
            Format::Pretty => fmt_layer!(display, pretty()),
            Format::Compact => fmt_layer!(display, compact()),
            Format::Json => fmt_layer!(display, json().flatten_event(true)),
        }
    }
}
