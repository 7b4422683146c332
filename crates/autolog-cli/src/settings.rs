//! CLI settings, read from `autolog.toml` (or `--config`) and `AUTOLOG_*`
//! environment variables. Command-line flags override both.

use chrono::{Local, NaiveDate};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_CONFIG: &str = "autolog.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// `text` or `json`
    pub log_format: String,
    /// Fixed clock for every date-dependent calculation
    pub today: Option<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "warn".into(),
            log_format: "text".into(),
            today: None,
        }
    }
}

impl Settings {
    /// An explicit `--config` file must exist; the default one is optional.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let (name, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG, false),
        };
        Config::builder()
            .add_source(File::with_name(name).required(required))
            .add_source(Environment::with_prefix("AUTOLOG"))
            .build()?
            .try_deserialize()
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Install the tracing subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable; `log` records from the engine are
/// forwarded by the subscriber's log bridge.
pub fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    if settings.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
