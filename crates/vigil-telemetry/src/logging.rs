//! Subscriber construction for the engine's `tracing` output.
//!
//! A [`LogConfig`] picks a level, a format and a [`LogSink`]. Terminal sinks
//! get ANSI colors; rotated files never do.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Directive,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::error::{TelemetryError, TelemetryResult};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// How each record is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored.
    #[default]
    Pretty,
    /// One line per record.
    Compact,
    /// Newline-delimited JSON.
    Json,
    /// The `tracing-subscriber` default layout.
    Full,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            "full" => Ok(Self::Full),
            other => Err(TelemetryError::InvalidSetting(format!(
                "log format '{other}'"
            ))),
        }
    }
}

/// How often a file sink starts a new file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RotationPeriod {
    /// New file each day.
    #[default]
    Daily,
    /// New file each hour.
    Hourly,
    /// New file each minute.
    Minutely,
    /// A single file.
    Never,
}

impl FromStr for RotationPeriod {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "hourly" => Ok(Self::Hourly),
            "minutely" => Ok(Self::Minutely),
            "never" => Ok(Self::Never),
            other => Err(TelemetryError::InvalidSetting(format!(
                "rotation '{other}'"
            ))),
        }
    }
}

impl RotationPeriod {
    fn appender_rotation(self) -> Rotation {
        match self {
            Self::Daily => Rotation::DAILY,
            Self::Hourly => Rotation::HOURLY,
            Self::Minutely => Rotation::MINUTELY,
            Self::Never => Rotation::NEVER,
        }
    }
}

/// Rotated log files in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    /// Directory holding the files. Created if missing.
    pub directory: PathBuf,
    /// File name prefix, e.g. `vigil` gives `vigil.2026-10-18`.
    pub prefix: String,
    /// Rotation period.
    pub rotation: RotationPeriod,
    /// Files to keep; 0 keeps every file.
    pub keep: usize,
}

impl FileSink {
    /// Daily-rotated `vigil.*` files in `directory`, all kept.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: "vigil".to_owned(),
            rotation: RotationPeriod::default(),
            keep: 0,
        }
    }

    fn open(&self) -> TelemetryResult<RollingFileAppender> {
        std::fs::create_dir_all(&self.directory)?;

        let mut builder = RollingFileAppender::builder()
            .rotation(self.rotation.appender_rotation())
            .filename_prefix(&self.prefix);
        if self.keep > 0 {
            builder = builder.max_log_files(self.keep);
        }
        builder
            .build(&self.directory)
            .map_err(|e| TelemetryError::Sink(e.to_string()))
    }
}

/// Where records are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogSink {
    /// Standard output.
    Stdout,
    /// Standard error.
    #[default]
    Stderr,
    /// Rotated files.
    Files(FileSink),
}

impl LogSink {
    fn is_terminal(&self) -> bool {
        !matches!(self, Self::Files(_))
    }
}

/// Logging setup for the engine process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level, e.g. `info`.
    pub level: String,
    /// Record layout.
    pub format: LogFormat,
    /// Output destination.
    pub sink: LogSink,
    /// Per-target overrides such as `vigil_events=trace`.
    pub directives: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogConfig {
    /// Pretty output to stderr at `level`.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            sink: LogSink::default(),
            directives: Vec::new(),
        }
    }

    /// Set the record layout.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the destination.
    #[must_use]
    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// Add a per-target override.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    fn env_filter(&self) -> TelemetryResult<EnvFilter> {
        let level = self.level.trim().to_ascii_lowercase();
        let mut filter = EnvFilter::try_new(&level)
            .map_err(|e| TelemetryError::InvalidSetting(format!("level '{level}': {e}")))?;

        for raw in &self.directives {
            let directive: Directive = raw.trim().parse().map_err(
                |e: tracing_subscriber::filter::ParseError| {
                    TelemetryError::InvalidSetting(format!("directive '{raw}': {e}"))
                },
            )?;
            filter = filter.add_directive(directive);
        }

        Ok(filter)
    }

    fn fmt_layer<S, W>(&self, writer: W) -> BoxedLayer<S>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(self.sink.is_terminal());

        match self.format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Full => layer.boxed(),
        }
    }
}

#[cfg(feature = "config")]
impl TryFrom<&vigil_config::LoggingConfig> for LogConfig {
    type Error = TelemetryError;

    fn try_from(config: &vigil_config::LoggingConfig) -> Result<Self, Self::Error> {
        let sink = match config.target.trim() {
            "stdout" => LogSink::Stdout,
            "stderr" => LogSink::Stderr,
            "file" => {
                let directory = config.directory.clone().ok_or_else(|| {
                    TelemetryError::InvalidSetting("file target without a directory".to_owned())
                })?;
                LogSink::Files(FileSink {
                    directory,
                    prefix: config.file_prefix.trim().to_owned(),
                    rotation: config.rotation.parse()?,
                    keep: config.max_files,
                })
            },
            other => {
                return Err(TelemetryError::InvalidSetting(format!(
                    "log target '{other}'"
                )));
            },
        };

        Ok(Self {
            level: config.level.trim().to_owned(),
            format: config.format.parse()?,
            sink,
            directives: config.directives.clone(),
        })
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if a setting does not parse, the log directory cannot
/// be created, or a global subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.env_filter()?;

    let layer = match &config.sink {
        LogSink::Stdout => config.fmt_layer(std::io::stdout),
        LogSink::Stderr => config.fmt_layer(std::io::stderr),
        LogSink::Files(files) => config.fmt_layer(files.open()?),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInstalled(e.to_string()))
}

/// Install pretty `info` logging to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::default())
}
