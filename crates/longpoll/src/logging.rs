use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Targets that follow `--log-level`; everything else (reqwest, hyper) is
/// capped at `warn`.
const LONGPOLL_TARGETS: [&str; 4] = [
    "longpoll",
    "longpoll_transport",
    "longpoll_frame",
    "longpoll_session",
];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Filter directives for `level` when `RUST_LOG` is unset.
pub fn directives(level: LogLevel) -> String {
    let mut out = level.min(LogLevel::Warn).as_str().to_string();
    for target in LONGPOLL_TARGETS {
        out.push_str(&format!(",{target}={}", level.as_str()));
    }
    out
}

/// Log to stderr. A set `RUST_LOG` replaces the `--log-level` directives.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false);

    match format {
        LogFormat::Text => {
            let _ = builder.with_target(false).try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().flatten_event(true).try_init();
        }
    }
}
