use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod channel;
pub mod listen;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Subscribe to a channel and print delivered messages.
    Listen(ListenArgs),
    /// Print the channel id for a user, service and service id.
    Channel(ChannelArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Channel(args) => channel::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Base URL the channel id is appended to (e.g. http://example.com/lp/).
    #[arg(env = "LONGPOLL_BASE_URL")]
    pub base_url: String,
    /// Channel id to subscribe to.
    #[arg(env = "LONGPOLL_CHANNEL")]
    pub channel: String,
    /// Exit after printing N messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Long-poll window per request (e.g. 31s, 500ms).
    #[arg(long, env = "LONGPOLL_POLL_TIMEOUT", default_value = "31s", value_parser = parse_duration)]
    pub poll_timeout: Duration,
    /// Also print individual non-JSON frames.
    #[arg(long)]
    pub raw_frames: bool,
    /// Exit with an error after N consecutive failed polls (default: retry forever).
    #[arg(long, env = "LONGPOLL_MAX_FAILURES")]
    pub max_failures: Option<usize>,
    /// Cap on remembered frame fingerprints (default: unbounded).
    #[arg(long, env = "LONGPOLL_MAX_FINGERPRINTS")]
    pub max_fingerprints: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ChannelArgs {
    /// Service name.
    pub service: String,
    /// User id (numeric; default 0).
    #[arg(long)]
    pub user: Option<String>,
    /// Service instance id (numeric; default 0).
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `500ms`, `5s` or bare seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration value: {input}"))?;

    if value == 0 {
        return Err("duration must be greater than zero".to_string());
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("31").unwrap(), Duration::from_secs(31));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
