mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "longpoll", version, about = "HTTP long-polling client CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", env = "LONGPOLL_FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        env = "LONGPOLL_LOG_FORMAT",
        default_value = "text",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "LONGPOLL_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn parses_listen_subcommand() {
        let cli = Cli::try_parse_from([
            "longpoll",
            "listen",
            "http://example.com/lp/",
            "42_chat_7",
            "--count",
            "3",
            "--poll-timeout",
            "500ms",
        ])
        .expect("listen args should parse");

        match cli.command {
            Command::Listen(args) => {
                assert_eq!(args.channel, "42_chat_7");
                assert_eq!(args.count, Some(3));
                assert_eq!(args.poll_timeout, Duration::from_millis(500));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_duration() {
        let err = Cli::try_parse_from([
            "longpoll",
            "listen",
            "http://example.com/lp/",
            "1_chat_1",
            "--poll-timeout",
            "soon",
        ])
        .expect_err("bad duration should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_channel_subcommand() {
        let cli = Cli::try_parse_from(["longpoll", "channel", "chat", "--user", "42", "--id", "7"])
            .expect("channel args should parse");
        assert!(matches!(cli.command, Command::Channel(_)));
    }
}
