use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use longpoll_frame::MessageFrame;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    channel: &'a str,
    sequence: usize,
    message: &'a MessageFrame,
    timestamp: String,
}

#[derive(Serialize)]
struct ChannelOutput<'a> {
    channel: &'a str,
}

pub fn print_message(message: &MessageFrame, channel: &str, sequence: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                channel,
                sequence,
                message,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "CHANNEL", "KIND", "MESSAGE"])
                .add_row(vec![
                    sequence.to_string(),
                    channel.to_string(),
                    message.kind().to_string(),
                    message_preview(message),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "#{} channel={} kind={} message={}",
                sequence,
                channel,
                message.kind(),
                message_preview(message)
            );
        }
        OutputFormat::Raw => {
            let mut text = message_preview(message);
            text.push('\n');
            print_raw(text.as_bytes());
        }
    }
}

pub fn print_channel(channel: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ChannelOutput { channel };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["CHANNEL"])
                .add_row(vec![channel.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => println!("{channel}"),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Structured messages as compact JSON, raw messages verbatim.
pub fn message_preview(message: &MessageFrame) -> String {
    match message {
        MessageFrame::Object(map) => {
            serde_json::to_string(map).unwrap_or_else(|_| "<object>".to_string())
        }
        MessageFrame::Array(items) => {
            serde_json::to_string(items).unwrap_or_else(|_| "<array>".to_string())
        }
        MessageFrame::Raw(text) => text.clone(),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
