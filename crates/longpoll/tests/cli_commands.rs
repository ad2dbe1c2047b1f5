#![cfg(feature = "cli")]

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn longpoll() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_longpoll"));
    cmd.arg("--log-level").arg("error");
    cmd
}

fn read_request(stream: &TcpStream) {
    let mut reader = BufReader::new(stream);
    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line).unwrap_or(0);
        if read == 0 || line.trim_end().is_empty() {
            break;
        }
    }
}

/// Answer the first request with `body`, then hold later connections open.
fn spawn_server(body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().expect("listener should have an address");

    thread::spawn(move || {
        let mut held = Vec::new();
        let mut answered = false;
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            read_request(&stream);
            if answered {
                held.push(stream);
                continue;
            }
            answered = true;
            let response = format!(
                "HTTP/1.1 200 OK\r\nETag: e1\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.shutdown(std::net::Shutdown::Write);
        }
    });

    addr
}

#[test]
fn channel_prints_composed_id() {
    let output = longpoll()
        .args(["--format", "raw", "channel", "chat", "--user", "42", "--id", "7"])
        .output()
        .expect("channel command should run");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "42_chat_7");
}

#[test]
fn channel_defaults_missing_ids_to_zero() {
    let output = longpoll()
        .args(["--format", "json", "channel", "news"])
        .output()
        .expect("channel command should run");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(value["channel"], "0_news_0");
    assert_eq!(value.as_object().map(|object| object.len()), Some(1));
}

#[test]
fn channel_rejects_non_numeric_user() {
    let output = longpoll()
        .args(["channel", "chat", "--user", "x"])
        .output()
        .expect("channel command should run");

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("user id"));
}

#[test]
fn listen_rejects_invalid_channel() {
    let output = longpoll()
        .args(["listen", "http://127.0.0.1:9/lp/", "a/b"])
        .output()
        .expect("listen command should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn listen_gives_up_after_consecutive_failures() {
    // Nothing listens on a port that was bound and released.
    let addr = TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("ephemeral port should be available");

    let output = longpoll()
        .arg("listen")
        .arg(format!("http://{addr}/lp/"))
        .args(["42_chat_7", "--max-failures", "2", "--poll-timeout", "2s"])
        .output()
        .expect("listen command should run");

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("poll failed"));
}

#[test]
fn listen_prints_frames_then_whole_body() {
    let addr = spawn_server(r#"{"a":1}{"b":2}"#);

    let mut child = longpoll()
        .args(["--format", "json", "listen"])
        .arg(format!("http://{addr}/lp/"))
        .args(["42_chat_7", "--count", "3", "--poll-timeout", "5s"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("listen command should start");

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().expect("child should be pollable") {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            panic!("listen did not exit after --count messages");
        }
        thread::sleep(Duration::from_millis(25));
    };
    assert!(status.success());

    let output = child.wait_with_output().expect("stdout should be readable");
    let lines: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be json"))
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["channel"], "42_chat_7");
    assert_eq!(lines[0]["message"]["kind"], "object");
    assert_eq!(lines[0]["message"]["value"]["a"], 1);
    assert_eq!(lines[1]["message"]["value"]["b"], 2);
    assert_eq!(lines[2]["message"]["kind"], "raw");
    assert_eq!(lines[2]["message"]["value"], r#"{"a":1}{"b":2}"#);
    assert_eq!(lines[2]["sequence"], 3);
    let keys: Vec<&str> = lines[0]
        .as_object()
        .expect("message line should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["channel", "message", "sequence", "timestamp"]);
}
