// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use tempfile::TempDir;

/// Empty working directory; commands run with it as cwd
pub fn setup_test_env() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// `oq` running in `dir` with logs silenced
pub fn oq(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("oq").expect("oq binary");
    cmd.current_dir(dir).env("OQ_LOG", "off").env_remove("RUST_LOG");
    cmd
}

pub fn write_config(dir: &Path, toml: &str) {
    std::fs::write(dir.join("oq.toml"), toml).expect("Failed to write oq.toml");
}

/// Enqueue and return the printed id
pub fn enqueue(dir: &Path, args: &[&str]) -> String {
    let output = oq(dir).arg("enqueue").args(args).output().expect("run oq");
    assert!(
        output.status.success(),
        "enqueue failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout)
        .expect("utf8")
        .trim()
        .to_string()
}

/// `oq status --output json`
pub fn status_json(dir: &Path) -> serde_json::Value {
    let output = oq(dir)
        .args(["status", "--output", "json"])
        .output()
        .expect("run oq");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("status JSON")
}

/// Action types in dispatch order
pub fn queued_types(dir: &Path) -> Vec<String> {
    status_json(dir)["actions"]
        .as_array()
        .expect("actions array")
        .iter()
        .map(|a| a["type"].as_str().expect("type").to_string())
        .collect()
}

/// A localhost port with nothing listening on it
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("addr").port()
}

/// Answer `count` HTTP requests with `status`, reporting each request body
pub fn serve(status: u16, count: usize) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for _ in 0..count {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
            }
            let mut body = vec![0u8; content_length];
            let _ = reader.read_exact(&mut body);

            let mut stream = stream;
            let _ = write!(
                stream,
                "HTTP/1.1 {status} Status\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            );
            let _ = stream.flush();
            let _ = tx.send(String::from_utf8_lossy(&body).into_owned());
        }
    });

    (format!("http://{addr}/api/actions"), rx)
}
