// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for sweep and watch
//!
//! Executors point at throwaway localhost servers, or at a closed port to
//! force transport failures.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::{closed_port, enqueue, oq, serve, setup_test_env, status_json, write_config};
use predicates::prelude::*;
use std::time::Duration;

fn executor_config(action_type: &str, url: &str) -> String {
    format!("[executors.{action_type}]\nurl = \"{url}\"\ntimeout = \"2s\"\n")
}

#[test]
fn sweep_without_executors_refuses_and_keeps_queue() {
    let temp = setup_test_env();
    enqueue(temp.path(), &["CONTACT_FORM_SUBMIT"]);

    oq(temp.path())
        .arg("sweep")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no executors configured"));

    assert_eq!(status_json(temp.path())["length"], 1);
}

#[test]
fn sweep_delivers_and_removes() {
    let temp = setup_test_env();
    let (url, bodies) = serve(200, 1);
    write_config(temp.path(), &executor_config("CONTACT_FORM_SUBMIT", &url));
    enqueue(
        temp.path(),
        &["CONTACT_FORM_SUBMIT", "--payload", r#"{"name":"Test"}"#],
    );

    oq(temp.path())
        .arg("sweep")
        .assert()
        .success()
        .stdout(predicate::str::contains("succeeded 1"));

    let body = bodies.recv_timeout(Duration::from_secs(5)).unwrap();
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["name"], "Test");
    assert_eq!(status_json(temp.path())["length"], 0);
}

#[test]
fn failed_delivery_counts_a_retry() {
    let temp = setup_test_env();
    let url = format!("http://127.0.0.1:{}/", closed_port());
    write_config(temp.path(), &executor_config("CONTACT_FORM_SUBMIT", &url));
    enqueue(temp.path(), &["CONTACT_FORM_SUBMIT"]);

    oq(temp.path())
        .arg("sweep")
        .assert()
        .success()
        .stdout(predicate::str::contains("retried 1"));

    let status = status_json(temp.path());
    assert_eq!(status["length"], 1);
    assert_eq!(status["actions"][0]["retries"], 1);
}

#[test]
fn server_error_then_success_over_two_sweeps() {
    let temp = setup_test_env();
    let (failing_url, _) = serve(503, 1);
    write_config(temp.path(), &executor_config("CONTACT_FORM_SUBMIT", &failing_url));
    enqueue(temp.path(), &["CONTACT_FORM_SUBMIT"]);

    oq(temp.path())
        .arg("sweep")
        .assert()
        .success()
        .stdout(predicate::str::contains("retried 1"));

    let (ok_url, _) = serve(200, 1);
    write_config(temp.path(), &executor_config("CONTACT_FORM_SUBMIT", &ok_url));
    oq(temp.path())
        .arg("sweep")
        .assert()
        .success()
        .stdout(predicate::str::contains("succeeded 1"));

    assert_eq!(status_json(temp.path())["length"], 0);
}

#[test]
fn exhausted_action_is_removed() {
    let temp = setup_test_env();
    let url = format!("http://127.0.0.1:{}/", closed_port());
    write_config(temp.path(), &executor_config("CONTACT_FORM_SUBMIT", &url));
    enqueue(temp.path(), &["CONTACT_FORM_SUBMIT", "--max-retries", "0"]);

    oq(temp.path())
        .arg("sweep")
        .assert()
        .success()
        .stdout(predicate::str::contains("exhausted 1"));

    assert_eq!(status_json(temp.path())["length"], 0);
}

#[test]
fn unknown_type_is_dropped() {
    let temp = setup_test_env();
    let url = format!("http://127.0.0.1:{}/", closed_port());
    write_config(temp.path(), &executor_config("CONTACT_FORM_SUBMIT", &url));
    enqueue(temp.path(), &["ANALYTICS_PING"]);

    oq(temp.path())
        .arg("sweep")
        .assert()
        .success()
        .stdout(predicate::str::contains("dropped 1"));

    assert_eq!(status_json(temp.path())["length"], 0);
}

#[test]
fn sweep_report_as_json() {
    let temp = setup_test_env();
    let url = format!("http://127.0.0.1:{}/", closed_port());
    write_config(temp.path(), &executor_config("CONTACT_FORM_SUBMIT", &url));
    enqueue(temp.path(), &["CONTACT_FORM_SUBMIT"]);

    let output = oq(temp.path())
        .args(["sweep", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["attempted"], 1);
    assert_eq!(report["retried"], 1);
    assert_eq!(report["succeeded"], 0);
}

#[test]
fn watch_delivers_backlog_on_start() {
    let temp = setup_test_env();
    let (url, bodies) = serve(200, 1);
    write_config(temp.path(), &executor_config("CONTACT_FORM_SUBMIT", &url));
    let id = enqueue(temp.path(), &["CONTACT_FORM_SUBMIT"]);

    // Runs until killed; the timeout stands in for Ctrl-C
    oq(temp.path())
        .arg("watch")
        .timeout(Duration::from_secs(3))
        .assert()
        .interrupted()
        .stdout(predicate::str::contains(format!("synced  {id}")));

    assert!(bodies.recv_timeout(Duration::from_secs(1)).is_ok());
    assert_eq!(status_json(temp.path())["length"], 0);
}
