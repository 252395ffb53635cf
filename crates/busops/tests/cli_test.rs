//! Integration tests for the `busops` CLI binary.
//!
//! Server-bound commands run with `--demo`, against the seeded in-memory
//! backend, so no ticketing server is needed.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `busops` binary with env isolation.
///
/// Clears all `BUSOPS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn busops_cmd() -> assert_cmd::Command {
    isolated("/tmp/busops-cli-test-nonexistent")
}

fn isolated(home: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("busops");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("BUSOPS_PROFILE")
        .env_remove("BUSOPS_SERVER")
        .env_remove("BUSOPS_OUTPUT")
        .env_remove("BUSOPS_INSECURE")
        .env_remove("BUSOPS_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn demo(args: &[&str]) -> assert_cmd::Command {
    let mut cmd = busops_cmd();
    cmd.arg("--demo").args(args);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = busops_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = String::from_utf8_lossy(&output.stderr);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_pages() {
    busops_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("stops")
            .and(predicate::str::contains("lines"))
            .and(predicate::str::contains("route"))
            .and(predicate::str::contains("tickets"))
            .and(predicate::str::contains("buy")),
    );
}

#[test]
fn test_completions_zsh() {
    busops_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    busops_cmd()
        .args(["--demo", "--output", "invalid", "stops", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("possible values"));
}

// ── Connection / configuration errors ───────────────────────────────

#[test]
fn test_no_server_configured() {
    busops_cmd()
        .args(["stops", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No server configured"));
}

#[test]
fn test_unreachable_server_exit_code() {
    busops_cmd()
        .args(["--server", "http://127.0.0.1:1", "--timeout", "5", "stops", "list"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not connect"));
}

// ── Stops ───────────────────────────────────────────────────────────

#[test]
fn test_stops_list_plain() {
    demo(&["-o", "plain", "stops", "list"])
        .assert()
        .success()
        .stdout("1\n2\n3\n");
}

#[test]
fn test_delete_without_yes_refuses_non_interactive() {
    demo(&["stops", "delete", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));
}

#[test]
fn test_delete_stop_with_yes() {
    demo(&["--yes", "stops", "delete", "3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Bus stop #3 deleted"));
}

#[test]
fn test_delete_stop_in_route_is_rejected() {
    demo(&["--yes", "stops", "delete", "1"]).assert().code(6);
}

// ── Lines & routes ──────────────────────────────────────────────────

#[test]
fn test_line_detail_shows_route() {
    demo(&["lines", "get", "1"]).assert().success().stdout(
        predicate::str::contains("Line 1 - Downtown Loop")
            .and(predicate::str::contains("Central Station"))
            .and(predicate::str::contains("City Hall")),
    );
}

#[test]
fn test_unknown_line_is_not_found() {
    demo(&["lines", "get", "99"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Bus line not found with id: 99"));
}

#[test]
fn test_create_line_with_route() {
    demo(&[
        "-o", "plain", "lines", "create", "--name", "Line 4 - Riverside", "--stop", "3", "--stop",
        "1",
    ])
    .assert()
    .success()
    .stdout("4\n");
}

#[test]
fn test_route_move_down() {
    demo(&["-o", "plain", "route", "move", "1", "1", "down"])
        .assert()
        .success()
        .stdout("2\n1\n");
}

#[test]
fn test_route_move_past_end_is_usage_error() {
    demo(&["route", "move", "1", "2", "down"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already at that end"));
}

#[test]
fn test_emptying_route_shows_server_message() {
    demo(&["route", "remove", "2", "1"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Route must have at least one stop"));
}

#[test]
fn test_delete_line_with_active_tickets_deactivates() {
    demo(&["--yes", "lines", "delete", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("deactivated instead"));
}

// ── Categories ──────────────────────────────────────────────────────

#[test]
fn test_category_form_parse_error() {
    demo(&[
        "categories", "create", "--name", "Broken", "--days", "abc", "--price", "1",
    ])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("Duration (days) must be a number"));
}

// ── Tickets ─────────────────────────────────────────────────────────

#[test]
fn test_tickets_newest_first() {
    demo(&["-o", "plain", "tickets", "list"])
        .assert()
        .success()
        .stdout("2\n3\n1\n");
}

#[test]
fn test_unknown_email_shows_empty_state() {
    demo(&["tickets", "list", "--email", "nobody@example.com"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No tickets found."));
}

#[test]
fn test_single_ride_renewal_rejected() {
    demo(&["tickets", "renew", "2"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Single ride tickets cannot be renewed"));
}

#[test]
fn test_weekly_pass_renewal_extends_expiry() {
    demo(&["-o", "json", "tickets", "renew", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-02-18T00:00:00"));
}

#[test]
fn test_renew_reports_new_expiry_without_listing() {
    demo(&["-vv", "tickets", "renew", "3"])
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("Ticket #3 renewed until 2026-02-18 00:00"))
        .stderr(predicate::str::contains("renew_ticket(3)"))
        .stderr(predicate::str::contains("list_tickets").not());
}

#[test]
fn test_cancelled_ticket_cannot_be_cancelled_again() {
    demo(&["--yes", "tickets", "cancel", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ticket #2 is cancelled and cannot be cancelled"));
}

#[test]
fn test_buy_monthly_pass_without_line() {
    demo(&[
        "-o",
        "json",
        "buy",
        "--name",
        "John Doe",
        "--email",
        "john@example.com",
        "--category",
        "2",
    ])
    .assert()
    .success()
    .stdout(
        predicate::str::contains("\"id\": 100")
            .and(predicate::str::contains("\"line_name\": null"))
            .and(predicate::str::contains("\"active\": true")),
    );
}

#[test]
fn test_buy_on_inactive_line_is_refused() {
    demo(&[
        "buy",
        "--name",
        "John Doe",
        "--email",
        "john@example.com",
        "--category",
        "2",
        "--line",
        "3",
    ])
    .assert()
    .code(2);
}

#[test]
fn test_dashboard_counts() {
    demo(&["-o", "json-compact", "dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"lines":3,"active_lines":2,"categories":3,"tickets":3}"#,
        ));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    busops_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_init_then_profiles() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path().to_str().unwrap().to_owned();

    isolated(&home)
        .args(["config", "init", "--server", "http://localhost:9000"])
        .assert()
        .success();

    isolated(&home)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *").and(predicate::str::contains("9000")));

    isolated(&home)
        .args(["config", "use", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'prod' not found"));
}
