use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_sievers-interp");

const MESSAGE: &str = "From: alerts@monitoring.example.com\r\n\
Subject: [ALERT] disk full\r\n\
\r\n\
/var is at 99%\r\n";

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.display().to_string()
}

fn run(args: &[&str], config: &str) -> Output {
    Command::new(BIN)
        .args(args)
        .args(["--config", config])
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn default_config(dir: &Path) -> String {
    write(dir, "registry.json", "{}")
}

#[test]
fn test_prints_actions_in_sieve_syntax() {
    let dir = tempfile::tempdir().unwrap();
    let config = default_config(dir.path());
    let script = write(
        dir.path(),
        "alerts.sieve",
        "require \"fileinto\";\nif header :contains \"subject\" \"[ALERT]\" { fileinto \"Alerts\"; stop; }\nkeep;\n",
    );
    let message = write(dir.path(), "mail.eml", MESSAGE);

    let output = run(&[&script, &message], &config);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "fileinto \"Alerts\";\n");
}

#[test]
fn test_json_output_and_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let config = default_config(dir.path());
    let script = write(
        dir.path(),
        "bounce.sieve",
        "require \"envelope\";\nif envelope :domain \"from\" \"example.com\" { discard; }\n",
    );
    let message = write(dir.path(), "mail.eml", MESSAGE);

    let output = run(&[&script, &message, "--json", "--envelope-from", "mailer@example.com"], &config);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["actions"][0]["action"], "discard");
    assert_eq!(value["stopped"], false);
}

#[test]
fn test_implicit_keep() {
    let dir = tempfile::tempdir().unwrap();
    let config = default_config(dir.path());
    let script = write(dir.path(), "noop.sieve", "if false { discard; }\n");
    let message = write(dir.path(), "mail.eml", MESSAGE);

    let output = run(&[&script, &message], &config);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "keep;  # implicit\n");
}

#[test]
fn test_check_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    let config = default_config(dir.path());

    let good = write(dir.path(), "good.sieve", "keep;\n");
    let output = run(&[&good, "--check"], &config);
    assert!(output.status.success());

    let bad = write(dir.path(), "bad.sieve", "keep;\nfileinto \"Junk\";\n");
    let output = run(&[&bad, "--check"], &config);
    assert!(output.status.success());

    let strict = write(dir.path(), "strict.json", r#"{"enforce_require": true}"#);
    let output = run(&[&bad, "--check"], &strict);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be declared with require"), "{stderr}");
}

#[test]
fn test_unknown_implementation_in_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "registry.json", r#"{"commands": {"vacation": "vacation"}}"#);
    let script = write(dir.path(), "s.sieve", "keep;\n");

    let output = run(&[&script, "--check"], &config);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown implementation 'vacation'"), "{stderr}");
}
