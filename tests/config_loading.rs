// tests/config_loading.rs

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use shellwrap::config::load_and_validate;
use shellwrap::errors::ShellwrapError;
use shellwrap::logging::LogLevel;
use shellwrap::Options;
use shellwrap_test_utils::builders::{ConfigBuilder, ProfileBuilder};
use shellwrap_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{}", contents)?;
    Ok(file)
}

#[test]
fn profile_builds_the_first_layer() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
[supervisor]
kill_grace = "2s"

[diagnostics]
env_keys = ["CVSROOT"]
stderr_limit = 512
drain_grace = "250ms"

[logging]
level = "debug"

[profile.cvs]
binary = "cvs"
options = { q = true }
timeout = "10s"
cwd = "/repo"
env = { CVSROOT = "/srv/cvs" }
"#,
    )?;

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.supervisor().kill_grace, Some(Duration::from_secs(2)));
    assert_eq!(cfg.classifier().env_keys, vec!["CVSROOT".to_string()]);
    assert_eq!(cfg.classifier().stderr_limit, 512);
    assert_eq!(cfg.classifier().drain_grace, Duration::from_millis(250));
    assert_eq!(cfg.log_level(), Some(LogLevel::Debug));
    assert_eq!(cfg.profile_names().collect::<Vec<_>>(), vec!["cvs"]);

    let checkout = cfg.model("cvs")?.after(
        ["checkout"],
        Options::new().with("d", "mod").with("r", "HEAD"),
    );
    let cmd = checkout.resolve();

    assert_eq!(
        cmd.argv,
        vec!["cvs", "-q", "checkout", "-d", "mod", "-r", "HEAD"]
    );
    assert_eq!(cmd.timeout, Some(Duration::from_secs(10)));
    assert_eq!(cmd.spawn.cwd, Some(PathBuf::from("/repo")));
    assert_eq!(
        cmd.spawn.env.and_then(|e| e.get("CVSROOT").cloned()),
        Some("/srv/cvs".to_string())
    );
    Ok(())
}

#[test]
fn defaults_apply_when_sections_are_missing() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
[profile.ls]
binary = "ls"
args = ["-1"]
"#,
    )?;

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.supervisor().kill_grace, None);
    assert!(cfg.classifier().env_keys.contains(&"PATH".to_string()));
    assert_eq!(cfg.log_level(), None);
    assert_eq!(cfg.model("ls")?.resolve().argv, vec!["ls", "-1"]);
    assert_eq!(cfg.model("ls")?.timeout(), None);
    Ok(())
}

#[test]
fn default_timeout_fills_in_missing_profile_timeouts() -> TestResult {
    init_tracing();

    let cfg = ConfigBuilder::new()
        .with_default_timeout("30s")
        .with_profile("fast", ProfileBuilder::new("true").timeout("500ms").build())
        .with_profile("plain", ProfileBuilder::new("true").build())
        .build();

    assert_eq!(cfg.model("fast")?.timeout(), Some(Duration::from_millis(500)));
    assert_eq!(cfg.model("plain")?.timeout(), Some(Duration::from_secs(30)));
    Ok(())
}

#[test]
fn unknown_profile_is_a_config_error() {
    init_tracing();

    let cfg = ConfigBuilder::new().build();
    match cfg.model("nope") {
        Err(ShellwrapError::Config(msg)) => assert!(msg.contains("nope")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn empty_binary_is_rejected() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
[profile.broken]
binary = "  "
"#,
    )?;

    match load_and_validate(file.path()) {
        Err(ShellwrapError::Config(msg)) => {
            assert!(msg.contains("broken"));
            assert!(msg.contains("binary"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    Ok(())
}

#[test]
fn malformed_durations_are_rejected() -> TestResult {
    init_tracing();

    let bad_timeout = write_config(
        r#"
[profile.cvs]
binary = "cvs"
timeout = "ten seconds"
"#,
    )?;
    match load_and_validate(bad_timeout.path()) {
        Err(ShellwrapError::Config(msg)) => assert!(msg.contains("[profile.cvs].timeout")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }

    let zero_timeout = write_config(
        r#"
[supervisor]
default_timeout = "0s"
"#,
    )?;
    match load_and_validate(zero_timeout.path()) {
        Err(ShellwrapError::Config(msg)) => assert!(msg.contains("greater than zero")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }

    let overflowing = write_config(
        r#"
[supervisor]
kill_grace = "99999999999999999h"
"#,
    )?;
    match load_and_validate(overflowing.path()) {
        Err(ShellwrapError::Config(msg)) => assert!(msg.contains("out of range")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[test]
fn invalid_toml_is_reported() -> TestResult {
    init_tracing();

    let file = write_config("[profile.cvs\nbinary = ")?;
    match load_and_validate(file.path()) {
        Err(ShellwrapError::Toml(_)) => {}
        other => panic!("Expected Toml error, got: {:?}", other.map(|_| ())),
    }
    Ok(())
}
