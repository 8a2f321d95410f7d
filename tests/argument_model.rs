// tests/argument_model.rs

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use shellwrap::args::{CWD_KEY, ENV_KEY, TIMEOUT_KEY, no_args};
use shellwrap::{ArgModel, Options};
use shellwrap_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn cvs_checkout() -> ArgModel {
    ArgModel::create("cvs", no_args(), Options::new().with("q", true))
        .bake_options(Options::new().with(TIMEOUT_KEY, 10).with(CWD_KEY, "/repo"))
        .after(["checkout"], Options::new().with("d", "mod").with("r", "HEAD"))
}

#[test]
fn cvs_checkout_resolves_to_expected_command() -> TestResult {
    init_tracing();

    let cmd = cvs_checkout().resolve();

    assert_eq!(
        cmd.argv,
        vec!["cvs", "-q", "checkout", "-d", "mod", "-r", "HEAD"]
    );
    assert_eq!(cmd.timeout, Some(Duration::from_secs(10)));
    assert_eq!(cmd.spawn.cwd, Some(PathBuf::from("/repo")));
    Ok(())
}

#[test]
fn composition_never_mutates_the_receiver() {
    init_tracing();

    let base = cvs_checkout();
    let snapshot = base.resolve();

    let _baked = base.bake(
        ["-A"],
        Options::new().with("P", true).with(TIMEOUT_KEY, 1),
    );
    let _after = base.after(["mod"], Options::new().with("f", true));

    assert_eq!(base.resolve(), snapshot);
}

#[test]
fn bake_extends_the_last_layer_after_starts_a_new_one() {
    init_tracing();

    let checkout = cvs_checkout();
    let baked = checkout.bake(["mod"], Options::new().with("P", true));
    let after = checkout.after(["mod"], Options::new().with("P", true));

    assert_eq!(baked.layers().len(), checkout.layers().len());
    assert_eq!(after.layers().len(), checkout.layers().len() + 1);

    assert_eq!(
        baked.resolve().argv,
        vec!["cvs", "-q", "checkout", "mod", "-d", "mod", "-r", "HEAD", "-P"]
    );
    assert_eq!(
        after.resolve().argv,
        vec!["cvs", "-q", "checkout", "-d", "mod", "-r", "HEAD", "mod", "-P"]
    );
}

#[test]
fn reserved_keys_are_never_flags() {
    init_tracing();

    let env = [("CVSROOT".to_string(), "/srv/cvs".to_string())].into();
    let model = ArgModel::new("cvs").bake_options(
        Options::new()
            .with(ENV_KEY, shellwrap::ArgValue::Env(env))
            .with(CWD_KEY, "/repo")
            .with(TIMEOUT_KEY, "2s"),
    );

    let cmd = model.resolve();
    assert_eq!(cmd.argv, vec!["cvs"]);
    assert_eq!(cmd.timeout, Some(Duration::from_secs(2)));
    assert_eq!(
        model.environment().and_then(|e| e.get("CVSROOT").cloned()),
        Some("/srv/cvs".to_string())
    );
    assert_eq!(model.working_directory(), Some(PathBuf::from("/repo")));
}

#[test]
fn falsy_values_drop_flags_and_others_are_stringified() {
    init_tracing();

    let model = ArgModel::create(
        "tool",
        no_args(),
        Options::new()
            .with("a", false)
            .with("b", 0)
            .with("c", "")
            .with("d", Option::<String>::None)
            .with("e", 7)
            .with("f", 1.5)
            .with("verbose", true),
    );

    assert_eq!(
        model.resolve().argv,
        vec!["tool", "-e", "7", "-f", "1.5", "--verbose"]
    );
}

#[test]
fn unusual_keys_are_passed_through() {
    init_tracing();

    // No validation beyond the naming convention.
    let model = ArgModel::create(
        "tool",
        no_args(),
        Options::new()
            .with("_kb", true)
            .with("__no-color", true)
            .with("weird key!", "x")
            .with("_", true),
    );

    assert_eq!(
        model.resolve().argv,
        vec!["tool", "-kb", "--no-color", "--weird key!", "x", "-"]
    );
}
