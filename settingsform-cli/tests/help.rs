use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("settingsform");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("settingsform"))
        .stdout(contains("render"))
        .stdout(contains("save"));
}

#[test]
fn lists_auto_resolve_steps() {
    let mut cmd = cargo::cargo_bin_cmd!("settingsform");
    cmd.args(["steps", "--max", "48"])
        .assert()
        .success()
        .stdout(contains("Disabled"))
        .stdout(contains("12 hours"))
        .stdout(contains("1 day"))
        .stdout(contains("2 days"));
}

#[test]
fn renders_inline_project() {
    let mut cmd = cargo::cargo_bin_cmd!("settingsform");
    cmd.args([
        "render",
        "--project",
        r#"{"name": "Backend", "slug": "backend", "options": {"sentry:resolve_age": 24}}"#,
        "--set",
        "mail_subject_prefix=[backend]",
    ])
    .assert()
    .success()
    .stdout(contains("Project Details"))
    .stdout(contains("Backend"))
    .stdout(contains("[backend]"))
    .stdout(contains("1 day"));
}

#[test]
fn rejects_unknown_field_edit() {
    let mut cmd = cargo::cargo_bin_cmd!("settingsform");
    cmd.args(["render", "--project", "{}", "--set", "bogus=1"])
        .assert()
        .failure()
        .stderr(contains("unknown field 'bogus'"));
}

#[test]
fn refuses_steps_range_wider_than_a_year() {
    let mut cmd = cargo::cargo_bin_cmd!("settingsform");
    cmd.args(["steps", "--min", "-9223372036854775808"])
        .assert()
        .failure()
        .stderr(contains("hours apart"));
}
