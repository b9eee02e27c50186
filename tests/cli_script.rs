mod common;

use assert_cmd::Command;
use common::{answers, files_with_extension, script, TestEnv, KITCHEN_QUOTE};
use jobdocs::cli::SCRIPT_ENV;
use jobdocs_config::manager::HOME_ENV;
use predicates::str::contains;

fn jobdocs(env: &TestEnv) -> Command {
    let mut cmd = Command::cargo_bin("jobdocs").unwrap();
    cmd.env(SCRIPT_ENV, "1").env(HOME_ENV, env.home.path());
    cmd
}

#[test]
fn exit_says_goodbye() {
    let env = TestEnv::new();
    jobdocs(&env)
        .write_stdin("5\n")
        .assert()
        .success()
        .stdout(contains("Contractor Quote & Invoice Tool"))
        .stdout(contains("Goodbye."));
}

#[test]
fn end_of_input_at_the_menu_is_a_clean_exit() {
    let env = TestEnv::new();
    jobdocs(&env).write_stdin("").assert().success();
}

#[test]
fn script_mode_creates_a_quote() {
    let env = TestEnv::new();
    jobdocs(&env)
        .write_stdin(script(&answers(&[KITCHEN_QUOTE, &["5"]])))
        .assert()
        .success()
        .stdout(contains("Assigned new Job ID: J0001"))
        .stdout(contains("Saved quote CSV"))
        .stdout(contains("Goodbye."));

    let dir = env.job_dir("J0001");
    assert_eq!(files_with_extension(&dir, "csv").len(), 1);
    let html = files_with_extension(&dir, "html");
    assert_eq!(html.len(), 1);
    let page = std::fs::read_to_string(&html[0]).unwrap();
    assert!(page.contains("$625.00"));
}

#[test]
fn edit_without_job_id_returns_to_the_menu() {
    let env = TestEnv::new();
    jobdocs(&env)
        .write_stdin("4\n\n5\n")
        .assert()
        .success()
        .stdout(contains("Job ID is required."))
        .stdout(contains("Goodbye."));
}

#[test]
fn editing_an_unknown_job_warns() {
    let env = TestEnv::new();
    jobdocs(&env)
        .write_stdin("4\nJ0042\n5\n")
        .assert()
        .success()
        .stdout(contains("No job folder found for J0042."));
}
