use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;
use tempfile::NamedTempFile;

fn script(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{source}").unwrap();
    file
}

#[test]
fn no_script_runs_the_built_in_hello_world() {
    Command::cargo_bin("lumen")
        .unwrap()
        .assert()
        .success()
        .stdout(contains("Hello, world!"));
}

#[test]
fn runs_main_and_prints_its_return_value() {
    let file = script("int Main() { int a = 2; int b = 3; return a + b; }");

    Command::cargo_bin("lumen")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(contains("5"));
}

#[test]
fn while_loop_and_struct_field_access_scenarios_run_end_to_end() {
    let file = script(
        "int Main() { int n = 10; int s = 0; int i = 1; while (i <= n) { s = s + i; i = i + 1; } return s; }",
    );

    Command::cargo_bin("lumen")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(contains("55"));
}

#[test]
fn nonexistent_script_path_is_a_silent_no_op_with_no_main_to_call() {
    // eval_file treats a missing path as a no-op rather than an I/O
    // error, but that leaves no `Main()` registered to invoke.
    Command::cargo_bin("lumen")
        .unwrap()
        .arg("/no/such/script.lum")
        .assert()
        .failure()
        .stderr(contains("Main()"));
}

#[test]
fn a_script_with_no_main_is_reported_as_an_error() {
    let file = script("int helper(int n) { return n; }");

    Command::cargo_bin("lumen")
        .unwrap()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(contains("Main()"));
}
