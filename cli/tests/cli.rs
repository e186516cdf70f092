use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;

fn write_model(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".tml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn renders_data_table_for_minimal_model() {
    let model = write_model(
        r#"
        "U" is an agent.
        "S" is a service.
        "X" is public data.
        "U" sends "X" to "S".
        "#,
    );

    Command::cargo_bin("tml")
        .unwrap()
        .arg(model.path())
        .arg("-i")
        .arg("data")
        .assert()
        .success()
        .stdout(contains("data-table"))
        .stdout(contains("public"));
}

#[test]
fn check_file_mode_exits_cleanly_on_empty_model() {
    let model = write_model("");

    Command::cargo_bin("tml")
        .unwrap()
        .arg(model.path())
        .arg("-c")
        .assert()
        .success();
}

#[test]
fn rejects_missing_model_file() {
    Command::cargo_bin("tml")
        .unwrap()
        .arg("/no/such/model.tml")
        .assert()
        .failure();
}
