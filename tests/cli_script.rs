mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("donation_hub_cli").unwrap();
    cmd.env("DONATION_HUB_CLI_SCRIPT", "1")
        .env("DONATION_HUB_HOME", home)
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_records_and_summarizes() {
    let home = common::temp_home();
    let input = "add \"Ali Ahmed\" 5000 Zakat \"5 NO\"\nadd Sana 2000 Fitra J-1\nsummary\nexit\n";

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Recorded Rs 5,000 from Ali Ahmed as receipt"))
        .stdout(contains("-5N-0000001"))
        .stdout(contains("-J1-0000002"))
        .stdout(contains("Total collected : Rs 7,000"))
        .stdout(contains("Zakat collected : Rs 5,000"));

    let stored = std::fs::read_to_string(home.join("data").join("donations.json")).unwrap();
    assert!(stored.contains("\"Ali Ahmed\""));
}

#[test]
fn sequence_survives_restart_after_delete() {
    let home = common::temp_home();
    cli(&home)
        .write_stdin("add A 100 General Other\nadd B 100 General Other\nadd C 100 General Other\n")
        .assert()
        .success();

    let first = first_receipt(&home);
    assert!(first.ends_with("-GEN-0000001"));

    cli(&home)
        .write_stdin(format!("delete {first}\nadd D 100 General Other\nlist\n"))
        .assert()
        .success()
        .stdout(contains("-GEN-0000004"))
        .stdout(contains(first.as_str()).not());
}

#[test]
fn invalid_amount_is_reported_and_nothing_is_saved() {
    let home = common::temp_home();
    cli(&home)
        .write_stdin("add Ali 0 Zakat J-1\nlist\n")
        .assert()
        .success()
        .stderr(contains("amount"))
        .stdout(contains("No donations recorded yet"));
}

#[test]
fn unknown_command_suggests_closest() {
    let home = common::temp_home();
    cli(&home)
        .write_stdin("sumary\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `sumary`"));
}

fn first_receipt(home: &std::path::Path) -> String {
    let stored = std::fs::read_to_string(home.join("data").join("donations.json")).unwrap();
    stored
        .split('"')
        .find(|piece| piece.ends_with("-0000001"))
        .expect("first receipt in file")
        .to_string()
}

#[test]
fn receipt_and_config_commands() {
    let home = common::temp_home();
    cli(&home)
        .write_stdin("config set currency_label PKR\nadd Fatima 1250 Monthly \"J Area\"\n")
        .assert()
        .success()
        .stdout(contains("Set currency_label = PKR"))
        .stdout(contains("Recorded PKR 1,250"));

    let config = std::fs::read_to_string(home.join("config.json")).unwrap();
    assert!(config.contains("\"PKR\""));

    let receipt = first_receipt(&home);
    assert!(receipt.ends_with("-JA-0000001"));
    cli(&home)
        .write_stdin(format!("receipt {receipt}\n"))
        .assert()
        .success()
        .stdout(contains("Verification code:"))
        .stdout(contains("Share text"))
        .stdout(contains("PKR 1,250"));
}
