//! Command-line tests against the built `tdoc` binary and the render
//! functions, using temporary document files.

use std::path::PathBuf;
use std::process::Command;

use chrono::NaiveDate;
use tdoc_cli::seal::{load_profile, render_decode, render_encode};

const VISA: &str = "
size: mrvb
number: VX1234567
fullName: Eriksson, Anna Maria
nationalityCode: UTO
birthDate: 1974-08-12
genderMarker: F
expirationDate: 2030-04-15
optionalData: AB12
visa:
  placeOfIssue: Zenith
  numberOfEntries: Multiple
  passportNumber: P1234567
  durationOfStay: [90, 0, 0]
  visaTypeCode: 1A
";

const PROFILE: &str = "
authorityCode: UTO
identifierCode: UTSS
certReference: 1A2B
featureDefinitionRef: 93
typeCategory: 1
issueDate: 2024-03-25
";

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn tdoc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tdoc"))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 25).unwrap()
}

#[test]
fn encode_then_decode_visa() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "visa.yaml", VISA);
    let profile = load_profile(Some(write(&dir, "issuer.yaml", PROFILE).as_path())).unwrap();

    let out = render_encode(&file, &profile, today(), false).unwrap();
    let payload = out
        .lines()
        .find_map(|l| l.strip_prefix("base45:"))
        .unwrap()
        .trim();

    let json: serde_json::Value = serde_json::from_str(&render_decode(payload).unwrap()).unwrap();
    assert_eq!(json["visa"]["number"], "VX1234567");
    assert_eq!(json["visa"]["passportNumber"], "P1234567");
    assert_eq!(json["visa"]["optionalData"], "AB12");
    assert_eq!(json["header"]["certReference"], "1A2B");
    assert_eq!(json["features"], serde_json::json!([2, 3, 5, 4, 6]));
}

#[test]
fn invalid_profile_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let bad = PROFILE.replace("typeCategory: 1", "typeCategory: 255");
    assert!(load_profile(Some(write(&dir, "issuer.yaml", &bad).as_path())).is_err());
}

#[test]
fn mrz_command_prints_lines() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        &dir,
        "passport.json",
        r#"{"size": "td3", "number": "L898902C3", "fullName": "Eriksson, Anna Maria",
            "birthDate": "1974-08-12", "genderMarker": "F",
            "expirationDate": "2012-04-15", "optionalData": "ZE184226B"}"#,
    );
    let output = tdoc().arg("mrz").arg(&file).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec![
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
            "L898902C36UTO7408122F1204159ZE184226B<<<<<10",
        ]
    );
}

#[test]
fn parse_command_exit_codes() {
    let ok = tdoc()
        .args([
            "parse",
            "--size",
            "td2",
            "I<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<D231458907UTO7408122F1204159<<<<<<<6",
        ])
        .output()
        .unwrap();
    assert!(ok.status.success());
    assert!(String::from_utf8(ok.stdout).unwrap().contains("D23145890"));

    let bad = tdoc()
        .args([
            "parse",
            "--size",
            "td2",
            "I<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<D231458907UTO7408122F1204159<<<<<<<5",
        ])
        .output()
        .unwrap();
    assert_eq!(bad.status.code(), Some(1));
}

#[test]
fn missing_file_is_an_error() {
    let output = tdoc().args(["mrz", "/nonexistent/visa.yaml"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
