use std::process::{Command, Stdio};
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_weave").to_string()
}

fn weave() -> Command {
    let mut cmd = Command::new(bin());
    cmd.stdin(Stdio::null()).env("NO_COLOR", "1");
    cmd
}

const SAMPLE: &str = "@nsobid 1A2B3C\n@title \"Sample\"\n@enabled\n100 DEADBEEF\n";

#[test]
fn cli_converts_tree_and_skips_on_rerun() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("romfs").join("exefs");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(nested.join("sample.PCHTXT"), SAMPLE).unwrap();
    std::fs::write(dir.path().join("noid.pchtxt"), "@enabled\n10 00\n").unwrap();

    let out = weave()
        .arg("--no-pause")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Created 1A2B3C.ips"), "{stdout}");
    assert!(stdout.contains("Failed: Missing Game ID"), "{stdout}");
    assert!(stdout.contains("• Created: 1"), "{stdout}");
    assert!(stdout.contains("• Failed:  1"), "{stdout}");

    let container = nested.join("1A2B3C.ips");
    let first = std::fs::read(&container).unwrap();
    assert_eq!(first, b"IPS32\x00\x00\x01\x00\x00\x04\xDE\xAD\xBE\xEFEEOF");

    let out = weave()
        .args(["convert", "--no-pause"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Skipped (File exists)"), "{stdout}");
    assert_eq!(std::fs::read(&container).unwrap(), first);
}

#[test]
fn cli_json_summary() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.pchtxt"), SAMPLE).unwrap();

    let out = weave().arg("--json").arg(dir.path()).output().unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["created"], 1);
    assert_eq!(json["files"][0]["binary_id"], "1A2B3C");
    assert_eq!(json["files"][0]["name"], "Sample");
    assert_eq!(json["files"][0]["status"], "created");
}

#[test]
fn cli_empty_directory_succeeds() {
    let dir = tempdir().unwrap();
    let out = weave()
        .arg("--no-pause")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("No .pchtxt files found"));
}

#[test]
fn cli_inspect_lists_records() {
    let dir = tempdir().unwrap();
    let ips = dir.path().join("x.ips");
    std::fs::write(&ips, b"IPS32\x00\x00\x01\x00\x00\x02\xAB\xCDEEOF").unwrap();

    let out = weave().arg("inspect").arg(&ips).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("1 records"), "{stdout}");
    assert!(stdout.contains("0x00000100"), "{stdout}");
    assert!(stdout.contains("ABCD"), "{stdout}");
}

#[test]
fn cli_inspect_rejects_garbage() {
    let dir = tempdir().unwrap();
    let ips = dir.path().join("x.ips");
    std::fs::write(&ips, b"not a container").unwrap();

    let out = weave().arg("inspect").arg(&ips).output().unwrap();
    assert!(!out.status.success());
}

#[test]
fn cli_parse_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("p.pchtxt");
    std::fs::write(
        &input,
        "@nsobid ab\n@flag offset_shift 0x10\n@enabled\n10 \"hi\\n\"\n",
    )
    .unwrap();

    let out = weave().args(["parse", "--json"]).arg(&input).output().unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["binary_id"], "ab");
    assert_eq!(json["offset_shift"], 16);
    assert_eq!(json["records"][0]["address"], "0x00000020");
    assert_eq!(json["records"][0]["payload"], "68690A");
    assert!(!dir.path().join("ab.ips").exists());
}

#[test]
fn cli_global_flags_before_subcommand() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("p.pchtxt");
    std::fs::write(&input, SAMPLE).unwrap();

    let out = weave().args(["-vv", "parse"]).arg(&input).output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("records:      1"));

    let mods = dir.path().join("mods");
    std::fs::create_dir(&mods).unwrap();
    std::fs::write(mods.join("m.pchtxt"), SAMPLE).unwrap();
    let out = weave()
        .args(["-q", "--no-pause", "convert"])
        .arg(&mods)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(mods.join("1A2B3C.ips").exists());
}
