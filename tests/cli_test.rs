use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

fn imgcompare(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("imgcompare").unwrap();
    // keep the user's real config out of the way
    cmd.env("HOME", home.path());
    cmd
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let img = RgbImage::from_fn(60, 40, |x, y| Rgb([(x * 4) as u8, (y * 6) as u8, 77]));
    img.save(dir.path().join("a.png")).unwrap();
    img.save(dir.path().join("b.png")).unwrap();
    RgbImage::from_fn(60, 60, |x, y| {
        if x > 20 && x < 40 && y > 10 && y < 30 {
            Rgb([250, 240, 10])
        } else {
            Rgb([5, 5, 60])
        }
    })
    .save(dir.path().join("c.png"))
    .unwrap();
    std::fs::write(dir.path().join("d.jpg"), b"not really a jpeg").unwrap();
    dir
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    imgcompare(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("near-duplicate"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    imgcompare(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("imgcompare"));
}

// ─── Scan command ────────────────────────────────────────────────────────────

#[test]
fn test_scan_json_output() {
    let home = TempDir::new().unwrap();
    let dir = fixture();
    let output = imgcompare(&home)
        .args(["scan", "--format", "json"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["images_total"], 4);
    assert_eq!(json["images_fingerprinted"], 3);
    assert_eq!(json["total_groups"], 2);
    assert_eq!(json["threshold"], 10.0);
    assert_eq!(json["groups"][0]["member_count"], 1);
    assert_eq!(json["skipped"][0]["kind"], "decode_failure");
}

#[test]
fn test_scan_human_output() {
    let home = TempDir::new().unwrap();
    let dir = fixture();
    imgcompare(&home)
        .args(["scan", "--no-color", "--detailed", "--duplicates-only"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 with duplicates"))
        .stdout(predicate::str::contains("#0"))
        .stdout(predicate::str::contains("b.png"))
        .stdout(predicate::str::contains("skipped"));
}

#[test]
fn test_scan_quiet_lists_pairs() {
    let home = TempDir::new().unwrap();
    let dir = fixture();
    imgcompare(&home)
        .args(["scan", "--format", "quiet"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("a.png\t"))
        .stdout(predicate::str::contains("c.png").not());
}

#[test]
fn test_scan_missing_path() {
    let home = TempDir::new().unwrap();
    imgcompare(&home)
        .args(["scan", "/nonexistent/path/xyz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_scan_rejects_bad_similarity() {
    let home = TempDir::new().unwrap();
    let dir = fixture();
    imgcompare(&home)
        .args(["scan", "--similarity", "150"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 100"));
}

// ─── Compare command ─────────────────────────────────────────────────────────

#[test]
fn test_compare_identical_images() {
    let home = TempDir::new().unwrap();
    let dir = fixture();
    let output = imgcompare(&home)
        .args(["compare", "--format", "json"])
        .arg(dir.path().join("a.png"))
        .arg(dir.path().join("b.png"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["distance"], 0.0);
    assert_eq!(json["duplicate"], true);
    assert_eq!(json["psnr"], 0.0);
}

#[test]
fn test_compare_unreadable_image() {
    let home = TempDir::new().unwrap();
    let dir = fixture();
    imgcompare(&home)
        .arg("compare")
        .arg(dir.path().join("a.png"))
        .arg(dir.path().join("d.jpg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot decode"));
}

// ─── Config command ──────────────────────────────────────────────────────────

#[test]
fn test_config_set_and_show() {
    let home = TempDir::new().unwrap();
    imgcompare(&home)
        .args(["config", "set", "similarity", "75"])
        .assert()
        .success();
    imgcompare(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("similarity = 75.0"));
}

#[test]
fn test_config_unknown_key() {
    let home = TempDir::new().unwrap();
    imgcompare(&home)
        .args(["config", "set", "bogus", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

// ─── Completions ─────────────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    imgcompare(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("imgcompare"));
}
