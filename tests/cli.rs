//! End-to-end tests for the pdf-watermark binary

mod common;

use common::{build_pdf, system_font_path};
use std::process::Command;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pdf-watermark"))
}

#[test]
fn test_missing_font_reported_before_reading_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = cli()
        .current_dir(temp_dir.path())
        .args(["--font", "missing-font.ttf", "stamp", "also-missing.pdf"])
        .output()
        .expect("Failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Font file not found: missing-font.ttf"), "{}", stderr);
    assert!(stderr.contains("--font"), "should print guidance: {}", stderr);
    assert!(!stderr.contains("also-missing.pdf"), "input should not be read: {}", stderr);
}

#[test]
fn test_out_of_range_opacity_rejected() {
    let output = cli()
        .args(["stamp", "input.pdf", "--opacity", "1.5"])
        .output()
        .expect("Failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("opacity must be between"), "{}", stderr);
}

#[test]
fn test_info_prints_page_count() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("three.pdf");
    std::fs::write(&input, build_pdf(&[(612, 792); 3])).unwrap();

    let output = cli().arg("info").arg(&input).output().expect("Failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pages: 3"), "{}", stdout);
    assert!(stdout.contains("First page: 612 x 792 pt"), "{}", stdout);
}

#[test]
fn test_info_rejects_non_pdf() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("notes.pdf");
    std::fs::write(&input, b"plain text").unwrap();

    let output = cli().arg("info").arg(&input).output().expect("Failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not read PDF"), "{}", stderr);
}

#[test]
fn test_stamp_writes_watermarked_copy() {
    let Some(font) = system_font_path() else { return };
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("report.pdf");
    std::fs::write(&input, build_pdf(&[(612, 792); 2])).unwrap();

    let output = cli()
        .arg("--font")
        .arg(font)
        .arg("stamp")
        .arg(&input)
        .args(["--text", "CONFIDENTIAL", "--angle", "45", "--color", "#808080"])
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stamped = temp_dir.path().join("watermarked_report.pdf");
    assert!(stamped.exists(), "Stamped PDF was not created");
    let info = pdf_watermark::pdf::document_info(&std::fs::read(&stamped).unwrap()).unwrap();
    assert_eq!(info.page_count, 2);
}

#[test]
fn test_preview_writes_png() {
    let Some(font) = system_font_path() else { return };
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("report.pdf");
    let preview = temp_dir.path().join("tile.png");
    std::fs::write(&input, build_pdf(&[(300, 200)])).unwrap();

    let output = cli()
        .arg("--font")
        .arg(font)
        .arg("preview")
        .arg(&input)
        .arg("-o")
        .arg(&preview)
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let decoded = image::open(&preview).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (300, 200));
}
