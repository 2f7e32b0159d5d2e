use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use tempfile::TempDir;

fn liqtar() -> Command {
    Command::cargo_bin("liqtar").unwrap()
}

/// Write a one-page statement with one text run per line.
fn write_statement(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
        operations.push(Operation::new("Td", vec![50.into(), (780 - 20 * i as i64).into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

const STATEMENT: &[&str] = &[
    "LIQUIDACION MASTERCARD",
    "ARANCEL .......... 100,00",
    "IVA CRED.FISC.COMERCIO S/ARANC 21,00% ..... 21,00",
    "RETENCION IVA ..... 1.500,00",
];

#[test]
fn help_lists_subcommands() {
    liqtar()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn process_prints_summary() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(dir.path(), "statement.pdf", STATEMENT);

    liqtar()
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Retenciones IVA"))
        .stdout(predicate::str::contains("1.500,00"))
        .stdout(predicate::str::contains("Pages scanned: 1"));
}

#[test]
fn process_writes_output_and_report() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(dir.path(), "statement.pdf", STATEMENT);
    let output = dir.path().join("summary.json");
    let report = dir.path().join("report.pdf");

    liqtar()
        .arg("process")
        .arg(&input)
        .args(["-f", "json", "-o"])
        .arg(&output)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written"))
        .stdout(predicate::str::contains("Report written"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["totals"]["retencion_iva"], "1500.00");

    let pdf = std::fs::read(&report).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn batch_writes_per_file_outputs() {
    let dir = TempDir::new().unwrap();
    write_statement(dir.path(), "march.pdf", STATEMENT);
    write_statement(dir.path(), "april.pdf", &["RETENCION GANANCIAS ..... 30,00"]);
    let out = dir.path().join("out");

    liqtar()
        .arg("batch")
        .arg(dir.path().join("*.pdf").to_str().unwrap())
        .args(["-f", "csv", "-j", "2", "--summary", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 0 failed"));

    let march = std::fs::read_to_string(out.join("march.csv")).unwrap();
    assert!(march.contains("Retenciones IVA,1500.00"));
    assert!(out.join("april.csv").exists());

    let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("april.pdf,success,"));
    assert!(lines[2].starts_with("march.pdf,success,"));
    assert!(lines[2].contains("1500.00"));
}

#[test]
fn process_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    liqtar()
        .args(["-c", config.to_str().unwrap(), "config", "init"])
        .assert()
        .success();

    liqtar()
        .args(["-c", config.to_str().unwrap(), "process"])
        .arg(dir.path().join("missing.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_rejects_other_formats() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("statement.txt");
    std::fs::write(&input, "RETENCION IVA ..... 1.500,00").unwrap();

    liqtar()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn process_broken_pdf_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("statement.pdf");
    std::fs::write(&input, b"%PDF-1.5 truncated").unwrap();

    liqtar()
        .arg("process")
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("*.pdf");

    liqtar()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn batch_continue_on_error_writes_summary() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.pdf"), b"not a pdf").unwrap();
    let out = dir.path().join("out");

    liqtar()
        .arg("batch")
        .arg(dir.path().join("*.pdf").to_str().unwrap())
        .arg("-o")
        .arg(&out)
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"));

    let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,"));
    assert!(summary.contains("broken.pdf,error,"));
}

#[test]
fn config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");
    let config = config.to_str().unwrap();

    liqtar()
        .args(["-c", config, "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));

    liqtar()
        .args(["-c", config, "config", "init"])
        .assert()
        .success();

    liqtar()
        .args(["-c", config, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    liqtar()
        .args(["-c", config, "config", "get", "pdf.max_file_size_mb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50"));

    liqtar()
        .args(["-c", config, "config", "set", "extraction.rounding", "half_even"])
        .assert()
        .success();

    liqtar()
        .args(["-c", config, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("half_even"));

    liqtar()
        .args(["-c", config, "config", "set", "extraction.rounding", "sideways"])
        .assert()
        .failure();
}
