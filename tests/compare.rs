//! End-to-end comparison runs through the binary: config loading, catalog
//! parsing, diffing, and report output.

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

mod common;
use common::TestWorkspace;

fn catalog_diff() -> Command {
    Command::cargo_bin("catalog-diff").expect("binary exists")
}

#[test]
fn attribute_difference_is_reported_per_sub_key() {
    let ws = TestWorkspace::new();
    let staging = ws.write(
        "staging.csv",
        "sku,color,additional_attributes\nA1,red,\"size=M\u{a7}note=ok\"\n",
    );
    let production = ws.write(
        "production.csv",
        "sku,color,additional_attributes\nA1,red,\"size=L\u{a7}note=ok\"\n",
    );
    let config = ws.write_config(&staging, &production, "");

    catalog_diff()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success();

    let report = fs::read_to_string(ws.report_path()).expect("report exists");
    let mut lines = report.lines();
    assert_eq!(lines.next(), Some("\"sku\",\"product_websites\",\"differences\""));
    assert_eq!(
        lines.next(),
        Some("\"A1\",\"\",\"additional_attributes:size [M \u{2192} L]\"")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn missing_and_extra_records_group_per_key() {
    let ws = TestWorkspace::new();
    let staging = ws.write(
        "staging.csv",
        "sku,name,product_websites\nA1,Widget,base\nB2,Gadget,eu\n",
    );
    let production = ws.write("production.csv", "sku,name,product_websites\nA1,Widget,base\nC3,New,us\n");
    let config = ws.write_config(&staging, &production, "");

    catalog_diff()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stderr(contains("Total differences found: 2"));

    let report = fs::read_to_string(ws.report_path()).expect("report exists");
    let lines: Vec<_> = report.lines().collect();
    assert_eq!(lines[1], "\"B2\",\"eu\",\"missing_in_production\"");
    assert_eq!(lines[2], "\"C3\",\"\",\"extra_in_production\"");
}

#[test]
fn multiple_differences_for_one_key_share_a_row() {
    let ws = TestWorkspace::new();
    let staging = ws.write(
        "staging.csv",
        "sku,name,price\nA1,Widget,10\n",
    );
    let production = ws.write(
        "production.csv",
        "sku,name,price\nA1,Gadget,12\n",
    );
    let config = ws.write_config(&staging, &production, "");

    catalog_diff()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success();

    let report = fs::read_to_string(ws.report_path()).expect("report exists");
    let lines: Vec<_> = report.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[1],
        "\"A1\",\"\",\"name [Widget \u{2192} Gadget]; price [10 \u{2192} 12]\""
    );
}

#[test]
fn no_differences_logs_notice_and_writes_nothing() {
    let ws = TestWorkspace::new();
    let staging = ws.write("staging.csv", "sku,name\nA1,Widget\n");
    let production = ws.write("production.csv", "sku,name\nA1,Widget\n");
    let config = ws.write_config(&staging, &production, "");

    catalog_diff()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stderr(contains("No differences found"));

    assert!(!ws.report_path().exists());
}

#[test]
fn excluded_columns_and_attributes_are_skipped() {
    let ws = TestWorkspace::new();
    let staging = ws.write(
        "staging.csv",
        "sku,updated_at,additional_attributes\nA1,2024-01-01,\"size=M\u{a7}ean=123\"\n",
    );
    let production = ws.write(
        "production.csv",
        "sku,updated_at,additional_attributes\nA1,2024-06-30,\"size=M\u{a7}ean=456\"\n",
    );
    let config = ws.write_config(
        &staging,
        &production,
        r#""exclude_columns": ["updated_at"], "exclude_additional_attributes": ["ean"]"#,
    );

    catalog_diff()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stderr(contains("No differences found"));
}

#[test]
fn html_fields_escape_report_values() {
    let ws = TestWorkspace::new();
    let staging = ws.write(
        "staging.csv",
        "sku,description\nA1,<b>bold</b>\n",
    );
    let production = ws.write(
        "production.csv",
        "sku,description\nA1,plain & simple\n",
    );
    let config = ws.write_config(&staging, &production, r#""html_fields": ["description"]"#);

    catalog_diff()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success();

    let report = fs::read_to_string(ws.report_path()).expect("report exists");
    assert!(report.contains("&lt;b&gt;bold&lt;/b&gt; \u{2192} plain &amp; simple"));
}

#[test]
fn utf8_bom_on_inputs_is_stripped() {
    let ws = TestWorkspace::new();
    let staging = ws.write_bytes(
        "staging.csv",
        b"\xef\xbb\xbfsku,name\nA1,Widget\n",
    );
    let production = ws.write("production.csv", "sku,name\nA1,Widget\n");
    let config = ws.write_config(&staging, &production, "");

    catalog_diff()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stderr(contains("No differences found"));
}

#[test]
fn semicolon_delimiter_is_configurable() {
    let ws = TestWorkspace::new();
    let staging = ws.write("staging.csv", "sku;name\nA1;Widget\n");
    let production = ws.write("production.csv", "sku;name\nA1;Gadget\n");
    let config = ws.write_config(&staging, &production, r#""csv_delimiter": ";""#);

    catalog_diff()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success();

    let report = fs::read_to_string(ws.report_path()).expect("report exists");
    assert!(report.contains("name [Widget \u{2192} Gadget]"));
}

#[test]
fn cli_overrides_replace_configured_paths() {
    let ws = TestWorkspace::new();
    let staging = ws.write("staging.csv", "sku,name\nA1,Widget\n");
    let production = ws.write("production.csv", "sku,name\nA1,Gadget\n");
    let decoy = ws.write("decoy.csv", "sku,name\nA1,Widget\n");
    let config = ws.write_config(&staging, &decoy, "");
    let output = ws.path().join("override-report.csv");

    catalog_diff()
        .args([
            "--config",
            config.to_str().unwrap(),
            "--production",
            production.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let report = fs::read_to_string(&output).expect("report exists");
    assert!(report.contains("name [Widget \u{2192} Gadget]"));
    assert!(!ws.report_path().exists());
}

#[test]
fn missing_config_file_is_fatal() {
    let ws = TestWorkspace::new();
    catalog_diff()
        .args(["--config", ws.path().join("nope.json").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Loading configuration"));
}

#[test]
fn config_without_catalog_locations_is_fatal() {
    let ws = TestWorkspace::new();
    let config = ws.write("config.json", "{}");
    catalog_diff()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("master_file"));
}

#[test]
fn unreadable_input_document_is_fatal() {
    let ws = TestWorkspace::new();
    let production = ws.write("production.csv", "sku,name\nA1,Widget\n");
    let config = ws.write_config(&ws.path().join("missing.csv"), &production, "");
    catalog_diff()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Opening input file"));
}
