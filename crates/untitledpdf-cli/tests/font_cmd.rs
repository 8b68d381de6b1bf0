//! Integration tests for the `font` subcommand.

mod common;

use common::{cmd, run_json};
use predicates::prelude::*;

#[test]
fn subset_arial_maps_to_arial() {
    cmd()
        .args(["font", "BAAAAA+ArialMT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("family: Arial\n"))
        .stdout(predicate::str::contains("weight: normal"))
        .stdout(predicate::str::contains("slant: normal"))
        .stdout(predicate::str::contains("standard: Helvetica"));
}

#[test]
fn times_bold_italic_json() {
    let json = run_json(&[
        "font",
        "Times-BoldItalic",
        "--base-name",
        "Times-Roman",
        "--format",
        "json",
    ]);
    assert_eq!(json["base_name"], "Times-Roman");
    assert_eq!(json["description"]["family"], "Times New Roman");
    assert_eq!(json["description"]["weight"], "Bold");
    assert_eq!(json["description"]["slant"], "Italic");
    assert_eq!(json["description"]["hint"], "Serif");
    assert_eq!(json["standard_font"], "Times-BoldItalic");
}

#[test]
fn base_name_derived_from_full_name() {
    let json = run_json(&["font", "Courier-Oblique", "--format", "json"]);
    assert_eq!(json["base_name"], "Courier");
    assert_eq!(json["description"]["hint"], "Monospace");
    assert_eq!(json["description"]["slant"], "Oblique");
}

#[test]
fn unknown_family_passes_through() {
    cmd()
        .args(["font", "Garamond-Bold"])
        .assert()
        .success()
        .stdout(predicate::str::contains("family: Garamond"))
        .stdout(predicate::str::contains("hint: system"))
        .stdout(predicate::str::contains("weight: bold"));
}
