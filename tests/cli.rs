// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn seqsync(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seqsync"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("run seqsync")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "seqsync failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

#[test]
fn parse_prints_the_diagram_as_json() {
    let file = fixture("checkout.mmd");
    let output = seqsync(&["parse", file.to_str().expect("utf-8 path")]);

    let json: Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(json["has_header"], true);
    assert_eq!(json["participants"][1]["id"], "S");
    assert_eq!(json["participants"][1]["alias"], "Shop");
    assert_eq!(json["messages"][1]["arrow"], "-->>");
    assert_eq!(json["messages"][1]["origin_line"], 4);
}

#[test]
fn edit_prints_the_rewritten_source() {
    let file = fixture("checkout.mmd");
    let output = seqsync(&[
        "edit",
        file.to_str().expect("utf-8 path"),
        "add-participant",
        "P",
        "--name",
        "Payments",
        "--position",
        "after-C",
    ]);

    assert_eq!(
        stdout(&output),
        "sequenceDiagram\n    participant C as Customer\n    participant P as Payments\n    participant S as Shop\n    C->>S: place order\n    S-->>C: order confirmed\n"
    );
}

#[test]
fn edit_reports_unknown_entities() {
    let file = fixture("checkout.mmd");
    let output = seqsync(&["edit", file.to_str().expect("utf-8 path"), "delete-message", "9"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no message #9"));
}

#[test]
fn match_prints_node_ids() {
    let source = fixture("checkout.mmd");
    let svg = fixture("checkout.svg");
    let output = seqsync(&[
        "match",
        source.to_str().expect("utf-8 path"),
        svg.to_str().expect("utf-8 path"),
    ]);

    let json: Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(json["matched"], 4);
    assert_eq!(json["participants"][0]["node"]["id"], "actor-C");
    assert_eq!(json["messages"][1]["node"]["id"], "msg-1");
    assert_eq!(json["messages"][1]["entity"]["text"], "order confirmed");
    assert_eq!(json["messages"][0]["dashed"], false);
    assert_eq!(json["messages"][1]["dashed"], true);
    assert_eq!(json["messages"][1]["filled_head"], true);
}

#[test]
fn usage_errors_exit_with_two() {
    let output = seqsync(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
}
