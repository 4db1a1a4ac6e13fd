mod common;

use std::fs;
use std::process::Command;

use common::{id, string_record, PackBuilder, WireExt};
use serde_json::json;

const SCHEMA: &str = r#"{
    "dialect": "rogue-trader",
    "types": [
        {"name": "Unit", "fullName": "Game.Unit", "typeId": "10101010101010101010101010101010",
         "fields": [
            {"name": "Hp", "value": {"kind": "Int32"}},
            {"name": "Portrait", "value": {"kind": "UnityObjectRef"}}
         ]}
    ]
}"#;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bp-unpack"))
}

fn unit_record(hp: i32, portrait: i32) -> Vec<u8> {
    string_record(
        id(0x10),
        |w| {
            w.i32(hp);
            w.i32(portrait);
        },
        "Unit",
        "u1",
    )
}

#[test]
fn decodes_pack_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let pack = dir.path().join("blueprints.pack");
    let schema = dir.path().join("schema.json");
    let assets = dir.path().join("assets.json");
    let output = dir.path().join("out.json");
    fs::write(&pack, PackBuilder::new().record(id(1), unit_record(30, 0)).build()).unwrap();
    fs::write(&schema, SCHEMA).unwrap();
    fs::write(&assets, r#"[{"AssetId": "portrait_guid", "FileId": 42}]"#).unwrap();

    let status = bin()
        .arg(&pack)
        .arg("--schema")
        .arg(&schema)
        .arg("--assets")
        .arg(&assets)
        .arg("-o")
        .arg(&output)
        .arg("--pretty")
        .status()
        .unwrap();
    assert!(status.success());

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        doc["blueprints"][id(1).to_string()]["Data"]["Portrait"],
        json!({"AssetId": "portrait_guid", "FileId": 42, "Index": 0})
    );
}

#[test]
fn decode_failure_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let pack = dir.path().join("blueprints.pack");
    let schema = dir.path().join("schema.json");
    // Index 3 with an empty asset table.
    fs::write(&pack, PackBuilder::new().record(id(1), unit_record(1, 3)).build()).unwrap();
    fs::write(&schema, SCHEMA).unwrap();

    let out = bin().arg(&pack).arg("--schema").arg(&schema).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("asset index 3 out of range"), "{stderr}");
}

#[test]
fn keep_going_writes_error_entries() {
    let dir = tempfile::tempdir().unwrap();
    let pack = dir.path().join("blueprints.pack");
    let schema = dir.path().join("schema.json");
    let mut bad = blueprint_pack_buffers::Writer::new();
    bad.guid(id(0x55));
    fs::write(
        &pack,
        PackBuilder::new()
            .record(id(1), bad.flush())
            .record(id(2), unit_record(5, -1))
            .build(),
    )
    .unwrap();
    fs::write(&schema, SCHEMA).unwrap();

    let out = bin()
        .arg(&pack)
        .arg("--schema")
        .arg(&schema)
        .arg("--keep-going")
        .args(["--workers", "2"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert!(doc["blueprints"][id(1).to_string()]["$error"].is_string());
    assert_eq!(doc["blueprints"][id(2).to_string()]["Data"]["Portrait"], json!(null));
}

#[test]
fn missing_schema_argument_is_usage_error() {
    let out = bin().arg("whatever.pack").output().unwrap();
    assert_eq!(out.status.code(), Some(2));
}
