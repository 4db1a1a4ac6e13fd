mod common;

use blueprint_pack::{
    load_schema_document, AssetTable, PackDecoder, SchemaDocument, SchemaFileError,
    SchemaProvider, ValueSchema,
};
use common::{guid_record, id, PackBuilder, WireExt};
use serde_json::json;

const WRATH_DOC: &str = r#"{
    "dialect": "wrath",
    "types": [
        {"name": "BlueprintFoo", "fullName": "Game.BlueprintFoo",
         "typeId": "0123456789abcdef0123456789abcdef",
         "fields": [
            {"name": "m_Level", "value": {"kind": "Int32"}},
            {"name": "Items", "value": {"kind": "List",
                "element": {"kind": "Object", "type": "Game.Item", "identified": true}}},
            {"name": "Mode", "value": {"kind": "EnumInt32", "type": "Game.Mode"}},
            {"name": "Icon", "value": {"kind": "WeakResourceLink"}}
         ]},
        {"name": "Item", "fullName": "Game.Item",
         "typeId": "fedcba9876543210fedcba9876543210",
         "fields": [{"name": "Owner", "value": {"kind": "BlueprintRefWrath"}}]},
        {"name": "Mode", "fullName": "Game.Mode",
         "enum": {"flags": false, "constants": [{"name": "Off", "value": 0}, {"name": "On", "value": 1}]}}
    ]
}"#;

#[test]
fn loads_types_fields_and_enums() {
    let doc = SchemaDocument::from_json_str(WRATH_DOC).unwrap();
    let reg = load_schema_document(&doc).unwrap();
    assert_eq!(reg.dialect().name, "wrath");
    assert_eq!(reg.len(), 3);

    let foo = reg
        .resolve("0123456789abcdef0123456789abcdef".parse().unwrap())
        .unwrap();
    assert_eq!(foo.name, "BlueprintFoo");
    let names: Vec<&str> = foo.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["m_Level", "Items", "Mode", "Icon"]);

    let item = reg.lookup("Game.Item").unwrap();
    assert_eq!(
        foo.fields[1].value,
        ValueSchema::list(ValueSchema::object(item, true, false))
    );
    let mode = reg.type_schema(reg.lookup("Game.Mode").unwrap()).unwrap();
    assert_eq!(reg.enum_display_name(mode, 1), "On");
    assert_eq!(reg.enum_display_name(mode, 5), "Unset");
}

#[test]
fn decodes_pack_with_loaded_schema() {
    let reg = load_schema_document(&SchemaDocument::from_json_str(WRATH_DOC).unwrap()).unwrap();
    let foo: blueprint_pack::Guid = "0123456789abcdef0123456789abcdef".parse().unwrap();
    let item: blueprint_pack::Guid = "fedcba9876543210fedcba9876543210".parse().unwrap();
    let body = guid_record(
        foo,
        |w| {
            w.string("m_Level").i32(9);
            w.string("Items").i32(2);
            w.guid(item);
            w.string("Owner").guid(id(0xab));
            w.guid(blueprint_pack::Guid::ZERO);
            w.string("Mode").i32(1);
            w.string("Icon").string("AssetId").string("icon_01");
        },
        "Foo",
        id(0x42),
    );
    let archive = PackBuilder::new().record(id(1), body).build();
    let assets = AssetTable::default();
    let value = PackDecoder::new(&reg, &assets)
        .decode_pack_to_value(&archive)
        .unwrap();
    assert_eq!(
        value.to_json(),
        json!({"blueprints": {(id(1).to_string()): {
            "Data": {
                "$type": "0123456789abcdef0123456789abcdef, BlueprintFoo",
                "m_Level": 9,
                "Items": [
                    {"$type": "fedcba9876543210fedcba9876543210, Item",
                     "Owner": format!("!bp_{}", id(0xab))},
                    null
                ],
                "Mode": "On",
                "Icon": {"AssetId": "icon_01"}
            },
            "Name": "Foo",
            "AssetId": id(0x42).to_string()
        }}})
    );
}

#[test]
fn unknown_referenced_type() {
    let doc = SchemaDocument::from_json_str(
        r#"{"dialect": "rogue-trader", "types": [
            {"name": "A", "fullName": "Game.A",
             "fields": [{"name": "B", "value": {"kind": "Object", "type": "Game.Missing"}}]}
        ]}"#,
    )
    .unwrap();
    assert!(matches!(
        load_schema_document(&doc),
        Err(SchemaFileError::UnknownType(name)) if name == "Game.Missing"
    ));
}

#[test]
fn duplicate_type_name() {
    let doc = SchemaDocument::from_json_str(
        r#"{"dialect": "rogue-trader", "types": [
            {"name": "A", "fullName": "Game.A"},
            {"name": "A", "fullName": "Game.A"}
        ]}"#,
    )
    .unwrap();
    assert!(matches!(
        load_schema_document(&doc),
        Err(SchemaFileError::DuplicateType(name)) if name == "Game.A"
    ));
}

#[test]
fn duplicate_type_id() {
    let doc = SchemaDocument::from_json_str(
        r#"{"dialect": "rogue-trader", "types": [
            {"name": "A", "fullName": "Game.A", "typeId": "000000000000000000000000000000aa"},
            {"name": "B", "fullName": "Game.B", "typeId": "000000000000000000000000000000aa"}
        ]}"#,
    )
    .unwrap();
    match load_schema_document(&doc) {
        Err(SchemaFileError::DuplicateTypeId { first, second, .. }) => {
            assert_eq!(first, "Game.A");
            assert_eq!(second, "Game.B");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_dialect() {
    let doc = SchemaDocument::from_json_str(r#"{"dialect": "kingmaker", "types": []}"#).unwrap();
    assert!(matches!(
        load_schema_document(&doc),
        Err(SchemaFileError::UnknownDialect(name)) if name == "kingmaker"
    ));
}

#[test]
fn unknown_kind_is_a_parse_error() {
    let err = SchemaDocument::from_json_str(
        r#"{"dialect": "wrath", "types": [
            {"name": "A", "fullName": "Game.A", "fields": [{"name": "x", "value": {"kind": "Quaternion"}}]}
        ]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, SchemaFileError::Parse(_)));
}

#[test]
fn missing_schema_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchemaDocument::from_path(dir.path().join("schema.json")).unwrap_err();
    assert!(matches!(err, SchemaFileError::Io { .. }));
}
