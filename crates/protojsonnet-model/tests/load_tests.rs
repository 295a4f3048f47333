use protojsonnet_model::{
    ContainerType, Enum, FieldKind, LoadOptions, Message, Registry, UNKNOWN_ENUM_VALUE,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

fn load(name: &str, options: LoadOptions) -> Registry {
    Registry::from_json(&fixture(name), &options).expect("fixture should parse")
}

fn meta_json(msg: &Message) -> Value {
    serde_json::to_value(msg.field_meta()).unwrap()
}

#[test]
fn simple_schema_resolves_every_type() {
    let registry = load("simple.json", LoadOptions::default());
    assert_eq!(registry.len(), 7);
    assert!(registry.diagnostics().is_empty());

    let top = registry.get("testdata.simple.TopMessage").expect("top message");
    assert!(top.is_top_level());
    assert_eq!(top.name(), "TopMessage");
    assert_eq!(top.nested_name(), "TopMessage");
    assert_eq!(top.qualified_name(), "testdata.simple.TopMessage");
    assert_eq!(top.package(), "testdata.simple");
    assert!(top.as_enum().is_none());

    let msg = top.as_message().unwrap();
    assert_eq!(msg.fields().len(), 16);
    for f in msg.fields() {
        assert!(!f.is_required());
        assert!(!f.is_map());
        assert!(!f.is_list());
        assert_eq!(f.container_type(), ContainerType::None);
        assert_eq!(f.one_of_group(), None);
        assert!(f.validation_rules().is_none());
        if f.name() == "enum_field" {
            assert_eq!(f.kind(), FieldKind::Enum);
            assert_eq!(f.type_name(), "testdata.simple.TopLevelEnum");
        } else {
            assert_eq!(f.kind(), FieldKind::Primitive);
        }
    }

    let meta = meta_json(msg);
    assert_eq!(
        meta["int64_field"],
        json!({ "type": "int64", "allowedNames": ["int64_field", "int64Field"] })
    );
    assert_eq!(
        meta["enum_field"],
        json!({ "type": "testdata.simple.TopLevelEnum", "allowedNames": ["enum_field", "enumField"] })
    );
}

#[test]
fn fields_are_sorted_by_name_regardless_of_declaration() {
    let registry = load("simple.json", LoadOptions::default());
    let msg = registry.message("testdata.simple.TopMessage").unwrap();
    let names: Vec<_> = msg.fields().iter().map(|f| f.name()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(names.first(), Some(&"bool_field"));
}

#[test]
fn nested_list_field() {
    let registry = load("simple.json", LoadOptions::default());
    let msg = registry
        .message("testdata.simple.TopMessage.InnerMessage1")
        .unwrap();
    assert!(!msg.identity().is_top_level());
    let numbers = msg.field("numbers").unwrap();
    assert_eq!(numbers.container_type(), ContainerType::List);
    assert!(numbers.is_list());
    assert!(!numbers.is_map());
    assert!(!numbers.is_required());
    assert_eq!(
        meta_json(msg)["numbers"],
        json!({ "type": "int32", "allowedNames": ["numbers"], "containerType": "list" })
    );
}

#[test]
fn nested_one_of_and_maps() {
    let registry = load("simple.json", LoadOptions::default());
    let msg = registry
        .message("testdata.simple.TopMessage.InnerMessage2")
        .unwrap();

    let one_ofs = msg.one_ofs();
    assert_eq!(one_ofs.len(), 1);
    assert_eq!(one_ofs[0].group, "main_or_stub");
    assert_eq!(one_ofs[0].fields, ["main", "stub"]);
    assert!(!one_ofs[0].required);

    let msgs = msg.field("msgs").unwrap();
    assert!(msgs.is_map());
    assert_eq!(msgs.kind(), FieldKind::Message);
    assert_eq!(msgs.container_type(), ContainerType::Map);
    assert_eq!(msgs.type_name(), "testdata.simple.TopMessage.InnerMessage1");

    let simple_map = msg.field("simple_map").unwrap();
    assert_eq!(simple_map.setter_name(), "withSimpleMap");
    assert_eq!(simple_map.type_name(), "string");
    assert!(simple_map.is_map());

    assert_eq!(
        meta_json(msg),
        json!({
            "main": { "type": "testdata.simple.TopMessage.InnerMessage1", "allowedNames": ["main"] },
            "stub": { "type": "testdata.simple.TopMessage.InnerMessage1", "allowedNames": ["stub"] },
            "msgs": { "type": "testdata.simple.TopMessage.InnerMessage1", "allowedNames": ["msgs"], "containerType": "map" },
            "simple_map": { "type": "string", "allowedNames": ["simple_map", "simpleMap"], "containerType": "map" }
        })
    );
}

#[test]
fn top_level_enum_views() {
    let registry = load("simple.json", LoadOptions::default());
    let e = registry.enum_type("testdata.simple.TopLevelEnum").unwrap();
    let expect = |pairs: &[(&str, &str)]| -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    };
    assert_eq!(
        e.map(),
        expect(&[("FIRST", "FIRST"), ("SECOND", "SECOND"), ("THIRD", "THIRD")])
    );
    assert_eq!(
        e.reverse_map(),
        expect(&[("0", "FIRST"), ("1", "SECOND"), ("2", "THIRD")])
    );
    assert_eq!(e.name_for_first_value(), "FIRST");

    let flavor = registry
        .enum_type("testdata.simple.TopMessage.InnerMessage1.Flavor")
        .unwrap();
    assert_eq!(flavor.identity().nested_name(), "TopMessage.InnerMessage1.Flavor");
}

#[test]
fn missing_enum_resolves_to_unknown() {
    assert_eq!(Enum::default().name_for_first_value(), UNKNOWN_ENUM_VALUE);
    let registry = load("simple.json", LoadOptions::default());
    let name = registry
        .enum_type("testdata.simple.Missing")
        .map_or(UNKNOWN_ENUM_VALUE, Enum::name_for_first_value);
    assert_eq!(name, "UNKNOWN");
}

#[test]
fn validation_rules_drive_required_and_constraints() {
    let registry = load("validate.json", LoadOptions::default());
    assert!(registry.diagnostics().is_empty());
    let msg = registry.message("testdata.genvalidate.TopMessage").unwrap();

    assert_eq!(
        meta_json(msg),
        json!({
            "by_id": {
                "type": "string",
                "allowedNames": ["by_id", "byId"],
                "constraints": { "string": { "uuid": true } }
            },
            "by_name": { "type": "string", "allowedNames": ["by_name", "byName"] },
            "count": {
                "type": "int32",
                "allowedNames": ["count"],
                "constraints": { "int32": { "gte": 1, "lt": 100 } }
            },
            "labels": {
                "type": "string",
                "allowedNames": ["labels"],
                "containerType": "map",
                "required": true,
                "constraints": { "map": { "min_pairs": 1 } }
            },
            "name": {
                "type": "string",
                "allowedNames": ["name"],
                "constraints": { "string": { "min_len": 1, "max_len": 64 } }
            },
            "optional_tags": {
                "type": "string",
                "allowedNames": ["optional_tags", "optionalTags"],
                "containerType": "list",
                "constraints": { "repeated": { "min_items": 1, "ignore_empty": true } }
            },
            "owner": {
                "type": "testdata.genvalidate.Owner",
                "allowedNames": ["owner"],
                "required": true
            },
            "tags": {
                "type": "string",
                "allowedNames": ["tags"],
                "containerType": "list",
                "required": true,
                "constraints": { "repeated": { "min_items": 1, "unique": true } }
            }
        })
    );

    assert_eq!(msg.one_ofs()[0].group, "choice");
    assert!(msg.one_ofs()[0].required);
    assert_eq!(msg.one_ofs()[0].fields, ["by_id", "by_name"]);
}

#[test]
fn disabled_message_has_no_rules() {
    let registry = load("validate.json", LoadOptions::default());
    let unchecked = registry.message("testdata.genvalidate.Unchecked").unwrap();
    let owner = unchecked.field("owner").unwrap();
    assert!(owner.validation_rules().is_none());
    assert!(!owner.is_required());

    // other messages in the same file are unaffected
    let owner_type = registry.message("testdata.genvalidate.Owner").unwrap();
    assert!(owner_type.field("email").unwrap().constraints().is_some());
}

#[test]
fn constraints_share_one_convention_across_rule_kinds() {
    let registry = load("validate.json", LoadOptions::default());
    let owner = registry.message("testdata.genvalidate.Owner").unwrap();
    assert_eq!(
        owner.field("tenure_days").unwrap().constraints(),
        Some(json!({ "int64": { "gte": 0, "lt": 36500, "not_in": [13] } }))
    );

    let top = registry.message("testdata.genvalidate.TopMessage").unwrap();
    for f in top.fields() {
        let Some(Value::Object(c)) = f.constraints() else { continue };
        for body in c.values() {
            for key in body.as_object().unwrap().keys() {
                assert!(!key.chars().any(char::is_uppercase), "{}: {key}", f.name());
            }
        }
    }
}

#[test]
fn skipping_validation_reports_nothing_required() {
    let registry = load("validate.json", LoadOptions::skip_validation());
    for (_, t) in registry.iter() {
        let Some(msg) = t.as_message() else { continue };
        for f in msg.fields() {
            assert!(!f.is_required(), "{}", f.name());
            assert!(f.constraints().is_none(), "{}", f.name());
            assert!(f.validation_rules().is_none(), "{}", f.name());
        }
        assert!(msg.one_ofs().iter().all(|o| !o.required));
    }
    // map promotion does not depend on validation
    let labels = registry
        .message("testdata.genvalidate.TopMessage")
        .unwrap()
        .field("labels")
        .unwrap();
    assert!(labels.is_map());
}

#[test]
fn loading_twice_is_deterministic() {
    let a = load("simple.json", LoadOptions::default());
    let b = load("simple.json", LoadOptions::default());
    assert_eq!(a.names().collect::<Vec<_>>(), b.names().collect::<Vec<_>>());
    for ((name_a, ta), (_, tb)) in a.iter().zip(b.iter()) {
        assert_eq!(ta, tb, "{name_a}");
    }
}
