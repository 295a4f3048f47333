//! Descriptor set JSON (subset).
//!
//! We read the JSON rendering of `google.protobuf.FileDescriptorSet` as
//! produced by `buf build --as-file-descriptor-set -o set.json`. Custom options
//! show up as bracketed keys (`"[validate.rules]": {...}`), so options are kept
//! as a loose JSON object and decoded later by [`crate::extensions`].
//!
//! Attribute names are accepted in both lowerCamel (the JSON mapping) and
//! snake_case (the `.proto` field names). Absent attributes behave like the
//! protobuf zero-value, through the accessor methods.

use crate::error::ModelError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Options of a message, field, one-of or enum, keyed as in the JSON rendering.
pub type OptionsJson = BTreeMap<String, Value>;

/// Parse a descriptor set from its JSON rendering.
pub fn parse_descriptor_set(text: &str) -> Result<FileDescriptorSet, ModelError> {
    serde_json::from_str(text).map_err(ModelError::Descriptor)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileDescriptorSet {
    #[serde(default)]
    pub file: Vec<FileDescriptorProto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileDescriptorProto {
    pub name: Option<String>,
    pub package: Option<String>,
    #[serde(default, rename = "messageType", alias = "message_type")]
    pub message_type: Vec<DescriptorProto>,
    #[serde(default, rename = "enumType", alias = "enum_type")]
    pub enum_type: Vec<EnumDescriptorProto>,
    pub syntax: Option<String>,
}

impl FileDescriptorProto {
    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DescriptorProto {
    pub name: Option<String>,
    #[serde(default)]
    pub field: Vec<FieldDescriptorProto>,
    #[serde(default, rename = "nestedType", alias = "nested_type")]
    pub nested_type: Vec<DescriptorProto>,
    #[serde(default, rename = "enumType", alias = "enum_type")]
    pub enum_type: Vec<EnumDescriptorProto>,
    #[serde(default, rename = "oneofDecl", alias = "oneof_decl")]
    pub oneof_decl: Vec<OneofDescriptorProto>,
    #[serde(default)]
    pub options: Option<OptionsJson>,
}

impl DescriptorProto {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// True when the message was synthesized by the compiler for a `map<K, V>` field.
    pub fn is_map_entry(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.get("mapEntry").or_else(|| o.get("map_entry")))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OneofDescriptorProto {
    pub name: Option<String>,
    #[serde(default)]
    pub options: Option<OptionsJson>,
}

impl OneofDescriptorProto {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldDescriptorProto {
    pub name: Option<String>,
    pub number: Option<i32>,
    #[serde(default, deserialize_with = "de_label")]
    pub label: Option<Label>,
    #[serde(default, rename = "type", deserialize_with = "de_field_type")]
    pub typ: Option<ProtoType>,
    #[serde(rename = "typeName", alias = "type_name")]
    pub type_name: Option<String>,
    #[serde(rename = "jsonName", alias = "json_name")]
    pub json_name: Option<String>,
    #[serde(rename = "oneofIndex", alias = "oneof_index")]
    pub oneof_index: Option<i32>,
    #[serde(default)]
    pub options: Option<OptionsJson>,
}

impl FieldDescriptorProto {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// The JSON name, falling back to the name protoc would compute.
    pub fn json_name(&self) -> String {
        match &self.json_name {
            Some(name) => name.clone(),
            None => default_json_name(self.name()),
        }
    }

    pub fn type_name(&self) -> &str {
        self.type_name.as_deref().unwrap_or_default()
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Some(Label::Repeated)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnumDescriptorProto {
    pub name: Option<String>,
    #[serde(default)]
    pub value: Vec<EnumValueDescriptorProto>,
    #[serde(default)]
    pub options: Option<OptionsJson>,
}

impl EnumDescriptorProto {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnumValueDescriptorProto {
    pub name: Option<String>,
    pub number: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Optional,
    Required,
    Repeated,
}

impl Label {
    fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::Optional),
            2 => Some(Self::Required),
            3 => Some(Self::Repeated),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "LABEL_OPTIONAL" => Some(Self::Optional),
            "LABEL_REQUIRED" => Some(Self::Required),
            "LABEL_REPEATED" => Some(Self::Repeated),
            _ => None,
        }
    }
}

/// `google.protobuf.FieldDescriptorProto.Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtoType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl ProtoType {
    pub const ALL: [ProtoType; 18] = [
        Self::Double,
        Self::Float,
        Self::Int64,
        Self::Uint64,
        Self::Int32,
        Self::Fixed64,
        Self::Fixed32,
        Self::Bool,
        Self::String,
        Self::Group,
        Self::Message,
        Self::Bytes,
        Self::Uint32,
        Self::Enum,
        Self::Sfixed32,
        Self::Sfixed64,
        Self::Sint32,
        Self::Sint64,
    ];

    /// The descriptor enum name, e.g. `TYPE_INT32`.
    pub fn descriptor_name(self) -> &'static str {
        match self {
            Self::Double => "TYPE_DOUBLE",
            Self::Float => "TYPE_FLOAT",
            Self::Int64 => "TYPE_INT64",
            Self::Uint64 => "TYPE_UINT64",
            Self::Int32 => "TYPE_INT32",
            Self::Fixed64 => "TYPE_FIXED64",
            Self::Fixed32 => "TYPE_FIXED32",
            Self::Bool => "TYPE_BOOL",
            Self::String => "TYPE_STRING",
            Self::Group => "TYPE_GROUP",
            Self::Message => "TYPE_MESSAGE",
            Self::Bytes => "TYPE_BYTES",
            Self::Uint32 => "TYPE_UINT32",
            Self::Enum => "TYPE_ENUM",
            Self::Sfixed32 => "TYPE_SFIXED32",
            Self::Sfixed64 => "TYPE_SFIXED64",
            Self::Sint32 => "TYPE_SINT32",
            Self::Sint64 => "TYPE_SINT64",
        }
    }

    /// Lower-case tag used as the type name of primitive fields (`int32`, `string`, ...).
    pub fn primitive_tag(self) -> String {
        self.descriptor_name()
            .trim_start_matches("TYPE_")
            .to_ascii_lowercase()
    }

    fn from_number(n: i64) -> Option<Self> {
        if n < 1 {
            return None;
        }
        Self::ALL.get((n - 1) as usize).copied()
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.descriptor_name() == name)
    }
}

/// Enum values are rendered either by name or by number.
#[derive(Deserialize)]
#[serde(untagged)]
enum NameOrNumber {
    Name(String),
    Number(i64),
}

fn de_label<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Label>, D::Error> {
    use serde::de::Error as _;
    match Option::<NameOrNumber>::deserialize(d)? {
        None => Ok(None),
        Some(NameOrNumber::Number(n)) => Label::from_number(n)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unknown field label {n}"))),
        Some(NameOrNumber::Name(s)) => Label::from_name(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unknown field label {s:?}"))),
    }
}

fn de_field_type<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ProtoType>, D::Error> {
    use serde::de::Error as _;
    match Option::<NameOrNumber>::deserialize(d)? {
        None => Ok(None),
        Some(NameOrNumber::Number(n)) => ProtoType::from_number(n)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unknown field type {n}"))),
        Some(NameOrNumber::Name(s)) => ProtoType::from_name(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unknown field type {s:?}"))),
    }
}

/// 64-bit integers in the proto3 JSON mapping may be numbers or decimal strings.
pub(crate) fn de_opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    use serde::de::Error as _;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(u64),
        Text(String),
    }

    match Option::<Lenient>::deserialize(d)? {
        None => Ok(None),
        Some(Lenient::Number(n)) => Ok(Some(n)),
        Some(Lenient::Text(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid integer {s:?}: {e}"))),
    }
}

/// protoc's lowerCamel JSON name: underscores dropped, the following letter upper-cased.
pub fn default_json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_camel_and_snake_case_attribute_names() {
        let camel: DescriptorProto = serde_json::from_value(json!({
            "name": "A",
            "nestedType": [{ "name": "B" }],
            "oneofDecl": [{ "name": "choice" }],
            "field": [{ "name": "x", "type": "TYPE_INT32", "oneofIndex": 0, "jsonName": "x" }]
        }))
        .unwrap();
        let snake: DescriptorProto = serde_json::from_value(json!({
            "name": "A",
            "nested_type": [{ "name": "B" }],
            "oneof_decl": [{ "name": "choice" }],
            "field": [{ "name": "x", "type": 5, "oneof_index": 0, "json_name": "x" }]
        }))
        .unwrap();

        for m in [camel, snake] {
            assert_eq!(m.nested_type.len(), 1);
            assert_eq!(m.oneof_decl[0].name(), "choice");
            assert_eq!(m.field[0].typ, Some(ProtoType::Int32));
            assert_eq!(m.field[0].oneof_index, Some(0));
        }
    }

    #[test]
    fn label_and_type_accept_names_and_numbers() {
        let f: FieldDescriptorProto = serde_json::from_value(json!({
            "name": "tags", "label": "LABEL_REPEATED", "type": "TYPE_STRING"
        }))
        .unwrap();
        assert!(f.is_repeated());
        assert_eq!(f.typ.map(ProtoType::primitive_tag).as_deref(), Some("string"));

        let f: FieldDescriptorProto =
            serde_json::from_value(json!({ "name": "n", "label": 3, "type": 18 })).unwrap();
        assert!(f.is_repeated());
        assert_eq!(f.typ, Some(ProtoType::Sint64));

        let err = serde_json::from_value::<FieldDescriptorProto>(json!({ "type": "TYPE_NOPE" }));
        assert!(err.is_err());
    }

    #[test]
    fn missing_attributes_use_zero_values() {
        let f = FieldDescriptorProto::default();
        assert_eq!(f.name(), "");
        assert_eq!(f.type_name(), "");
        assert!(!f.is_repeated());
        assert!(!DescriptorProto::default().is_map_entry());
        assert_eq!(FileDescriptorProto::default().package(), "");
    }

    #[test]
    fn json_name_falls_back_to_lower_camel() {
        let f: FieldDescriptorProto =
            serde_json::from_value(json!({ "name": "simple_map_value" })).unwrap();
        assert_eq!(f.json_name(), "simpleMapValue");
        assert_eq!(default_json_name("already"), "already");
    }

    #[test]
    fn map_entry_marker_is_read_from_options() {
        let m: DescriptorProto =
            serde_json::from_value(json!({ "name": "E", "options": { "mapEntry": true } }))
                .unwrap();
        assert!(m.is_map_entry());
    }

    #[test]
    fn malformed_json_is_a_descriptor_error() {
        let err = parse_descriptor_set("{ not json").unwrap_err();
        assert!(matches!(err, ModelError::Descriptor(_)));
    }
}
