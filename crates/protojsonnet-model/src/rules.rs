//! protoc-gen-validate field rules.
//!
//! Only the parts consulted when deciding whether a field is required are
//! typed (`message.required`, the `repeated` and `map` blocks). Every other
//! rule kind is carried as JSON, normalized to the same convention as the
//! typed blocks: proto field names (`min_len`) and numeric 64-bit bounds.

use crate::descriptor::de_opt_u64;
use crate::error::ExtensionError;
use crate::extensions::shape_of;
use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const RULES_EXTENSION: &str = "validate.rules";

/// Rules attached to a single field through `(validate.rules)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct FieldRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageRules>,
    #[serde(flatten)]
    pub kind: Option<TypeRules>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// The type-specific part of the rules; at most one kind is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRules {
    Float(Value),
    Double(Value),
    Int32(Value),
    Int64(Value),
    Uint32(Value),
    Uint64(Value),
    Sint32(Value),
    Sint64(Value),
    Fixed32(Value),
    Fixed64(Value),
    Sfixed32(Value),
    Sfixed64(Value),
    Bool(Value),
    String(Value),
    Bytes(Value),
    Enum(Value),
    Any(Value),
    Duration(Value),
    Timestamp(Value),
    Repeated(RepeatedRules),
    Map(MapRules),
}

const TYPE_RULE_KEYS: &[&str] = &[
    "float",
    "double",
    "int32",
    "int64",
    "uint32",
    "uint64",
    "sint32",
    "sint64",
    "fixed32",
    "fixed64",
    "sfixed32",
    "sfixed64",
    "bool",
    "string",
    "bytes",
    "enum",
    "any",
    "duration",
    "timestamp",
    "repeated",
    "map",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepeatedRules {
    #[serde(
        default,
        alias = "minItems",
        deserialize_with = "de_opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_items: Option<u64>,
    #[serde(
        default,
        alias = "maxItems",
        deserialize_with = "de_opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldRules>>,
    #[serde(default, alias = "ignoreEmpty", skip_serializing_if = "Option::is_none")]
    pub ignore_empty: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapRules {
    #[serde(
        default,
        alias = "minPairs",
        deserialize_with = "de_opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_pairs: Option<u64>,
    #[serde(
        default,
        alias = "maxPairs",
        deserialize_with = "de_opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_pairs: Option<u64>,
    #[serde(default, alias = "noSparse", skip_serializing_if = "Option::is_none")]
    pub no_sparse: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Box<FieldRules>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Box<FieldRules>>,
    #[serde(default, alias = "ignoreEmpty", skip_serializing_if = "Option::is_none")]
    pub ignore_empty: Option<bool>,
}

impl FieldRules {
    /// Decode the JSON value of a `(validate.rules)` option. Unknown keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self, ExtensionError> {
        let Value::Object(obj) = value else {
            return Err(ExtensionError::Shape {
                extension: RULES_EXTENSION,
                expected: "object",
                actual: shape_of(value),
            });
        };
        let payload = |source| ExtensionError::Payload {
            extension: RULES_EXTENSION,
            source,
        };

        let message = match obj.get("message") {
            None | Some(Value::Null) => None,
            Some(v) => Some(serde_json::from_value::<MessageRules>(v.clone()).map_err(payload)?),
        };

        let kind = match obj
            .iter()
            .find(|(k, v)| TYPE_RULE_KEYS.contains(&k.as_str()) && !v.is_null())
        {
            None => None,
            Some((k, v)) => {
                let mut tagged = Map::new();
                tagged.insert(k.clone(), normalize_scalar(k, v));
                Some(serde_json::from_value::<TypeRules>(Value::Object(tagged)).map_err(payload)?)
            }
        };

        Ok(Self { message, kind })
    }

    pub fn repeated(&self) -> Option<&RepeatedRules> {
        match &self.kind {
            Some(TypeRules::Repeated(r)) => Some(r),
            _ => None,
        }
    }

    pub fn map(&self) -> Option<&MapRules> {
        match &self.kind {
            Some(TypeRules::Map(r)) => Some(r),
            _ => None,
        }
    }

    pub fn message_required(&self) -> bool {
        self.message
            .as_ref()
            .and_then(|m| m.required)
            .unwrap_or(false)
    }
}

impl TryFrom<Value> for FieldRules {
    type Error = ExtensionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Keys of a scalar rule kind that hold 64-bit integers, which descriptor JSON renders as strings.
fn int64_keys(kind: &str) -> &'static [&'static str] {
    match kind {
        "int64" | "uint64" | "sint64" | "fixed64" | "sfixed64" => {
            &["const", "lt", "lte", "gt", "gte", "in", "not_in"]
        }
        "string" => &["len", "min_len", "max_len", "len_bytes", "min_bytes", "max_bytes"],
        "bytes" => &["len", "min_len", "max_len"],
        _ => &[],
    }
}

/// Rewrite a scalar rule payload with snake_case keys and numeric 64-bit bounds.
/// `repeated` and `map` get the same treatment from their typed structs.
fn normalize_scalar(kind: &str, value: &Value) -> Value {
    if matches!(kind, "repeated" | "map") {
        return value.clone();
    }
    let Value::Object(obj) = value else {
        return value.clone();
    };
    let numeric = int64_keys(kind);
    let normalized = obj
        .iter()
        .map(|(k, v)| {
            let key = k.to_snake_case();
            let v = if numeric.contains(&key.as_str()) {
                parse_int(v)
            } else {
                snake_keys(v)
            };
            (key, v)
        })
        .collect();
    Value::Object(normalized)
}

/// Strings that do not parse as integers are kept as they are.
fn parse_int(value: &Value) -> Value {
    match value {
        Value::String(s) => s
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| s.parse::<u64>().map(Value::from))
            .unwrap_or_else(|_| value.clone()),
        Value::Array(items) => Value::Array(items.iter().map(parse_int).collect()),
        other => other.clone(),
    }
}

fn snake_keys(value: &Value) -> Value {
    match value {
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.to_snake_case(), snake_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(snake_keys).collect()),
        other => other.clone(),
    }
}

impl TypeRules {
    /// The type payload as a generic value, keyed by rule kind (`{"string": {...}}`).
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
