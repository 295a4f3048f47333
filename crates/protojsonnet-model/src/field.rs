use crate::descriptor::{FieldDescriptorProto, ProtoType};
use crate::rules::FieldRules;
use crate::types::{ContainerType, FieldKind};
use serde::Serialize;
use serde_json::Value;

/// A resolved message field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    json_name: String,
    kind: FieldKind,
    container: ContainerType,
    /// Fully-qualified for enums and messages, a lower-case tag for primitives.
    type_name: String,
    one_of_group: Option<String>,
    /// Set whenever the descriptor declares a one-of index, even one we could not resolve.
    in_one_of: bool,
    rules: Option<FieldRules>,
}

impl Field {
    pub(crate) fn build(
        f: &FieldDescriptorProto,
        one_of_group: Option<String>,
        rules: Option<FieldRules>,
    ) -> Self {
        let (kind, type_name) = classify(f);
        // Maps also arrive as repeated fields; they are promoted once every type is registered.
        let container = if f.is_repeated() {
            ContainerType::List
        } else {
            ContainerType::None
        };
        Self {
            name: f.name().to_string(),
            json_name: f.json_name(),
            kind,
            container,
            type_name,
            one_of_group,
            in_one_of: f.oneof_index.is_some(),
            rules,
        }
    }

    /// Turn a list of map entries into a map of `value_type`. Only list fields can be promoted.
    pub(crate) fn promote_to_map(&mut self, value_type: String) -> bool {
        if self.container != ContainerType::List {
            return false;
        }
        self.container = ContainerType::Map;
        self.type_name = value_type;
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn json_name(&self) -> &str {
        &self.json_name
    }

    /// Names accepted when constructing a value: the canonical name, plus the JSON name if different.
    pub fn allowed_names(&self) -> Vec<String> {
        let mut names = vec![self.name.clone()];
        if self.json_name != self.name {
            names.push(self.json_name.clone());
        }
        names
    }

    pub fn one_of_group(&self) -> Option<&str> {
        self.one_of_group.as_deref()
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn container_type(&self) -> ContainerType {
        self.container
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_list(&self) -> bool {
        self.container == ContainerType::List
    }

    pub fn is_map(&self) -> bool {
        self.container == ContainerType::Map
    }

    /// Name of the generated setter, `with` + capitalized JSON name.
    pub fn setter_name(&self) -> String {
        let mut chars = self.json_name.chars();
        match chars.next() {
            Some(first) => format!("with{}{}", first.to_uppercase(), chars.as_str()),
            None => "with".to_string(),
        }
    }

    pub fn validation_rules(&self) -> Option<&FieldRules> {
        self.rules.as_ref()
    }

    pub fn is_required(&self) -> bool {
        is_required(self.container, self.rules.as_ref(), self.in_one_of)
    }

    /// The type-specific rule payload, e.g. `{"string": {"min_len": 1}}`.
    pub fn constraints(&self) -> Option<Value> {
        self.rules
            .as_ref()
            .and_then(|r| r.kind.as_ref())
            .map(|k| k.to_value())
    }

    pub fn meta(&self) -> FieldMeta {
        FieldMeta {
            type_name: self.type_name.clone(),
            allowed_names: self.allowed_names(),
            container_type: self.container,
            required: self.is_required(),
            constraints: self.constraints(),
        }
    }
}

/// Whether a field must be present, from its container shape and rules.
///
/// One-of members are never individually required for scalar shapes: in the
/// emitted JSON the chosen member is identified by presence, so the group
/// carries the requirement instead.
pub fn is_required(container: ContainerType, rules: Option<&FieldRules>, in_one_of: bool) -> bool {
    let Some(rules) = rules else {
        return false;
    };
    match container {
        ContainerType::None => rules.message_required() && !in_one_of,
        ContainerType::List => rules.repeated().is_some_and(|r| {
            !r.ignore_empty.unwrap_or(false) && r.min_items.unwrap_or(0) > 0
        }),
        ContainerType::Map => rules.map().is_some_and(|r| {
            !r.ignore_empty.unwrap_or(false) && r.min_pairs.unwrap_or(0) > 0
        }),
    }
}

fn classify(f: &FieldDescriptorProto) -> (FieldKind, String) {
    match f.typ {
        Some(ProtoType::Message) => (
            FieldKind::Message,
            f.type_name().trim_start_matches('.').to_string(),
        ),
        Some(ProtoType::Enum) => (
            FieldKind::Enum,
            f.type_name().trim_start_matches('.').to_string(),
        ),
        Some(t) => (FieldKind::Primitive, t.primitive_tag()),
        None => (FieldKind::Primitive, String::new()),
    }
}

/// Per-field attributes embedded in generated code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    #[serde(rename = "type")]
    pub type_name: String,
    pub allowed_names: Vec<String>,
    #[serde(skip_serializing_if = "ContainerType::is_none")]
    pub container_type: ContainerType,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Value>,
}
