use crate::descriptor::EnumDescriptorProto;
use crate::types::Identity;
use std::collections::BTreeMap;

/// Returned by [`Enum::name_for_first_value`] when the enum declares no values.
pub const UNKNOWN_ENUM_VALUE: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

/// A protobuf enum, values kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enum {
    identity: Identity,
    values: Vec<EnumValue>,
}

impl Enum {
    pub(crate) fn build(package: &str, e: &EnumDescriptorProto, parent: Option<&Identity>) -> Self {
        Self {
            identity: Identity::new(package, e.name(), parent),
            values: e
                .value
                .iter()
                .map(|v| EnumValue {
                    name: v.name.clone().unwrap_or_default(),
                    number: v.number.unwrap_or_default(),
                })
                .collect(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// Value name → value name.
    pub fn map(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|v| (v.name.clone(), v.name.clone()))
            .collect()
    }

    /// Value name → number as a string.
    pub fn value_map(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|v| (v.name.clone(), v.number.to_string()))
            .collect()
    }

    /// Number as a string → value name. Aliased numbers keep the last declared name.
    pub fn reverse_map(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|v| (v.number.to_string(), v.name.clone()))
            .collect()
    }

    /// The first declared value's name, the natural default.
    pub fn name_for_first_value(&self) -> &str {
        self.values
            .first()
            .map_or(UNKNOWN_ENUM_VALUE, |v| v.name.as_str())
    }
}
