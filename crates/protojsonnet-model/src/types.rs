//! Shared type identity and the `Type` union over messages and enums.

use crate::enums::Enum;
use crate::message::Message;
use serde::Serialize;

/// Where a message or enum lives: its package, local name, and enclosing messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    package: String,
    name: String,
    /// Local names of the enclosing messages, outermost first.
    parents: Vec<String>,
}

impl Identity {
    pub fn new(package: &str, name: &str, parent: Option<&Identity>) -> Self {
        let parents = match parent {
            Some(p) => {
                let mut chain = p.parents.clone();
                chain.push(p.name.clone());
                chain
            }
            None => Vec::new(),
        };
        Self {
            package: package.to_string(),
            name: name.to_string(),
            parents,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn is_top_level(&self) -> bool {
        self.parents.is_empty()
    }

    /// Dotted path without the package (`Outer.Inner`).
    pub fn nested_name(&self) -> String {
        if self.parents.is_empty() {
            return self.name.clone();
        }
        format!("{}.{}", self.parents.join("."), self.name)
    }

    /// Package plus nested path; the registry key.
    pub fn qualified_name(&self) -> String {
        let nested = self.nested_name();
        if self.package.is_empty() {
            nested
        } else {
            format!("{}.{nested}", self.package)
        }
    }
}

/// How a field's value is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Primitive,
    Enum,
    Message,
}

/// Whether a field holds one value, a list, or a string-keyed map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    #[default]
    None,
    List,
    Map,
}

impl ContainerType {
    pub fn is_none(&self) -> bool {
        *self == Self::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

/// A registered type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Message(Message),
    Enum(Enum),
}

impl Type {
    pub fn identity(&self) -> &Identity {
        match self {
            Type::Message(m) => m.identity(),
            Type::Enum(e) => e.identity(),
        }
    }

    pub fn name(&self) -> &str {
        self.identity().name()
    }

    pub fn package(&self) -> &str {
        self.identity().package()
    }

    pub fn is_top_level(&self) -> bool {
        self.identity().is_top_level()
    }

    pub fn nested_name(&self) -> String {
        self.identity().nested_name()
    }

    pub fn qualified_name(&self) -> String {
        self.identity().qualified_name()
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Type::Message(m) => Some(m),
            Type::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Enum> {
        match self {
            Type::Enum(e) => Some(e),
            Type::Message(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Type::Message(_) => "message",
            Type::Enum(_) => "enum",
        }
    }
}
