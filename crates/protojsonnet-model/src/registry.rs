//! The type registry: every message and enum of a descriptor set by qualified name.

use crate::config::LoadOptions;
use crate::descriptor::{parse_descriptor_set, FileDescriptorSet};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::enums::Enum;
use crate::error::ModelError;
use crate::message::{BuildContext, Message};
use crate::naming::file_path_for_type;
use crate::types::{FieldKind, Type};
use std::collections::BTreeMap;

/// Resolved types keyed by qualified name. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: BTreeMap<String, Type>,
    diagnostics: Vec<Diagnostic>,
}

impl Registry {
    /// Build the registry for a descriptor set.
    ///
    /// Loading never fails: malformed extensions and unresolvable map entries
    /// are recorded in [`Registry::diagnostics`] and otherwise ignored.
    pub fn load(set: &FileDescriptorSet, options: &LoadOptions) -> Self {
        let mut ctx = BuildContext::new(options);
        let mut registry = Registry::default();

        // ---------------------------------------------------------------------
        // Pass 1: build and register every message and enum.
        // ---------------------------------------------------------------------
        for file in &set.file {
            let package = file.package();
            for e in &file.enum_type {
                registry.register(Type::Enum(Enum::build(package, e, None)));
            }
            for m in &file.message_type {
                let (message, nested) = Message::build(package, m, None, &mut ctx);
                registry.register(Type::Message(message));
                for t in nested {
                    registry.register(t);
                }
            }
        }
        registry.diagnostics = ctx.diagnostics;

        // ---------------------------------------------------------------------
        // Pass 2: maps arrive as lists of synthetic entry messages; now that
        // every entry message is known, rewrite those lists into maps.
        // ---------------------------------------------------------------------
        registry.promote_map_fields();

        tracing::debug!(
            files = set.file.len(),
            types = registry.types.len(),
            diagnostics = registry.diagnostics.len(),
            "loaded descriptor set"
        );
        registry
    }

    /// Parse descriptor set JSON and load it.
    pub fn from_json(text: &str, options: &LoadOptions) -> Result<Self, ModelError> {
        Ok(Self::load(&parse_descriptor_set(text)?, options))
    }

    fn register(&mut self, t: Type) {
        let name = t.qualified_name();
        if self.types.insert(name.clone(), t).is_some() {
            tracing::debug!(type_name = %name, "type registered twice, keeping the last");
        }
    }

    fn promote_map_fields(&mut self) {
        let mut promotions: Vec<(String, usize, String)> = Vec::new();

        for (name, t) in &self.types {
            let Type::Message(m) = t else {
                continue;
            };
            for (idx, f) in m.fields().iter().enumerate() {
                if !f.is_list() || f.kind() != FieldKind::Message {
                    continue;
                }
                let subject = format!("{name}.{}", f.name());
                match self.types.get(f.type_name()) {
                    None => {
                        tracing::debug!(field = %subject, type_name = f.type_name(), "list element type not registered");
                        self.diagnostics.push(Diagnostic {
                            kind: DiagnosticKind::UnresolvedListElement,
                            subject,
                            message: format!("element type {:?} is not registered", f.type_name()),
                        });
                    }
                    Some(Type::Message(entry)) if entry.is_map_entry() => {
                        match entry.field("value") {
                            Some(value) => {
                                promotions.push((name.clone(), idx, value.type_name().to_string()))
                            }
                            None => {
                                tracing::debug!(field = %subject, "map entry has no value field");
                                self.diagnostics.push(Diagnostic {
                                    kind: DiagnosticKind::UnresolvedMapEntry,
                                    subject,
                                    message: format!(
                                        "map entry {:?} has no value field",
                                        f.type_name()
                                    ),
                                });
                            }
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        for (name, idx, value_type) in promotions {
            if let Some(Type::Message(m)) = self.types.get_mut(&name) {
                if let Some(f) = m.fields_mut().get_mut(idx) {
                    tracing::debug!(message_type = %name, field = f.name(), value_type = %value_type, "promoted list to map");
                    f.promote_to_map(value_type);
                }
            }
        }
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Type> {
        self.types.get(qualified_name)
    }

    pub fn message(&self, qualified_name: &str) -> Option<&Message> {
        self.get(qualified_name).and_then(Type::as_message)
    }

    pub fn enum_type(&self, qualified_name: &str) -> Option<&Enum> {
        self.get(qualified_name).and_then(Type::as_enum)
    }

    /// Like [`Registry::message`], with an error naming what went wrong.
    pub fn require_message(&self, qualified_name: &str) -> Result<&Message, ModelError> {
        match self.get(qualified_name) {
            Some(Type::Message(m)) => Ok(m),
            Some(Type::Enum(_)) => Err(ModelError::NotAMessage(qualified_name.to_string())),
            None => Err(ModelError::UnknownType(qualified_name.to_string())),
        }
    }

    /// Types in qualified-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_types(self) -> BTreeMap<String, Type> {
        self.types
    }

    /// The registered (map-promoted) messages declared directly inside `parent`.
    pub fn nested_messages<'a>(&'a self, parent: &'a Message) -> impl Iterator<Item = &'a Message> {
        parent
            .nested_messages()
            .iter()
            .filter_map(|name| self.message(name))
    }

    pub fn nested_enums<'a>(&'a self, parent: &'a Message) -> impl Iterator<Item = &'a Enum> {
        parent
            .nested_enums()
            .iter()
            .filter_map(|name| self.enum_type(name))
    }

    /// Qualified name → output path of the type, for cross-links between generated files.
    pub fn type_links(&self) -> BTreeMap<String, String> {
        self.types
            .iter()
            .map(|(name, t)| (name.clone(), file_path_for_type(t)))
            .collect()
    }
}
