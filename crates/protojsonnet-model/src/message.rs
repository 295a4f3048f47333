use crate::config::LoadOptions;
use crate::descriptor::DescriptorProto;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::enums::Enum;
use crate::error::ExtensionError;
use crate::extensions::{is_one_of_required, should_disable_validation, validation_rules};
use crate::field::{Field, FieldMeta};
use crate::types::{Identity, Type};
use serde::Serialize;
use std::collections::BTreeMap;

/// A one-of group and the names of its members, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OneOf {
    pub fields: Vec<String>,
    pub required: bool,
    pub group: String,
}

/// A protobuf message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    identity: Identity,
    map_entry: bool,
    /// Sorted by field name.
    fields: Vec<Field>,
    one_ofs: Vec<OneOf>,
    nested_messages: Vec<String>,
    nested_enums: Vec<String>,
}

/// State shared by every builder call during one load.
pub(crate) struct BuildContext<'a> {
    pub options: &'a LoadOptions,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> BuildContext<'a> {
    pub fn new(options: &'a LoadOptions) -> Self {
        Self {
            options,
            diagnostics: Vec::new(),
        }
    }

    fn malformed(&mut self, subject: String, err: ExtensionError) {
        tracing::warn!(subject = %subject, error = %err, "ignoring malformed extension");
        self.diagnostics.push(Diagnostic {
            kind: DiagnosticKind::MalformedExtension,
            subject,
            message: err.to_string(),
        });
    }
}

impl Message {
    /// Build a message and, depth-first, every type nested inside it.
    ///
    /// The nested types are returned alongside the message (enums of a message
    /// before its messages, each message followed by its own descendants); the
    /// message itself only keeps their qualified names.
    pub(crate) fn build(
        package: &str,
        m: &DescriptorProto,
        parent: Option<&Identity>,
        ctx: &mut BuildContext<'_>,
    ) -> (Self, Vec<Type>) {
        let identity = Identity::new(package, m.name(), parent);
        let qualified = identity.qualified_name();

        let mut validate = !ctx.options.skip_validation;
        if validate {
            match should_disable_validation(m.options.as_ref()) {
                Ok(disabled) => validate = !disabled,
                Err(err) => ctx.malformed(qualified.clone(), err),
            }
        }

        let mut one_ofs: Vec<OneOf> = Vec::with_capacity(m.oneof_decl.len());
        for o in &m.oneof_decl {
            let mut required = false;
            if validate {
                match is_one_of_required(o.options.as_ref()) {
                    Ok(r) => required = r,
                    Err(err) => ctx.malformed(format!("{qualified}.{}", o.name()), err),
                }
            }
            one_ofs.push(OneOf {
                fields: Vec::new(),
                required,
                group: o.name().to_string(),
            });
        }

        let mut fields = Vec::with_capacity(m.field.len());
        for f in &m.field {
            let mut rules = None;
            if validate {
                match validation_rules(f.options.as_ref()) {
                    Ok(r) => rules = r,
                    Err(err) => ctx.malformed(format!("{qualified}.{}", f.name()), err),
                }
            }
            let group = f
                .oneof_index
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| one_ofs.get_mut(i))
                .map(|o| {
                    o.fields.push(f.name().to_string());
                    o.group.clone()
                });
            if f.oneof_index.is_some() && group.is_none() {
                tracing::debug!(
                    type_name = %qualified,
                    field = f.name(),
                    "one-of index out of range"
                );
            }
            fields.push(Field::build(f, group, rules));
        }
        fields.sort_by(|a, b| a.name().cmp(b.name()));

        let mut nested = Vec::new();
        let mut nested_enums = Vec::with_capacity(m.enum_type.len());
        for e in &m.enum_type {
            let built = Enum::build(package, e, Some(&identity));
            nested_enums.push(built.identity().qualified_name());
            nested.push(Type::Enum(built));
        }
        let mut nested_messages = Vec::with_capacity(m.nested_type.len());
        for child in &m.nested_type {
            let (built, descendants) = Message::build(package, child, Some(&identity), ctx);
            nested_messages.push(built.identity().qualified_name());
            nested.push(Type::Message(built));
            nested.extend(descendants);
        }

        let message = Self {
            identity,
            map_entry: m.is_map_entry(),
            fields,
            one_ofs,
            nested_messages,
            nested_enums,
        };
        (message, nested)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Whether this message was synthesized to hold one entry of a `map<K, V>` field.
    pub fn is_map_entry(&self) -> bool {
        self.map_entry
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn one_ofs(&self) -> &[OneOf] {
        &self.one_ofs
    }

    /// Qualified names of the messages declared directly inside this one.
    pub fn nested_messages(&self) -> &[String] {
        &self.nested_messages
    }

    /// Qualified names of the enums declared directly inside this one.
    pub fn nested_enums(&self) -> &[String] {
        &self.nested_enums
    }

    /// Field metadata keyed by canonical field name.
    pub fn field_meta(&self) -> BTreeMap<String, FieldMeta> {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.meta()))
            .collect()
    }
}
