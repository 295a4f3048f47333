//! Resolved type model for protobuf descriptor sets.
//!
//! Generators do not work on raw descriptors. This crate turns a descriptor
//! set (the JSON rendering of `google.protobuf.FileDescriptorSet`) into a
//! [`Registry`] of fully resolved [`Message`]s and [`Enum`]s:
//!
//! - every type is keyed by its qualified name (`package.Outer.Inner`)
//! - fields are classified (primitive / enum / message) and shaped
//!   (scalar / list / map); `map<K, V>` fields, which descriptors encode as
//!   repeated synthetic entry messages, are resolved in a second pass
//! - protoc-gen-validate options (`validate.disabled`, `validate.required`,
//!   `validate.rules`) are decoded into typed rules, from which required-ness
//!   and constraints are derived
//! - field order is deterministic (sorted by name)
//!
//! ```no_run
//! use protojsonnet_model::{LoadOptions, Registry};
//!
//! # fn main() -> Result<(), protojsonnet_model::ModelError> {
//! let text = std::fs::read_to_string("descriptor.json").unwrap();
//! let registry = Registry::from_json(&text, &LoadOptions::default())?;
//! for (name, t) in registry.iter() {
//!     println!("{name} ({})", t.kind());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod enums;
pub mod error;
pub mod extensions;
pub mod field;
pub mod message;
pub mod naming;
pub mod registry;
pub mod rules;
pub mod tree;
pub mod types;

pub use config::LoadOptions;
pub use descriptor::{parse_descriptor_set, FileDescriptorSet};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use enums::{Enum, EnumValue, UNKNOWN_ENUM_VALUE};
pub use error::{ExtensionError, ModelError};
pub use field::{is_required, Field, FieldMeta};
pub use message::{Message, OneOf};
pub use naming::{file_name_for_type, file_path_for_type};
pub use registry::Registry;
pub use rules::{FieldRules, MapRules, MessageRules, RepeatedRules, TypeRules};
pub use tree::{PackageNode, PackageTree};
pub use types::{ContainerType, FieldKind, Identity, Type};
