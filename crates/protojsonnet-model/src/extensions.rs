//! Custom option (extension) extraction.
//!
//! In the descriptor JSON an extension appears as a bracketed key in the
//! options object of the element it annotates:
//!
//! ```json
//! { "options": { "[validate.rules]": { "string": { "minLen": "1" } } } }
//! ```
//!
//! Each extension we understand is a zero-sized type implementing
//! [`Extension`], which names the key and decodes the value into a concrete
//! Rust type. [`extract_extension`] does the lookup for any of them.

use crate::descriptor::OptionsJson;
use crate::error::ExtensionError;
use crate::rules::{FieldRules, RULES_EXTENSION};
use serde_json::Value;

/// A custom option with a statically known output shape.
pub trait Extension {
    /// Fully-qualified extension name, without brackets (e.g. `validate.rules`).
    const NAME: &'static str;
    type Output;

    fn decode(value: &Value) -> Result<Self::Output, ExtensionError>;
}

/// `(validate.disabled)` on message options.
pub struct Disabled;

/// `(validate.required)` on one-of options.
pub struct OneofRequired;

/// `(validate.rules)` on field options.
pub struct Rules;

impl Extension for Disabled {
    const NAME: &'static str = "validate.disabled";
    type Output = bool;

    fn decode(value: &Value) -> Result<bool, ExtensionError> {
        decode_bool(Self::NAME, value)
    }
}

impl Extension for OneofRequired {
    const NAME: &'static str = "validate.required";
    type Output = bool;

    fn decode(value: &Value) -> Result<bool, ExtensionError> {
        decode_bool(Self::NAME, value)
    }
}

impl Extension for Rules {
    const NAME: &'static str = RULES_EXTENSION;
    type Output = FieldRules;

    fn decode(value: &Value) -> Result<FieldRules, ExtensionError> {
        FieldRules::from_value(value)
    }
}

/// Look up extension `E` in an options object.
///
/// - `Ok(None)`: no options, empty options, or the extension is not set.
/// - `Ok(Some(_))`: the extension is set and decoded.
/// - `Err(_)`: the extension is set but its value has the wrong shape.
pub fn extract_extension<E: Extension>(
    options: Option<&OptionsJson>,
) -> Result<Option<E::Output>, ExtensionError> {
    let Some(options) = options.filter(|o| !o.is_empty()) else {
        return Ok(None);
    };
    match options.get(&format!("[{}]", E::NAME)) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => E::decode(value).map(Some),
    }
}

pub fn should_disable_validation(options: Option<&OptionsJson>) -> Result<bool, ExtensionError> {
    Ok(extract_extension::<Disabled>(options)?.unwrap_or(false))
}

pub fn is_one_of_required(options: Option<&OptionsJson>) -> Result<bool, ExtensionError> {
    Ok(extract_extension::<OneofRequired>(options)?.unwrap_or(false))
}

pub fn validation_rules(
    options: Option<&OptionsJson>,
) -> Result<Option<FieldRules>, ExtensionError> {
    extract_extension::<Rules>(options)
}

fn decode_bool(extension: &'static str, value: &Value) -> Result<bool, ExtensionError> {
    value.as_bool().ok_or(ExtensionError::Shape {
        extension,
        expected: "bool",
        actual: shape_of(value),
    })
}

pub(crate) fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
