use serde::Deserialize;

/// Settings for one load of a descriptor set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadOptions {
    /// Ignore every validation extension (`validate.disabled`, `validate.required`, `validate.rules`).
    pub skip_validation: bool,
}

impl LoadOptions {
    pub fn skip_validation() -> Self {
        Self {
            skip_validation: true,
        }
    }
}
