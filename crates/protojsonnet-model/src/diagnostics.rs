//! Structured record of the cases where loading degraded instead of failing.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An extension was set with an incompatible value; it was treated as absent.
    MalformedExtension,
    /// A list field referenced a message type that is not registered (another descriptor set).
    UnresolvedListElement,
    /// A list field referenced a map entry with no `value` field.
    UnresolvedMapEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The message, one-of or field the diagnostic is about (qualified).
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DiagnosticKind::MalformedExtension => "malformed extension",
            DiagnosticKind::UnresolvedListElement => "unresolved list element",
            DiagnosticKind::UnresolvedMapEntry => "unresolved map entry",
        };
        write!(f, "{kind}: {}: {}", self.subject, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_kind() {
        let d = Diagnostic {
            kind: DiagnosticKind::UnresolvedListElement,
            subject: "shop.Order.lines".to_string(),
            message: "element type \"catalog.Line\" is not registered".to_string(),
        };
        assert_eq!(
            d.to_string(),
            "unresolved list element: shop.Order.lines: element type \"catalog.Line\" is not registered"
        );
        assert_eq!(
            serde_json::to_value(&d).unwrap()["kind"],
            "unresolved_list_element"
        );
    }
}
