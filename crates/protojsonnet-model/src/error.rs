use thiserror::Error;

/// Errors at the ingestion boundary and in name-based lookups.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to parse descriptor set JSON: {0}")]
    Descriptor(#[source] serde_json::Error),
    #[error("type {0:?} is not registered")]
    UnknownType(String),
    #[error("type {0:?} is an enum, not a message")]
    NotAMessage(String),
}

/// An extension was set but its value could not be read as the requested shape.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("cannot read extension [{extension}] of shape {actual} as {expected}")]
    Shape {
        extension: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("invalid payload for extension [{extension}]: {source}")]
    Payload {
        extension: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
