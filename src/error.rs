use thiserror::Error;

/// Everything that can go wrong while melting an entity graph into
/// attributes or casting it back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializerError {
    #[error("invalid entity type: {0}")]
    InvalidEntityKind(String),
    #[error("bad serializer tag `{tag}` on field `{field}`")]
    BadSchemaTag { field: String, tag: String },
    /// Nothing left to extract at `namespace`. Relation loading uses this
    /// to stop; it only reaches callers when the root record is empty.
    #[error("no more properties found at namespace `{namespace}`")]
    NoMoreProperties { namespace: String },
    #[error("scalar encode error: {0}")]
    ScalarEncode(String),
    #[error("scalar decode error: {0}")]
    ScalarDecode(String),
    #[error("key encode error: {0}")]
    KeyEncode(String),
    #[error("key decode error: {0}")]
    KeyDecode(String),
}

impl SerializerError {
    pub fn no_more_properties(namespace: &str) -> Self {
        SerializerError::NoMoreProperties {
            namespace: namespace.to_string(),
        }
    }

    pub fn bad_tag(field: &str, tag: &str) -> Self {
        SerializerError::BadSchemaTag {
            field: field.to_string(),
            tag: tag.to_string(),
        }
    }

    pub fn is_no_more_properties(&self) -> bool {
        matches!(self, SerializerError::NoMoreProperties { .. })
    }
}

pub type Result<T> = std::result::Result<T, SerializerError>;
