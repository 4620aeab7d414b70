//! Declaration-time relation annotations
//!
//! Each relation field carries a tag string such as `"relation,comments"`.
//! Tags are parsed when they are read, so a malformed one surfaces as
//! `BadSchemaTag` the first time a save or load walks past it. Primary
//! keys are not tagged; records expose them through `Entity::primary_key`.

use crate::error::{Result, SerializerError};
use once_cell::sync::Lazy;
use regex::Regex;

pub const ANNOTATION_RELATION: &str = "relation";

// A dot inside a segment would shift every child namespace one level down
static SEGMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap()
});

/// How many children a relation field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Zero or one child (`Option<C>`)
    Single,
    /// Ordered, unbounded children (`Vec<C>`)
    Repeated,
}

/// Static metadata of one relation field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescriptor {
    pub segment: String,
    pub cardinality: Cardinality,
}

/// A field name paired with its raw annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTag {
    pub field: &'static str,
    pub tag: &'static str,
}

impl FieldTag {
    pub const fn new(field: &'static str, tag: &'static str) -> Self {
        FieldTag { field, tag }
    }

    /// Namespace segment named by the tag
    pub fn segment(&self) -> Result<&'static str> {
        parse_tag(self.field, self.tag)
    }

    /// Descriptor for this field when it is handed over as a relation slot
    /// of the given cardinality.
    pub fn relation(&self, cardinality: Cardinality) -> Result<RelationDescriptor> {
        Ok(RelationDescriptor {
            segment: self.segment()?.to_string(),
            cardinality,
        })
    }
}

/// Parse `"relation,<segment>[,...]"` into its segment
pub fn parse_tag<'t>(field: &str, tag: &'t str) -> Result<&'t str> {
    let args: Vec<&'t str> = tag.split(',').map(str::trim).collect();
    match args.as_slice() {
        [ANNOTATION_RELATION, segment, ..] if SEGMENT_REGEX.is_match(segment) => Ok(*segment),
        _ => Err(SerializerError::bad_tag(field, tag)),
    }
}
