//! Relation metadata
//!
//! Records register their primary key and relation fields by implementing
//! [`Entity`]; relation annotations are parsed from [`FieldTag`]s.

pub mod entity;
pub mod tag;

pub use entity::{Entity, RelationVisitor, RelationVisitorMut};
pub use tag::{parse_tag, Cardinality, FieldTag, RelationDescriptor};
