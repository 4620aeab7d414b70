//! # Propmelt - Entity Graph Melting for Attribute Stores
//!
//! Converts typed record graphs (records owning single or repeated child
//! records) into the flat, ordered attribute lists a key/value style store
//! accepts, and rebuilds the graph from such a list alone.
//!
//! ## Modules
//!
//! - **melt**: flatten, row slicing, reconstruction and JSON Lines I/O
//! - **schema**: the [`Entity`] registry trait and relation annotations
//! - **codec**: scalar field and primary key codecs
//! - **namespace**: dotted attribute addressing
//!
//! ## Quick Start
//!
//! ```rust
//! use propmelt::{load_entity, save_entity, Entity, FieldTag, RelationVisitor, RelationVisitorMut};
//! use serde::{Deserialize, Serialize};
//!
//! const COMMENTS: FieldTag = FieldTag::new("comments", "relation,comments");
//!
//! #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Comment {
//!     text: String,
//! }
//!
//! impl Entity for Comment {}
//!
//! #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Post {
//!     text: String,
//!     #[serde(skip)]
//!     comments: Vec<Comment>,
//! }
//!
//! impl Entity for Post {
//!     fn visit_relations<V: RelationVisitor>(&self, visitor: &mut V) -> propmelt::Result<()> {
//!         visitor.repeated(COMMENTS, &self.comments)
//!     }
//!
//!     fn visit_relations_mut<V: RelationVisitorMut>(&mut self, visitor: &mut V) -> propmelt::Result<()> {
//!         visitor.repeated(COMMENTS, &mut self.comments)
//!     }
//! }
//!
//! # fn main() -> propmelt::Result<()> {
//! let post = Post {
//!     text: "My post".to_string(),
//!     comments: vec![
//!         Comment { text: "first".to_string() },
//!         Comment { text: "second".to_string() },
//!     ],
//! };
//!
//! // text, comments.text, comments.text
//! let attributes = save_entity(&post)?;
//! assert_eq!(attributes.len(), 3);
//!
//! let loaded: Post = load_entity(attributes)?;
//! assert_eq!(loaded, post);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod melt;
pub mod namespace;
pub mod schema;
pub mod types;

// Re-export commonly used types for convenience
pub use codec::{Key, KeyCodec, KeyId, ScalarCodec, SerdeScalarCodec, UrlKeyCodec};
pub use error::{Result, SerializerError};
pub use melt::{extract, extract_from, Extraction, Serializer};
pub use schema::{
    Cardinality, Entity, FieldTag, RelationDescriptor, RelationVisitor, RelationVisitorMut,
};
pub use types::{Attribute, AttributeList, AttributeValue, SerializerConfig, KEY_ATTRIBUTE};

/// Save `entity` with the default config and codecs
pub fn save_entity<E: Entity>(entity: &E) -> Result<AttributeList> {
    Serializer::new(SerializerConfig::default()).save(entity)
}

/// Load a record from `attributes` with the default config and codecs
pub fn load_entity<E: Entity>(attributes: AttributeList) -> Result<E> {
    Serializer::new(SerializerConfig::default()).load(attributes)
}
