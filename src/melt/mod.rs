//! Entity graph melting - flatten records into namespaced attributes and
//! cast them back
//!
//! Saving walks the graph depth-first and prefixes every attribute with the
//! namespace of its record. Loading slices one record at a time off the
//! draining attribute list; repeated relations end when a slice comes back
//! empty, so no child counts are stored.

pub mod extract;
pub mod flatten;
pub mod reconstruct;
pub mod serializer;
pub mod writer;

pub use extract::{extract, extract_from, slice_rows, Extraction};
pub use flatten::Flattener;
pub use reconstruct::Reconstructor;
pub use serializer::Serializer;
pub use writer::{read_attributes, Row, RowWriter};
