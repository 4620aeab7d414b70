//! Collaborators the melt core delegates to
//!
//! - **scalar**: a record's own scalar fields to and from bare attributes
//! - **key**: primary keys to and from stored key tokens

mod finite;
pub mod key;
pub mod scalar;

pub use key::{Key, KeyCodec, KeyId, UrlKeyCodec};
pub use scalar::{ScalarCodec, SerdeScalarCodec};
