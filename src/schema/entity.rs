use crate::error::Result;
use crate::schema::tag::FieldTag;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record that can be melted into attributes and cast back.
///
/// Scalar fields go through the scalar codec (serde by default), so the
/// primary key and every relation field must be `#[serde(skip)]`, and the
/// struct should be `#[serde(default)]` so partially stored records load.
/// Relations are announced explicitly through the visitors instead of
/// being discovered at runtime:
///
/// ```rust
/// use propmelt::{Entity, FieldTag, RelationVisitor, RelationVisitorMut, Result};
/// use serde::{Deserialize, Serialize};
///
/// const COMMENTS: FieldTag = FieldTag::new("comments", "relation,comments");
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// #[serde(default)]
/// struct Comment {
///     #[serde(skip)]
///     id: String,
///     text: String,
/// }
///
/// impl Entity for Comment {
///     fn primary_key(&self) -> Option<&str> {
///         Some(self.id.as_str())
///     }
///
///     fn set_primary_key(&mut self, key: String) {
///         self.id = key;
///     }
/// }
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// #[serde(default)]
/// struct Post {
///     text: String,
///     #[serde(skip)]
///     comments: Vec<Comment>,
/// }
///
/// impl Entity for Post {
///     fn visit_relations<V: RelationVisitor>(&self, visitor: &mut V) -> Result<()> {
///         visitor.repeated(COMMENTS, &self.comments)
///     }
///
///     fn visit_relations_mut<V: RelationVisitorMut>(&mut self, visitor: &mut V) -> Result<()> {
///         visitor.repeated(COMMENTS, &mut self.comments)
///     }
/// }
/// ```
pub trait Entity: Default + Serialize + DeserializeOwned {
    /// Canonical string form of the primary key; `None` or empty means unset
    fn primary_key(&self) -> Option<&str> {
        None
    }

    fn set_primary_key(&mut self, _key: String) {}

    /// Scalar fields the backing store should index
    fn indexed_fields() -> &'static [&'static str] {
        &[]
    }

    /// Hand every relation field to `visitor`, in declaration order
    fn visit_relations<V: RelationVisitor>(&self, _visitor: &mut V) -> Result<()> {
        Ok(())
    }

    /// Hand every relation slot to `visitor`, in the same order as
    /// [`Entity::visit_relations`]
    fn visit_relations_mut<V: RelationVisitorMut>(&mut self, _visitor: &mut V) -> Result<()> {
        Ok(())
    }
}

/// Receives read-only relation fields during a save
pub trait RelationVisitor {
    fn single<C: Entity>(&mut self, field: FieldTag, child: Option<&C>) -> Result<()>;
    fn repeated<C: Entity>(&mut self, field: FieldTag, children: &[C]) -> Result<()>;
}

/// Receives relation slots to fill during a load
pub trait RelationVisitorMut {
    fn single<C: Entity>(&mut self, field: FieldTag, slot: &mut Option<C>) -> Result<()>;
    fn repeated<C: Entity>(&mut self, field: FieldTag, slot: &mut Vec<C>) -> Result<()>;
}

// Lets self-referencing records hold `Option<Box<Self>>`
impl<T: Entity> Entity for Box<T> {
    fn primary_key(&self) -> Option<&str> {
        (**self).primary_key()
    }

    fn set_primary_key(&mut self, key: String) {
        (**self).set_primary_key(key);
    }

    fn indexed_fields() -> &'static [&'static str] {
        T::indexed_fields()
    }

    fn visit_relations<V: RelationVisitor>(&self, visitor: &mut V) -> Result<()> {
        (**self).visit_relations(visitor)
    }

    fn visit_relations_mut<V: RelationVisitorMut>(&mut self, visitor: &mut V) -> Result<()> {
        (**self).visit_relations_mut(visitor)
    }
}
