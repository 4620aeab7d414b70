use crate::codec::{KeyCodec, ScalarCodec};
use crate::error::{Result, SerializerError};
use crate::melt::extract::extract_from;
use crate::namespace;
use crate::schema::{Cardinality, Entity, FieldTag, RelationVisitorMut};
use crate::types::{AttributeList, AttributeValue, SerializerConfig};
use tracing::trace;

/// Rebuilds an entity graph by repeatedly slicing records off a draining
/// attribute list
pub struct Reconstructor<'a, S, K> {
    config: &'a SerializerConfig,
    scalars: &'a S,
    keys: &'a K,
}

impl<'a, S: ScalarCodec, K: KeyCodec> Reconstructor<'a, S, K> {
    pub fn new(config: &'a SerializerConfig, scalars: &'a S, keys: &'a K) -> Self {
        Reconstructor {
            config,
            scalars,
            keys,
        }
    }

    /// Load one record at `namespace` into `entity`, then its relations.
    ///
    /// Fails with `NoMoreProperties` when nothing is left at `namespace`
    /// or the namespace lies beyond the depth cap. On any other failure
    /// `entity` may be partially populated and should be discarded.
    pub fn load<E: Entity>(
        &self,
        entity: &mut E,
        list: &mut AttributeList,
        namespace: &str,
        depth: usize,
    ) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(SerializerError::no_more_properties(namespace));
        }

        let extraction = extract_from(namespace, list);
        if extraction.is_empty() {
            return Err(SerializerError::no_more_properties(namespace));
        }

        let mut properties = extraction.attributes;
        for property in &mut properties {
            property.multiple = false;
        }
        self.scalars.decode(entity, properties)?;

        match extraction.key {
            Some(AttributeValue::Key(key)) => {
                let key = self.keys.decode_key(&key)?;
                entity.set_primary_key(key);
            }
            Some(_) => {
                return Err(SerializerError::KeyDecode(format!(
                    "key attribute at `{namespace}` does not hold a key"
                )));
            }
            None => {}
        }

        let mut visitor = LoadVisitor {
            reconstructor: self,
            list,
            namespace,
            depth,
        };
        entity.visit_relations_mut(&mut visitor)
    }
}

struct LoadVisitor<'r, 'a, S, K> {
    reconstructor: &'r Reconstructor<'a, S, K>,
    list: &'r mut AttributeList,
    namespace: &'r str,
    depth: usize,
}

impl<'r, 'a, S: ScalarCodec, K: KeyCodec> LoadVisitor<'r, 'a, S, K> {
    /// Load a fresh child; `None` when the namespace has no record left
    fn load_child<C: Entity>(&mut self, child_namespace: &str) -> Result<Option<C>> {
        let mut child = C::default();
        match self
            .reconstructor
            .load(&mut child, self.list, child_namespace, self.depth + 1)
        {
            Ok(()) => Ok(Some(child)),
            Err(e) if e.is_no_more_properties() => {
                trace!(namespace = child_namespace, "no more records");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl<'r, 'a, S: ScalarCodec, K: KeyCodec> RelationVisitorMut for LoadVisitor<'r, 'a, S, K> {
    fn single<C: Entity>(&mut self, field: FieldTag, slot: &mut Option<C>) -> Result<()> {
        let descriptor = field.relation(Cardinality::Single)?;
        let child_namespace = namespace::child(self.namespace, &descriptor.segment);

        if let Some(child) = self.load_child(&child_namespace)? {
            *slot = Some(child);
        }
        Ok(())
    }

    fn repeated<C: Entity>(&mut self, field: FieldTag, slot: &mut Vec<C>) -> Result<()> {
        let descriptor = field.relation(Cardinality::Repeated)?;
        let child_namespace = namespace::child(self.namespace, &descriptor.segment);

        while let Some(child) = self.load_child(&child_namespace)? {
            slot.push(child);
        }
        Ok(())
    }
}
