use crate::codec::{KeyCodec, ScalarCodec};
use crate::error::Result;
use crate::namespace;
use crate::schema::{Cardinality, Entity, FieldTag, RelationVisitor};
use crate::types::{Attribute, AttributeList, AttributeValue, SerializerConfig, KEY_ATTRIBUTE};
use tracing::trace;

/// Walks an entity graph depth-first into one flat attribute list
pub struct Flattener<'a, S, K> {
    config: &'a SerializerConfig,
    scalars: &'a S,
    keys: &'a K,
}

impl<'a, S: ScalarCodec, K: KeyCodec> Flattener<'a, S, K> {
    pub fn new(config: &'a SerializerConfig, scalars: &'a S, keys: &'a K) -> Self {
        Flattener {
            config,
            scalars,
            keys,
        }
    }

    /// Flatten `entity` and everything below it.
    ///
    /// `multiple` marks the node as part of a repeated collection somewhere
    /// up the chain. Output order: own scalars, own key, then relations in
    /// declaration order with repeated children in sequence.
    pub fn flatten<E: Entity>(
        &self,
        entity: &E,
        namespace: &str,
        multiple: bool,
        depth: usize,
    ) -> Result<AttributeList> {
        if depth > self.config.max_depth {
            trace!(namespace, depth, "depth cap reached, dropping record");
            return Ok(Vec::new());
        }

        let mut attributes = self.scalars.encode(entity)?;
        for attribute in &mut attributes {
            attribute.name = namespace::qualify(namespace, &attribute.name);
            attribute.multiple = multiple;
        }

        // The root's identity lives outside the attribute list
        if let Some(key) = entity.primary_key().filter(|key| !key.is_empty()) {
            if !namespace.is_empty() {
                let key = self.keys.encode_key(key)?;
                attributes.push(Attribute {
                    name: namespace::qualify(namespace, KEY_ATTRIBUTE),
                    value: AttributeValue::Key(key),
                    indexed: true,
                    multiple,
                });
            }
        }

        let mut visitor = FlattenVisitor {
            flattener: self,
            namespace,
            multiple,
            depth,
            attributes: &mut attributes,
        };
        entity.visit_relations(&mut visitor)?;

        Ok(attributes)
    }
}

struct FlattenVisitor<'f, 'a, S, K> {
    flattener: &'f Flattener<'a, S, K>,
    namespace: &'f str,
    multiple: bool,
    depth: usize,
    attributes: &'f mut AttributeList,
}

impl<'f, 'a, S: ScalarCodec, K: KeyCodec> RelationVisitor for FlattenVisitor<'f, 'a, S, K> {
    fn single<C: Entity>(&mut self, field: FieldTag, child: Option<&C>) -> Result<()> {
        let descriptor = field.relation(Cardinality::Single)?;
        let Some(child) = child else {
            return Ok(());
        };

        let child_namespace = namespace::child(self.namespace, &descriptor.segment);
        let attributes =
            self.flattener
                .flatten(child, &child_namespace, self.multiple, self.depth + 1)?;
        self.attributes.extend(attributes);
        Ok(())
    }

    fn repeated<C: Entity>(&mut self, field: FieldTag, children: &[C]) -> Result<()> {
        let descriptor = field.relation(Cardinality::Repeated)?;
        let child_namespace = namespace::child(self.namespace, &descriptor.segment);

        // Once repeated, every descendant is part of a repeated group
        for child in children {
            let attributes = self
                .flattener
                .flatten(child, &child_namespace, true, self.depth + 1)?;
            self.attributes.extend(attributes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Key, SerdeScalarCodec, UrlKeyCodec};
    use crate::error::SerializerError;
    use serde::{Deserialize, Serialize};

    const NOTE: FieldTag = FieldTag::new("note", "relation,note");
    const BROKEN: FieldTag = FieldTag::new("note", "relation");

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Note {
        #[serde(skip)]
        id: String,
        body: String,
        #[serde(skip)]
        note: Option<Box<Note>>,
    }

    impl Entity for Note {
        fn primary_key(&self) -> Option<&str> {
            Some(self.id.as_str())
        }

        fn visit_relations<V: RelationVisitor>(&self, visitor: &mut V) -> Result<()> {
            visitor.single(NOTE, self.note.as_ref())
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Broken {
        #[serde(skip)]
        note: Option<Note>,
    }

    impl Entity for Broken {
        fn visit_relations<V: RelationVisitor>(&self, visitor: &mut V) -> Result<()> {
            visitor.single(BROKEN, self.note.as_ref())
        }
    }

    fn chain(bodies: &[&str], key: &str) -> Note {
        let mut next: Option<Box<Note>> = None;
        for body in bodies.iter().rev() {
            next = Some(Box::new(Note {
                id: key.to_string(),
                body: body.to_string(),
                note: next,
            }));
        }
        next.map(|note| *note).unwrap_or_default()
    }

    fn flatten(entity: &Note, max_depth: usize) -> Result<AttributeList> {
        let config = SerializerConfig { max_depth };
        Flattener::new(&config, &SerdeScalarCodec, &UrlKeyCodec).flatten(entity, "", false, 0)
    }

    #[test]
    fn test_single_chain_namespaces() {
        let key = UrlKeyCodec.decode_key(&Key::named("Note", "n")).unwrap();
        let attributes = flatten(&chain(&["a", "b"], &key), 2).unwrap();

        assert_eq!(
            attributes,
            vec![
                Attribute::new("body", "a"),
                Attribute::new("note.body", "b"),
                Attribute::new("note.id", Key::named("Note", "n")).with_indexed(true),
            ]
        );
    }

    #[test]
    fn test_depth_cap_truncates_silently() {
        let attributes = flatten(&chain(&["a", "b", "c", "d"], ""), 2).unwrap();
        let names: Vec<_> = attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["body", "note.body", "note.note.body"]);

        let attributes = flatten(&chain(&["a", "b"], ""), 0).unwrap();
        assert_eq!(attributes, vec![Attribute::new("body", "a")]);
    }

    #[test]
    fn test_malformed_key_fails() {
        let err = flatten(&chain(&["a", "b"], "%%%"), 2).unwrap_err();
        assert!(matches!(err, SerializerError::KeyEncode(_)));

        // The root key is never encoded
        assert!(flatten(&chain(&["a"], "%%%"), 2).is_ok());
    }

    #[test]
    fn test_bad_tag_fails_on_read() {
        let config = SerializerConfig::default();
        let flattener = Flattener::new(&config, &SerdeScalarCodec, &UrlKeyCodec);
        let err = flattener
            .flatten(&Broken::default(), "", false, 0)
            .unwrap_err();
        assert!(matches!(err, SerializerError::BadSchemaTag { .. }));
    }
}
